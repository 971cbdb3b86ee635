//! Scheduled health checks
//!
//! A background task probes every target on a fixed interval and keeps the latest
//! status per target. The task stops when its [`CancellationToken`] is cancelled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use beatschain_services::{HealthProbe, HealthStatus};

type StatusMap = Arc<RwLock<HashMap<String, HealthStatus>>>;

pub struct HealthMonitor;

impl HealthMonitor {
    /// Start probing `targets` every `check_interval` until `cancel_token` is cancelled.
    ///
    /// The first round runs immediately.
    pub fn spawn(
        probe: Arc<dyn HealthProbe>,
        targets: Vec<String>,
        check_interval: Duration,
        cancel_token: CancellationToken,
    ) -> HealthMonitorHandle {
        let statuses: StatusMap = Arc::new(RwLock::new(HashMap::new()));
        let task = Self::create_monitor_task(
            probe,
            targets,
            check_interval,
            cancel_token.clone(),
            statuses.clone(),
        );

        HealthMonitorHandle {
            cancel_token,
            statuses,
            task,
        }
    }

    /// Probe every target once.
    pub async fn check_all(probe: &dyn HealthProbe, targets: &[String]) -> Vec<HealthStatus> {
        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            let status = probe.check(target).await;
            log_status(&status);
            results.push(status);
        }
        results
    }

    fn create_monitor_task(
        probe: Arc<dyn HealthProbe>,
        targets: Vec<String>,
        check_interval: Duration,
        cancel_token: CancellationToken,
        statuses: StatusMap,
    ) -> JoinHandle<()> {
        let mut ticker = interval(check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::spawn(async move {
            info!(
                targets = targets.len(),
                interval_secs = check_interval.as_secs_f64(),
                "Health monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        info!("Health monitor shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let round = tokio::select! {
                            _ = cancel_token.cancelled() => None,
                            results = Self::check_all(probe.as_ref(), &targets) => Some(results),
                        };
                        let Some(results) = round else {
                            info!("Health monitor shutting down");
                            break;
                        };

                        let mut map = statuses.write().await;
                        for status in results {
                            map.insert(status.target.clone(), status);
                        }
                    }
                }
            }
        })
    }
}

fn log_status(status: &HealthStatus) {
    if status.healthy {
        info!(
            target_url = %status.target,
            status_code = ?status.status_code,
            latency_ms = status.latency_ms,
            "Service healthy"
        );
    } else {
        warn!(
            target_url = %status.target,
            status_code = ?status.status_code,
            latency_ms = status.latency_ms,
            error = status.error.as_deref().unwrap_or("unknown"),
            "Service unhealthy"
        );
    }
}

/// Handle to a running [`HealthMonitor`] task.
pub struct HealthMonitorHandle {
    cancel_token: CancellationToken,
    statuses: StatusMap,
    task: JoinHandle<()>,
}

impl HealthMonitorHandle {
    /// Latest status recorded for `target`.
    pub async fn latest(&self, target: &str) -> Option<HealthStatus> {
        self.statuses.read().await.get(target).cloned()
    }

    /// Latest status of every target checked so far, ordered by target.
    pub async fn snapshot(&self) -> Vec<HealthStatus> {
        let mut statuses: Vec<_> = self.statuses.read().await.values().cloned().collect();
        statuses.sort_by(|a, b| a.target.cmp(&b.target));
        statuses
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Health monitor task ended abnormally");
        }
    }
}
