//! BeatsChain Infrastructure Library
//!
//! Process-level concerns shared by the binaries:
//! - **telemetry**: tracing subscriber setup
//! - **health**: the scheduled health-check task

#[cfg(feature = "health-monitor")]
pub mod health;
pub mod telemetry;

// Re-export commonly used types
#[cfg(feature = "health-monitor")]
pub use health::{HealthMonitor, HealthMonitorHandle};
pub use telemetry::init_telemetry;
