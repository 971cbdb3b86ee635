mod common;

use serde_json::json;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;

use beatschain_core::placeholder::is_placeholder_id;
use beatschain_core::{ExtractedMetadata, FileDescriptor, MetadataMap, UploadReport, UploadStage};
use beatschain_processing::UploadRequest;
use common::{HarnessBuilder, MockMinter, MockStorage, MockTranscoder, RecordingAttribution};

const MB: u64 = 1024 * 1024;

fn map(value: serde_json::Value) -> MetadataMap {
    value.as_object().cloned().unwrap()
}

fn audio_request(name: &str, size_bytes: u64, content_type: &str) -> UploadRequest {
    UploadRequest::new(
        FileDescriptor::new(name, size_bytes, content_type),
        vec![0u8; 64],
    )
}

fn expect_failed(report: &UploadReport) -> (UploadStage, &str) {
    match report {
        UploadReport::Failed(failed) => (failed.stage, failed.message.as_str()),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_file_is_rejected_before_any_network_call() {
    let harness = HarnessBuilder::default().build();

    let report = harness
        .orchestrator
        .process(audio_request("test.mp3", 0, "audio/mpeg"), None)
        .await;

    let (stage, message) = expect_failed(&report);
    assert_eq!(stage, UploadStage::Validating);
    assert!(message.contains("file is empty"), "{}", message);
    assert_eq!(harness.network_calls(), 0);
    assert!(report.token_id().is_none());
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let harness = HarnessBuilder::default().build();

    let report = harness
        .orchestrator
        .process(audio_request("big.mp3", 60 * MB, "audio/mpeg"), None)
        .await;

    let (stage, message) = expect_failed(&report);
    assert_eq!(stage, UploadStage::Validating);
    assert!(message.contains("file too large"), "{}", message);
    assert_eq!(harness.network_calls(), 0);
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let harness = HarnessBuilder::default().build();

    let report = harness
        .orchestrator
        .process(audio_request("notes.txt", 1024, "text/plain"), None)
        .await;

    let (stage, message) = expect_failed(&report);
    assert_eq!(stage, UploadStage::Validating);
    assert!(message.contains("unsupported file type"), "{}", message);
    assert_eq!(harness.network_calls(), 0);
}

#[tokio::test]
async fn invalid_overrides_are_rejected_before_any_network_call() {
    let harness = HarnessBuilder::default().build();

    let request = audio_request("beat.mp3", MB, "audio/mpeg")
        .with_overrides(map(json!({ "_system_owner": "me" })));
    let report = harness.orchestrator.process(request, None).await;

    let (stage, message) = expect_failed(&report);
    assert_eq!(stage, UploadStage::Validating);
    assert!(message.contains("reserved"), "{}", message);
    assert_eq!(harness.network_calls(), 0);
}

#[tokio::test]
async fn user_metadata_overrides_extracted_metadata() {
    let harness = HarnessBuilder {
        extracted: ExtractedMetadata {
            title: Some("Y".to_string()),
            duration: Some(180.0),
            ..Default::default()
        },
        ..Default::default()
    }
    .build();

    let request = audio_request("beat.wav", 5 * MB, "audio/wav")
        .with_overrides(map(json!({ "title": "X" })));
    let report = harness.orchestrator.process(request, None).await;

    match report {
        UploadReport::Completed(completed) => {
            assert_eq!(completed.metadata, map(json!({ "title": "X", "duration": 180.0 })));
        }
        other => panic!("expected completion, got {:?}", other),
    }

    let pin = harness.storage.last_pin.lock().unwrap().clone().unwrap();
    assert_eq!(pin.name, "X");
    let minted = harness.minter.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(minted.metadata.name, "X");
}

#[tokio::test]
async fn every_user_key_survives_to_the_final_record() {
    let harness = HarnessBuilder {
        extracted: ExtractedMetadata {
            title: Some("Tagged".to_string()),
            artist: Some("Tag Artist".to_string()),
            bpm: Some(90),
            ..Default::default()
        },
        ..Default::default()
    }
    .build();

    let overrides = map(json!({
        "artist": "DJ Test",
        "bpm": 124,
        "genre": "House",
        "explicit": false,
    }));
    let request =
        audio_request("beat.mp3", MB, "audio/mpeg").with_overrides(overrides.clone());

    match harness.orchestrator.process(request, None).await {
        UploadReport::Completed(completed) => {
            for (key, value) in &overrides {
                assert_eq!(completed.metadata.get(key), Some(value), "key {}", key);
            }
            assert_eq!(completed.metadata["title"], json!("Tagged"));
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn happy_path_reports_progress_and_tracks_revenue() {
    let harness = HarnessBuilder {
        attribution: RecordingAttribution::with_campaign("camp-7"),
        ..Default::default()
    }
    .build();

    let (tx, mut rx) = mpsc::channel(32);
    let request = audio_request("beat.mp3", MB, "audio/mpeg").with_owner(Some("wallet-1"));
    let report = harness.orchestrator.process(request, Some(tx)).await;

    let completed = match &report {
        UploadReport::Completed(completed) => completed,
        other => panic!("expected completion, got {:?}", other),
    };
    assert_eq!(completed.token_id, "token-1");
    assert_eq!(completed.content_id, "QmTestHash");
    assert_eq!(completed.playback_id, "pb-1");
    assert_eq!(completed.attribution_id.as_deref(), Some("camp-7"));
    assert!(!completed.storage_is_placeholder);
    assert!(!completed.playback_is_placeholder);

    let mut percents = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.job_id, report.job_id());
        percents.push(event.percent);
    }
    assert_eq!(percents, vec![10, 20, 30, 40, 60, 80, 90, 95, 100]);

    let notified = harness.attribution.notified.lock().unwrap();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].event_type, "upload_start");
    assert_eq!(notified[0].user_id, "wallet-1");

    let revenue = harness.attribution.revenue.lock().unwrap();
    assert_eq!(revenue.len(), 1);
    assert_eq!(revenue[0].campaign_id, "camp-7");
    assert_eq!(revenue[0].token_id, "token-1");

    let minted = harness.minter.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(minted.recipient, "wallet-1");
    assert_eq!(minted.metadata.animation_url, "https://lvpr.tv/pb-1");
}

#[tokio::test]
async fn storage_failure_still_reaches_minting_with_placeholder() {
    let harness = HarnessBuilder {
        storage: MockStorage {
            fail: true,
            ..Default::default()
        },
        ..Default::default()
    }
    .build();

    let report = harness
        .orchestrator
        .process(audio_request("beat.mp3", MB, "audio/mpeg"), None)
        .await;

    match &report {
        UploadReport::Completed(completed) => {
            assert!(is_placeholder_id(&completed.content_id));
            assert!(completed.storage_is_placeholder);
            assert!(completed.storage_url.starts_with("blob:local/"));
            assert!(completed.playback_is_placeholder);
        }
        other => panic!("expected completion, got {:?}", other),
    }

    assert_eq!(harness.minter.calls.load(Ordering::SeqCst), 1);
    let minted = harness.minter.last_request.lock().unwrap().clone().unwrap();
    assert!(minted.content_id.starts_with("local-"));
    // Placeholder storage has nothing to transcode
    assert_eq!(harness.transcoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transcode_failure_records_placeholder_playback() {
    let harness = HarnessBuilder {
        transcoder: MockTranscoder {
            fail: true,
            ..Default::default()
        },
        ..Default::default()
    }
    .build();

    let report = harness
        .orchestrator
        .process(audio_request("beat.mp3", MB, "audio/mpeg"), None)
        .await;

    match &report {
        UploadReport::Completed(completed) => {
            assert!(completed.playback_id.starts_with("local-playback-"));
            assert_eq!(completed.playback_url, completed.storage_url);
            assert!(completed.playback_is_placeholder);
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(harness.transcoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn disabled_transcoding_skips_the_provider() {
    let mut builder = HarnessBuilder::default();
    builder.config.transcode.enabled = false;
    let harness = builder.build();

    let (tx, mut rx) = mpsc::channel(32);
    let report = harness
        .orchestrator
        .process(audio_request("beat.mp3", MB, "audio/mpeg"), Some(tx))
        .await;

    assert!(report.is_success());
    assert_eq!(harness.transcoder.calls.load(Ordering::SeqCst), 0);

    let mut stages = Vec::new();
    while let Ok(event) = rx.try_recv() {
        stages.push(event.stage);
    }
    assert!(stages.contains(&UploadStage::Transcoding));
}

#[tokio::test]
async fn mint_failure_ends_in_error_without_token() {
    let harness = HarnessBuilder {
        minter: MockMinter {
            fail: true,
            ..Default::default()
        },
        attribution: RecordingAttribution::with_campaign("camp-9"),
        ..Default::default()
    }
    .build();

    let (tx, mut rx) = mpsc::channel(32);
    let report = harness
        .orchestrator
        .process(audio_request("beat.mp3", MB, "audio/mpeg"), Some(tx))
        .await;

    let (stage, message) = expect_failed(&report);
    assert_eq!(stage, UploadStage::Minting);
    assert!(message.contains("minting failed"), "{}", message);
    assert!(report.token_id().is_none());

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        last = Some(event);
    }
    let last = last.unwrap();
    assert_eq!(last.stage, UploadStage::Error);
    assert_eq!(last.percent, 90);
    assert!(last.message.is_some());

    assert!(harness.attribution.revenue.lock().unwrap().is_empty());
    let failures = harness.attribution.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].campaign_id, "camp-9");
}

#[tokio::test]
async fn no_campaign_id_skips_revenue_and_failure_tracking() {
    let harness = HarnessBuilder::default().build();

    let report = harness
        .orchestrator
        .process(audio_request("beat.mp3", MB, "audio/mpeg"), None)
        .await;

    match &report {
        UploadReport::Completed(completed) => assert!(completed.attribution_id.is_none()),
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(harness.attribution.notified.lock().unwrap().len(), 1);
    assert!(harness.attribution.revenue.lock().unwrap().is_empty());
    assert!(harness.attribution.failures.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_jobs_are_independent() {
    let harness = HarnessBuilder::default().build();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = harness.orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .process(audio_request(&format!("beat-{}.mp3", i), MB, "audio/mpeg"), None)
                    .await
            })
        })
        .collect();

    let mut job_ids = std::collections::HashSet::new();
    let mut token_ids = std::collections::HashSet::new();
    for handle in handles {
        let report = handle.await.unwrap();
        assert!(report.is_success());
        job_ids.insert(report.job_id());
        token_ids.insert(report.token_id().unwrap().to_string());
    }
    assert_eq!(job_ids.len(), 8);
    assert_eq!(token_ids.len(), 8);
    assert_eq!(harness.minter.calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn dropped_progress_receiver_does_not_affect_the_job() {
    let harness = HarnessBuilder::default().build();

    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let report = harness
        .orchestrator
        .process(audio_request("beat.mp3", MB, "audio/mpeg"), Some(tx))
        .await;

    assert!(report.is_success());
}
