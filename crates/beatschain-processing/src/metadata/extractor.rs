//! Audio tag and property inspection using lofty

use async_trait::async_trait;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use std::io::Cursor;
use thiserror::Error;

use beatschain_core::constants::UNKNOWN_ARTIST;
use beatschain_core::{ExtractedMetadata, FileDescriptor};

use super::MetadataExtractor;

#[derive(Debug, Error)]
enum InspectError {
    #[error("Failed to detect audio format: {0}")]
    Probe(#[from] std::io::Error),

    #[error("Failed to read audio: {0}")]
    Read(#[from] lofty::error::LoftyError),
}

/// Reads duration, bitrate, sample rate and channels from the audio properties and
/// title, artist, genre, BPM and ISRC from the primary tag.
#[derive(Debug, Clone, Default)]
pub struct AudioTagExtractor;

impl AudioTagExtractor {
    pub fn new() -> Self {
        Self
    }

    fn inspect(data: &[u8]) -> Result<ExtractedMetadata, InspectError> {
        let tagged_file = Probe::new(Cursor::new(data)).guess_file_type()?.read()?;

        let properties = tagged_file.properties();
        let duration = properties.duration().as_secs_f64();

        let mut metadata = ExtractedMetadata {
            duration: (duration > 0.0).then_some(duration),
            bitrate: properties.audio_bitrate().filter(|b| *b > 0),
            sample_rate: properties.sample_rate().filter(|r| *r > 0),
            channels: properties.channels().filter(|c| *c > 0),
            ..Default::default()
        };

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            metadata.title = non_empty(tag.title().map(|s| s.to_string()));
            metadata.artist = non_empty(tag.artist().map(|s| s.to_string()));
            metadata.genre = non_empty(tag.genre().map(|s| s.to_string()));
            metadata.bpm = tag_bpm(tag);
            metadata.isrc = non_empty(tag.get_string(&ItemKey::Isrc).map(|s| s.to_string()));
        }

        Ok(metadata)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Tempo from the integer BPM frame, or the free-form one (`"128.00"`).
fn tag_bpm(tag: &Tag) -> Option<u32> {
    [ItemKey::IntegerBpm, ItemKey::Bpm]
        .iter()
        .filter_map(|key| tag.get_string(key))
        .filter_map(|raw| raw.trim().parse::<f64>().ok())
        .find(|bpm| bpm.is_finite() && *bpm > 0.0)
        .map(|bpm| bpm.round() as u32)
}

#[async_trait]
impl MetadataExtractor for AudioTagExtractor {
    async fn extract(&self, file: &FileDescriptor, data: &[u8]) -> ExtractedMetadata {
        let owned = data.to_vec();
        let inspected = tokio::task::spawn_blocking(move || Self::inspect(&owned)).await;

        let mut metadata = match inspected {
            Ok(Ok(metadata)) => metadata,
            Ok(Err(e)) => {
                tracing::warn!(file = %file.name, error = %e, "Audio inspection failed, using filename");
                ExtractedMetadata::default()
            }
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "Audio inspection task failed");
                ExtractedMetadata::default()
            }
        };

        if metadata.title.is_none() {
            metadata.title = Some(file.stem().to_string());
        }
        if metadata.artist.is_none() {
            metadata.artist = Some(UNKNOWN_ARTIST.to_string());
        }

        tracing::debug!(
            file = %file.name,
            duration = ?metadata.duration,
            bitrate = ?metadata.bitrate,
            bpm = ?metadata.bpm,
            "Metadata extracted"
        );

        metadata
    }
}
