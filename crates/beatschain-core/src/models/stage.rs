use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Stage of an upload job.
///
/// Non-terminal stages are ordered; a job visits each of them exactly once.
/// `Error` is reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Idle,
    Validating,
    Extracting,
    Merging,
    Notifying,
    Storing,
    Transcoding,
    Minting,
    Attributing,
    Completed,
    Error,
}

impl UploadStage {
    /// The forward sequence from submission to completion.
    pub const SEQUENCE: [UploadStage; 10] = [
        UploadStage::Idle,
        UploadStage::Validating,
        UploadStage::Extracting,
        UploadStage::Merging,
        UploadStage::Notifying,
        UploadStage::Storing,
        UploadStage::Transcoding,
        UploadStage::Minting,
        UploadStage::Attributing,
        UploadStage::Completed,
    ];

    /// The stage that must follow this one on the success path.
    pub fn next(self) -> Option<UploadStage> {
        let index = Self::SEQUENCE.iter().position(|s| *s == self)?;
        Self::SEQUENCE.get(index + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStage::Completed | UploadStage::Error)
    }

    /// Progress reported when the job enters this stage.
    ///
    /// `Error` has no percentage of its own; the last reported value is kept.
    pub fn progress_percent(self) -> Option<u8> {
        match self {
            UploadStage::Idle => Some(0),
            UploadStage::Validating => Some(10),
            UploadStage::Extracting => Some(20),
            UploadStage::Merging => Some(30),
            UploadStage::Notifying => Some(40),
            UploadStage::Storing => Some(60),
            UploadStage::Transcoding => Some(80),
            UploadStage::Minting => Some(90),
            UploadStage::Attributing => Some(95),
            UploadStage::Completed => Some(100),
            UploadStage::Error => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UploadStage::Idle => "idle",
            UploadStage::Validating => "validating",
            UploadStage::Extracting => "extracting",
            UploadStage::Merging => "merging",
            UploadStage::Notifying => "notifying",
            UploadStage::Storing => "storing",
            UploadStage::Transcoding => "transcoding",
            UploadStage::Minting => "minting",
            UploadStage::Attributing => "attributing",
            UploadStage::Completed => "completed",
            UploadStage::Error => "error",
        }
    }
}

impl Display for UploadStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadStage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SEQUENCE
            .iter()
            .chain(std::iter::once(&UploadStage::Error))
            .find(|stage| stage.as_str() == s)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Invalid upload stage: {}", s))
    }
}
