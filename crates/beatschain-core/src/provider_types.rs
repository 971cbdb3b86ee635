use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Content storage provider types
///
/// Defined in core because configuration selects the provider and the
/// storage results record which one produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// Pinata IPFS pinning service
    Pinata,
    /// Content-addressed files on the local filesystem
    Local,
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pinata" | "ipfs" => Ok(StorageProvider::Pinata),
            "local" => Ok(StorageProvider::Local),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageProvider::Pinata => write!(f, "pinata"),
            StorageProvider::Local => write!(f, "local"),
        }
    }
}
