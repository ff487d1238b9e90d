//! Append-Only File (AOF) persistence module
//!
//! Provides durability by logging every write the backend receives.
//! Each record is written in a compact binary format with a checksum, and
//! the log is replayed into memory on open.

mod backend;
mod entry;
mod reader;
mod replay;
mod writer;

pub use backend::AofBackend;
pub use entry::{AofOp, AofRecord};
pub use reader::AofReader;
pub use replay::replay_records;
pub use writer::AofWriter;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// AOF sync policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncPolicy {
    /// Sync after every write (safest, slowest)
    #[serde(rename = "always")]
    Always,
    /// Sync at most once a second (balanced)
    #[default]
    #[serde(rename = "everysec")]
    EverySecond,
    /// Let the OS decide when to sync (fastest, least safe)
    #[serde(rename = "no")]
    No,
}

/// AOF configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AofConfig {
    /// Whether to enable AOF
    pub enabled: bool,
    /// Path to the AOF file
    pub path: PathBuf,
    /// Sync policy
    pub sync_policy: SyncPolicy,
}

impl Default for AofConfig {
    fn default() -> Self {
        AofConfig {
            enabled: false,
            path: PathBuf::from("ferrumkv.aof"),
            sync_policy: SyncPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_policy_names() {
        let policies: Vec<SyncPolicy> =
            serde_json::from_str(r#"["always", "everysec", "no"]"#).unwrap();
        assert_eq!(
            policies,
            vec![SyncPolicy::Always, SyncPolicy::EverySecond, SyncPolicy::No]
        );
        assert!(serde_json::from_str::<SyncPolicy>(r#""sometimes""#).is_err());
    }

    #[test]
    fn test_partial_config() {
        let config: AofConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.path, PathBuf::from("ferrumkv.aof"));
        assert_eq!(config.sync_policy, SyncPolicy::EverySecond);
    }
}
