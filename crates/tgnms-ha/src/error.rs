use std::path::PathBuf;

use crate::arbitration::HaPeerRole;

/// Errors raised outside the pure arbitration/projection functions.
///
/// Arbitration failure itself is never an `Err`: it is reported as
/// `HaPeerRole::Error` inside an [`ArbitrationResult`](crate::ArbitrationResult).
#[derive(Debug, thiserror::Error)]
pub enum HaError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    #[error("invalid controller FSM state '{0}'")]
    InvalidFsmState(String),

    #[error("failed to decode controller status: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("no active controller: {0}")]
    NoActiveController(String),

    #[error("{0} controller is not configured")]
    PeerNotConfigured(HaPeerRole),
}
