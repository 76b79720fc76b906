//! Controller arbitration for a Binary-Star controller pair.
//!
//! Given the FSM state each replica reported in the latest poll round, decide
//! which one is authoritative for the network. Contradictory or absent
//! reports fail closed into `HaPeerRole::Error` instead of guessing.
//!
//! | primary | backup  | active  |
//! |---------|---------|---------|
//! | UNKNOWN | UNKNOWN | ERROR   |
//! | ACTIVE  | ACTIVE  | ERROR   |
//! | PASSIVE | PASSIVE | ERROR   |
//! | *       | ACTIVE  | BACKUP  |
//! | *       | PASSIVE | PRIMARY |
//! | *       | UNKNOWN | PRIMARY |

use serde::{Deserialize, Serialize};

use crate::fsm::ControllerFsmState;

/// Neither replica reported a settled state (unreachable or still starting).
pub const BOTH_OFFLINE: &str = "Both controllers offline";
/// Used for networks without a backup controller.
pub const PRIMARY_OFFLINE: &str = "Primary controller offline";
pub const BOTH_ACTIVE: &str = "Both controllers ACTIVE";
pub const BOTH_PASSIVE: &str = "Both controllers PASSIVE";

/// Which replica of the pair is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HaPeerRole {
    Primary,
    Backup,
    /// Arbitration failed; see `ArbitrationResult::error`.
    Error,
}

impl std::fmt::Display for HaPeerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Primary => "PRIMARY",
            Self::Backup => "BACKUP",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// Outcome of one arbitration. `error` is set iff `active` is `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawArbitrationResult")]
pub struct ArbitrationResult {
    active: HaPeerRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ArbitrationResult {
    pub fn primary() -> Self {
        Self { active: HaPeerRole::Primary, error: None }
    }

    pub fn backup() -> Self {
        Self { active: HaPeerRole::Backup, error: None }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self { active: HaPeerRole::Error, error: Some(reason.into()) }
    }

    pub fn active(&self) -> HaPeerRole {
        self.active
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.active == HaPeerRole::Error
    }
}

#[derive(Deserialize)]
struct RawArbitrationResult {
    active: HaPeerRole,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawArbitrationResult> for ArbitrationResult {
    type Error = String;

    fn try_from(raw: RawArbitrationResult) -> Result<Self, Self::Error> {
        match (raw.active, raw.error) {
            (HaPeerRole::Error, Some(reason)) => Ok(Self::failed(reason)),
            (HaPeerRole::Error, None) => Err("ERROR verdict without a reason".into()),
            (active, None) => Ok(Self { active, error: None }),
            (active, Some(_)) => Err(format!("{active} verdict must not carry an error")),
        }
    }
}

/// Resolve the authoritative controller from the two reported FSM states.
///
/// Pure and total. An unreachable primary next to a PASSIVE backup still
/// resolves to PRIMARY: without evidence of a takeover the primary keeps the
/// role.
pub fn resolve(primary: ControllerFsmState, backup: ControllerFsmState) -> ArbitrationResult {
    use ControllerFsmState::{Active, Passive, Unknown};

    match (primary, backup) {
        (Unknown, Unknown) => ArbitrationResult::failed(BOTH_OFFLINE),
        (Active, Active) => ArbitrationResult::failed(BOTH_ACTIVE),
        (Passive, Passive) => ArbitrationResult::failed(BOTH_PASSIVE),
        (Unknown | Passive, Active) => ArbitrationResult::backup(),
        (Unknown | Active, Passive) => ArbitrationResult::primary(),
        (Active | Passive, Unknown) => ArbitrationResult::primary(),
    }
}
