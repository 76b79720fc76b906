//! Binary-Star FSM state as self-reported by one controller replica.
//!
//! The controller reports its state as a numeric code (or nothing at all when
//! it cannot be reached). Only the settled ACTIVE/PASSIVE states take part in
//! arbitration; startup states and missing reports collapse into `Unknown`.
//! A replica still starting up (`STATE_PRIMARY`/`STATE_BACKUP`) is therefore
//! counted as offline: a pair where neither side has settled resolves to
//! "Both controllers offline".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::HaError;

pub const STATE_PRIMARY: i64 = 1;
pub const STATE_BACKUP: i64 = 2;
pub const STATE_ACTIVE: i64 = 3;
pub const STATE_PASSIVE: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerFsmState {
    /// Replica is serving requests.
    Active,
    /// Replica is standing by for its peer.
    Passive,
    /// Replica unreachable or not yet settled.
    #[default]
    Unknown,
}

impl ControllerFsmState {
    pub const ALL: [ControllerFsmState; 3] = [
        ControllerFsmState::Active,
        ControllerFsmState::Passive,
        ControllerFsmState::Unknown,
    ];

    /// Decode the controller's Binary-Star code. `None` means no report.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(STATE_ACTIVE) => Self::Active,
            Some(STATE_PASSIVE) => Self::Passive,
            _ => Self::Unknown,
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Active => Some(STATE_ACTIVE),
            Self::Passive => Some(STATE_PASSIVE),
            Self::Unknown => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ControllerFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Passive => "PASSIVE",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ControllerFsmState {
    type Err = HaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        // startup states: the replica has not settled yet
        if matches!(upper.as_str(), "STATE_PRIMARY" | "STATE_BACKUP") {
            return Ok(Self::Unknown);
        }
        match upper.strip_prefix("STATE_").unwrap_or(upper.as_str()) {
            "ACTIVE" => Ok(Self::Active),
            "PASSIVE" => Ok(Self::Passive),
            "" | "UNKNOWN" | "NULL" | "NONE" => Ok(Self::Unknown),
            _ => Err(HaError::InvalidFsmState(s.to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFsmState {
    Code(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for ControllerFsmState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<RawFsmState>::deserialize(deserializer)? {
            None => Ok(Self::Unknown),
            Some(RawFsmState::Code(code)) => Ok(Self::from_code(Some(code))),
            Some(RawFsmState::Name(name)) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
