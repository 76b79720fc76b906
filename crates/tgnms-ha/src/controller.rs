//! Controller endpoints and routing to the active peer.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::arbitration::{ArbitrationResult, HaPeerRole};
use crate::HaError;

pub const DEFAULT_API_PORT: u16 = 8080;

/// Address of one controller replica's API service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerEndpoint {
    pub api_ip: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// E2E port of the controller itself; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e2e_port: Option<u16>,
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

impl ControllerEndpoint {
    pub fn new(api_ip: &str, api_port: u16) -> Self {
        Self { api_ip: api_ip.to_string(), api_port, e2e_port: None }
    }

    /// Base URL of the API service, e.g. `http://[2001:db8::1]:8080`.
    pub fn api_service_url(&self) -> String {
        match self.api_ip.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("http://[{ip}]:{}", self.api_port),
            _ => format!("http://{}:{}", self.api_ip, self.api_port),
        }
    }
}

/// The two replicas serving one network. A network without HA has no backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerPair {
    pub primary: ControllerEndpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<ControllerEndpoint>,
}

impl ControllerPair {
    pub fn new(primary: ControllerEndpoint, backup: Option<ControllerEndpoint>) -> Self {
        Self { primary, backup }
    }

    pub fn peer(&self, role: HaPeerRole) -> Option<&ControllerEndpoint> {
        match role {
            HaPeerRole::Primary => Some(&self.primary),
            HaPeerRole::Backup => self.backup.as_ref(),
            HaPeerRole::Error => None,
        }
    }

    /// Endpoint that API requests for this network must be routed to.
    pub fn active_endpoint(&self, verdict: &ArbitrationResult) -> Result<&ControllerEndpoint, HaError> {
        match verdict.active() {
            HaPeerRole::Error => Err(HaError::NoActiveController(
                verdict.error().unwrap_or_default().to_string(),
            )),
            role => self.peer(role).ok_or(HaError::PeerNotConfigured(role)),
        }
    }
}
