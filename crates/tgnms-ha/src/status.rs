//! Per-network HA status, evaluated from one controller poll round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::arbitration::{resolve, ArbitrationResult, PRIMARY_OFFLINE};
use crate::controller::ControllerPair;
use crate::fsm::ControllerFsmState;
use crate::upgrade::{project_upgrade_status, NodeUpgradeProjection, TopologyNode, UpgradeStateDump};
use crate::HaError;

/// Everything one poll round collected for a network.
///
/// Both FSM states must come from the same round; mixing rounds is the
/// ingestion side's problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatusSample {
    #[serde(default)]
    pub primary: ControllerFsmState,
    #[serde(default)]
    pub backup: ControllerFsmState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_state: Option<UpgradeStateDump>,
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
}

impl ControllerStatusSample {
    pub fn from_json(s: &str) -> Result<Self, HaError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHaStatus {
    pub network: String,
    pub ha: ArbitrationResult,
    /// Base URL requests should go to; absent when arbitration failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<NodeUpgradeProjection<TopologyNode>>,
    pub evaluated_at: DateTime<Utc>,
}

/// Arbitrate one network and project its upgrade batches.
///
/// A network without a configured backup has nothing to arbitrate: an
/// unreachable primary is reported as "Primary controller offline" instead
/// of blaming a backup that does not exist.
pub fn evaluate_network(
    network: &str,
    controllers: &ControllerPair,
    sample: &ControllerStatusSample,
) -> NetworkHaStatus {
    let ha = match controllers.backup {
        None if !sample.primary.is_reachable() => ArbitrationResult::failed(PRIMARY_OFFLINE),
        _ => resolve(sample.primary, sample.backup),
    };

    let active_api_url = match controllers.active_endpoint(&ha) {
        Ok(endpoint) => {
            tracing::debug!(
                network = %network,
                active = %ha.active(),
                primary = %sample.primary,
                backup = %sample.backup,
                "Resolved active controller"
            );
            Some(endpoint.api_service_url())
        }
        Err(e) => {
            tracing::warn!(
                network = %network,
                primary = %sample.primary,
                backup = %sample.backup,
                primary_reachable = sample.primary.is_reachable(),
                backup_reachable = sample.backup.is_reachable(),
                error = %e,
                "No routable active controller"
            );
            None
        }
    };

    let upgrade = sample
        .upgrade_state
        .as_ref()
        .map(|dump| project_upgrade_status(&sample.nodes, dump));

    NetworkHaStatus {
        network: network.to_string(),
        ha,
        active_api_url,
        upgrade,
        evaluated_at: Utc::now(),
    }
}
