//! Upgrade batch projection.
//!
//! The controller reports in-flight firmware upgrades by node name. The
//! dashboard wants the full topology node for each of them, grouped the same
//! way the controller batched them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anything that can be looked up by its topology node name.
pub trait NamedNode {
    fn node_name(&self) -> &str;
}

/// A node as it appears in the controller's topology dump.
///
/// Only the fields the NMS reads are typed; everything else is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub name: String,
    #[serde(default)]
    pub mac_addr: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TopologyNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mac_addr: String::new(),
            site_name: String::new(),
            node_type: None,
            status: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl NamedNode for TopologyNode {
    fn node_name(&self) -> &str {
        &self.name
    }
}

/// Upgrade state as dumped by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStateDump {
    #[serde(default)]
    pub cur_batch: Vec<String>,
    #[serde(default)]
    pub pending_batches: Vec<Vec<String>>,
    /// Opaque to the projector.
    #[serde(default)]
    pub cur_req: serde_json::Value,
    #[serde(default)]
    pub pending_reqs: Vec<serde_json::Value>,
}

/// Same shape as [`UpgradeStateDump`] with names resolved to nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpgradeProjection<N> {
    pub cur_upgrade_req: serde_json::Value,
    pub cur_batch: Vec<N>,
    pub pending_batches: Vec<Vec<N>>,
    pub pending_reqs: Vec<serde_json::Value>,
}

impl<N> Default for NodeUpgradeProjection<N> {
    fn default() -> Self {
        Self {
            cur_upgrade_req: serde_json::Value::Null,
            cur_batch: Vec::new(),
            pending_batches: Vec::new(),
            pending_reqs: Vec::new(),
        }
    }
}

/// Resolve every batch of `upgrade_state` against `nodes`.
///
/// Names missing from the topology are dropped without error (the node may
/// have been removed after the batch was scheduled). Batch count and order,
/// and node order inside each batch, are preserved. When two nodes share a
/// name the later one wins.
pub fn project_upgrade_status<N>(nodes: &[N], upgrade_state: &UpgradeStateDump) -> NodeUpgradeProjection<N>
where
    N: NamedNode + Clone,
{
    let by_name: HashMap<&str, &N> = nodes.iter().map(|n| (n.node_name(), n)).collect();

    let resolve_batch = |batch: &[String]| -> Vec<N> {
        batch
            .iter()
            .filter_map(|name| by_name.get(name.as_str()).map(|&node| node.clone()))
            .collect()
    };

    NodeUpgradeProjection {
        cur_upgrade_req: upgrade_state.cur_req.clone(),
        cur_batch: resolve_batch(upgrade_state.cur_batch.as_slice()),
        pending_batches: upgrade_state
            .pending_batches
            .iter()
            .map(|batch| resolve_batch(batch.as_slice()))
            .collect(),
        pending_reqs: upgrade_state.pending_reqs.clone(),
    }
}
