//! TGNMS HA - Controller arbitration and upgrade batch tracking
//!
//! Decides which controller of a Binary-Star pair is authoritative for a
//! network and resolves the controller's upgrade-state dump into topology
//! nodes grouped by batch.

pub mod arbitration;
pub mod config;
pub mod controller;
pub mod error;
pub mod fsm;
pub mod status;
pub mod upgrade;

pub use arbitration::{resolve, ArbitrationResult, HaPeerRole};
pub use config::{NetworkConfig, NmsConfig};
pub use controller::{ControllerEndpoint, ControllerPair};
pub use error::*;
pub use fsm::ControllerFsmState;
pub use status::{evaluate_network, ControllerStatusSample, NetworkHaStatus};
pub use upgrade::{
    project_upgrade_status,
    NamedNode,
    NodeUpgradeProjection,
    TopologyNode,
    UpgradeStateDump,
};
