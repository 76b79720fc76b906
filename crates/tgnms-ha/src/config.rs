//! NMS configuration: the managed networks and their controller pairs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::{ControllerEndpoint, ControllerPair};
use crate::HaError;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_HEALTH_REFRESH_INTERVAL_SECS: u64 = 30;
pub const REFRESH_INTERVAL_ENV: &str = "TGNMS_REFRESH_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NmsConfig {
    /// How often the ingestion side re-polls controller status.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_health_refresh_interval")]
    pub health_refresh_interval_secs: u64,
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub primary: ControllerEndpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<ControllerEndpoint>,
}

impl NetworkConfig {
    pub fn controller_pair(&self) -> ControllerPair {
        ControllerPair::new(self.primary.clone(), self.backup.clone())
    }

    pub fn is_ha(&self) -> bool {
        self.backup.is_some()
    }
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_health_refresh_interval() -> u64 {
    DEFAULT_HEALTH_REFRESH_INTERVAL_SECS
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            health_refresh_interval_secs: DEFAULT_HEALTH_REFRESH_INTERVAL_SECS,
            networks: Vec::new(),
        }
    }
}

impl NmsConfig {
    /// `<config_dir>/tgnms/ha.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tgnms").join("ha.toml"))
    }

    pub fn from_toml_str(s: &str) -> Result<Self, HaError> {
        let config: NmsConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, HaError> {
        let raw = std::fs::read_to_string(path).map_err(|source| HaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env_overrides()?;
        tracing::debug!(
            path = %path.display(),
            networks = config.networks.len(),
            "Loaded NMS config"
        );
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the default location.
    /// A missing file at the default location is not an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, HaError> {
        let fallback = Self::default_path();
        Self::load_with_fallback(path, fallback.as_deref())
    }

    /// Load `path` if given (it must exist), else `fallback` if it exists,
    /// else the defaults.
    pub fn load_with_fallback(path: Option<&Path>, fallback: Option<&Path>) -> Result<Self, HaError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match fallback {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                tracing::debug!("No NMS config found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides()?;
                Ok(config)
            }
        }
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), HaError> {
        match std::env::var(REFRESH_INTERVAL_ENV) {
            Ok(raw) => self.override_refresh_interval(&raw),
            Err(_) => Ok(()),
        }
    }

    /// Apply a textual refresh interval override and re-validate.
    pub fn override_refresh_interval(&mut self, raw: &str) -> Result<(), HaError> {
        let secs: u64 = raw.trim().parse().map_err(|_| {
            HaError::InvalidConfig(format!("{REFRESH_INTERVAL_ENV} must be an integer, got '{raw}'"))
        })?;
        self.refresh_interval_secs = secs;
        self.validate()
    }

    pub fn validate(&self) -> Result<(), HaError> {
        if self.refresh_interval_secs == 0 {
            return Err(HaError::InvalidConfig("refresh_interval_secs must be > 0".into()));
        }
        if self.health_refresh_interval_secs == 0 {
            return Err(HaError::InvalidConfig("health_refresh_interval_secs must be > 0".into()));
        }

        let mut seen = HashSet::new();
        for network in &self.networks {
            if network.name.trim().is_empty() {
                return Err(HaError::InvalidConfig("network name must not be empty".into()));
            }
            if !seen.insert(network.name.as_str()) {
                return Err(HaError::InvalidConfig(format!("duplicate network '{}'", network.name)));
            }
            let endpoints = std::iter::once(&network.primary).chain(network.backup.as_ref());
            for endpoint in endpoints {
                if endpoint.api_ip.trim().is_empty() {
                    return Err(HaError::InvalidConfig(format!(
                        "network '{}' has a controller without api_ip",
                        network.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig, HaError> {
        self.networks
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| HaError::UnknownNetwork(name.to_string()))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn health_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.health_refresh_interval_secs)
    }
}
