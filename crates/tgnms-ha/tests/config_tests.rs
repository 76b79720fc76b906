use std::io::Write;

use tgnms_ha::{HaError, NmsConfig};

const SAMPLE: &str = r#"
refresh_interval_secs = 10

[[networks]]
name = "tower-a"
[networks.primary]
api_ip = "10.0.0.1"
api_port = 8080
e2e_port = 17077
[networks.backup]
api_ip = "2001:db8::2"
api_port = 8081

[[networks]]
name = "lab"
[networks.primary]
api_ip = "127.0.0.1"
"#;

#[test]
fn test_parse_networks() {
    let config = NmsConfig::from_toml_str(SAMPLE).unwrap();
    assert_eq!(config.refresh_interval_secs, 10);
    assert_eq!(config.health_refresh_interval_secs, 30);
    assert_eq!(config.networks.len(), 2);

    let tower = config.network("tower-a").unwrap();
    assert!(tower.is_ha());
    assert_eq!(tower.primary.e2e_port, Some(17077));

    let lab = config.network("lab").unwrap();
    assert!(!lab.is_ha());
    assert_eq!(lab.primary.api_port, 8080, "api_port defaults to 8080");
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = NmsConfig::from_toml_str("").unwrap();
    assert_eq!(config, NmsConfig::default());
    assert_eq!(config.refresh_interval().as_secs(), 5);
    assert_eq!(config.health_refresh_interval().as_secs(), 30);
}

#[test]
fn test_unknown_network() {
    let config = NmsConfig::from_toml_str(SAMPLE).unwrap();
    assert!(matches!(config.network("nope"), Err(HaError::UnknownNetwork(n)) if n == "nope"));
}

#[test]
fn test_duplicate_network_rejected() {
    let toml = r#"
[[networks]]
name = "a"
primary = { api_ip = "10.0.0.1" }

[[networks]]
name = "a"
primary = { api_ip = "10.0.0.2" }
"#;
    assert!(matches!(NmsConfig::from_toml_str(toml), Err(HaError::InvalidConfig(_))));
}

#[test]
fn test_zero_interval_rejected() {
    let result = NmsConfig::from_toml_str("refresh_interval_secs = 0");
    assert!(matches!(result, Err(HaError::InvalidConfig(_))));
}

#[test]
fn test_missing_api_ip_rejected() {
    let toml = r#"
[[networks]]
name = "a"
primary = { api_ip = "" }
"#;
    assert!(matches!(NmsConfig::from_toml_str(toml), Err(HaError::InvalidConfig(_))));
}

#[test]
fn test_malformed_toml() {
    let result = NmsConfig::from_toml_str("networks = [[[");
    assert!(matches!(result, Err(HaError::ConfigParse(_))));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let config = NmsConfig::load(file.path()).unwrap();
    assert_eq!(config.networks.len(), 2);
}

#[test]
fn test_load_missing_explicit_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let result = NmsConfig::load_or_default(Some(missing.as_path()));
    assert!(matches!(result, Err(HaError::ConfigRead { .. })));
}

#[test]
fn test_refresh_override_accepts_integer() {
    let mut config = NmsConfig::default();
    config.override_refresh_interval(" 42 ").unwrap();
    assert_eq!(config.refresh_interval_secs, 42);
}

#[test]
fn test_refresh_override_rejects_non_integer() {
    let mut config = NmsConfig::default();
    let result = config.override_refresh_interval("abc");
    assert!(matches!(result, Err(HaError::InvalidConfig(_))));
}

#[test]
fn test_refresh_override_rejects_zero() {
    let mut config = NmsConfig::default();
    let result = config.override_refresh_interval("0");
    assert!(matches!(result, Err(HaError::InvalidConfig(_))));
}

#[test]
fn test_missing_fallback_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("tgnms").join("ha.toml");
    let config = NmsConfig::load_with_fallback(None, Some(fallback.as_path())).unwrap();
    assert!(config.networks.is_empty());
    assert_eq!(config.health_refresh_interval_secs, 30);
}

#[test]
fn test_no_config_dir_yields_defaults() {
    let config = NmsConfig::load_with_fallback(None, None).unwrap();
    assert!(config.networks.is_empty());
}

#[test]
fn test_existing_fallback_file_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let config = NmsConfig::load_with_fallback(None, Some(file.path())).unwrap();
    assert_eq!(config.networks.len(), 2);
}

#[test]
fn test_explicit_path_wins_over_fallback() {
    let mut explicit = tempfile::NamedTempFile::new().unwrap();
    explicit.write_all(b"refresh_interval_secs = 7").unwrap();
    let mut fallback = tempfile::NamedTempFile::new().unwrap();
    fallback.write_all(SAMPLE.as_bytes()).unwrap();
    let config = NmsConfig::load_with_fallback(Some(explicit.path()), Some(fallback.path())).unwrap();
    assert!(config.networks.is_empty());
}
