//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use crate::config::{ConfigLoader, FilterSettings, KonaConfig, LogConfig, MeasureConfig, Validate};
use crate::error::config::ConfigError;
use crate::filters::FilterKind;
use std::fs;
use tempfile::tempdir;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = KonaConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.filter.kinds(), FilterKind::ALL.to_vec());
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = KonaConfig::default();

    config.filter.bits_per_key = -1.0;
    assert!(config.validate().is_err());

    config.filter.bits_per_key = 10.0;
    config.measure.keys = 0;
    assert!(config.validate().is_err());

    config.measure.keys = 1000;
    config.log.level = "verbose".to_string();
    assert!(config.validate().is_err());

    config.log.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

/// Test the individual validation rules.
#[test]
fn test_specific_validation_rules() {
    for bad in [0.0, f64::NAN, f64::INFINITY] {
        let settings = FilterSettings {
            bits_per_key: bad,
            ..FilterSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValueOutOfRange { .. })
        ));
    }

    let measure = MeasureConfig {
        keys: usize::MAX,
        ..MeasureConfig::default()
    };
    assert!(measure.validate().is_err());

    let log = LogConfig {
        level: "loud".to_string(),
        ..LogConfig::default()
    };
    assert!(log.validate().is_err());
}

/// Test that filter settings produce the matching library configuration.
#[test]
fn test_filter_settings_conversion() {
    let settings = FilterSettings {
        kind: Some(FilterKind::CountingBloom),
        bits_per_key: 12.0,
        seed: Some(17),
    };
    let config = settings.to_filter_config();

    assert_eq!(settings.kinds(), vec![FilterKind::CountingBloom]);
    assert_eq!(config.bits_per_key(), 12.0);
    assert_eq!(config.seed(), Some(17));

    let random = FilterSettings::default().to_filter_config();
    assert_eq!(random.seed(), None);
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    std::env::remove_var("TEST_FILE__FILTER__KIND");

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config_file_test.toml");

    let config_content = r#"
    [filter]
    kind = "succinct_counting_bloom"
    bits_per_key = 10.0
    seed = 42

    [measure]
    keys = 5000
    "#;

    fs::write(&config_path, config_content).unwrap();

    // Load the configuration with a unique prefix
    let loader = ConfigLoader::new(Some(&config_path), "TEST_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.filter.kind, Some(FilterKind::SuccinctCountingBloom));
    assert_eq!(config.filter.bits_per_key, 10.0);
    assert_eq!(config.filter.seed, Some(42));
    assert_eq!(config.measure.keys, 5000);

    // Other values should be defaults
    assert_eq!(config.measure.key_seed, MeasureConfig::default().key_seed);
    assert_eq!(config.log, LogConfig::default());
}

/// Test loading configuration from a JSON file.
#[test]
fn test_load_json_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    fs::write(&config_path, r#"{ "filter": { "kind": "bloom" }, "log": { "json": true } }"#)
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_JSON");
    let config = loader.load().unwrap();

    assert_eq!(config.filter.kind, Some(FilterKind::Bloom));
    assert!(config.log.json);
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config_env_test.toml");

    let config_content = r#"
    [filter]
    bits_per_key = 10.0

    [measure]
    keys = 5000
    "#;

    fs::write(&config_path, config_content).unwrap();

    // Set environment variables with a unique prefix
    std::env::set_var("TEST_ENV__FILTER__BITS_PER_KEY", "16");
    std::env::set_var("TEST_ENV__MEASURE__KEYS", "250");

    let loader = ConfigLoader::new(Some(&config_path), "TEST_ENV");
    let config = loader.load().unwrap();

    // Verify environment variables took precedence
    assert_eq!(config.filter.bits_per_key, 16.0);
    assert_eq!(config.measure.keys, 250);

    // Clean up environment variables
    std::env::remove_var("TEST_ENV__FILTER__BITS_PER_KEY");
    std::env::remove_var("TEST_ENV__MEASURE__KEYS");
}

/// Test that a missing file is reported as such.
#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("absent.toml");

    let loader = ConfigLoader::new(Some(&config_path), "TEST_MISSING");
    assert!(matches!(loader.load(), Err(ConfigError::FileNotFound(_))));
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("invalid.toml");

    let config_content = r#"
    [filter
    kind = bloom"
    "#;

    fs::write(&config_path, config_content).unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INVALID");
    assert!(loader.load().is_err());
}

/// Test that a file with out-of-range values fails validation.
#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("negative.toml");

    fs::write(&config_path, "[filter]\nbits_per_key = -3.0\n").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_NEGATIVE");
    assert!(matches!(
        loader.load(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));
}

/// Test that an unknown filter kind is rejected at load time.
#[test]
fn test_load_rejects_unknown_kind() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("kind.toml");

    fs::write(&config_path, "[filter]\nkind = \"quotient\"\n").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_KIND");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that unsupported extensions are rejected.
#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.ini");
    fs::write(&config_path, "").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INI");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that the generated default configuration loads back unchanged.
#[test]
fn test_generated_config_round_trip() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("generated.toml");

    let toml = toml::to_string_pretty(&KonaConfig::default()).unwrap();
    fs::write(&config_path, toml).unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_GENERATED");
    assert_eq!(loader.load().unwrap(), KonaConfig::default());
}
