use std::time::{SystemTime, UNIX_EPOCH};

use rover_core::config::{self, Config, ConfigError};
use rover_core::engine::PresentationOrder;
use rover_core::search::Ranking;

fn scratch_path(name: &str) -> std::path::PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir()
        .join("rover")
        .join(format!("config-test-{unique}"))
        .join(name)
}

#[test]
fn accepts_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.engine.search_threshold, 500);
    assert_eq!(cfg.engine.presentation_order, PresentationOrder::Insertion);
    assert!(cfg.config_path.to_string_lossy().contains("rover"));
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn rejects_unknown_log_level() {
    let cfg = Config {
        log_level: "chatty".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn rejects_oversized_search_threshold() {
    let mut cfg = Config::default();
    cfg.engine.search_threshold = 5_000_000;
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn missing_file_loads_defaults_at_requested_path() {
    let path = scratch_path("absent.toml");
    let cfg = config::load(Some(&path)).unwrap();

    assert_eq!(cfg.config_path, path);
    assert_eq!(cfg.engine, Config::default().engine);
}

#[test]
fn saved_config_loads_back() {
    let path = scratch_path("config.toml");
    let mut cfg = Config {
        config_path: path.clone(),
        log_level: "debug".to_string(),
        ..Default::default()
    };
    cfg.engine.search_threshold = 64;
    cfg.engine.ranking = Ranking::PrefixFirst;
    cfg.engine.presentation_order = PresentationOrder::Explicit;

    config::save(&cfg).unwrap();
    let loaded = config::load(Some(&path)).unwrap();

    assert_eq!(loaded, cfg);
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn loads_json5_config() {
    let path = scratch_path("rover.json5");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ log_level: 'warn', engine: { type_ahead: false } }").unwrap();

    let cfg = config::load(Some(&path)).unwrap();

    assert_eq!(cfg.log_level, "warn");
    assert!(!cfg.engine.type_ahead);
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn invalid_file_reports_typed_errors() {
    let path = scratch_path("broken.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    std::fs::write(&path, "engine = [").unwrap();
    assert!(matches!(config::load(Some(&path)), Err(ConfigError::Toml(_))));

    std::fs::write(&path, "log_level = \"loud\"").unwrap();
    assert!(matches!(config::load(Some(&path)), Err(ConfigError::Invalid(_))));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
