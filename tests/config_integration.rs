use ragwatch::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("RAGWATCH_SERVER__PORT");
        env::remove_var("RAGWATCH_AGENT__BASE_URL");
        env::remove_var("RAGWATCH_FEED__BASE_URL");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("AGENT_URL");
        env::remove_var("FEED_URL");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["ragwatch"]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.agent.base_url, "http://localhost:8080");
    assert_eq!(config.feed.collection, "agentstate");
    assert_eq!(config.feed.poll_interval_ms, 1500);
    assert!(config.resilience.rate_limit_enabled);
    assert!(!config.resilience.timeout_disabled);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("RAGWATCH_SERVER__PORT", "9090");
        env::set_var("RAGWATCH_AGENT__BASE_URL", "https://agent.internal");
    }

    let config = AppConfig::load_from_args(["ragwatch"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.agent.base_url, "https://agent.internal");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("RAGWATCH_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["ragwatch", "--port", "7171"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 7171);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("test_config.yaml");
    let config_content = r#"
server:
  port: 7070
feed:
  base_url: "https://store.example.com"
    "#;
    fs::write(&file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args([
        "ragwatch",
        "--config",
        file_path.to_str().expect("utf-8 path"),
    ])
    .expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.feed.base_url, "https://store.example.com");
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    // Create ./config.yaml
    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args(["ragwatch"]).expect("Failed to load config");

    // Clean up BEFORE asserting so a failure doesn't leave the file behind.
    let result = std::panic::catch_unwind(|| {
        assert_eq!(config.server.port, 6060);
    });

    fs::remove_file(cwd_path).unwrap();

    if let Err(e) = result {
        std::panic::resume_unwind(e);
    }
}
