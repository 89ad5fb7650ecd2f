use std::fs;
use tempfile::tempdir;

use super::*;

#[test]
fn test_full_config_loading_workflow() {
    let dir = tempdir().unwrap();
    let ferry_dir = dir.path().join(".ferry");
    fs::create_dir_all(&ferry_dir).unwrap();

    let config_content = r#"
http:
  connect_timeout_ms: ${FERRY_TEST_CONNECT_MS:-2500}
  user_agent: ferry-ci
  gzip: false

retry:
  max_attempts: 4

# log section left to defaults
"#;

    fs::write(ferry_dir.join("config.yaml"), config_content).unwrap();

    let loader = ConfigLoader::new(dir.path());
    assert_eq!(loader.config_path(), ferry_dir.join("config.yaml"));
    let config = loader.load().unwrap();

    assert_eq!(config.http.connect_timeout_ms, 2500);
    assert_eq!(config.http.user_agent.as_deref(), Some("ferry-ci"));
    assert!(!config.http.gzip);
    assert_eq!(config.http.request_timeout_ms, 30_000);
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.retry.initial_backoff_ms, 10);

    // Round trip through YAML keeps every value
    let yaml = serde_yaml::to_string(&config).unwrap();
    fs::write(ferry_dir.join("config.yaml"), yaml).unwrap();
    assert_eq!(loader.load().unwrap(), config);
}
