//! Configuration file loading and parsing.

use crate::env::{parse_int, vars, EnvError};
use crate::types::FerryConfig;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", display_line(*line))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

fn display_line(line: Option<usize>) -> String {
    line.map_or_else(|| "unknown".to_string(), |l| l.to_string())
}

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_path: PathBuf,
    explicit: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
            explicit: None,
        }
    }

    /// Create a loader for one specific file. Unlike the project lookup,
    /// a missing file is an error.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            base_path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            explicit: Some(path),
        }
    }

    /// The file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        match &self.explicit {
            Some(path) => path.clone(),
            None => self.base_path.join(".ferry/config.yaml"),
        }
    }

    /// Load configuration, falling back to defaults when the project has
    /// no `.ferry/config.yaml`.
    pub fn load(&self) -> Result<FerryConfig, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    fn load_with<F>(&self, lookup: F) -> Result<FerryConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = self.config_path();

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let expanded = expand_env_vars(&contents, &lookup)?;
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        } else if self.explicit.is_some() {
            return Err(ConfigError::NotFound { path: config_path });
        } else {
            FerryConfig::default()
        };

        apply_env_overrides(&mut config, &lookup)?;
        validate(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars<F>(content: &str, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| ConfigError::ParseError {
        line: None,
        message: e.to_string(),
    })?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match (lookup(var_name), default) {
            (Some(v), _) => v,
            (None, Some(d)) => d.to_string(),
            (None, None) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Apply `FERRY_*` overrides on top of the file values.
fn apply_env_overrides<F>(config: &mut FerryConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(vars::FERRY_RETRY_MAX_ATTEMPTS);
    if let Some(n) = parse_int(vars::FERRY_RETRY_MAX_ATTEMPTS, raw)? {
        config.retry.max_attempts = n;
    }
    let raw = lookup(vars::FERRY_RETRY_BACKOFF_MS);
    if let Some(ms) = parse_int(vars::FERRY_RETRY_BACKOFF_MS, raw)? {
        config.retry.initial_backoff_ms = ms;
    }
    if let Some(level) = lookup(vars::FERRY_LOG_LEVEL) {
        config.log.level = level.trim().to_lowercase();
    }
    if let Some(format) = lookup(vars::FERRY_LOG_FORMAT) {
        config.log.format = format.trim().to_lowercase();
    }
    Ok(())
}

/// Validate configuration values.
fn validate(config: &FerryConfig) -> Result<(), ConfigError> {
    let fail = |message: &str| {
        Err(ConfigError::ValidationError {
            message: message.to_string(),
        })
    };

    if config.retry.max_attempts == 0 {
        return fail("retry.max_attempts must be greater than 0");
    }
    if config.http.connect_timeout_ms == 0 {
        return fail("http.connect_timeout_ms must be greater than 0");
    }
    if config.http.request_timeout_ms == 0 {
        return fail("http.request_timeout_ms must be greater than 0");
    }
    if !LOG_LEVELS.contains(&config.log.level.to_lowercase().as_str()) {
        return fail(&format!("log.level {:?} is not a known level", config.log.level));
    }
    if !LOG_FORMATS.contains(&config.log.format.to_lowercase().as_str()) {
        return fail(&format!("log.format {:?} is not a known format", config.log.format));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_vars() -> impl Fn(&str) -> Option<String> {
        lookup_from(&[])
    }

    fn write_project_config(dir: &Path, contents: &str) {
        let ferry_dir = dir.join(".ferry");
        fs::create_dir_all(&ferry_dir).unwrap();
        fs::write(ferry_dir.join("config.yaml"), contents).unwrap();
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load_with(no_vars()).unwrap();
        assert_eq!(config, FerryConfig::default());
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        write_project_config(
            dir.path(),
            r#"
http:
  request_timeout_ms: 5000
  user_agent: relay/1.0
retry:
  max_attempts: 5
log:
  format: json
"#,
        );

        let config = ConfigLoader::new(dir.path()).load_with(no_vars()).unwrap();

        assert_eq!(config.http.request_timeout_ms, 5000);
        assert_eq!(config.http.user_agent.as_deref(), Some("relay/1.0"));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.log.format, "json");

        // Unspecified values keep their defaults
        assert_eq!(config.http.connect_timeout_ms, 10_000);
        assert_eq!(config.retry.initial_backoff_ms, 10);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "retry:\n  initial_backoff_ms: 25\n").unwrap();

        let loader = ConfigLoader::from_file(&path);
        assert_eq!(loader.config_path(), path);
        let config = loader.load_with(no_vars()).unwrap();
        assert_eq!(config.retry.initial_backoff_ms, 25);
    }

    #[test]
    fn test_explicit_file_missing() {
        let dir = tempdir().unwrap();
        let err = ConfigLoader::from_file(dir.path().join("nope.yaml"))
            .load_with(no_vars())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_env_var_expansion() {
        let lookup = lookup_from(&[("TEST_VAR", "test_value")]);
        let result = expand_env_vars("key: ${TEST_VAR}", &lookup).unwrap();
        assert_eq!(result, "key: test_value");
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("key: ${NONEXISTENT:-default}", &no_vars()).unwrap();
        assert_eq!(result, "key: default");
    }

    #[test]
    fn test_env_var_missing_error() {
        let err = expand_env_vars("key: ${MISSING_VAR}", &no_vars()).unwrap_err();
        match err {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_env_vars_in_single_value() {
        let lookup = lookup_from(&[("PREFIX", "ferry"), ("SUFFIX", "relay")]);
        let result = expand_env_vars("user_agent: ${PREFIX}-${SUFFIX}", &lookup).unwrap();
        assert_eq!(result, "user_agent: ferry-relay");
    }

    #[test]
    fn test_env_var_expansion_in_config() {
        let dir = tempdir().unwrap();
        write_project_config(
            dir.path(),
            r#"
retry:
  max_attempts: ${ATTEMPTS}
  initial_backoff_ms: ${BACKOFF:-40}
"#,
        );

        let config = ConfigLoader::new(dir.path())
            .load_with(lookup_from(&[("ATTEMPTS", "4")]))
            .unwrap();

        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.initial_backoff_ms, 40);
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        write_project_config(dir.path(), "retry:\n  max_attempts: 5\nlog:\n  level: warn\n");

        let config = ConfigLoader::new(dir.path())
            .load_with(lookup_from(&[
                (vars::FERRY_RETRY_MAX_ATTEMPTS, "2"),
                (vars::FERRY_RETRY_BACKOFF_MS, "50"),
                (vars::FERRY_LOG_LEVEL, "DEBUG"),
                (vars::FERRY_LOG_FORMAT, "compact"),
            ]))
            .unwrap();

        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.initial_backoff_ms, 50);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "compact");
    }

    #[test]
    fn test_bad_env_override() {
        let dir = tempdir().unwrap();
        let err = ConfigLoader::new(dir.path())
            .load_with(lookup_from(&[(vars::FERRY_RETRY_MAX_ATTEMPTS, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env(EnvError::InvalidValue { .. })));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = FerryConfig::default();
        config.retry.max_attempts = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("max_attempts")
        ));

        let mut config = FerryConfig::default();
        config.http.request_timeout_ms = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("request_timeout_ms")
        ));

        let mut config = FerryConfig::default();
        config.log.level = "loud".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { message }) if message.contains("log.level")
        ));

        let mut config = FerryConfig::default();
        config.log.format = "xml".to_string();
        assert!(validate(&config).is_err());

        assert!(validate(&FerryConfig::default()).is_ok());
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let dir = tempdir().unwrap();
        write_project_config(
            dir.path(),
            r#"
retry:
  max_attempts: 3
  broken: [unclosed
"#,
        );

        match ConfigLoader::new(dir.path()).load_with(no_vars()).unwrap_err() {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("Expected ParseError with line number, got {other:?}"),
        }
    }
}
