//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ParConfig;
use std::path::Path;

/// File name looked up by [`load_config`] inside a project directory.
pub const CONFIG_FILE_NAME: &str = "matepar.toml";

/// Loads and validates a configuration file.
///
/// If `path` is a directory, `<path>/matepar.toml` is read; a directory without
/// that file yields the default configuration.
pub fn load_config(path: &Path) -> Result<ParConfig, ConfigError> {
    let config_path = if path.is_dir() {
        let candidate = path.join(CONFIG_FILE_NAME);
        if !candidate.exists() {
            return Ok(ParConfig::default());
        }
        candidate
    } else {
        path.to_path_buf()
    };
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ParConfig, ConfigError> {
    let config: ParConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ParConfig) -> Result<(), ConfigError> {
    if config.engine.max_temperature == 0 {
        return Err(ConfigError::OutOfRange {
            key: "engine.max_temperature",
            reason: "must be at least 1",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ParConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[engine]
max_temperature = 250
seed = 7
verbose = true

[report]
color = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.engine.max_temperature, 250);
        assert_eq!(config.engine.seed, 7);
        assert!(config.engine.verbose);
        assert!(config.report.color);
    }

    #[test]
    fn zero_temperature_rejected() {
        let err = load_config_from_str("[engine]\nmax_temperature = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { key: "engine.max_temperature", .. }));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = load_config_from_str("[engine]\ncooling = 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[engine]\nseed = 3\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.engine.seed, 3);
    }

    #[test]
    fn directory_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, ParConfig::default());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[report]\ncolor = true\n").unwrap();
        let config = load_config(&path).unwrap();
        assert!(config.report.color);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("/nonexistent/dir/matepar.toml");
        let err = load_config(path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { path: p, .. } if p == path));
    }
}
