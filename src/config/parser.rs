use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to detect if the configuration has changed between crawl runs.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use crate::url::TrapPattern;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[policy]
allowed-domains = ["ics.uci.edu", "cs.uci.edu"]
max-path-depth = 12
max-segment-repeats = 2

[content]
min-tokens = 50
top-level-domain = "uci.edu"

[persistence]
backend = "sqlite"
snapshot-path = "./stats.db"
flush-interval-ms = 5000
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.policy.allowed_domains.len(), 2);
        assert_eq!(config.policy.max_path_depth, 12);
        assert_eq!(config.policy.max_segment_repeats, 2);
        assert_eq!(config.content.min_tokens, 50);
        assert_eq!(config.content.max_tokens, 200_000);
        assert_eq!(config.persistence.backend, StorageBackend::Sqlite);
        assert_eq!(config.persistence.flush_interval_ms, 5000);
        // Unspecified tables keep their defaults
        assert!(!config.policy.trap_rules.is_empty());
        assert!(config
            .policy
            .denied_extensions
            .iter()
            .any(|e| e == "pdf"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.policy.allowed_domains.len(), 4);
        assert_eq!(config.policy.max_path_depth, 10);
        assert_eq!(config.policy.max_segment_repeats, 3);
        assert_eq!(config.content.min_tokens, 100);
        assert!((config.content.min_alpha_ratio - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.persistence.backend, StorageBackend::Json);
        assert_eq!(config.persistence.flush_interval_ms, 2000);
    }

    #[test]
    fn test_custom_trap_rules_replace_defaults() {
        let config = parse_config(
            r#"
[[policy.trap-rules]]
reason = "photo gallery"
pattern = { kind = "segment", segments = ["gallery"] }
"#,
        )
        .unwrap();

        assert_eq!(config.policy.trap_rules.len(), 1);
        assert_eq!(
            config.policy.trap_rules[0].pattern,
            TrapPattern::Segment {
                segments: vec!["gallery".to_string()]
            }
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawl.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config(
            r#"
[content]
min-tokens = 500
max-tokens = 100
"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_hash_tracks_file_edits() {
        let relaxed = create_temp_config("[content]\nmin-tokens = 20\n");
        let strict = create_temp_config("[content]\nmin-tokens = 200\n");

        let (config, hash) = load_config_with_hash(relaxed.path()).unwrap();
        assert_eq!(config.content.min_tokens, 20);
        assert_eq!(hash, compute_config_hash(relaxed.path()).unwrap());
        assert_eq!(hash.len(), 64);

        assert_ne!(hash, compute_config_hash(strict.path()).unwrap());
    }
}
