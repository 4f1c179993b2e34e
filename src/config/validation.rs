use crate::config::types::{Config, ContentConfig, PersistenceConfig, PolicyConfig};
use crate::url::{TrapPattern, TrapRule};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_policy_config(&config.policy)?;
    validate_content_config(&config.content)?;
    validate_persistence_config(&config.persistence)?;
    Ok(())
}

/// Validates crawl policy configuration
fn validate_policy_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_domains must list at least one domain".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_domain_pattern(domain)?;
    }

    for ext in &config.denied_extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains('/') {
            return Err(ConfigError::Validation(format!(
                "denied extension '{}' must be non-empty and written without a leading dot",
                ext
            )));
        }
    }

    if config.max_path_depth < 1 {
        return Err(ConfigError::Validation(
            "max_path_depth must be >= 1".to_string(),
        ));
    }

    if config.max_segment_repeats < 1 {
        return Err(ConfigError::Validation(
            "max_segment_repeats must be >= 1".to_string(),
        ));
    }

    for rule in &config.trap_rules {
        validate_trap_rule(rule)?;
    }

    Ok(())
}

/// Validates a single trap rule
fn validate_trap_rule(rule: &TrapRule) -> Result<(), ConfigError> {
    if rule.reason.trim().is_empty() {
        return Err(ConfigError::Validation(
            "trap rule reason cannot be empty".to_string(),
        ));
    }

    let empty = match &rule.pattern {
        TrapPattern::SegmentUnderRoot { roots, segments } => {
            roots.is_empty() || segments.is_empty()
        }
        TrapPattern::Segment { segments } => segments.is_empty(),
        TrapPattern::PathContains { needle } | TrapPattern::QueryKeyContains { needle } => {
            needle.is_empty()
        }
        TrapPattern::QueryKey { key, .. } => key.is_empty(),
        TrapPattern::QueryKeyUnderSegment { segment, key } => segment.is_empty() || key.is_empty(),
        TrapPattern::QueryKeyPrefix { prefix } => prefix.is_empty(),
        TrapPattern::DateStamp => false,
    };

    if empty {
        return Err(ConfigError::Validation(format!(
            "trap rule '{}' has an empty pattern",
            rule.reason
        )));
    }

    Ok(())
}

/// Validates content thresholds
fn validate_content_config(config: &ContentConfig) -> Result<(), ConfigError> {
    if config.min_tokens > config.max_tokens {
        return Err(ConfigError::Validation(format!(
            "min_tokens ({}) cannot exceed max_tokens ({})",
            config.min_tokens, config.max_tokens
        )));
    }

    if !(0.0..=1.0).contains(&config.min_alpha_ratio) {
        return Err(ConfigError::Validation(format!(
            "min_alpha_ratio must be between 0 and 1, got {}",
            config.min_alpha_ratio
        )));
    }

    validate_domain_string(&config.top_level_domain)?;

    Ok(())
}

/// Validates persistence configuration
fn validate_persistence_config(config: &PersistenceConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot_path cannot be empty".to_string(),
        ));
    }

    if config.flush_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "flush_interval_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates an allowed-domain entry (a leading "*." is tolerated)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    validate_domain_string(pattern.strip_prefix("*.").unwrap_or(pattern))
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'uci.edu')",
            domain
        )));
    }

    Ok(())
}
