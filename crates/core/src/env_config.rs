//! Environment variable access for importer configuration.

use crate::error::ConfigError;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read a required, non-empty environment variable.
pub fn require_env(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if v.trim().is_empty() => Err(ConfigError::Empty(var)),
        Ok(v) => Ok(v),
        Err(_) => Err(ConfigError::Missing(var)),
    }
}

/// Resolve a required value from an explicit override or the environment.
///
/// An explicit value wins; an explicitly empty one is rejected the same way
/// as an empty variable.
pub fn resolve_required(explicit: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match explicit {
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(var)),
        Some(v) => Ok(v),
        None => require_env(var),
    }
}
