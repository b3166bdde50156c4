use thiserror::Error;

/// Configuration failures detected before any database interaction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{0} environment variable is empty")]
    Empty(&'static str),
}
