use std::path::PathBuf;
use thiserror::Error;

use super::coerce::CoerceError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("env file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read env file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    // The offending line is left out on purpose: it may hold a secret.
    #[error("failed to parse env file '{path}' at position {position}")]
    ParseError { path: PathBuf, position: usize },

    #[error("failed to load env file '{0}'")]
    InvalidEnvFile(PathBuf),

    #[error("failed to parse load options '{path}': {source}")]
    OptionsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // The value is left out on purpose: it may hold a secret.
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(String),

    #[error("error setting field {field}: {source}")]
    InvalidField {
        field: &'static str,
        source: CoerceError,
    },

    #[error("validation errors: {}", required_list(.0))]
    MissingRequired(Vec<String>),
}

impl ConfigError {
    /// Variables reported as missing, if this is a validation error.
    pub fn missing_variables(&self) -> &[String] {
        match self {
            ConfigError::MissingRequired(names) => names,
            _ => &[],
        }
    }
}

fn required_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("{name} is required"))
        .collect::<Vec<_>>()
        .join("; ")
}
