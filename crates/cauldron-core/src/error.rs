//! Error types for Cauldron

use thiserror::Error;

/// The main error type for Cauldron operations
#[derive(Debug, Error)]
pub enum CauldronError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Value out of range: {field} must be {expected}, got {value}")]
    ValueOutOfRange {
        field: String,
        expected: String,
        value: f64,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),
}

/// Result type alias for Cauldron operations
pub type Result<T> = std::result::Result<T, CauldronError>;

impl From<toml::de::Error> for CauldronError {
    fn from(err: toml::de::Error) -> Self {
        CauldronError::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for CauldronError {
    fn from(err: toml::ser::Error) -> Self {
        CauldronError::TomlSer(err.to_string())
    }
}
