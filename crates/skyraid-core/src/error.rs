//! Error types.
//!
//! Gameplay never fails; these cover tuning files and malformed effect
//! requests, both of which callers log and recover from.

/// Failure loading or validating a tuning file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read tuning file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse tuning JSON: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid tuning value `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// A visual effect request that cannot be honoured.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectError {
    NonFiniteCoordinate { x: f64, y: f64 },
    InvalidScale(f64),
}

impl std::fmt::Display for EffectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectError::NonFiniteCoordinate { x, y } => {
                write!(f, "non-finite effect coordinates ({}, {})", x, y)
            }
            EffectError::InvalidScale(scale) => write!(f, "invalid effect scale {}", scale),
        }
    }
}

impl std::error::Error for EffectError {}
