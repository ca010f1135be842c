use crate::errors::{ConfigError, StoreError};
use thiserror::Error as ThisError;
use uniffi::Error;

#[derive(Debug, ThisError, Error)]
#[non_exhaustive]
pub enum OneRepError {
    #[error("error: {message}")]
    Common { message: String },
}

impl From<StoreError> for OneRepError {
    fn from(e: StoreError) -> Self {
        OneRepError::with_display(e)
    }
}

impl From<ConfigError> for OneRepError {
    fn from(e: ConfigError) -> Self {
        OneRepError::with_display(e)
    }
}

impl From<&str> for OneRepError {
    fn from(s: &str) -> Self {
        OneRepError::Common {
            message: s.to_string(),
        }
    }
}

impl OneRepError {
    pub fn with_display<D: std::fmt::Display>(d: D) -> Self {
        OneRepError::Common {
            message: d.to_string(),
        }
    }
}
