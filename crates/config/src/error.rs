use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{name} is not set. {hint}")]
    MissingVar {
        name: &'static str,
        hint: &'static str,
    },

    #[error("invalid value for {name} ({value:?}): {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Error {
    #[must_use]
    pub fn missing(name: &'static str, hint: &'static str) -> Self {
        Self::MissingVar { name, hint }
    }

    #[must_use]
    pub fn invalid(name: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
