use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("required field `{field}` is empty")]
    EmptyField { field: &'static str },
    #[error("unknown order status `{0}`")]
    UnknownStatus(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Message safe to show the operator inline; internal detail stays in the
    /// log line, not the terminal.
    pub fn operator_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::EmptyField { .. }) => {
                "A required field is missing. Fill it in and try again."
            }
            Self::Domain(DomainError::UnknownStatus(_)) => {
                "That is not a valid order status. Use pending, approved, delivered, or suspended."
            }
            Self::Domain(DomainError::InvariantViolation(_)) => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Persistence(_) => {
                "Saved data could not be reached. In-memory state is unaffected."
            }
            Self::Integration(_) => "The assistant service is temporarily unavailable.",
            Self::Configuration(_) => "Configuration is invalid. Run `dokkan doctor` for details.",
        }
    }
}
