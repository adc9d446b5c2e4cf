use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    EmptyIdentifier { kind: &'static str },
    IdentifierTooLong { kind: &'static str, max: usize },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyIdentifier { kind } => {
                write!(f, "{kind} identifier must not be empty")
            }
            ModelError::IdentifierTooLong { kind, max } => {
                write!(f, "{kind} identifier exceeds {max} characters")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
