use thiserror::Error;

use crate::actions::ActionError;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Rejected action: {0}")]
    Action(#[from] ActionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
