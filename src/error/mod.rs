use std::io::Error as IoError;

use serde_json::Error as JsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

use crate::model::status::VotingState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("Malformed record in storage: {0}")]
    Storage(#[from] JsonError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] TomlError),
    #[error("Cannot {action} while voting is {state}")]
    InvalidTransition {
        action: &'static str,
        state: VotingState,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_candidate(why: impl Into<String>) -> Self {
        Self::InvalidCandidate(why.into())
    }

    pub fn invalid_transition(action: &'static str, state: VotingState) -> Self {
        Self::InvalidTransition { action, state }
    }
}
