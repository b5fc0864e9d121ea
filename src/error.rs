//! Error taxonomy for playback and backend calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// Transport failure or a non-2xx response from the backend
    #[error("network error: {0}")]
    Network(String),
    /// The audio sink refused to start playback
    #[error("playback error: {0}")]
    Playback(String),
    /// The backend answered 2xx but the body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PlayerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PlayerError::Decode(e.to_string())
        } else {
            PlayerError::Network(e.to_string())
        }
    }
}

pub type PlayerResult<T> = Result<T, PlayerError>;
