use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("point set is empty; no tour is defined")]
    EmptySet,
    #[error("duplicate point name: {0}")]
    DuplicateName(String),
    #[error("invalid coordinate for {name}: lat={lat}, lng={lng}")]
    InvalidCoordinate { name: String, lat: f64, lng: f64 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("search deadline of {0:?} elapsed before the scan completed")]
    DeadlineExceeded(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
