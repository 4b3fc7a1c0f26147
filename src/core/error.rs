//! Error types for optvol

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptVolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Numerical instability: {0}")]
    Numerical(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type OptVolResult<T> = Result<T, OptVolError>;

impl OptVolError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

impl From<csv::Error> for OptVolError {
    fn from(e: csv::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
