use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("Unknown health status: {0}")]
    Unknown(String),
}
