use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Format(String),
    #[error("{0}")]
    Length(String),
    #[error("{0}")]
    UnsupportedValue(String),
    #[error("{0}")]
    Range(String),
    #[error("{0}")]
    Sequencing(String),
    #[error("No {0} specified")]
    MissingField(&'static str),
    #[error("This response is not valid")]
    Integrity,
    #[error("{0}")]
    State(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
