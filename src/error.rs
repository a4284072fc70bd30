use thiserror::Error;

#[derive(Error, Debug)]
pub enum PKError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid kinetic parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown drug: {0}")]
    UnknownDrug(String),

    #[error("Unknown side effect: {0}")]
    UnknownSideEffect(String),

    #[error("Could not parse dose time '{0}'")]
    TimeParse(String),

    #[error("Missing input: {0}")]
    MissingInput(String),
}

pub type PKResult<T> = Result<T, PKError>;
