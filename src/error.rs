use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PramError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Sampling(#[from] rand::distributions::WeightedError),

    #[error(transparent)]
    Config(#[from] ::config::ConfigError),

    #[error("invalid parameter {name}: {value} (expected a value in [0, 1])")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown category {value:?} in column {column:?}")]
    UnknownCategory { column: String, value: String },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("input data file does not exist: {0}")]
    MissingInput(PathBuf),
}

pub type PramResult<T> = Result<T, PramError>;
