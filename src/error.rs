use thiserror::Error;

use crate::domain::entities::upload::FileError;

/// A single uploaded file could not be turned into rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a readable spreadsheet: {0}")]
    Unreadable(String),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("invalid csv: {0}")]
    Csv(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("failed to serialize export: {0}")]
    Serialize(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("all {} uploaded files failed to decode", errors.len())]
    AllFilesFailed { errors: Vec<FileError> },

    #[error(transparent)]
    Store(#[from] StoreError),
}
