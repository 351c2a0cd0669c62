use serde::Serialize;

use crate::domain::entities::row::Row;

/// One file of an upload batch, as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Provenance of one ingested file, stored alongside its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub file_name: String,
    pub row_count: i64,
    pub imported_at: String,
}

/// Rows plus the upload records describing them; appended as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendBatch {
    pub rows: Vec<Row>,
    pub uploads: Vec<UploadRecord>,
}

impl AppendBatch {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            uploads: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResult {
    pub rows_added: usize,
    pub files_processed: usize,
    pub errors: Vec<FileError>,
}
