use std::sync::Arc;

use rayon::prelude::*;

use crate::domain::entities::row::Row;
use crate::domain::entities::upload::{
    AppendBatch, FileError, IngestResult, UploadFile, UploadRecord,
};
use crate::error::{DecodeError, IngestError};
use crate::infra::import::decode_file;
use crate::usecase::ports::repo::RowRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestLimits {
    pub max_files: usize,
    pub max_file_bytes: usize,
    pub skip_blank_rows: bool,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_files: 50,
            max_file_bytes: 20 * 1024 * 1024,
            skip_blank_rows: true,
        }
    }
}

/// Decodes upload batches and appends them to the store as one unit.
pub struct ImportService {
    repo: Arc<dyn RowRepository>,
    limits: IngestLimits,
}

impl ImportService {
    pub fn new(repo: Arc<dyn RowRepository>, limits: IngestLimits) -> Self {
        Self { repo, limits }
    }

    pub fn limits(&self) -> IngestLimits {
        self.limits
    }

    /// Files decode in parallel; rows are appended in file order, then row
    /// order, regardless of which decode finished first. A file that fails to
    /// decode is reported in `errors` and skipped.
    pub fn ingest(&self, files: Vec<UploadFile>) -> Result<IngestResult, IngestError> {
        if files.is_empty() {
            return Err(IngestError::InvalidRequest("no files attached".to_string()));
        }
        if files.len() > self.limits.max_files {
            return Err(IngestError::InvalidRequest(format!(
                "{} files uploaded, limit is {}",
                files.len(),
                self.limits.max_files
            )));
        }

        let max_file_bytes = self.limits.max_file_bytes;
        let decoded: Vec<Result<Vec<Row>, DecodeError>> = files
            .par_iter()
            .map(|file| decode_file(file, max_file_bytes))
            .collect();

        let imported_at = chrono::Utc::now().to_rfc3339();
        let mut batch = AppendBatch::default();
        let mut errors = Vec::new();

        for (file, result) in files.iter().zip(decoded) {
            match result {
                Ok(rows) => {
                    let before = batch.rows.len();
                    if self.limits.skip_blank_rows {
                        batch.rows.extend(rows.into_iter().filter(|row| !row.is_blank()));
                    } else {
                        batch.rows.extend(rows);
                    }
                    let row_count = batch.rows.len() - before;
                    tracing::debug!(file = %file.name, rows = row_count, "decoded upload");
                    batch.uploads.push(UploadRecord {
                        file_name: file.name.clone(),
                        row_count: row_count as i64,
                        imported_at: imported_at.clone(),
                    });
                }
                Err(err) => {
                    tracing::warn!(file = %file.name, error = %err, "failed to decode upload");
                    errors.push(FileError {
                        file: file.name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        if batch.uploads.is_empty() {
            return Err(IngestError::AllFilesFailed { errors });
        }

        let files_processed = batch.uploads.len();
        let rows_added = self.repo.append_batch(batch)?;

        tracing::info!(
            files = files_processed,
            failed = errors.len(),
            rows = rows_added,
            "ingested upload batch"
        );

        Ok(IngestResult {
            rows_added,
            files_processed,
            errors,
        })
    }
}
