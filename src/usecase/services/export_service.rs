use std::sync::Arc;

use crate::domain::entities::row::Row;
use crate::error::ExportError;
use crate::infra::export::csv::encode_csv;
use crate::infra::export::xlsx::encode_xlsx;
use crate::usecase::ports::repo::RowRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("unknown export format: {s}")),
        }
    }
}

pub fn encode_rows(rows: &[Row], format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    let encoded = match format {
        ExportFormat::Xlsx => encode_xlsx(rows),
        ExportFormat::Csv => encode_csv(rows),
    };
    encoded.map_err(|err| ExportError::Serialize(format!("{err:#}")))
}

pub struct ExportService {
    repo: Arc<dyn RowRepository>,
}

impl ExportService {
    pub fn new(repo: Arc<dyn RowRepository>) -> Self {
        Self { repo }
    }

    /// Serializes the whole store as it is at call time.
    pub fn export_all(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let rows = self.repo.all_rows()?;
        encode_rows(&rows, format)
    }

    /// Serializes exactly the rows the client holds, without consulting the
    /// store.
    pub fn export_subset(
        &self,
        rows: &[Row],
        format: ExportFormat,
    ) -> Result<Vec<u8>, ExportError> {
        encode_rows(rows, format)
    }
}
