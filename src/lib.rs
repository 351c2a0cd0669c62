//! Consolidates meter-test spreadsheets into one positional table and serves
//! it back for counting, searching, filtering and export.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod platform {
    pub mod blocking;
}
pub mod usecase;

pub use config::AppConfig;
pub use domain::entities::row::{Cell, Row, INDEX_COLUMN};
pub use domain::entities::upload::{IngestResult, UploadFile};
pub use error::{DecodeError, ExportError, IngestError, StoreError};
