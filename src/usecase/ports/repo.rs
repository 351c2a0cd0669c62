use crate::domain::entities::row::Row;
use crate::domain::entities::upload::{AppendBatch, UploadRecord};
pub use crate::error::StoreError;

/// The consolidated table. Implementations own their rows exclusively:
/// `append_batch` and `clear` are mutually exclusive, and every read sees the
/// state left by the last completed write.
pub trait RowRepository: Send + Sync {
    fn init(&self) -> Result<(), StoreError>;

    /// Appends rows and their upload records as one unit. Returns the number
    /// of rows added.
    fn append_batch(&self, batch: AppendBatch) -> Result<usize, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
    fn width(&self) -> Result<usize, StoreError>;
    /// Owned snapshot, every row padded to `width()`.
    fn all_rows(&self) -> Result<Vec<Row>, StoreError>;
    fn uploads(&self) -> Result<Vec<UploadRecord>, StoreError>;

    fn append(&self, rows: Vec<Row>) -> Result<usize, StoreError> {
        self.append_batch(AppendBatch::from_rows(rows))
    }
}
