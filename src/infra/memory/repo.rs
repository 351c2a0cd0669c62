use parking_lot::RwLock;

use crate::domain::entities::row::{Row, Table};
use crate::domain::entities::upload::{AppendBatch, UploadRecord};
use crate::usecase::ports::repo::{RowRepository, StoreError};

#[derive(Default)]
struct State {
    table: Table,
    uploads: Vec<UploadRecord>,
}

/// Volatile store. Everything is lost when the process exits.
#[derive(Default)]
pub struct MemoryRepo {
    state: RwLock<State>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowRepository for MemoryRepo {
    fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn append_batch(&self, batch: AppendBatch) -> Result<usize, StoreError> {
        let mut state = self.state.write();
        let added = state.table.extend(batch.rows);
        state.uploads.extend(batch.uploads);
        Ok(added)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.table.clear();
        state.uploads.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.state.read().table.len())
    }

    fn width(&self) -> Result<usize, StoreError> {
        Ok(self.state.read().table.width())
    }

    fn all_rows(&self) -> Result<Vec<Row>, StoreError> {
        Ok(self.state.read().table.rows().to_vec())
    }

    fn uploads(&self) -> Result<Vec<UploadRecord>, StoreError> {
        Ok(self.state.read().uploads.clone())
    }
}
