use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::domain::entities::row::Row;
use crate::domain::entities::upload::{AppendBatch, UploadRecord};
use crate::infra::sqlite::queries::{
    append_rows, count_rows, delete_all, list_uploads, load_all_rows, table_width,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RowRepository, StoreError};

/// SQLite-backed store. Each call opens its own connection; the lock keeps
/// writers exclusive so `count` never observes a half-applied append.
pub struct SqliteRepo {
    db_path: PathBuf,
    lock: RwLock<()>,
}

impl SqliteRepo {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn unavailable(err: anyhow::Error) -> StoreError {
    StoreError::Unavailable(format!("{err:#}"))
}

impl RowRepository for SqliteRepo {
    fn init(&self) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        init_db(&self.db_path).map_err(unavailable)
    }

    fn append_batch(&self, batch: AppendBatch) -> Result<usize, StoreError> {
        let _guard = self.lock.write();
        append_rows(&self.db_path, &batch.rows, &batch.uploads).map_err(unavailable)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        delete_all(&self.db_path).map_err(unavailable)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let _guard = self.lock.read();
        count_rows(&self.db_path)
            .map(|count| count as usize)
            .map_err(unavailable)
    }

    fn width(&self) -> Result<usize, StoreError> {
        let _guard = self.lock.read();
        table_width(&self.db_path)
            .map(|width| width as usize)
            .map_err(unavailable)
    }

    fn all_rows(&self) -> Result<Vec<Row>, StoreError> {
        let _guard = self.lock.read();
        load_all_rows(&self.db_path).map_err(unavailable)
    }

    fn uploads(&self) -> Result<Vec<UploadRecord>, StoreError> {
        let _guard = self.lock.read();
        list_uploads(&self.db_path).map_err(unavailable)
    }
}
