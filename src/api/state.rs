use std::sync::Arc;

use anyhow::Result;

use crate::config::StoreKind;
use crate::infra::memory::repo::MemoryRepo;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::usecase::ports::repo::RowRepository;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::import_service::{ImportService, IngestLimits};
use crate::usecase::services::query_service::QueryService;

/// Shared by every handler. The repository is owned here and injected into
/// each service; nothing reaches it through globals.
pub struct AppState {
    pub repo: Arc<dyn RowRepository>,
    pub imports: ImportService,
    pub queries: QueryService,
    pub exports: ExportService,
}

impl AppState {
    pub fn new(repo: Arc<dyn RowRepository>, limits: IngestLimits) -> Self {
        Self {
            imports: ImportService::new(repo.clone(), limits),
            queries: QueryService::new(repo.clone()),
            exports: ExportService::new(repo.clone()),
            repo,
        }
    }
}

/// Opens and initializes the configured store, loading any persisted rows.
pub fn open_store(kind: &StoreKind) -> Result<Arc<dyn RowRepository>> {
    let repo: Arc<dyn RowRepository> = match kind {
        StoreKind::Sqlite(db_path) => {
            tracing::info!(path = %db_path.display(), "opening sqlite store");
            Arc::new(SqliteRepo::new(db_path.clone()))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; consolidated rows are lost on restart");
            Arc::new(MemoryRepo::new())
        }
    };
    repo.init()?;
    tracing::info!(rows = repo.count()?, "store ready");
    Ok(repo)
}
