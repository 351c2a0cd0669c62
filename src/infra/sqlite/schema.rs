use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .context("failed to set busy timeout")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
        }
    }

    let conn = open_connection(db_path)?;

    // `value` has no declared affinity so text stays text and numbers stay
    // REAL. Empty cells are not stored.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS table_meta (
            id          INTEGER PRIMARY KEY CHECK (id = 1),
            width       INTEGER NOT NULL,
            row_count   INTEGER NOT NULL
        );

        INSERT OR IGNORE INTO table_meta(id, width, row_count) VALUES (1, 0, 0);

        CREATE TABLE IF NOT EXISTS cell (
            row_idx     INTEGER NOT NULL,
            col_idx     INTEGER NOT NULL,
            value       BLOB NOT NULL,
            PRIMARY KEY (row_idx, col_idx)
        );

        CREATE TABLE IF NOT EXISTS upload (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name   TEXT NOT NULL,
            row_count   INTEGER NOT NULL,
            imported_at TEXT NOT NULL
        );
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
