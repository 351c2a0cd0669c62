use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, types::Value, Connection};

use crate::domain::entities::row::{max_width, Cell, Row};
use crate::domain::entities::upload::UploadRecord;
use crate::infra::sqlite::schema::open_connection;

pub fn cell_to_value(cell: &Cell) -> Option<Value> {
    match cell {
        Cell::Empty => None,
        Cell::Text(value) if value.is_empty() => None,
        Cell::Text(value) => Some(Value::Text(value.clone())),
        Cell::Number(value) => Some(Value::Real(*value)),
    }
}

pub fn value_to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Integer(v) => Cell::Number(v as f64),
        Value::Real(v) => Cell::Number(v),
        Value::Text(v) => Cell::text(v),
        Value::Blob(v) => Cell::text(String::from_utf8_lossy(&v).into_owned()),
    }
}

fn read_meta(conn: &Connection) -> Result<(i64, i64)> {
    conn.query_row(
        "SELECT width, row_count FROM table_meta WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .context("failed to read table_meta")
}

pub fn count_rows(db_path: &Path) -> Result<i64> {
    let conn = open_connection(db_path)?;
    let (_width, row_count) = read_meta(&conn)?;
    Ok(row_count)
}

pub fn table_width(db_path: &Path) -> Result<i64> {
    let conn = open_connection(db_path)?;
    let (width, _row_count) = read_meta(&conn)?;
    Ok(width)
}

/// Appends `rows` after the current last row, then records `uploads`. One
/// transaction: either everything lands or nothing does.
pub fn append_rows(db_path: &Path, rows: &[Row], uploads: &[UploadRecord]) -> Result<usize> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start append transaction")?;

    let (width, row_count) = read_meta(&tx)?;
    let next_width = width.max(max_width(rows) as i64);

    let mut insert_cell = tx
        .prepare("INSERT INTO cell(row_idx, col_idx, value) VALUES (?1, ?2, ?3)")
        .context("failed to prepare cell insert")?;
    for (offset, row) in rows.iter().enumerate() {
        let row_idx = row_count + offset as i64;
        for (col_idx, cell) in row.cells().iter().enumerate() {
            let Some(value) = cell_to_value(cell) else {
                continue;
            };
            insert_cell
                .execute(params![row_idx, col_idx as i64, value])
                .context("failed to insert cell")?;
        }
    }
    drop(insert_cell);

    let mut insert_upload = tx
        .prepare("INSERT INTO upload(file_name, row_count, imported_at) VALUES (?1, ?2, ?3)")
        .context("failed to prepare upload insert")?;
    for upload in uploads {
        insert_upload
            .execute(params![upload.file_name, upload.row_count, upload.imported_at])
            .context("failed to insert upload record")?;
    }
    drop(insert_upload);

    tx.execute(
        "UPDATE table_meta SET width = ?1, row_count = ?2 WHERE id = 1",
        params![next_width, row_count + rows.len() as i64],
    )
    .context("failed to update table_meta")?;

    tx.commit().context("failed to commit append transaction")?;
    Ok(rows.len())
}

pub fn delete_all(db_path: &Path) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start delete transaction")?;
    tx.execute("DELETE FROM cell", [])
        .context("failed to delete cells")?;
    tx.execute("DELETE FROM upload", [])
        .context("failed to delete upload records")?;
    tx.execute(
        "UPDATE table_meta SET width = 0, row_count = 0 WHERE id = 1",
        [],
    )
    .context("failed to reset table_meta")?;
    tx.commit().context("failed to commit delete transaction")?;
    Ok(())
}

pub fn load_all_rows(db_path: &Path) -> Result<Vec<Row>> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start read transaction")?;
    let (width, row_count) = read_meta(&tx)?;

    let mut rows = vec![Row::new(vec![Cell::Empty; width as usize]); row_count as usize];

    let mut stmt = tx
        .prepare(
            "SELECT row_idx, col_idx, value
             FROM cell
             ORDER BY row_idx ASC, col_idx ASC",
        )
        .context("failed to prepare row hydration query")?;
    let mut cells = stmt
        .query([])
        .context("failed to run row hydration query")?;

    while let Some(cell) = cells.next().context("failed to read hydrated cell")? {
        let row_idx: i64 = cell.get(0).context("failed to read row_idx")?;
        let col_idx: i64 = cell.get(1).context("failed to read col_idx")?;
        let value: Value = cell.get(2).context("failed to read value")?;

        if let Some(dest) = rows
            .get_mut(row_idx as usize)
            .and_then(|dest_row| dest_row.0.get_mut(col_idx as usize))
        {
            *dest = value_to_cell(value);
        }
    }
    drop(cells);
    drop(stmt);

    tx.commit().context("failed to finish read transaction")?;
    Ok(rows)
}

pub fn list_uploads(db_path: &Path) -> Result<Vec<UploadRecord>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT file_name, row_count, imported_at
             FROM upload
             ORDER BY id ASC",
        )
        .context("failed to prepare uploads query")?;

    let uploads = stmt
        .query_map([], |row| {
            Ok(UploadRecord {
                file_name: row.get(0)?,
                row_count: row.get(1)?,
                imported_at: row.get(2)?,
            })
        })
        .context("failed to query uploads")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect uploads")?;

    Ok(uploads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_map_back_to_cells() {
        assert_eq!(cell_to_value(&Cell::Empty), None);
        assert_eq!(cell_to_value(&Cell::Text(String::new())), None);
        assert_eq!(
            value_to_cell(cell_to_value(&Cell::from("0042")).expect("text value")),
            Cell::from("0042")
        );
        assert_eq!(value_to_cell(Value::Integer(3)), Cell::Number(3.0));
        assert_eq!(value_to_cell(Value::Null), Cell::Empty);
    }
}
