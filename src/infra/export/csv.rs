use anyhow::{Context, Result};

use crate::domain::entities::row::Row;

pub fn encode_csv(rows: &[Row]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record(row.cells().iter().map(|cell| cell.as_text().into_owned()))
            .context("failed to write csv record")?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush csv export: {}", err.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::row::Cell;

    #[test]
    fn writes_numbers_as_plain_text() {
        let rows = vec![Row::new(vec![
            Cell::from("M1"),
            Cell::Number(42.0),
            Cell::Empty,
            Cell::from("a,b"),
        ])];

        let bytes = encode_csv(&rows).expect("csv should encode");

        assert_eq!(String::from_utf8_lossy(&bytes), "M1,42,,\"a,b\"\n");
    }
}
