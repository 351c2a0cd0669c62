use anyhow::{Context, Result};

use crate::domain::entities::row::{Cell, Row};
use crate::error::DecodeError;

/// Every record is data, including the first. Fields are never type-inferred
/// so leading zeros in meter numbers survive.
pub fn decode_csv(bytes: &[u8], delimiter: u8) -> Result<Vec<Row>, DecodeError> {
    read_records(bytes, delimiter).map_err(|err| DecodeError::Csv(format!("{err:#}")))
}

fn read_records(bytes: &[u8], delimiter: u8) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to parse csv record {}", line + 1))?;
        rows.push(record.iter().map(Cell::text).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_header_and_ragged_rows() {
        let rows = decode_csv(b"Meter,Index,Result\nM1,0042,PASS\nM2,0043\n", b',')
            .expect("csv should decode");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Row::from_iter(["Meter", "Index", "Result"]));
        assert_eq!(rows[1].get(1), Some(&Cell::from("0042")));
        assert_eq!(rows[2].len(), 2);
    }

    #[test]
    fn empty_fields_are_empty_cells() {
        let rows = decode_csv(b"a,,c\n", b',').expect("csv should decode");
        assert_eq!(rows[0].get(1), Some(&Cell::Empty));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = decode_csv(&[0x66, 0xff, 0xfe, b'\n'], b',').expect_err("should fail");
        assert!(matches!(err, DecodeError::Csv(_)));
    }
}
