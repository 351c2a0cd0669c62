use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::Timelike;

use crate::domain::entities::row::{Cell, Row};
use crate::error::DecodeError;

pub fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(v) => Cell::text(v.as_str()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(v) => Cell::Text(v.to_string()),
        Data::DateTime(v) => match v.as_datetime() {
            Some(dt) if !v.is_duration() => {
                if dt.num_seconds_from_midnight() == 0 {
                    Cell::Text(dt.format("%Y-%m-%d").to_string())
                } else {
                    Cell::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string())
                }
            }
            _ => Cell::Number(v.as_f64()),
        },
        Data::DateTimeIso(v) => Cell::text(v.as_str()),
        Data::DurationIso(v) => Cell::text(v.as_str()),
        Data::Error(v) => Cell::Text(v.to_string()),
    }
}

/// Decodes the first sheet of any workbook format calamine recognizes.
pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<Row>, DecodeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|err| DecodeError::Unreadable(err.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoSheets)?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|err| {
        DecodeError::Unreadable(format!("failed to read sheet {sheet_name}: {err}"))
    })?;

    Ok(rows_from_range(&range))
}

/// Ranges start at the first used cell. Re-anchor them at A1 so column
/// positions match the sheet.
fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Row> = (0..start_row).map(|_| Row::default()).collect();
    for sheet_row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(sheet_row.iter().map(cell_from_data));
        rows.push(Row::new(cells));
    }
    rows
}

#[cfg(test)]
mod tests {
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    use super::*;

    #[test]
    fn garbage_bytes_are_unreadable() {
        let err = decode_workbook(b"definitely not a workbook").expect_err("should fail");
        assert!(matches!(err, DecodeError::Unreadable(_)));
    }

    #[test]
    fn maps_scalar_cells() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::String(String::new())), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(12)), Cell::Number(12.0));
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::from("true"));
        assert_eq!(
            cell_from_data(&Data::String("M-7".to_string())),
            Cell::from("M-7")
        );
    }

    #[test]
    fn dates_become_text_and_durations_stay_numbers() {
        let date = ExcelDateTime::new(45000.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_from_data(&Data::DateTime(date)), Cell::from("2023-03-15"));

        let noon = ExcelDateTime::new(45000.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_from_data(&Data::DateTime(noon)),
            Cell::from("2023-03-15 12:00:00")
        );

        let elapsed = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_from_data(&Data::DateTime(elapsed)), Cell::Number(1.5));
    }

    #[test]
    fn error_cells_keep_their_code() {
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::Div0)),
            Cell::from("#DIV/0!")
        );
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::NA)),
            Cell::from("#N/A")
        );
    }

    #[test]
    fn offset_ranges_keep_column_positions() {
        let mut range = Range::new((1, 1), (1, 2));
        range.set_value((1, 1), Data::String("M1".to_string()));
        range.set_value((1, 2), Data::Float(5.0));

        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_blank());
        assert_eq!(
            rows[1],
            Row::new(vec![Cell::Empty, Cell::from("M1"), Cell::Number(5.0)])
        );
    }
}
