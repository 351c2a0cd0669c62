use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Position of the "index number" column used for identity search.
pub const INDEX_COLUMN: usize = 1;

/// A single cell value. Serialized untagged so the wire form is a plain JSON
/// string, number or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Text form used for matching and csv output. Integral numbers render
    /// without a fractional part.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(value) => Cow::Borrowed(value.as_str()),
            Cell::Number(value) => Cow::Owned(format_number(*value)),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One record. Column positions carry the meaning; no column has a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Vec<Cell>);

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row(cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, col_idx: usize) -> Option<&Cell> {
        self.0.get(col_idx)
    }

    pub fn index_value(&self) -> Option<&Cell> {
        self.get(INDEX_COLUMN)
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(Cell::is_empty)
    }

    /// Right-pads with `Cell::Empty` up to `width`. Never truncates.
    pub fn pad_to(&mut self, width: usize) {
        if self.0.len() < width {
            self.0.resize(width, Cell::Empty);
        }
    }
}

impl<T: Into<Cell>> FromIterator<T> for Row {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Row(iter.into_iter().map(Into::into).collect())
    }
}

pub fn max_width(rows: &[Row]) -> usize {
    rows.iter().map(Row::len).max().unwrap_or(0)
}

/// Ordered rows sharing one declared width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    width: usize,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Appends `rows`, widening the table (and every stored row) when the
    /// batch is wider than the current declared width.
    pub fn extend(&mut self, rows: Vec<Row>) -> usize {
        let added = rows.len();
        let batch_width = max_width(&rows);
        if batch_width > self.width {
            self.width = batch_width;
            for row in &mut self.rows {
                row.pad_to(batch_width);
            }
        }
        self.rows.reserve(added);
        for mut row in rows {
            row.pad_to(self.width);
            self.rows.push(row);
        }
        added
    }

    pub fn clear(&mut self) {
        self.width = 0;
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_become_empty_cells() {
        assert_eq!(Cell::text(""), Cell::Empty);
        assert_eq!(Cell::from("M-01"), Cell::Text("M-01".to_string()));
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(42.0).as_text(), "42");
        assert_eq!(Cell::Number(-3.0).as_text(), "-3");
        assert_eq!(Cell::Number(0.25).as_text(), "0.25");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn rows_use_positional_json() {
        let row: Row = vec![Cell::from("A"), Cell::Number(7.5), Cell::Empty]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&row).expect("row should serialize");
        assert_eq!(json, r#"["A",7.5,null]"#);

        let parsed: Row = serde_json::from_str(&json).expect("row should parse");
        assert_eq!(parsed, row);
    }

    #[test]
    fn table_widens_existing_rows() {
        let mut table = Table::new();
        table.extend(vec![Row::from_iter(["a", "b"])]);
        table.extend(vec![Row::from_iter(["c", "d", "e"]), Row::from_iter(["f"])]);

        assert_eq!(table.width(), 3);
        assert!(table.rows().iter().all(|row| row.len() == 3));
        assert_eq!(table.rows()[0].get(2), Some(&Cell::Empty));
        assert_eq!(table.rows()[2].get(1), Some(&Cell::Empty));
    }

    #[test]
    fn clear_resets_width() {
        let mut table = Table::new();
        table.extend(vec![Row::from_iter(["a", "b"])]);
        table.clear();
        assert_eq!(table.width(), 0);
        assert!(table.is_empty());
    }
}
