use std::sync::Arc;

use crate::domain::entities::row::Row;
use crate::usecase::ports::repo::{RowRepository, StoreError};

/// Rows whose index column contains `term`, ignoring case. An empty term
/// keeps everything.
pub fn search_by_index(rows: &[Row], term: &str) -> Vec<Row> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| {
            row.index_value()
                .is_some_and(|cell| cell.as_text().to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Rows where any cell contains `term`, ignoring case. An empty term keeps
/// everything.
pub fn filter_any(rows: &[Row], term: &str) -> Vec<Row> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| {
            row.cells()
                .iter()
                .any(|cell| cell.as_text().to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub struct QueryService {
    repo: Arc<dyn RowRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn RowRepository>) -> Self {
        Self { repo }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        self.repo.count()
    }

    pub fn all_rows(&self) -> Result<Vec<Row>, StoreError> {
        self.repo.all_rows()
    }

    pub fn search_by_index(&self, term: &str) -> Result<Vec<Row>, StoreError> {
        Ok(search_by_index(&self.repo.all_rows()?, term))
    }

    pub fn filter_any(&self, term: &str) -> Result<Vec<Row>, StoreError> {
        Ok(filter_any(&self.repo.all_rows()?, term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::row::Cell;

    fn sample() -> Vec<Row> {
        vec![
            Row::from_iter(["Meter", "Index", "Result"]),
            Row::new(vec![Cell::from("Alpha"), Cell::Number(1042.0), Cell::from("PASS")]),
            Row::new(vec![Cell::from("beta"), Cell::from("AB-77"), Cell::from("fail")]),
            Row::new(vec![Cell::from("Gamma")]),
        ]
    }

    #[test]
    fn empty_term_returns_everything() {
        assert_eq!(search_by_index(&sample(), ""), sample());
        assert_eq!(filter_any(&sample(), ""), sample());
    }

    #[test]
    fn search_matches_numeric_index_as_text() {
        let found = search_by_index(&sample(), "104");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get(0), Some(&Cell::from("Alpha")));
    }

    #[test]
    fn search_ignores_case_and_other_columns() {
        let found = search_by_index(&sample(), "ab-7");
        assert_eq!(found.len(), 1);
        assert!(search_by_index(&sample(), "pass").is_empty());
    }

    #[test]
    fn rows_without_index_cell_never_match() {
        assert!(search_by_index(&sample(), "gamma").is_empty());
    }

    #[test]
    fn filter_checks_every_column() {
        let found = filter_any(&sample(), "PASS");
        assert_eq!(found.len(), 1);

        let found = filter_any(&sample(), "a");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn filter_and_search_agree_with_definition() {
        let rows = sample();
        for term in ["", "a", "ALPHA", "10", "x", "-"] {
            let needle = term.to_lowercase();
            let expected: Vec<Row> = rows
                .iter()
                .filter(|row| {
                    needle.is_empty()
                        || row
                            .cells()
                            .iter()
                            .any(|cell| cell.as_text().to_lowercase().contains(&needle))
                })
                .cloned()
                .collect();
            assert_eq!(filter_any(&rows, term), expected, "term {term:?}");
        }
    }
}
