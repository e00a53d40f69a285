// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// One row of reference data, column name to value.
pub type ReferenceRow = HashMap<String, String>;

/// Reference rows selected round-robin by iteration index.
#[derive(Debug, Default)]
pub struct ReferenceRows {
    rows: RwLock<Vec<ReferenceRow>>,
}

impl ReferenceRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded rows.
    pub fn load(&self, rows: Vec<ReferenceRow>) {
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = rows;
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of `column` in row `index mod len`; `None` if no rows are loaded
    /// or the row lacks the column.
    pub fn value_at(&self, index: u64, column: &str) -> Option<String> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        if rows.is_empty() {
            return None;
        }
        let row = &rows[(index % rows.len() as u64) as usize];
        row.get(column).cloned()
    }
}

/// Read a CSV file whose header row names the columns.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceRow>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn row(name: &str) -> ReferenceRow {
        HashMap::from([("name".to_string(), name.to_string())])
    }

    #[test]
    fn test_empty_rows_yield_nothing() {
        let rows = ReferenceRows::new();
        assert!(rows.is_empty());
        assert_eq!(rows.value_at(0, "name"), None);
    }

    #[test]
    fn test_value_at_wraps_around() {
        let rows = ReferenceRows::new();
        rows.load(vec![row("a"), row("b"), row("c")]);

        let seen: Vec<String> = (0..7).map(|i| rows.value_at(i, "name").unwrap()).collect();
        assert_eq!(seen, vec!["a", "b", "c", "a", "b", "c", "a"]);
        assert_eq!(rows.value_at(1, "missing"), None);
    }

    #[test]
    fn test_read_csv_uses_header_row() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,city").unwrap();
        writeln!(file, "Ada,London").unwrap();
        writeln!(file, "Grace,Arlington").unwrap();

        let rows = read_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Ada");
        assert_eq!(rows[1]["city"], "Arlington");
    }
}
