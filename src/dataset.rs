use chrono::NaiveDate;

use crate::fmt::money;

/// A single table value. Loaded files are loosely typed; numeric and date
/// coercion happens at load time, everything else stays text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Display form used in tables. Numbers keep two decimals since every
    /// numeric column in this dataset is a price or a quantity.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n:.2}")
                }
            }
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// Display form for cells of a known money column.
    pub fn display_money(&self) -> String {
        match self {
            Cell::Number(n) => money(*n),
            other => other.display(),
        }
    }
}

/// In-memory table: ordered column names plus row-major cells. Immutable
/// after load; every view derives what it needs without touching the shared
/// copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First `n` rows, or all of them if the table is shorter.
    pub fn head(&self, n: usize) -> &[Vec<Cell>] {
        &self.rows[..self.rows.len().min(n)]
    }

    /// Cell at (row, column name); `Empty` for short rows.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut ds = Dataset::new(vec!["Product".into(), "Total Price".into()]);
        ds.rows.push(vec![Cell::Text("A".into()), Cell::Number(10.0)]);
        ds.rows.push(vec![Cell::Text("B".into()), Cell::Number(5.0)]);
        ds.rows.push(vec![Cell::Text("A".into()), Cell::Number(3.0)]);
        ds
    }

    #[test]
    fn test_has_column() {
        let ds = sample();
        assert!(ds.has_column("Product"));
        assert!(ds.has_column("Total Price"));
        assert!(!ds.has_column("Region"));
        assert!(!ds.has_column("product")); // case-sensitive, like the source data
    }

    #[test]
    fn test_head_clamps_to_len() {
        let ds = sample();
        assert_eq!(ds.head(2).len(), 2);
        assert_eq!(ds.head(5).len(), 3);
        assert_eq!(ds.head(0).len(), 0);
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let ds = sample();
        assert_eq!(*ds.cell(99, 0), Cell::Empty);
        assert_eq!(*ds.cell(0, 99), Cell::Empty);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(1200.0).display(), "1200");
        assert_eq!(Cell::Number(19.99).display(), "19.99");
        assert_eq!(Cell::Text("East".into()).display(), "East");
        assert_eq!(Cell::Empty.display(), "");
        let d = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(Cell::Date(d).display(), "2024-03-17");
    }

    #[test]
    fn test_cell_display_money() {
        assert_eq!(Cell::Number(1234.5).display_money(), "$1,234.50");
        assert_eq!(Cell::Text("n/a".into()).display_money(), "n/a");
    }
}
