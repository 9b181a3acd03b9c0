use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::NaiveDate;

use crate::dataset::{Cell, Dataset};
use crate::error::{Result, SalesdashError};

/// Column coerced to dates at load time, when present.
pub const ORDER_DATE_COLUMN: &str = "OrderDate";

/// Date formats accepted in a text OrderDate cell.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

// ---------------------------------------------------------------------------
// Cell parsing helpers
// ---------------------------------------------------------------------------

fn parse_cell(raw: &str) -> Cell {
    let s = raw.trim();
    if s.is_empty() {
        return Cell::Empty;
    }
    if let Ok(n) = s.parse::<f64>() {
        return Cell::Number(n);
    }
    // Money-formatted numbers: $1,234.56 and (500.00) for negatives
    let stripped = s.replace(['$', ','], "");
    let stripped = stripped.trim();
    if let Some(inner) = stripped.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        if let Ok(n) = inner.trim().parse::<f64>() {
            return Cell::Number(-n);
        }
    }
    if let Ok(n) = stripped.parse::<f64>() {
        return Cell::Number(n);
    }
    Cell::Text(s.to_string())
}

pub fn excel_serial_to_date(serial: f64) -> NaiveDate {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    base + chrono::Duration::days(serial as i64)
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
}

// ---------------------------------------------------------------------------
// File readers
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut ds = Dataset::new(columns);

    for result in rdr.records() {
        let record = result?;
        let row: Vec<Cell> = record.iter().map(parse_cell).collect();
        ds.rows.push(row);
    }
    Ok(ds)
}

#[cfg(feature = "xlsx")]
fn read_xlsx(path: &Path) -> Result<Dataset> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| SalesdashError::DataLoad(format!("Failed to open XLSX: {e}")))?;

    // First sheet only
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SalesdashError::DataLoad("Workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| SalesdashError::DataLoad(format!("Failed to read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| SalesdashError::DataLoad(format!("Sheet '{sheet}' is empty")))?;
    let columns: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();
    let mut ds = Dataset::new(columns);

    for row in rows {
        let cells: Vec<Cell> = row
            .iter()
            .map(|data| match data {
                Data::Float(f) => Cell::Number(*f),
                Data::Int(i) => Cell::Number(*i as f64),
                Data::String(s) => parse_cell(s),
                Data::Bool(b) => Cell::Text(b.to_string()),
                Data::DateTime(dt) => Cell::Number(dt.as_f64()),
                Data::DateTimeIso(s) => parse_date_text(s).map(Cell::Date).unwrap_or(Cell::Text(s.clone())),
                Data::DurationIso(s) => Cell::Text(s.clone()),
                Data::Error(_) | Data::Empty => Cell::Empty,
            })
            .collect();
        // Skip fully blank trailing rows that spreadsheets tend to carry
        if cells.iter().all(|c| *c == Cell::Empty) {
            continue;
        }
        ds.rows.push(cells);
    }
    Ok(ds)
}

/// Coerce every non-empty OrderDate cell to a date. A value that fails to
/// parse fails the whole load; there is no per-row recovery.
fn coerce_order_date(ds: &mut Dataset) -> Result<()> {
    let Some(idx) = ds.column_index(ORDER_DATE_COLUMN) else {
        return Ok(());
    };
    for row in &mut ds.rows {
        let Some(cell) = row.get_mut(idx) else {
            continue;
        };
        let parsed = match &*cell {
            Cell::Empty | Cell::Date(_) => continue,
            Cell::Number(serial) => Some(excel_serial_to_date(*serial)),
            Cell::Text(s) => parse_date_text(s),
        };
        match parsed {
            Some(date) => *cell = Cell::Date(date),
            None => {
                return Err(SalesdashError::DateParse {
                    column: ORDER_DATE_COLUMN.to_string(),
                    value: cell.display(),
                })
            }
        }
    }
    Ok(())
}

/// Read a dataset from disk, dispatching on extension.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(SalesdashError::DataLoad(format!(
            "Data file not found: {}",
            path.display()
        )));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let mut ds = match ext.as_str() {
        "csv" => read_csv(path)?,
        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" => read_xlsx(path)?,
        #[cfg(not(feature = "xlsx"))]
        "xlsx" | "xls" => {
            return Err(SalesdashError::DataLoad(
                "XLSX support requires the 'xlsx' feature".to_string(),
            ))
        }
        other => {
            return Err(SalesdashError::DataLoad(format!(
                "Unsupported data file extension: '{other}'"
            )))
        }
    };
    coerce_order_date(&mut ds)?;
    Ok(ds)
}

// ---------------------------------------------------------------------------
// Memoized load
// ---------------------------------------------------------------------------

struct CacheEntry {
    path: PathBuf,
    modified: SystemTime,
    dataset: Arc<Dataset>,
}

/// Read-once cache for the session's dataset, keyed by path and mtime.
/// Process-scoped: view switches reuse the cached table, editing the file
/// on disk invalidates it on the next load.
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| {
                SalesdashError::DataLoad(format!("Cannot read {}: {e}", path.display()))
            })?;

        if let Some(entry) = &self.entry {
            if entry.path == path && entry.modified == modified {
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let dataset = Arc::new(read_dataset(path)?);
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}
