use std::collections::{BTreeMap, HashMap};

use crate::dataset::{Cell, Dataset};
use crate::loader::ORDER_DATE_COLUMN;

pub const PRODUCT_COLUMN: &str = "Product";
pub const REGION_COLUMN: &str = "Region";
pub const PRICE_COLUMN: &str = "Total Price";

/// The four sidebar views, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Overview,
    SalesByProduct,
    SalesByRegion,
    SalesOverTime,
}

pub const ALL_VIEWS: &[ViewKind] = &[
    ViewKind::Overview,
    ViewKind::SalesByProduct,
    ViewKind::SalesByRegion,
    ViewKind::SalesOverTime,
];

impl ViewKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::SalesByProduct => "Sales by Product",
            Self::SalesByRegion => "Sales by Region",
            Self::SalesOverTime => "Sales Over Time",
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregated series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesSeries {
    pub points: Vec<SeriesPoint>,
    pub total: f64,
}

/// A chart view either has its series or is missing required columns.
/// The missing case is a per-view condition, not an error: it degrades to
/// a warning and leaves every other view untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    Ready(SalesSeries),
    Missing { required: [&'static str; 2] },
}

impl ViewData {
    pub fn warning(required: &[&'static str; 2]) -> String {
        format!(
            "Required columns '{}' or '{}' not found in data.",
            required[0], required[1]
        )
    }
}

fn series_from(points: Vec<SeriesPoint>) -> SalesSeries {
    let total = points.iter().map(|p| p.value).sum();
    SalesSeries { points, total }
}

/// Group rows by a key column's text value and sum a numeric column within
/// each group, keeping first-appearance order. Non-numeric values contribute
/// nothing to a group's sum.
fn group_sum(ds: &Dataset, key_idx: usize, val_idx: usize) -> Vec<SeriesPoint> {
    let mut order: Vec<SeriesPoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &ds.rows {
        let key = match row.get(key_idx) {
            Some(Cell::Empty) | None => continue,
            Some(cell) => cell.display(),
        };
        let value = row.get(val_idx).and_then(Cell::as_f64).unwrap_or(0.0);
        match index.get(&key) {
            Some(&i) => order[i].value += value,
            None => {
                index.insert(key.clone(), order.len());
                order.push(SeriesPoint { key, value });
            }
        }
    }
    order
}

/// Stable descending sort by summed value; equal sums keep input order.
fn sort_descending(points: &mut [SeriesPoint]) {
    points.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
}

fn grouped_view(
    ds: &Dataset,
    key_col: &'static str,
    required: [&'static str; 2],
) -> ViewData {
    let (Some(key_idx), Some(val_idx)) = (ds.column_index(key_col), ds.column_index(PRICE_COLUMN))
    else {
        return ViewData::Missing { required };
    };
    let mut points = group_sum(ds, key_idx, val_idx);
    sort_descending(&mut points);
    ViewData::Ready(series_from(points))
}

/// Total sales per product, descending by sum.
pub fn sales_by_product(ds: &Dataset) -> ViewData {
    grouped_view(ds, PRODUCT_COLUMN, [PRODUCT_COLUMN, PRICE_COLUMN])
}

/// Total sales per region, descending by sum.
pub fn sales_by_region(ds: &Dataset) -> ViewData {
    grouped_view(ds, REGION_COLUMN, [REGION_COLUMN, PRICE_COLUMN])
}

/// Total sales per calendar month, chronological. The YearMonth key is
/// derived here transiently; the cached dataset is never mutated.
pub fn sales_over_time(ds: &Dataset) -> ViewData {
    let required = [ORDER_DATE_COLUMN, PRICE_COLUMN];
    let (Some(date_idx), Some(val_idx)) = (
        ds.column_index(ORDER_DATE_COLUMN),
        ds.column_index(PRICE_COLUMN),
    ) else {
        return ViewData::Missing { required };
    };

    // BTreeMap keyed "YYYY-MM" sorts chronologically for free.
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for row in &ds.rows {
        let Some(date) = row.get(date_idx).and_then(Cell::as_date) else {
            continue;
        };
        let value = row.get(val_idx).and_then(Cell::as_f64).unwrap_or(0.0);
        *by_month.entry(date.format("%Y-%m").to_string()).or_default() += value;
    }

    let points = by_month
        .into_iter()
        .map(|(key, value)| SeriesPoint { key, value })
        .collect();
    ViewData::Ready(series_from(points))
}

// ---------------------------------------------------------------------------
// Descriptive statistics (Overview's full summary)
// ---------------------------------------------------------------------------

/// Per-column summary: count for every column, mean/min/max for numeric,
/// min/max for dates, unique/top/freq for categorical.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
}

pub fn describe(ds: &Dataset) -> Vec<ColumnSummary> {
    ds.columns
        .iter()
        .enumerate()
        .map(|(idx, name)| summarize_column(ds, idx, name))
        .collect()
}

fn summarize_column(ds: &Dataset, idx: usize, name: &str) -> ColumnSummary {
    let mut count = 0usize;
    let mut numbers: Vec<f64> = Vec::new();
    let mut dates: Vec<chrono::NaiveDate> = Vec::new();
    let mut texts: Vec<&str> = Vec::new();

    for row in &ds.rows {
        match row.get(idx) {
            Some(Cell::Empty) | None => {}
            Some(Cell::Number(n)) => {
                count += 1;
                numbers.push(*n);
            }
            Some(Cell::Date(d)) => {
                count += 1;
                dates.push(*d);
            }
            Some(Cell::Text(s)) => {
                count += 1;
                texts.push(s);
            }
        }
    }

    let mut summary = ColumnSummary {
        name: name.to_string(),
        count,
        mean: None,
        min: None,
        max: None,
        unique: None,
        top: None,
        freq: None,
    };

    if !numbers.is_empty() {
        summary.mean = Some(numbers.iter().sum::<f64>() / numbers.len() as f64);
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        summary.min = Some(format!("{min:.2}"));
        summary.max = Some(format!("{max:.2}"));
    } else if !dates.is_empty() {
        summary.min = dates.iter().min().map(|d| d.format("%Y-%m-%d").to_string());
        summary.max = dates.iter().max().map(|d| d.format("%Y-%m-%d").to_string());
    }

    if !texts.is_empty() {
        // Most frequent value; ties broken by first appearance.
        let mut order: Vec<(&str, usize)> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for t in &texts {
            match seen.get(t) {
                Some(&i) => order[i].1 += 1,
                None => {
                    seen.insert(t, order.len());
                    order.push((t, 1));
                }
            }
        }
        summary.unique = Some(order.len());
        let mut best: Option<(&str, usize)> = None;
        for (t, f) in order.iter().copied() {
            if best.map_or(true, |(_, bf)| f > bf) {
                best = Some((t, f));
            }
        }
        if let Some((top, freq)) = best {
            summary.top = Some(top.to_string());
            summary.freq = Some(freq);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(product: &str, region: &str, date: Option<(i32, u32, u32)>, price: f64) -> Vec<Cell> {
        let date_cell = match date {
            Some((y, m, d)) => Cell::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            None => Cell::Empty,
        };
        vec![
            Cell::Text(product.into()),
            Cell::Text(region.into()),
            date_cell,
            Cell::Number(price),
        ]
    }

    fn sales_dataset() -> Dataset {
        let mut ds = Dataset::new(vec![
            "Product".into(),
            "Region".into(),
            "OrderDate".into(),
            "Total Price".into(),
        ]);
        ds.rows.push(row("A", "East", Some((2024, 1, 5)), 10.0));
        ds.rows.push(row("B", "West", Some((2024, 1, 20)), 5.0));
        ds.rows.push(row("A", "East", Some((2024, 2, 1)), 3.0));
        ds
    }

    fn points(data: ViewData) -> Vec<(String, f64)> {
        match data {
            ViewData::Ready(series) => series.points.into_iter().map(|p| (p.key, p.value)).collect(),
            ViewData::Missing { .. } => panic!("expected series"),
        }
    }

    #[test]
    fn test_sales_by_product_descending() {
        let got = points(sales_by_product(&sales_dataset()));
        assert_eq!(got, vec![("A".to_string(), 13.0), ("B".to_string(), 5.0)]);
    }

    #[test]
    fn test_equal_sums_keep_input_order() {
        let mut ds = Dataset::new(vec!["Region".into(), "Total Price".into()]);
        ds.rows
            .push(vec![Cell::Text("East".into()), Cell::Number(20.0)]);
        ds.rows
            .push(vec![Cell::Text("West".into()), Cell::Number(20.0)]);
        let got = points(sales_by_region(&ds));
        assert_eq!(
            got,
            vec![("East".to_string(), 20.0), ("West".to_string(), 20.0)]
        );
    }

    #[test]
    fn test_sales_over_time_chronological() {
        let mut ds = Dataset::new(vec!["OrderDate".into(), "Total Price".into()]);
        // Deliberately out of order on input
        for (date, price) in [
            ((2024, 2, 1), 7.0),
            ((2024, 1, 5), 10.0),
            ((2024, 1, 20), 5.0),
        ] {
            ds.rows.push(vec![
                Cell::Date(NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap()),
                Cell::Number(price),
            ]);
        }
        let got = points(sales_over_time(&ds));
        assert_eq!(
            got,
            vec![("2024-01".to_string(), 15.0), ("2024-02".to_string(), 7.0)]
        );
    }

    #[test]
    fn test_missing_columns_yield_warning_not_series() {
        let ds = Dataset::new(vec!["Quantity".into()]);
        let data = sales_by_product(&ds);
        match data {
            ViewData::Missing { required } => {
                assert_eq!(required, ["Product", "Total Price"]);
                assert_eq!(
                    ViewData::warning(&required),
                    "Required columns 'Product' or 'Total Price' not found in data."
                );
            }
            ViewData::Ready(_) => panic!("expected missing columns"),
        }
        assert!(matches!(sales_by_region(&ds), ViewData::Missing { .. }));
        assert!(matches!(sales_over_time(&ds), ViewData::Missing { .. }));
    }

    #[test]
    fn test_missing_only_price_column() {
        let ds = Dataset::new(vec!["Product".into()]);
        assert!(matches!(sales_by_product(&ds), ViewData::Missing { .. }));
    }

    #[test]
    fn test_series_total() {
        match sales_by_product(&sales_dataset()) {
            ViewData::Ready(series) => assert_eq!(series.total, 18.0),
            ViewData::Missing { .. } => panic!("expected series"),
        }
    }

    #[test]
    fn test_non_numeric_prices_contribute_nothing() {
        let mut ds = Dataset::new(vec!["Product".into(), "Total Price".into()]);
        ds.rows
            .push(vec![Cell::Text("A".into()), Cell::Number(10.0)]);
        ds.rows
            .push(vec![Cell::Text("A".into()), Cell::Text("n/a".into())]);
        let got = points(sales_by_product(&ds));
        assert_eq!(got, vec![("A".to_string(), 10.0)]);
    }

    #[test]
    fn test_time_view_skips_rows_without_date() {
        let mut ds = Dataset::new(vec!["OrderDate".into(), "Total Price".into()]);
        ds.rows.push(vec![
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            Cell::Number(10.0),
        ]);
        ds.rows.push(vec![Cell::Empty, Cell::Number(99.0)]);
        let got = points(sales_over_time(&ds));
        assert_eq!(got, vec![("2024-01".to_string(), 10.0)]);
    }

    #[test]
    fn test_describe_numeric_column() {
        let summaries = describe(&sales_dataset());
        let price = summaries.iter().find(|s| s.name == "Total Price").unwrap();
        assert_eq!(price.count, 3);
        assert_eq!(price.mean, Some(6.0));
        assert_eq!(price.min.as_deref(), Some("3.00"));
        assert_eq!(price.max.as_deref(), Some("10.00"));
        assert!(price.unique.is_none());
    }

    #[test]
    fn test_describe_categorical_column() {
        let summaries = describe(&sales_dataset());
        let product = summaries.iter().find(|s| s.name == "Product").unwrap();
        assert_eq!(product.count, 3);
        assert_eq!(product.unique, Some(2));
        assert_eq!(product.top.as_deref(), Some("A"));
        assert_eq!(product.freq, Some(2));
        assert!(product.mean.is_none());
    }

    #[test]
    fn test_describe_date_column() {
        let summaries = describe(&sales_dataset());
        let date = summaries.iter().find(|s| s.name == "OrderDate").unwrap();
        assert_eq!(date.min.as_deref(), Some("2024-01-05"));
        assert_eq!(date.max.as_deref(), Some("2024-02-01"));
        assert!(date.mean.is_none());
    }

    #[test]
    fn test_describe_dataset_is_untouched() {
        let ds = sales_dataset();
        let before = ds.clone();
        let _ = describe(&ds);
        let _ = sales_over_time(&ds);
        assert_eq!(ds, before);
        assert!(!ds.has_column("YearMonth"));
    }
}
