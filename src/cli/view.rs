use std::io::IsTerminal;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::ViewCommands;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::fmt::{money, number};
use crate::loader::DatasetCache;
use crate::settings::{get_data_file, shellexpand_path};
use crate::views::{self, ColumnSummary, ViewData, PRICE_COLUMN};

pub fn dispatch(cmd: ViewCommands) -> Result<()> {
    let path = resolve_file(&cmd)?;

    if std::io::stdout().is_terminal() {
        let show_summary = matches!(cmd, ViewCommands::Overview { full: true, .. });
        return super::dashboard::run_at(&path, cmd.kind(), show_summary);
    }

    // Non-TTY: plain text to stdout
    let mut cache = DatasetCache::new();
    let ds = cache.load(&path)?;
    let s = render_text(&ds, &cmd);
    println!("{s}");
    Ok(())
}

fn resolve_file(cmd: &ViewCommands) -> Result<PathBuf> {
    match cmd.file() {
        Some(f) => Ok(PathBuf::from(shellexpand_path(f))),
        None => get_data_file(),
    }
}

pub(crate) fn render_text(ds: &Dataset, cmd: &ViewCommands) -> String {
    match cmd {
        ViewCommands::Overview { full, .. } => overview(ds, *full),
        ViewCommands::Product { .. } => {
            series_report(views::sales_by_product(ds), "Total Sales by Product", "Product Name")
        }
        ViewCommands::Region { .. } => region(views::sales_by_region(ds)),
        ViewCommands::Time { .. } => {
            series_report(views::sales_over_time(ds), "Total Sales Over Time", "Date")
        }
    }
}

// ---------------------------------------------------------------------------
// Pure formatting functions (view data → String)
// ---------------------------------------------------------------------------

fn data_table(ds: &Dataset, rows: &[Vec<crate::dataset::Cell>]) -> Table {
    let price_idx = ds.column_index(PRICE_COLUMN);
    let mut table = Table::new();
    table.set_header(ds.columns.clone());
    for row in rows {
        let cells: Vec<Cell> = ds
            .columns
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let cell = row.get(i).unwrap_or(&crate::dataset::Cell::Empty);
                if price_idx == Some(i) {
                    Cell::new(cell.display_money())
                } else {
                    Cell::new(cell.display())
                }
            })
            .collect();
        table.add_row(cells);
    }
    table
}

fn overview(ds: &Dataset, full: bool) -> String {
    let preview = data_table(ds, ds.head(5));
    let mut out = format!("Data Overview\n\nFirst 5 Rows of the Data\n{preview}");

    if full {
        let all = data_table(ds, &ds.rows);
        out.push_str(&format!(
            "\n\nFull Data ({} rows)\n{all}",
            number(ds.len())
        ));
        out.push_str(&format!(
            "\n\nDescriptive Statistics\n{}",
            stats_table(&views::describe(ds))
        ));
    }
    out
}

fn stats_table(summaries: &[ColumnSummary]) -> Table {
    let mut table = Table::new();
    let mut header = vec![String::new()];
    header.extend(summaries.iter().map(|s| s.name.clone()));
    table.set_header(header);

    let rows: Vec<(&str, Box<dyn Fn(&ColumnSummary) -> String>)> = vec![
        ("count", Box::new(|s| s.count.to_string())),
        (
            "mean",
            Box::new(|s| s.mean.map(|m| format!("{m:.2}")).unwrap_or_default()),
        ),
        ("min", Box::new(|s| s.min.clone().unwrap_or_default())),
        ("max", Box::new(|s| s.max.clone().unwrap_or_default())),
        (
            "unique",
            Box::new(|s| s.unique.map(|u| u.to_string()).unwrap_or_default()),
        ),
        ("top", Box::new(|s| s.top.clone().unwrap_or_default())),
        (
            "freq",
            Box::new(|s| s.freq.map(|f| f.to_string()).unwrap_or_default()),
        ),
    ];
    for (label, get) in rows {
        let mut cells = vec![Cell::new(label)];
        cells.extend(summaries.iter().map(|s| Cell::new(get(s))));
        table.add_row(cells);
    }
    table
}

fn series_report(data: ViewData, title: &str, key_header: &str) -> String {
    let series = match data {
        ViewData::Ready(series) => series,
        ViewData::Missing { required } => return warning(&required),
    };
    let mut table = Table::new();
    table.set_header(vec![key_header, "Total Sales Amount"]);
    for p in &series.points {
        table.add_row(vec![Cell::new(&p.key), Cell::new(money(p.value))]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(series.total)),
    ]);
    format!("{title}\n{table}")
}

fn region(data: ViewData) -> String {
    let series = match data {
        ViewData::Ready(series) => series,
        ViewData::Missing { required } => return warning(&required),
    };
    let mut table = Table::new();
    table.set_header(vec!["Region", "Total Sales Amount", "Share"]);
    for p in &series.points {
        let share = if series.total > 0.0 {
            format!("{:.1}%", p.value / series.total * 100.0)
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(&p.key),
            Cell::new(money(p.value)),
            Cell::new(share),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(series.total)),
        Cell::new(""),
    ]);
    format!("Total Sales by Region\n{table}")
}

fn warning(required: &[&'static str; 2]) -> String {
    ViewData::warning(required).yellow().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell as DataCell;
    use chrono::NaiveDate;

    fn sales_dataset() -> Dataset {
        let mut ds = Dataset::new(vec![
            "Product".into(),
            "Region".into(),
            "OrderDate".into(),
            "Total Price".into(),
        ]);
        for (product, region, (y, m, d), price) in [
            ("Widget", "East", (2024, 1, 5), 10.0),
            ("Gadget", "West", (2024, 1, 20), 5.0),
            ("Widget", "East", (2024, 2, 1), 3.0),
        ] {
            ds.rows.push(vec![
                DataCell::Text(product.into()),
                DataCell::Text(region.into()),
                DataCell::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
                DataCell::Number(price),
            ]);
        }
        ds
    }

    #[test]
    fn test_overview_preview_only() {
        let ds = sales_dataset();
        let out = overview(&ds, false);
        assert!(out.contains("First 5 Rows of the Data"));
        assert!(out.contains("Widget"));
        assert!(!out.contains("Descriptive Statistics"));
    }

    #[test]
    fn test_overview_full_is_additive() {
        let ds = sales_dataset();
        let preview = overview(&ds, false);
        let full = overview(&ds, true);
        assert!(full.starts_with(&preview));
        assert!(full.contains("Full Data (3 rows)"));
        assert!(full.contains("Descriptive Statistics"));
    }

    #[test]
    fn test_product_report_sorted_descending() {
        let ds = sales_dataset();
        let out = render_text(&ds, &ViewCommands::Product { file: None });
        assert!(out.contains("Total Sales by Product"));
        let widget = out.find("Widget").unwrap();
        let gadget = out.find("Gadget").unwrap();
        assert!(widget < gadget, "Widget ($13) should list before Gadget ($5)");
        assert!(out.contains("$13.00"));
    }

    #[test]
    fn test_region_report_shares() {
        let ds = sales_dataset();
        let out = render_text(&ds, &ViewCommands::Region { file: None });
        assert!(out.contains("Total Sales by Region"));
        assert!(out.contains("East"));
        assert!(out.contains("72.2%"));
    }

    #[test]
    fn test_time_report_chronological() {
        let ds = sales_dataset();
        let out = render_text(&ds, &ViewCommands::Time { file: None });
        assert!(out.contains("Total Sales Over Time"));
        let jan = out.find("2024-01").unwrap();
        let feb = out.find("2024-02").unwrap();
        assert!(jan < feb);
        assert!(out.contains("$15.00"));
        assert!(out.contains("$7.00"));
    }

    #[test]
    fn test_missing_columns_render_warning() {
        let ds = Dataset::new(vec!["Quantity".into()]);
        let out = render_text(&ds, &ViewCommands::Product { file: None });
        assert!(out.contains("Required columns 'Product' or 'Total Price' not found in data."));
        assert!(!out.contains("Total Sales Amount"));
    }
}
