use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings};

/// Sample rows spanning three months, four products, three regions.
/// Totals are spread so every chart has visible shape.
const SAMPLE_ROWS: &[(&str, &str, &str, f64)] = &[
    ("Laptop", "East", "2024-01-05", 1200.00),
    ("Monitor", "West", "2024-01-08", 310.50),
    ("Keyboard", "East", "2024-01-12", 45.99),
    ("Laptop", "South", "2024-01-19", 1150.00),
    ("Headset", "West", "2024-01-27", 89.90),
    ("Monitor", "East", "2024-02-02", 289.00),
    ("Laptop", "West", "2024-02-09", 1275.25),
    ("Keyboard", "South", "2024-02-14", 52.40),
    ("Headset", "East", "2024-02-21", 95.00),
    ("Monitor", "South", "2024-02-26", 330.75),
    ("Laptop", "East", "2024-03-04", 1199.99),
    ("Keyboard", "West", "2024-03-11", 48.25),
    ("Headset", "South", "2024-03-18", 102.10),
    ("Monitor", "West", "2024-03-23", 295.60),
    ("Laptop", "South", "2024-03-29", 1180.00),
];

fn default_output() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("salesdash")
        .join("sample_sales.csv")
}

pub fn sample_csv() -> String {
    let mut out = String::from("Product,Region,OrderDate,Total Price\n");
    for (product, region, date, price) in SAMPLE_ROWS {
        out.push_str(&format!("{product},{region},{date},{price:.2}\n"));
    }
    out
}

pub fn run(output: Option<String>) -> Result<()> {
    let configure = output.is_none();
    let path = output.map(PathBuf::from).unwrap_or_else(default_output);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, sample_csv())?;
    println!("Wrote {} sample rows to {}", SAMPLE_ROWS.len(), path.display());

    if configure {
        let mut settings = load_settings();
        settings.data_file = path.to_string_lossy().to_string();
        save_settings(&settings)?;
        println!("{}", "Configured as the active data file.".green());
        println!("Run `salesdash` to open the dashboard.");
    }
    Ok(())
}
