use crate::dataset::Cell;
use crate::error::Result;
use crate::fmt::number;
use crate::loader::{read_dataset, ORDER_DATE_COLUMN};
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();

    if settings.data_file.is_empty() {
        println!("Data file:  (not set)");
        println!();
        println!("Run `salesdash load <file>` or `salesdash demo` to get started.");
        return Ok(());
    }

    println!("Data file:  {}", settings.data_file);

    let path = std::path::PathBuf::from(&settings.data_file);
    if !path.exists() {
        println!();
        println!("File is missing. Run `salesdash load <file>` to point at another one.");
        return Ok(());
    }

    let ds = read_dataset(&path)?;
    println!("Rows:       {}", number(ds.len()));
    println!("Columns:    {}", ds.columns.join(", "));

    if let Some(idx) = ds.column_index(ORDER_DATE_COLUMN) {
        let dates: Vec<_> = ds.rows.iter().filter_map(|r| match r.get(idx) {
            Some(Cell::Date(d)) => Some(*d),
            _ => None,
        }).collect();
        if let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) {
            println!("Dates:      {} to {}", min.format("%Y-%m-%d"), max.format("%Y-%m-%d"));
        }
    }
    Ok(())
}
