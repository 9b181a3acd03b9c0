use std::path::PathBuf;

use crate::error::{Result, SalesdashError};
use crate::loader::read_dataset;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(file: &str) -> Result<()> {
    let resolved = PathBuf::from(shellexpand_path(file));

    if !resolved.exists() {
        return Err(SalesdashError::Settings(format!(
            "No data file found at {}",
            resolved.display()
        )));
    }

    // Validate before committing so a broken file never becomes the default.
    let ds = read_dataset(&resolved)?;

    let mut settings = load_settings();
    settings.data_file = resolved.to_string_lossy().to_string();
    save_settings(&settings)?;

    println!(
        "Switched to {} ({} rows, {} columns)",
        resolved.display(),
        ds.len(),
        ds.columns.len()
    );
    Ok(())
}
