use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesdashError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the sales spreadsheet (CSV or XLSX). Empty until configured.
    #[serde(default)]
    pub data_file: String,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("salesdash")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SalesdashError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

/// The configured data file, or an error telling the user how to set one.
pub fn get_data_file() -> Result<PathBuf> {
    let settings = load_settings();
    if settings.data_file.is_empty() {
        return Err(SalesdashError::Settings(
            "No data file configured. Run `salesdash load <file>` or `salesdash demo`.".to_string(),
        ));
    }
    Ok(PathBuf::from(settings.data_file))
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
