use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesdashError {
    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unparseable date in column '{column}': {value}")]
    DateParse { column: String, value: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SalesdashError>;
