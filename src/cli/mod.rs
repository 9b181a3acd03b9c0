pub mod dashboard;
pub mod demo;
pub mod load;
pub mod status;
pub mod view;

use clap::{Parser, Subcommand};

use crate::views::ViewKind;

#[derive(Parser)]
#[command(
    name = "salesdash",
    about = "Terminal dashboard for exploring a sales spreadsheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a single dashboard view (text when piped, interactive on a TTY).
    View {
        #[command(subcommand)]
        command: ViewCommands,
    },
    /// Point salesdash at a sales data file (CSV or XLSX).
    Load {
        /// Path to the data file
        file: String,
    },
    /// Show the configured data file and its shape.
    Status,
    /// Write a sample sales CSV to explore salesdash without real data.
    Demo {
        /// Where to write the sample file (default: ~/Documents/salesdash/sample_sales.csv)
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ViewCommands {
    /// First rows of the data, plus the full summary on request.
    Overview {
        /// Also show the full table and descriptive statistics
        #[arg(long)]
        full: bool,
        /// Data file override (default: the configured file)
        #[arg(long)]
        file: Option<String>,
    },
    /// Total sales by product, as a bar chart.
    Product {
        #[arg(long)]
        file: Option<String>,
    },
    /// Total sales by region, as a donut chart.
    Region {
        #[arg(long)]
        file: Option<String>,
    },
    /// Total sales by month, as a line chart.
    Time {
        #[arg(long)]
        file: Option<String>,
    },
}

impl ViewCommands {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Overview { .. } => ViewKind::Overview,
            Self::Product { .. } => ViewKind::SalesByProduct,
            Self::Region { .. } => ViewKind::SalesByRegion,
            Self::Time { .. } => ViewKind::SalesOverTime,
        }
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Overview { file, .. }
            | Self::Product { file }
            | Self::Region { file }
            | Self::Time { file } => file.as_deref(),
        }
    }
}
