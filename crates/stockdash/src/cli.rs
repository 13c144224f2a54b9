use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base address; falls back to $STOCKDASH_API, then the public backend.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout, in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Sets the level of logging
    #[arg(long, value_enum, ignore_case = true, default_value_t = TraceLevel::Warn, global = true)]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the companies the backend offers.
    Companies,

    /// Load the directory, select one company and print its dashboard.
    Show {
        symbol: String,
    },

    /// Interactive dashboard; type a symbol or row number to switch company.
    Dash,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<TraceLevel> for log::LevelFilter {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Debug => log::LevelFilter::Debug,
            TraceLevel::Info => log::LevelFilter::Info,
            TraceLevel::Warn => log::LevelFilter::Warn,
            TraceLevel::Error => log::LevelFilter::Error,
        }
    }
}
