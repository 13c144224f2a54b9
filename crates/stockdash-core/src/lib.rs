//! Selection-driven fetch & render pipeline of the dashboard.
//!
//! ```text
//! load() ──> CompanyDirectory ──> default selection ─┐
//! select(symbol) ────────────────────────────────────┴─> fetch_for() ──> ChartRenderer + MetricsView
//! ```
//!
//! Everything that touches a screen goes through the [`Presenter`] and [`ChartSurface`] ports.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod present;

#[cfg(test)]
pub(crate) mod testing;

pub use chart::{
    ChartError, ChartHandle, ChartKind, ChartRenderer, ChartSurface, Datasets, LineChart, Series,
};
pub use config::ConfigStore;
pub use dashboard::{Cycle, Dashboard};
pub use directory::{CompanyDirectory, Entry};
pub use error::DashError;
pub use fetcher::FetchResult;
pub use metrics::MetricsView;
pub use present::{Notice, Presenter};
