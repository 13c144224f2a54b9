use crate::directory::Entry;
use crate::metrics::MetricsView;
use std::fmt;

/// A blocking, user-visible message about one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DataUnavailable { symbol: String },
    RenderFailed { symbol: String, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DataUnavailable { symbol } => write!(f, "Failed to load data for {symbol}"),
            Notice::RenderFailed { symbol, reason } => {
                write!(f, "Failed to draw charts for {symbol}: {reason}")
            }
        }
    }
}

/// Text side of the screen: the company list, the four metric fields and notices.
pub trait Presenter: Send + Sync {
    fn directory_loading(&self);

    fn directory_loaded(&self, entries: &[Entry]);

    /// Inline error in place of the company list.
    fn directory_failed(&self, message: &str);

    fn mark_active(&self, symbol: &str);

    fn show_metrics(&self, symbol: &str, metrics: &MetricsView);

    fn notify(&self, notice: &Notice);
}
