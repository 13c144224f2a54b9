use crate::chart::ChartError;
use stockdash_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("failed to load companies: {0}")]
    DirectoryLoadFailed(#[source] ClientError),

    #[error("history unavailable for {symbol}: {source}")]
    HistoryUnavailable {
        symbol: String,
        #[source]
        source: ClientError,
    },

    /// Never surfaced to the user; the prediction falls back to the placeholder.
    #[error("prediction unavailable for {symbol}: {source}")]
    PredictionUnavailable {
        symbol: String,
        #[source]
        source: ClientError,
    },

    #[error("{0} is not in the company directory")]
    InvalidSelection(String),

    #[error("failed to render {symbol}: {source}")]
    Render {
        symbol: String,
        #[source]
        source: ChartError,
    },
}
