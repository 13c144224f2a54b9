use crate::error::DashError;
use log::{error, trace, warn};
use stockdash_client::{Backend, HistoryResult, PredictionResult, Query};

/// Everything one fetch-and-render cycle needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub history: HistoryResult,
    pub prediction: PredictionResult,
}

/// Request history & prediction for `symbol` concurrently and wait for both to settle.
///
/// History is mandatory; a failed prediction is absorbed as `next_close_prediction: None`.
pub async fn fetch_for<B>(backend: &B, base: &str, symbol: &str) -> Result<FetchResult, DashError>
where
    B: Backend,
{
    let history_query = Query::history(symbol);
    let prediction_query = Query::prediction(symbol);

    trace!("[{symbol}] requesting history & prediction from {base}");
    let (history, prediction) = futures::join!(
        backend.history(base, &history_query),
        backend.predict(base, &prediction_query),
    );

    let history = history.map_err(|source| {
        error!("[{symbol}] history request failed: {source}");
        DashError::HistoryUnavailable {
            symbol: symbol.to_string(),
            source,
        }
    })?;

    let prediction = prediction.unwrap_or_else(|source| {
        let absorbed = DashError::PredictionUnavailable {
            symbol: symbol.to_string(),
            source,
        };
        warn!("[{symbol}] {absorbed}");
        PredictionResult::unavailable()
    });

    trace!("[{symbol}] fetched {} candles", history.candles.len());
    Ok(FetchResult {
        history,
        prediction,
    })
}
