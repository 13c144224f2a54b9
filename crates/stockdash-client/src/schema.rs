use serde::{Deserialize, Serialize};

pub const HISTORY_PERIOD: &str = "1y";
pub const PREDICTION_PERIOD: &str = "6mo";
pub const INTERVAL: &str = "1d";

/// A single entry of the company directory.
/// ```json
/// { "symbol": "AAPL", "name": "Apple Inc." }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub symbol: String,
    pub name: String,
}

impl Company {
    /// Label shown in the directory listing, e.g. `Apple Inc. (AAPL)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// One trading day of price & indicator data.
/// ```json
/// {
///     "date": "2024-03-01",
///     "open": 179.55,
///     "high": 180.53,
///     "low": 177.38,
///     "close": 179.66,
///     "volume": 73488000.0,
///     "sma20": 184.1,
///     "sma50": 188.03,
///     "rsi14": null
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Candle {
    pub date: String,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub sma20: Option<f64>,
    #[serde(default)]
    pub sma50: Option<f64>,
    #[serde(default)]
    pub rsi14: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Metrics {
    pub high_52w: f64,
    pub low_52w: f64,
    pub avg_volume: f64,
}

/// Response of `GET /api/history`; candles ascend by date.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HistoryResult {
    #[serde(default)]
    pub symbol: Option<String>,
    pub metrics: Metrics,
    pub candles: Vec<Candle>,
}

/// Response of `GET /api/predict/next`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub next_close_prediction: Option<f64>,
}

impl PredictionResult {
    /// A prediction that could not be retrieved.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Query parameters shared by the history & prediction endpoints.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub symbol: String,
    pub period: String,
    pub interval: String,
}

impl Query {
    pub fn history(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            period: HISTORY_PERIOD.to_string(),
            interval: INTERVAL.to_string(),
        }
    }

    pub fn prediction(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            period: PREDICTION_PERIOD.to_string(),
            interval: INTERVAL.to_string(),
        }
    }
}
