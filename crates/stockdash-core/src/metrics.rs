use stockdash_client::{HistoryResult, PredictionResult};

/// Shown in place of a prediction the backend could not provide.
pub const PLACEHOLDER: &str = "—";

/// The four summary fields, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsView {
    pub high_52w: String,
    pub low_52w: String,
    pub avg_volume: String,
    pub prediction: String,
}

impl MetricsView {
    pub fn new(history: &HistoryResult, prediction: &PredictionResult) -> Self {
        let metrics = &history.metrics;
        Self {
            high_52w: format_price(Some(metrics.high_52w)),
            low_52w: format_price(Some(metrics.low_52w)),
            avg_volume: format_volume(Some(metrics.avg_volume)),
            prediction: format_prediction(prediction.next_close_prediction),
        }
    }
}

/// `1234.5` -> `"1,234.50"`; missing or non-finite values give an empty string.
pub fn format_price(n: Option<f64>) -> String {
    match n.filter(|n| n.is_finite()) {
        Some(n) => grouped(&format!("{n:.2}")),
        None => String::new(),
    }
}

/// `58412345.7` -> `"58,412,346"`
pub fn format_volume(n: Option<f64>) -> String {
    match n.filter(|n| n.is_finite()) {
        Some(n) => grouped(&format!("{n:.0}")),
        None => String::new(),
    }
}

pub fn format_prediction(n: Option<f64>) -> String {
    match format_price(n) {
        formatted if formatted.is_empty() => PLACEHOLDER.to_string(),
        formatted => formatted,
    }
}

/// Insert `,` between thousands of an already rounded decimal string.
fn grouped(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(number.len() + int.len() / 3);
    out.push_str(sign);
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}
