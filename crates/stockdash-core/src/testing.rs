//! Scripted backend and recording ports for the pipeline tests.

use crate::chart::{ChartError, ChartHandle, ChartKind, ChartSurface, LineChart};
use crate::directory::Entry;
use crate::metrics::MetricsView;
use crate::present::{Notice, Presenter};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stockdash_client::{
    Backend, Candle, ClientError, Company, HistoryResult, Metrics, PredictionResult, Query,
    StatusCode,
};
use tokio::sync::Notify;

pub fn companies() -> Vec<Company> {
    vec![
        Company {
            symbol: "AAA".into(),
            name: "Alpha".into(),
        },
        Company {
            symbol: "BBB".into(),
            name: "Beta".into(),
        },
    ]
}

/// `len` daily candles for `symbol`, starting 2024-01-01, with the indicators left empty where
/// their window is not yet full.
pub fn history(symbol: &str, len: usize) -> HistoryResult {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let candles = (0..len)
        .map(|i| {
            let close = 100.0 + i as f64;
            Candle {
                date: (start + Days::new(i as u64)).format("%Y-%m-%d").to_string(),
                open: Some(close - 0.5),
                high: Some(close + 1.0),
                low: Some(close - 1.0),
                close,
                volume: Some(1_000.0),
                sma20: (i >= 19).then_some(close - 9.5),
                sma50: (i >= 49).then_some(close - 24.5),
                rsi14: (i >= 14).then_some(50.0),
            }
        })
        .collect();

    HistoryResult {
        symbol: Some(symbol.to_string()),
        metrics: Metrics {
            high_52w: 100.0 + len as f64,
            low_52w: 99.0,
            avg_volume: 1_000.0,
        },
        candles,
    }
}

fn unavailable(path: &str, symbol: &str) -> ClientError {
    ClientError::Status {
        url: format!("mock://{path}?symbol={symbol}"),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Companies,
    History(String),
    Predict(String),
}

/// Answers from fixed per-symbol tables; anything missing is a 500. A history request for a
/// gated symbol waits until its [`Notify`] fires; so does the first company list request once a
/// companies gate is set.
#[derive(Default)]
pub struct MockBackend {
    companies: Mutex<Option<Vec<Company>>>,
    companies_gate: Mutex<Option<Arc<Notify>>>,
    history: HashMap<String, HistoryResult>,
    predictions: HashMap<String, Option<f64>>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<(Call, String)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_companies(self, companies: Vec<Company>) -> Self {
        *self.companies.lock().unwrap() = Some(companies);
        self
    }

    pub fn with_history(mut self, symbol: &str, history: HistoryResult) -> Self {
        self.history.insert(symbol.to_string(), history);
        self
    }

    pub fn with_prediction(mut self, symbol: &str, next_close: Option<f64>) -> Self {
        self.predictions.insert(symbol.to_string(), next_close);
        self
    }

    pub fn with_gate(mut self, symbol: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(symbol.to_string(), gate);
        self
    }

    /// Hold the next company list request, with the list as it was when requested, until
    /// `gate` fires.
    pub fn with_companies_gate(self, gate: Arc<Notify>) -> Self {
        *self.companies_gate.lock().unwrap() = Some(gate);
        self
    }

    /// Answer further company list requests with `companies`, or fail them on `None`.
    pub fn set_companies(&self, companies: Option<Vec<Company>>) {
        *self.companies.lock().unwrap() = companies;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn bases(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }

    fn record(&self, call: Call, base: &str) {
        self.calls.lock().unwrap().push((call, base.to_string()));
    }
}

impl Backend for MockBackend {
    async fn companies(&self, base: &str) -> stockdash_client::Result<Vec<Company>> {
        self.record(Call::Companies, base);
        let companies = self.companies.lock().unwrap().clone();
        let gate = self.companies_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        companies.ok_or_else(|| unavailable("api/companies", ""))
    }

    async fn history(&self, base: &str, query: &Query) -> stockdash_client::Result<HistoryResult> {
        self.record(Call::History(query.symbol.clone()), base);
        if let Some(gate) = self.gates.get(&query.symbol) {
            gate.notified().await;
        }
        self.history
            .get(&query.symbol)
            .cloned()
            .ok_or_else(|| unavailable("api/history", &query.symbol))
    }

    async fn predict(&self, base: &str, query: &Query) -> stockdash_client::Result<PredictionResult> {
        self.record(Call::Predict(query.symbol.clone()), base);
        match self.predictions.get(&query.symbol) {
            Some(next_close) => Ok(PredictionResult {
                symbol: Some(query.symbol.clone()),
                next_close_prediction: *next_close,
            }),
            None => Err(unavailable("api/predict/next", &query.symbol)),
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Loading,
    Loaded(Vec<Entry>),
    DirectoryFailed(String),
    Active(String),
    Metrics(String, MetricsView),
    Notice(Notice),
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                Event::Loaded(entries) => Some(entries),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn directory_error(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::DirectoryFailed(message) => Some(message),
            _ => None,
        })
    }

    pub fn active_marker(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Active(symbol) => Some(symbol),
            _ => None,
        })
    }

    fn last_metrics(&self) -> Option<(String, MetricsView)> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Metrics(symbol, view) => Some((symbol, view)),
            _ => None,
        })
    }

    pub fn metrics(&self) -> Option<MetricsView> {
        self.last_metrics().map(|(_, view)| view)
    }

    /// Symbol of the most recent metrics write.
    pub fn metrics_for(&self) -> Option<String> {
        self.last_metrics().map(|(symbol, _)| symbol)
    }

    pub fn metrics_shown_for(&self, symbol: &str) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, Event::Metrics(s, _) if s == symbol))
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn directory_loading(&self) {
        self.push(Event::Loading);
    }

    fn directory_loaded(&self, entries: &[Entry]) {
        self.push(Event::Loaded(entries.to_vec()));
    }

    fn directory_failed(&self, message: &str) {
        self.push(Event::DirectoryFailed(message.to_string()));
    }

    fn mark_active(&self, symbol: &str) {
        self.push(Event::Active(symbol.to_string()));
    }

    fn show_metrics(&self, symbol: &str, metrics: &MetricsView) {
        self.push(Event::Metrics(symbol.to_string(), metrics.clone()));
    }

    fn notify(&self, notice: &Notice) {
        self.push(Event::Notice(notice.clone()));
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Default)]
struct SurfaceLog {
    created: usize,
    disposed: usize,
    live: HashMap<ChartKind, usize>,
    max_live: usize,
    last: HashMap<ChartKind, LineChart>,
    /// Successful creates left before the scripted failure, and its reason.
    fail_after: Option<(usize, String)>,
}

/// Chart engine double that counts live instances per surface.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

pub struct RecordedChart {
    kind: ChartKind,
    log: Arc<Mutex<SurfaceLog>>,
}

impl ChartHandle for RecordedChart {
    fn dispose(self) {
        let mut log = self.log.lock().unwrap();
        log.disposed += 1;
        *log.live.entry(self.kind).or_default() -= 1;
    }
}

impl ChartSurface for RecordingSurface {
    type Handle = RecordedChart;

    fn create(&mut self, kind: ChartKind, chart: LineChart) -> Result<RecordedChart, ChartError> {
        let mut log = self.log.lock().unwrap();
        match log.fail_after.take() {
            Some((0, reason)) => return Err(ChartError::Surface(reason)),
            Some((n, reason)) => log.fail_after = Some((n - 1, reason)),
            None => {}
        }

        log.created += 1;
        let live = log.live.entry(kind).or_default();
        *live += 1;
        let live = *live;
        log.max_live = log.max_live.max(live);
        log.last.insert(kind, chart);

        Ok(RecordedChart {
            kind,
            log: self.log.clone(),
        })
    }
}

impl RecordingSurface {
    pub fn created(&self) -> usize {
        self.log.lock().unwrap().created
    }

    pub fn disposed(&self) -> usize {
        self.log.lock().unwrap().disposed
    }

    pub fn live(&self, kind: ChartKind) -> usize {
        self.log.lock().unwrap().live.get(&kind).copied().unwrap_or(0)
    }

    /// Highest number of simultaneously live instances seen on any one surface.
    pub fn max_live(&self) -> usize {
        self.log.lock().unwrap().max_live
    }

    pub fn last(&self, kind: ChartKind) -> Option<LineChart> {
        self.log.lock().unwrap().last.get(&kind).cloned()
    }

    /// Let `creates` more charts through, then refuse the next one.
    pub fn fail_after(&self, creates: usize, reason: &str) {
        self.log.lock().unwrap().fail_after = Some((creates, reason.to_string()));
    }
}
