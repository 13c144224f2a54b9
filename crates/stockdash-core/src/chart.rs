use chrono::NaiveDate;
use log::{debug, error};
use std::fmt;
use stockdash_client::HistoryResult;
use thiserror::Error;

pub const RSI_BOUNDS: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("history contains no candles")]
    Empty,

    #[error("candle {index} has an unreadable date {date:?}")]
    BadDate { index: usize, date: String },

    #[error("candle {index} ({date}) is not after the previous one")]
    OutOfOrder { index: usize, date: String },

    #[error("candle {index} ({date}) has a non-finite close")]
    BadClose { index: usize, date: String },

    /// The chart engine refused to build an instance.
    #[error("chart surface error: {0}")]
    Surface(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Price,
    Indicator,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Price => write!(f, "price"),
            ChartKind::Indicator => write!(f, "indicator"),
        }
    }
}

/// One line of a chart; `None` points are drawn as gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub border_width: u8,
}

/// Everything the chart engine needs to draw one line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Category axis, shared by every series.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Fixed vertical range; `None` lets the engine fit the data.
    pub y_bounds: Option<(f64, f64)>,
    pub point_radius: u8,
    /// Hovering one index shows every series at that index.
    pub index_tooltip: bool,
}

/// Index-aligned columns derived from a history's candles.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub labels: Vec<String>,
    pub close: Vec<f64>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
}

impl Datasets {
    /// Split candles into columns, rejecting anything the charts could not show faithfully.
    pub fn from_history(history: &HistoryResult) -> Result<Self, ChartError> {
        let candles = &history.candles;
        if candles.is_empty() {
            return Err(ChartError::Empty);
        }

        let mut previous: Option<NaiveDate> = None;
        for (index, candle) in candles.iter().enumerate() {
            let date = NaiveDate::parse_from_str(&candle.date, "%Y-%m-%d").map_err(|_| {
                ChartError::BadDate {
                    index,
                    date: candle.date.clone(),
                }
            })?;
            if previous.is_some_and(|p| date <= p) {
                return Err(ChartError::OutOfOrder {
                    index,
                    date: candle.date.clone(),
                });
            }
            if !candle.close.is_finite() {
                return Err(ChartError::BadClose {
                    index,
                    date: candle.date.clone(),
                });
            }
            previous = Some(date);
        }

        Ok(Self {
            labels: candles.iter().map(|c| c.date.clone()).collect(),
            close: candles.iter().map(|c| c.close).collect(),
            sma20: candles.iter().map(|c| c.sma20).collect(),
            sma50: candles.iter().map(|c| c.sma50).collect(),
            rsi14: candles.iter().map(|c| c.rsi14).collect(),
        })
    }

    /// Close, SMA 20 & SMA 50 over the dates.
    pub fn price_chart(&self) -> LineChart {
        LineChart {
            labels: self.labels.clone(),
            series: vec![
                Series {
                    label: "Close".to_string(),
                    data: self.close.iter().copied().map(Some).collect(),
                    border_width: 2,
                },
                Series {
                    label: "SMA 20".to_string(),
                    data: self.sma20.clone(),
                    border_width: 1,
                },
                Series {
                    label: "SMA 50".to_string(),
                    data: self.sma50.clone(),
                    border_width: 1,
                },
            ],
            y_bounds: None,
            point_radius: 0,
            index_tooltip: true,
        }
    }

    /// RSI 14 on a fixed 0-100 axis.
    pub fn indicator_chart(&self) -> LineChart {
        LineChart {
            labels: self.labels.clone(),
            series: vec![Series {
                label: "RSI 14".to_string(),
                data: self.rsi14.clone(),
                border_width: 2,
            }],
            y_bounds: Some(RSI_BOUNDS),
            point_radius: 0,
            index_tooltip: false,
        }
    }
}

/// A live chart instance. Disposing consumes it, so a replaced handle cannot be touched again.
pub trait ChartHandle: Send {
    fn dispose(self);
}

/// The chart engine: turns a [`LineChart`] into a live instance on one of the two surfaces.
pub trait ChartSurface: Send {
    type Handle: ChartHandle;

    fn create(&mut self, kind: ChartKind, chart: LineChart) -> Result<Self::Handle, ChartError>;
}

struct Live<H> {
    handle: H,
    chart: LineChart,
}

/// Sole owner of the price & indicator chart instances.
pub struct ChartRenderer<S: ChartSurface> {
    surface: S,
    price: Option<Live<S::Handle>>,
    indicator: Option<Live<S::Handle>>,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            price: None,
            indicator: None,
        }
    }

    /// Rebuild both charts from `history`.
    ///
    /// The data is validated before any live chart is disposed, so bad input leaves the current
    /// charts on screen. If the surface refuses a chart halfway, the charts of the previous render
    /// are put back; the two surfaces always show the same history.
    pub fn render(&mut self, history: &HistoryResult) -> Result<(), ChartError> {
        let datasets = Datasets::from_history(history)?;
        debug!("rendering {} points", datasets.labels.len());

        let mut replaced = Vec::with_capacity(2);
        for (kind, chart) in [
            (ChartKind::Price, datasets.price_chart()),
            (ChartKind::Indicator, datasets.indicator_chart()),
        ] {
            replaced.push((kind, self.dispose(kind)));
            if let Err(e) = self.create(kind, chart) {
                self.restore(replaced);
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn is_live(&self, kind: ChartKind) -> bool {
        self.slot(kind).is_some()
    }

    fn slot(&self, kind: ChartKind) -> &Option<Live<S::Handle>> {
        match kind {
            ChartKind::Price => &self.price,
            ChartKind::Indicator => &self.indicator,
        }
    }

    fn slot_mut(&mut self, kind: ChartKind) -> &mut Option<Live<S::Handle>> {
        match kind {
            ChartKind::Price => &mut self.price,
            ChartKind::Indicator => &mut self.indicator,
        }
    }

    /// Dispose the live chart of `kind`, handing back what it showed.
    fn dispose(&mut self, kind: ChartKind) -> Option<LineChart> {
        // dispose first: never two live instances on one surface
        self.slot_mut(kind).take().map(|live| {
            debug!("disposing {kind} chart");
            live.handle.dispose();
            live.chart
        })
    }

    fn create(&mut self, kind: ChartKind, chart: LineChart) -> Result<(), ChartError> {
        let handle = self.surface.create(kind, chart.clone())?;
        *self.slot_mut(kind) = Some(Live { handle, chart });
        Ok(())
    }

    /// Bring back the charts disposed by a render that could not finish.
    fn restore(&mut self, replaced: Vec<(ChartKind, Option<LineChart>)>) {
        for (kind, previous) in replaced {
            self.dispose(kind);
            let Some(chart) = previous else { continue };
            if let Err(e) = self.create(kind, chart) {
                error!("could not restore the previous {kind} chart: {e}");
            }
        }
    }
}
