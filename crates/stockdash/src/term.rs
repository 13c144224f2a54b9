use crate::ui;
use colored::Colorize;
use indicatif::ProgressBar;
use std::sync::Mutex;
use stockdash_core::{
    ChartError, ChartHandle, ChartKind, ChartSurface, Entry, LineChart, MetricsView, Notice,
    Presenter,
};

const SPARK_WIDTH: usize = 60;
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Text: company list, metrics & notices
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub struct TerminalPresenter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalPresenter {
    pub fn list(&self, entries: &[Entry]) {
        for (row, entry) in entries.iter().enumerate() {
            let row = format!("{:>3}", row + 1);
            if entry.active {
                println!("{} {} {}", row.dimmed(), "●".green(), entry.label().bold());
            } else {
                println!("{}   {}", row.dimmed(), entry.label());
            }
        }
    }

    fn stop_spinner(&self) {
        let spinner = match self.spinner.lock() {
            Ok(mut spinner) => spinner.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn directory_loading(&self) {
        let pb = ui::spinner("Loading...");
        let previous = match self.spinner.lock() {
            Ok(mut spinner) => spinner.replace(pb),
            Err(poisoned) => poisoned.into_inner().replace(pb),
        };
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn directory_loaded(&self, entries: &[Entry]) {
        self.stop_spinner();
        if entries.is_empty() {
            println!("{}", "No companies available.".dimmed());
        }
        self.list(entries);
    }

    fn directory_failed(&self, message: &str) {
        self.stop_spinner();
        eprintln!("{}", message.red());
    }

    fn mark_active(&self, symbol: &str) {
        println!("{} {}", "▶".green(), symbol.bold());
    }

    fn show_metrics(&self, symbol: &str, metrics: &MetricsView) {
        println!("{}", format!("── {symbol} ").cyan().bold());
        println!("  {:<12}{}", "52w High", metrics.high_52w);
        println!("  {:<12}{}", "52w Low", metrics.low_52w);
        println!("  {:<12}{}", "Avg Volume", metrics.avg_volume);
        println!("  {:<12}{}", "Next Close", metrics.prediction);
    }

    fn notify(&self, notice: &Notice) {
        self.stop_spinner();
        eprintln!("{} {}", "!".red().bold(), notice.to_string().red());
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Charts as sparklines
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub struct TerminalSurface {
    next_id: u64,
}

pub struct TerminalChart {
    id: u64,
    kind: ChartKind,
}

impl ChartHandle for TerminalChart {
    fn dispose(self) {
        log::debug!("{} chart #{} disposed", self.kind, self.id);
    }
}

impl ChartSurface for TerminalSurface {
    type Handle = TerminalChart;

    fn create(&mut self, kind: ChartKind, chart: LineChart) -> Result<TerminalChart, ChartError> {
        self.next_id += 1;
        print!("{}", draw(kind, &chart));
        log::debug!("{kind} chart #{} created", self.next_id);
        Ok(TerminalChart {
            id: self.next_id,
            kind,
        })
    }
}

fn draw(kind: ChartKind, chart: &LineChart) -> String {
    let (first, last) = match (chart.labels.first(), chart.labels.last()) {
        (Some(first), Some(last)) => (first.as_str(), last.as_str()),
        _ => ("", ""),
    };
    let mut out = format!(
        "{} {kind} · {first} → {last} ({} points)\n",
        "┌".dimmed(),
        chart.labels.len()
    );

    let bounds = chart.y_bounds.or_else(|| data_bounds(chart));
    for series in &chart.series {
        let latest = series
            .data
            .iter()
            .rev()
            .find_map(|v| *v)
            .map(|v| format!("{v:.2}"))
            .unwrap_or_default();
        let line = match bounds {
            Some(bounds) => sparkline(&series.data, bounds, SPARK_WIDTH),
            None => " ".repeat(SPARK_WIDTH.min(series.data.len())),
        };
        out.push_str(&format!(
            "{} {:<8}{line} {latest}\n",
            "│".dimmed(),
            series.label
        ));
    }
    out
}

/// Lowest & highest point across all series of a chart.
fn data_bounds(chart: &LineChart) -> Option<(f64, f64)> {
    chart
        .series
        .iter()
        .flat_map(|s| s.data.iter().flatten())
        .fold(None, |bounds, &v| match bounds {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}

/// Squeeze `data` into at most `width` columns, each the last point of its bucket; buckets
/// without a point stay blank.
fn sparkline(data: &[Option<f64>], (lo, hi): (f64, f64), width: usize) -> String {
    let columns = width.min(data.len());
    (0..columns)
        .map(|c| {
            let bucket = &data[c * data.len() / columns..(c + 1) * data.len() / columns];
            match bucket.iter().rev().find_map(|v| *v) {
                Some(v) if hi > lo => {
                    let level = ((v - lo) / (hi - lo) * 7.0).round().clamp(0.0, 7.0);
                    SPARKS[level as usize]
                }
                Some(_) => SPARKS[3],
                None => ' ',
            }
        })
        .collect()
}
