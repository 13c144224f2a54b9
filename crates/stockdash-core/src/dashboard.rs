use crate::chart::{ChartRenderer, ChartSurface};
use crate::config::ConfigStore;
use crate::directory::{CompanyDirectory, Entry, LOAD_FAILED};
use crate::error::DashError;
use crate::fetcher;
use crate::metrics::MetricsView;
use crate::present::{Notice, Presenter};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use stockdash_client::Backend;

/// How a fetch-and-render cycle ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// Charts & metrics now show this symbol.
    Rendered(String),
    /// A newer cycle started while this one was in flight; its result was dropped.
    Superseded(String),
}

struct Screen<S: ChartSurface> {
    charts: ChartRenderer<S>,
    symbol: Option<String>,
}

/// The dashboard context: backend address, company directory, live charts and the ports they
/// are shown through.
///
/// Every selection starts a new generation. A cycle only touches the screen if its generation is
/// still the latest once its data has arrived, so a slow response for an earlier selection can
/// never overwrite a later one. All chart & metric updates happen under the `screen` lock.
pub struct Dashboard<B, S: ChartSurface, P> {
    backend: B,
    config: ConfigStore,
    directory: Mutex<CompanyDirectory>,
    generation: AtomicU64,
    load_epoch: AtomicU64,
    screen: tokio::sync::Mutex<Screen<S>>,
    presenter: P,
}

impl<B, S, P> Dashboard<B, S, P>
where
    B: Backend,
    S: ChartSurface,
    P: Presenter,
{
    pub fn new(backend: B, surface: S, presenter: P, config: ConfigStore) -> Self {
        Self {
            backend,
            config,
            directory: Mutex::new(CompanyDirectory::new()),
            generation: AtomicU64::new(0),
            load_epoch: AtomicU64::new(0),
            screen: tokio::sync::Mutex::new(Screen {
                charts: ChartRenderer::new(surface),
                symbol: None,
            }),
            presenter,
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn active(&self) -> Option<String> {
        self.directory().active().map(str::to_string)
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.directory().entries()
    }

    /// The inline message left by a failed directory load.
    pub fn directory_error(&self) -> Option<String> {
        self.directory().error().map(str::to_string)
    }

    /// Symbol for a row number or (case-insensitive) symbol typed by the user.
    pub fn resolve(&self, input: &str) -> Option<String> {
        self.directory().resolve(input).map(|c| c.symbol.clone())
    }

    /// The symbol currently on screen.
    pub async fn rendered(&self) -> Option<String> {
        self.screen.lock().await.symbol.clone()
    }

    /// Load the company list, then run a cycle for its first entry.
    pub async fn load(&self) -> Result<Option<Cycle>, DashError> {
        let epoch = self.load_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        // whatever is in flight belongs to the previous directory
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.presenter.directory_loading();

        let base = self.config.get();
        info!("Loading companies from {base}");
        let companies = self.backend.companies(&base).await;

        if self.load_epoch.load(Ordering::SeqCst) != epoch {
            debug!("directory load #{epoch} superseded; discarding");
            return Ok(None);
        }

        let first = match companies {
            Ok(companies) => {
                let mut directory = self.directory();
                let first = directory.loaded(companies).map(str::to_string);
                self.presenter.directory_loaded(&directory.entries());
                first
            }
            Err(source) => {
                error!("company list request failed: {source}");
                self.directory().failed(LOAD_FAILED);
                self.presenter.directory_failed(LOAD_FAILED);
                return Err(DashError::DirectoryLoadFailed(source));
            }
        };

        match first {
            Some(symbol) => self.cycle(&symbol).await.map(Some),
            None => {
                info!("Company directory is empty");
                Ok(None)
            }
        }
    }

    /// Make `symbol` active and run one cycle for it. Re-selecting the active symbol fetches
    /// again.
    pub async fn select(&self, symbol: &str) -> Result<Cycle, DashError> {
        let selected = self.directory().select(symbol);
        if let Err(e) = selected {
            warn!("[{symbol}] selection rejected: {e}");
            return Err(e);
        }

        self.presenter.mark_active(symbol);
        self.cycle(symbol).await
    }

    /// Point the dashboard at another backend and reload the directory.
    pub async fn apply_base(&self, value: &str) -> Result<Option<Cycle>, DashError> {
        if !self.config.set(value) {
            warn!("Blank backend address ignored; keeping {}", self.config.get());
        }
        self.load().await
    }

    async fn cycle(&self, symbol: &str) -> Result<Cycle, DashError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("[{symbol}] cycle #{generation} started");

        let base = self.config.get();
        let fetched = fetcher::fetch_for(&self.backend, &base, symbol).await;

        let mut screen = self.screen.lock().await;
        if !self.is_current(generation) {
            debug!("[{symbol}] cycle #{generation} superseded; discarding");
            return Ok(Cycle::Superseded(symbol.to_string()));
        }

        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                self.presenter.notify(&Notice::DataUnavailable {
                    symbol: symbol.to_string(),
                });
                return Err(e);
            }
        };

        if let Err(source) = screen.charts.render(&fetched.history) {
            error!("[{symbol}] chart rendering failed: {source}");
            self.presenter.notify(&Notice::RenderFailed {
                symbol: symbol.to_string(),
                reason: source.to_string(),
            });
            return Err(DashError::Render {
                symbol: symbol.to_string(),
                source,
            });
        }

        let metrics = MetricsView::new(&fetched.history, &fetched.prediction);
        self.presenter.show_metrics(symbol, &metrics);
        screen.symbol = Some(symbol.to_string());

        debug!("[{symbol}] cycle #{generation} rendered");
        Ok(Cycle::Rendered(symbol.to_string()))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn directory(&self) -> MutexGuard<'_, CompanyDirectory> {
        match self.directory.lock() {
            Ok(directory) => directory,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
