use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dotenv::var;
use std::sync::Arc;
use std::time::Duration;
use stockdash_client::prelude::*;
use stockdash_core::{ConfigStore, Dashboard, DashError, Presenter};
use term::{TerminalPresenter, TerminalSurface};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

mod cli;
mod term;
mod ui;

type TermDashboard<B = Client> = Dashboard<B, TerminalSurface, TerminalPresenter>;

const USER_AGENT: &str = concat!("stockdash/", env!("CARGO_PKG_VERSION"));

const HELP: &str = "\
  <symbol> | <row>   switch company
  :base <url>        use another backend
  :reload            reload the company list
  :list              show the company list
  :quit              exit";

fn preprocess(level: log::LevelFilter) {
    // grant access to .env
    dotenv::dotenv().ok();

    // initialise logger; RUST_LOG still refines per module
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    preprocess(cli.trace.into());
    log::info!("Command line input recorded: {cli:#?}");

    // --base-url > $STOCKDASH_API > built-in default
    let config = ConfigStore::default();
    if let Some(base) = cli.base_url.clone().or_else(|| var("STOCKDASH_API").ok()) {
        config.set(&base);
    }
    let client = build_client(USER_AGENT, Duration::from_secs(cli.timeout))?;

    // cli framework:
    // "> stockdash <COMMAND>"
    match &cli.command {
        // "> stockdash companies"
        cli::Commands::Companies => {
            let companies = client.companies(&config.get()).await?;
            for company in companies {
                println!("{:<8} {}", company.symbol.bold(), company.name);
            }
        }

        // "> stockdash show <SYMBOL>"
        cli::Commands::Show { symbol } => {
            let dash = Dashboard::new(
                client,
                TerminalSurface::default(),
                TerminalPresenter::default(),
                config,
            );
            show(&dash, symbol).await?;
        }

        // "> stockdash dash"
        cli::Commands::Dash => {
            let dash = Arc::new(Dashboard::new(
                client,
                TerminalSurface::default(),
                TerminalPresenter::default(),
                config,
            ));
            interactive(dash, BufReader::new(tokio::io::stdin())).await?;
        }
    }

    Ok(())
}

/// Load the directory, then select `symbol` even when it is the default that was just drawn.
async fn show<B: Backend>(dash: &TermDashboard<B>, symbol: &str) -> Result<()> {
    match dash.load().await {
        Err(e @ DashError::DirectoryLoadFailed(_)) => return Err(e.into()),
        // a failing default company must not stop the one asked for
        loaded => log::debug!("default selection: {loaded:?}"),
    }

    let symbol = dash.resolve(symbol).unwrap_or_else(|| symbol.to_string());
    dash.select(&symbol).await?;
    Ok(())
}

/// Read commands line by line; every selection runs as its own task so a slow response never
/// blocks the next one. Tasks still in flight at `:quit` or end of input are awaited.
async fn interactive<B, R>(dash: Arc<TermDashboard<B>>, input: R) -> Result<()>
where
    B: Backend + 'static,
    R: AsyncBufRead + Unpin,
{
    report(dash.load().await);
    println!("{}", HELP.dimmed());

    let mut tasks = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            ":quit" | ":q" => break,
            ":help" => println!("{}", HELP.dimmed()),
            ":list" => match dash.directory_error() {
                Some(message) => dash.presenter().directory_failed(&message),
                None => dash.presenter().list(&dash.entries()),
            },

            ":reload" => {
                let dash = dash.clone();
                tasks.spawn(async move { report(dash.load().await) });
            }

            ":base" => {
                let dash = dash.clone();
                let url = arg.to_string();
                tasks.spawn(async move { report(dash.apply_base(&url).await) });
            }

            input => {
                let symbol = dash.resolve(input).unwrap_or_else(|| input.to_string());
                let dash = dash.clone();
                tasks.spawn(async move { report(dash.select(&symbol).await) });
            }
        }

        // reap what already finished
        while let Some(joined) = tasks.try_join_next() {
            reap(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        reap(joined);
    }
    Ok(())
}

fn reap(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        log::error!("command task failed: {e}");
    }
}

fn report<T>(result: Result<T, DashError>) {
    match result {
        Ok(_) => {}
        // already on screen as a notice or inline error
        Err(
            e @ (DashError::DirectoryLoadFailed(_)
            | DashError::HistoryUnavailable { .. }
            | DashError::Render { .. }),
        ) => log::debug!("{e}"),
        Err(e) => eprintln!("{}", e.to_string().yellow()),
    }
}
