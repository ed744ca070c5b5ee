#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use campus_sphere::auth::{IdentityProvider, IdentityToolkitProvider, InMemoryProvider};
use campus_sphere::config::{Cli, Config};
use campus_sphere::logging;
use campus_sphere::storage::SessionStore;
use campus_sphere::tui::{App, AppError};

/// Simulated round trip for the offline provider, so the loading state is visible.
const OFFLINE_LATENCY: Duration = Duration::from_millis(400);

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;
    let _log_guard = logging::init(&config)?;
    tracing::info!(offline = !config.use_network(), "starting");

    let provider = build_provider(&config)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(provider);
    let result = app.run(&mut terminal).await;

    let restore_result = restore_terminal();
    tracing::info!("exiting");
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn build_provider(config: &Config) -> Result<Arc<dyn IdentityProvider>, AppError> {
    match (&config.api_key, config.offline) {
        (Some(api_key), false) => {
            let store = SessionStore::in_dir(&config.data_dir);
            Ok(Arc::new(IdentityToolkitProvider::new(api_key.clone(), store)?))
        }
        (None, false) => {
            tracing::warn!("no API key configured, falling back to offline mode");
            eprintln!("No API key configured; running offline.");
            Ok(Arc::new(InMemoryProvider::new().with_latency(OFFLINE_LATENCY)))
        }
        (_, true) => Ok(Arc::new(InMemoryProvider::new().with_latency(OFFLINE_LATENCY))),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
