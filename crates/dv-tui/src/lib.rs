//! Terminal dashboard for DevVault.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use tokio::runtime::Handle;

use dv_assist::{AssistError, AssistResult, GeminiClassifier};
use dv_store::{AssistConfig, MemoryVault, VaultConfig};

mod app;
mod desktop;
mod form;
mod input;
mod render;

pub use app::App;
pub use desktop::{ClipboardSink, CopyTracker, SystemBrowser, SystemClipboard, UrlOpener, COPY_FEEDBACK};
pub use form::AssistHandle;

const TICK_RATE: Duration = Duration::from_millis(200);

/// Build the classifier described by `assist`, or explain why autofill is off.
pub fn classifier_from_config(assist: &AssistConfig) -> AssistResult<GeminiClassifier> {
    if let Some((endpoint, api_key)) = assist.credentials() {
        return GeminiClassifier::new(endpoint, api_key, Duration::from_secs(assist.timeout_secs));
    }
    let reason = if !assist.enabled {
        "assist.enabled is false".to_string()
    } else if assist.endpoint.as_deref().map_or(true, |endpoint| endpoint.trim().is_empty()) {
        "assist.endpoint is not set".to_string()
    } else {
        format!("environment variable {} is not set", assist.api_key_env)
    };
    Err(AssistError::Disabled(reason))
}

fn assist_handle(config: &VaultConfig, runtime: Handle) -> Option<AssistHandle> {
    match classifier_from_config(&config.assist) {
        Ok(classifier) => {
            tracing::info!(endpoint = classifier.endpoint(), "autofill enabled");
            Some(AssistHandle {
                classifier,
                debounce: Duration::from_millis(config.assist.debounce_ms),
                runtime,
            })
        }
        Err(err) => {
            tracing::info!(reason = %err, "autofill disabled");
            None
        }
    }
}

/// Run the dashboard until the user quits.
pub fn run(config: &VaultConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let vault = Arc::new(MemoryVault::seeded()?);
    let mut app = App::new(
        vault,
        Box::new(SystemClipboard::default()),
        Box::new(SystemBrowser),
    )
    .with_assist(assist_handle(config, runtime.handle().clone()))
    .with_save_delay(Duration::from_millis(config.save_delay_ms));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);
    restore_terminal(terminal)?;
    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

fn event_loop(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|frame| render::render_app(frame, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key, Instant::now())? {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());
        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
        }
    }
}

fn restore_terminal(mut terminal: Terminal<ratatui::backend::CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_needs_endpoint_and_key() {
        let mut assist = AssistConfig {
            api_key_env: "DEVVAULT_TEST_KEY_TUI".into(),
            ..AssistConfig::default()
        };
        let err = classifier_from_config(&assist).unwrap_err();
        assert_eq!(err.to_string(), "autofill is disabled: assist.endpoint is not set");

        assist.endpoint = Some("http://127.0.0.1:9/generate".into());
        let err = classifier_from_config(&assist).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"autofill is disabled: environment variable DEVVAULT_TEST_KEY_TUI is not set"
        );

        std::env::set_var("DEVVAULT_TEST_KEY_TUI", "k");
        let classifier = classifier_from_config(&assist).unwrap();
        assert_eq!(classifier.endpoint(), "http://127.0.0.1:9/generate");
        std::env::remove_var("DEVVAULT_TEST_KEY_TUI");
    }
}
