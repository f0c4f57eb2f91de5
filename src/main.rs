mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::AudioBackend;
use config::AppConfig;
use controller::{AppController, SharedMedia};
use model::{AppModel, CatalogClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Podcastr Starting ===");
    tracing::debug!(
        api_url = %config.api_url,
        episode_limit = config.episode_limit,
        revalidate_secs = config.revalidate_every.as_secs(),
        headless = config.is_headless(),
        "Loaded configuration"
    );

    let catalog_client = CatalogClient::new(config.api_url.clone(), config.episode_limit)?;

    let mut app_model = AppModel::new();
    app_model.set_catalog_client(catalog_client);
    let model = Arc::new(Mutex::new(app_model));

    let backend = if config.is_headless() {
        AudioBackend::headless()
    } else {
        AudioBackend::new(config.player_command.clone())
    };
    let media: SharedMedia = Arc::new(Mutex::new(Box::new(backend)));

    let controller = AppController::new(model.clone(), media, config.revalidate_every);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First fetch runs behind the UI so the "loading" state is visible
    controller.refresh_catalog();
    controller.start().await;

    let res = run_app(&mut terminal, model.clone(), controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Podcastr shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let (playback, ui_state, catalog, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_info().await,
                model_guard.get_ui_state().await,
                model_guard.get_catalog().await,
                model_guard.should_quit().await,
            )
        };

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &catalog);
        })?;

        // Short poll keeps the progress bar moving smoothly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    // Stops the external player before the terminal is restored
    controller.media.lock().await.unload();

    Ok(())
}
