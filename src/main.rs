mod api;
mod app;
mod globals;
mod input;
mod logging;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenvy::dotenv;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Instant;
use tokio::sync::mpsc;

use app::{App, AppMessage, PendingSearch};
use ui::draw_ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    logging::init()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new();

    // Create channel for background tasks
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Run the app
    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Hand a dispatched search to a background task. The outcome comes back
/// over the channel tagged with the dispatch generation.
fn spawn_search(pending: PendingSearch, base_url: String, tx: mpsc::UnboundedSender<AppMessage>) {
    tokio::spawn(async move {
        let msg = match api::search_news(&base_url, &pending.name, pending.timeframe).await {
            Ok(articles) => AppMessage::SearchCompleted {
                generation: pending.generation,
                articles,
            },
            Err(error) => AppMessage::SearchFailed {
                generation: pending.generation,
                error,
            },
        };
        let _ = tx.send(msg);
    });
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
) -> Result<()> {
    let base_url = api::api_base_url();

    loop {
        // Apply finished searches (non-blocking)
        while let Ok(msg) = rx.try_recv() {
            app.apply_message(msg);
        }

        // Fire the keystroke debounce once its deadline passes
        if let Some(pending) = app.take_due_search(Instant::now()) {
            spawn_search(pending, base_url.clone(), tx.clone());
        }

        // Draw UI
        terminal.draw(|f| draw_ui(f, app))?;

        // Handle input with timeout - only read ONE event per loop iteration
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, ignore release and repeat
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('c')
                        if key.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        return Ok(());
                    }
                    KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.open_selected_in_browser();
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        if app.input.clear() {
                            app.on_query_edited(Instant::now());
                        }
                    }
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.input.insert(c);
                        app.on_query_edited(Instant::now());
                    }
                    KeyCode::Backspace => {
                        if app.input.backspace() {
                            app.on_query_edited(Instant::now());
                        }
                    }
                    KeyCode::Delete => {
                        if app.input.delete() {
                            app.on_query_edited(Instant::now());
                        }
                    }
                    KeyCode::Left => app.input.move_left(),
                    KeyCode::Right => app.input.move_right(),
                    KeyCode::Home => app.input.move_home(),
                    KeyCode::End => app.input.move_end(),
                    KeyCode::Enter => {
                        if let Some(pending) = app.submit() {
                            spawn_search(pending, base_url.clone(), tx.clone());
                        }
                    }
                    KeyCode::Tab => {
                        if let Some(pending) = app.cycle_timeframe() {
                            spawn_search(pending, base_url.clone(), tx.clone());
                        }
                    }
                    KeyCode::Down => {
                        app.next_result();
                    }
                    KeyCode::Up => {
                        app.previous_result();
                    }
                    KeyCode::Esc => {
                        app.input.clear();
                        app.reset_to_idle();
                    }
                    _ => {}
                }
            }
        }
    }
}
