//! Application state and search orchestration

use anyhow::{Context, Result};
use std::process::Command;
use std::time::{Duration, Instant};

use crate::api::{Article, SearchError, Timeframe};
use crate::input::InputField;

/// Quiet period after the last keystroke before a search is dispatched
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Rows one result card occupies in the results panel
pub const CARD_HEIGHT: usize = 4;

/// Messages sent from background search tasks to the main loop
#[derive(Debug)]
pub enum AppMessage {
    /// Search completed, possibly with zero articles
    SearchCompleted {
        generation: u64,
        articles: Vec<Article>,
    },
    /// Search failed before producing articles
    SearchFailed {
        generation: u64,
        error: SearchError,
    },
}

/// A search the main loop should hand off to a background task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub generation: u64,
    pub name: String,
    pub timeframe: Timeframe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

/// What the UI should draw. Exactly one variant holds at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState<'a> {
    /// Nothing searched yet, or the session was cleared
    Idle,
    /// A request is in flight
    Loading,
    /// The most recent search failed
    Error(&'a str),
    /// The search succeeded but matched no articles
    EmptyResults,
    /// Articles to render
    ResultsList(&'a [Article]),
}

/// Main application structure
pub struct App {
    /// Search input line, edited live
    pub input: InputField,
    /// Transient note shown in the input box title
    pub status_message: String,
    timeframe: Timeframe,
    status: SearchStatus,
    articles: Vec<Article>,
    error_message: Option<String>,
    /// Bumped on every dispatch and every reset, so a finished request
    /// can be told apart from the one the session currently waits on
    generation: u64,
    debounce_deadline: Option<Instant>,
    selected_index: usize,
}

impl App {
    /// Create new app instance
    pub fn new() -> Self {
        Self {
            input: InputField::new(),
            status_message: String::new(),
            timeframe: Timeframe::All,
            status: SearchStatus::Idle,
            articles: Vec::new(),
            error_message: None,
            generation: 0,
            debounce_deadline: None,
            selected_index: 0,
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Call after every edit to the input line. Blank input clears the
    /// session right away; anything else re-arms the debounce timer.
    pub fn on_query_edited(&mut self, now: Instant) {
        if self.input.is_blank() {
            self.reset_to_idle();
        } else {
            self.debounce_deadline = Some(now + DEBOUNCE_DELAY);
        }
    }

    /// Fire the debounce timer if its deadline has passed. The query is
    /// read at fire time, not at the keystroke that armed the timer.
    pub fn take_due_search(&mut self, now: Instant) -> Option<PendingSearch> {
        match self.debounce_deadline {
            Some(deadline) if now >= deadline => self.begin_search(),
            _ => None,
        }
    }

    /// Explicit submit. Dispatches immediately and cancels any armed
    /// debounce so the same query is not searched twice.
    pub fn submit(&mut self) -> Option<PendingSearch> {
        self.begin_search()
    }

    /// Switch timeframe. A non-blank query is re-searched immediately.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Option<PendingSearch> {
        if self.timeframe == timeframe {
            return None;
        }
        self.timeframe = timeframe;
        if self.input.is_blank() {
            return None;
        }
        self.begin_search()
    }

    /// Step to the next timeframe in display order.
    pub fn cycle_timeframe(&mut self) -> Option<PendingSearch> {
        self.set_timeframe(self.timeframe.next())
    }

    fn begin_search(&mut self) -> Option<PendingSearch> {
        self.debounce_deadline = None;
        let name = self.input.text().trim().to_string();
        if name.is_empty() {
            self.reset_to_idle();
            return None;
        }
        self.generation += 1;
        self.status = SearchStatus::Loading;
        self.error_message = None;
        Some(PendingSearch {
            generation: self.generation,
            name,
            timeframe: self.timeframe,
        })
    }

    /// Drop pending and in-flight work and return to the empty session.
    /// The generation bump invalidates outstanding requests.
    pub fn reset_to_idle(&mut self) {
        self.debounce_deadline = None;
        self.generation += 1;
        self.status = SearchStatus::Idle;
        self.articles.clear();
        self.error_message = None;
        self.selected_index = 0;
    }

    /// Apply a finished search to the session. Outcomes from any
    /// generation but the current one are discarded.
    pub fn apply_message(&mut self, msg: AppMessage) {
        let (generation, outcome) = match msg {
            AppMessage::SearchCompleted {
                generation,
                articles,
            } => (generation, Ok(articles)),
            AppMessage::SearchFailed { generation, error } => (generation, Err(error)),
        };
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale search outcome"
            );
            return;
        }
        match outcome {
            Ok(articles) => {
                tracing::debug!(generation, count = articles.len(), "Search completed");
                self.articles = articles;
                self.status = SearchStatus::Success;
                self.error_message = None;
            }
            Err(error) => {
                tracing::debug!(generation, %error, "Search failed");
                self.articles.clear();
                self.status = SearchStatus::Failed;
                self.error_message = Some(error.to_string());
            }
        }
        self.selected_index = 0;
    }

    /// Derive the one thing the UI should draw right now.
    pub fn render_state(&self) -> RenderState<'_> {
        match self.status {
            SearchStatus::Idle => RenderState::Idle,
            SearchStatus::Loading => RenderState::Loading,
            SearchStatus::Failed => {
                RenderState::Error(self.error_message.as_deref().unwrap_or("Unknown error"))
            }
            SearchStatus::Success => {
                if self.articles.is_empty() {
                    RenderState::EmptyResults
                } else {
                    RenderState::ResultsList(&self.articles)
                }
            }
        }
    }

    /// Move to next result
    pub fn next_result(&mut self) {
        if !self.articles.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.articles.len();
        }
    }

    /// Move to previous result
    pub fn previous_result(&mut self) {
        if !self.articles.is_empty() {
            if self.selected_index == 0 {
                self.selected_index = self.articles.len() - 1;
            } else {
                self.selected_index -= 1;
            }
        }
    }

    /// First card to draw so the selection stays on screen.
    pub fn scroll_offset(&self, visible_rows: usize) -> usize {
        let cards_per_screen = (visible_rows / CARD_HEIGHT).max(1);
        if self.selected_index >= cards_per_screen {
            self.selected_index + 1 - cards_per_screen
        } else {
            0
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        if self.status == SearchStatus::Success {
            self.articles.get(self.selected_index)
        } else {
            None
        }
    }

    /// Open the selected article in the default browser
    pub fn open_selected_in_browser(&mut self) {
        let link = match self.selected_article() {
            Some(article) => article.link.clone(),
            None => return,
        };
        match open_url(&link) {
            Ok(()) => self.status_message = format!("Opened {link} in browser"),
            Err(e) => self.status_message = format!("Failed to open URL: {e}"),
        }
    }
}

/// Open URL in default browser
fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open")
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to open browser")?;
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(&["/C", "start", "", url])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            link: format!("https://news.example.com/{title}"),
            snippet: format!("Snippet for {title}"),
            image_url: None,
            source: Some("Example Wire".to_string()),
            date: Some("2 hours ago".to_string()),
        }
    }

    fn articles(n: usize) -> Vec<Article> {
        (0..n).map(|i| article(&format!("story-{i}"))).collect()
    }

    /// Types one character and reports the edit, as the key loop does.
    fn type_char(app: &mut App, c: char, at: Instant) {
        app.input.insert(c);
        app.on_query_edited(at);
    }

    #[test]
    fn keystroke_burst_dispatches_once_with_latest_text() {
        let mut app = App::new();
        let t0 = Instant::now();

        for (i, c) in "elon".chars().enumerate() {
            let at = t0 + Duration::from_millis(100 * i as u64);
            type_char(&mut app, c, at);
            // Earlier keystrokes' deadlines never fire on their own
            assert_eq!(app.take_due_search(at), None);
        }

        let last_edit = t0 + Duration::from_millis(300);
        assert_eq!(
            app.take_due_search(last_edit + Duration::from_millis(499)),
            None
        );

        let fired = app
            .take_due_search(last_edit + DEBOUNCE_DELAY)
            .expect("deadline passed");
        assert_eq!(fired.name, "elon");
        assert_eq!(fired.timeframe, Timeframe::All);

        // The timer is one-shot
        assert_eq!(
            app.take_due_search(last_edit + Duration::from_secs(60)),
            None
        );
    }

    #[test]
    fn debounce_fire_uses_text_at_fire_time() {
        let mut app = App::new();
        let t0 = Instant::now();
        type_char(&mut app, 'a', t0);
        type_char(&mut app, 'd', t0 + Duration::from_millis(50));
        type_char(&mut app, 'a', t0 + Duration::from_millis(100));

        let fired = app
            .take_due_search(t0 + Duration::from_millis(100) + DEBOUNCE_DELAY)
            .expect("deadline passed");
        assert_eq!(fired.name, "ada");
    }

    #[test]
    fn submit_dispatches_immediately_and_cancels_debounce() {
        let mut app = App::new();
        let t0 = Instant::now();
        type_char(&mut app, 'x', t0);

        let fired = app.submit().expect("non-blank submit dispatches");
        assert_eq!(fired.name, "x");
        assert!(matches!(app.render_state(), RenderState::Loading));

        // The armed keystroke deadline was swallowed by the submit
        assert_eq!(app.take_due_search(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn submit_trims_surrounding_whitespace() {
        let mut app = App::new();
        for c in "  grace hopper ".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("non-blank submit dispatches");
        assert_eq!(fired.name, "grace hopper");
    }

    #[test]
    fn blank_submit_is_skipped() {
        let mut app = App::new();
        for c in "   ".chars() {
            app.input.insert(c);
        }
        assert_eq!(app.submit(), None);
        assert!(matches!(app.render_state(), RenderState::Idle));
    }

    #[test]
    fn timeframe_change_redispatches_current_query() {
        let mut app = App::new();
        let t0 = Instant::now();
        for c in "turing".chars() {
            app.input.insert(c);
        }
        app.on_query_edited(t0);

        let fired = app.cycle_timeframe().expect("non-blank query re-searches");
        assert_eq!(fired.name, "turing");
        assert_eq!(fired.timeframe, Timeframe::Day);

        // The change also cancelled the keystroke debounce
        assert_eq!(app.take_due_search(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn timeframe_change_with_blank_input_does_nothing() {
        let mut app = App::new();
        assert_eq!(app.set_timeframe(Timeframe::Week), None);
        assert_eq!(app.timeframe(), Timeframe::Week);
        assert!(matches!(app.render_state(), RenderState::Idle));
    }

    #[test]
    fn redundant_timeframe_set_does_not_redispatch() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        app.submit().expect("dispatches");
        assert_eq!(app.set_timeframe(Timeframe::All), None);
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        let first = app.submit().expect("dispatches");
        let second = app.submit().expect("dispatches");
        assert_ne!(first.generation, second.generation);

        // Newer generation resolves first
        app.apply_message(AppMessage::SearchCompleted {
            generation: second.generation,
            articles: articles(2),
        });
        // The older one lands late and must not overwrite
        app.apply_message(AppMessage::SearchCompleted {
            generation: first.generation,
            articles: articles(5),
        });

        match app.render_state() {
            RenderState::ResultsList(list) => assert_eq!(list.len(), 2),
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn clearing_input_mid_flight_discards_the_response() {
        let mut app = App::new();
        let t0 = Instant::now();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        // Results from an earlier search are on screen
        let first = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchCompleted {
            generation: first.generation,
            articles: articles(3),
        });
        assert!(!app.articles.is_empty());

        let second = app.submit().expect("dispatches");
        assert!(matches!(app.render_state(), RenderState::Loading));

        app.input.clear();
        app.on_query_edited(t0);
        assert!(matches!(app.render_state(), RenderState::Idle));
        // The clear empties the article list itself, not just the view
        assert!(app.articles.is_empty());

        app.apply_message(AppMessage::SearchCompleted {
            generation: second.generation,
            articles: articles(5),
        });
        assert!(matches!(app.render_state(), RenderState::Idle));
        assert!(app.articles.is_empty());
        assert_eq!(app.selected_article(), None);
    }

    #[test]
    fn successful_search_renders_results() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchCompleted {
            generation: fired.generation,
            articles: articles(5),
        });
        match app.render_state() {
            RenderState::ResultsList(list) => assert_eq!(list.len(), 5),
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn empty_result_set_is_not_an_error() {
        let mut app = App::new();
        for c in "nobody".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchCompleted {
            generation: fired.generation,
            articles: Vec::new(),
        });
        assert!(matches!(app.render_state(), RenderState::EmptyResults));
    }

    #[test]
    fn failed_search_renders_error_and_clears_results() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchCompleted {
            generation: fired.generation,
            articles: articles(3),
        });

        let second = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchFailed {
            generation: second.generation,
            error: SearchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
        });

        match app.render_state() {
            RenderState::Error(msg) => assert!(!msg.is_empty()),
            other => panic!("expected error, got {other:?}"),
        }
        // Articles from the earlier success must not linger after a failure
        assert!(app.articles.is_empty());
        assert_eq!(app.selected_article(), None);
    }

    #[test]
    fn new_dispatch_clears_previous_error() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchFailed {
            generation: fired.generation,
            error: SearchError::Status(reqwest::StatusCode::BAD_GATEWAY),
        });
        assert!(matches!(app.render_state(), RenderState::Error(_)));

        app.submit().expect("dispatches");
        assert!(matches!(app.render_state(), RenderState::Loading));
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchCompleted {
            generation: fired.generation,
            articles: articles(3),
        });

        assert_eq!(app.selected_index(), 0);
        app.previous_result();
        assert_eq!(app.selected_index(), 2);
        app.next_result();
        assert_eq!(app.selected_index(), 0);
        app.next_result();
        assert_eq!(app.selected_index(), 1);
    }

    #[test]
    fn scroll_offset_keeps_selection_visible() {
        let mut app = App::new();
        for c in "ada".chars() {
            app.input.insert(c);
        }
        let fired = app.submit().expect("dispatches");
        app.apply_message(AppMessage::SearchCompleted {
            generation: fired.generation,
            articles: articles(10),
        });

        // Two cards fit on an eight-row panel
        assert_eq!(app.scroll_offset(8), 0);
        app.next_result();
        assert_eq!(app.scroll_offset(8), 0);
        app.next_result();
        assert_eq!(app.scroll_offset(8), 1);
        for _ in 0..7 {
            app.next_result();
        }
        assert_eq!(app.selected_index(), 9);
        assert_eq!(app.scroll_offset(8), 8);
    }
}
