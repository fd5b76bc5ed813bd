//! Terminal UI using ratatui

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::api::Article;
use crate::app::{App, CARD_HEIGHT, RenderState};
use crate::input::InputField;

const PLACEHOLDER: &str = "Search for a person in the news...";

/// Draw the main UI
pub fn draw_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Timeframe selector
            Constraint::Min(10),   // Main panel
            Constraint::Length(3), // Help bar
        ])
        .split(f.area());

    draw_search_input(f, app, chunks[0]);
    draw_timeframe_line(f, app, chunks[1]);

    match app.render_state() {
        RenderState::Idle => draw_idle(f, chunks[2]),
        RenderState::Loading => draw_searching(f, chunks[2]),
        RenderState::Error(message) => draw_error(f, message, chunks[2]),
        RenderState::EmptyResults => draw_empty_results(f, app, chunks[2]),
        RenderState::ResultsList(articles) => draw_results(f, app, articles, chunks[2]),
    }

    draw_help_bar(f, app, chunks[3]);
}

/// Draw search input field. The cursor is an inverted block on the glyph
/// it sits on, so wide characters keep it column-accurate and it never
/// leaves the box.
fn draw_search_input(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.status_message.is_empty() {
        String::from(" 🔍 Search ")
    } else {
        format!(" 🔍 Search - {} ", app.status_message)
    };

    let style = if app.input.text().is_empty() {
        Style::default()
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };

    let input = Paragraph::new(input_line(&app.input)).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(input, area);
}

/// Input text as a single line with a block cursor over the glyph at the
/// cursor position (a trailing block when the cursor is at the end).
fn input_line(input: &InputField) -> Line<'_> {
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);

    if input.text().is_empty() {
        return Line::from(vec![
            Span::styled(" ", cursor_style),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ]);
    }

    let (before, under, after) = input.split_at_cursor();
    Line::from(vec![
        Span::raw(before),
        Span::styled(if under.is_empty() { " " } else { under }, cursor_style),
        Span::raw(after),
    ])
}

/// Draw the timeframe selector line. Hidden while the input is blank,
/// matching when a timeframe can actually apply to a search.
fn draw_timeframe_line(f: &mut Frame, app: &App, area: Rect) {
    if app.input.is_blank() {
        f.render_widget(Paragraph::new(""), area);
        return;
    }

    let line = Line::from(vec![
        Span::styled(" Timeframe: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.timeframe().label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  (Tab to change)", Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

/// Draw the idle hint shown before any search
fn draw_idle(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Type a person's name above to search the news")
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Results ")
                .border_style(Style::default().fg(Color::Gray)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Draw searching indicator
fn draw_searching(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("⏳ Searching for news articles...")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Draw error message
fn draw_error(f: &mut Frame, message: &str, area: Rect) {
    let paragraph = Paragraph::new(format!(
        "❌ {}\n\nEdit the search or press Enter to retry.",
        message
    ))
    .style(Style::default().fg(Color::Red))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                " Error ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Draw the empty-result notice. A search that matched nothing is not
/// an error and keeps the normal panel styling.
fn draw_empty_results(f: &mut Frame, app: &App, area: Rect) {
    let query = app.input.text().trim().to_string();
    let paragraph = Paragraph::new(format!(
        "No news articles found\n\nWe couldn't find anything for \"{}\". Try a different name or timeframe.",
        query
    ))
    .style(Style::default().fg(Color::Gray))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Results ")
            .border_style(Style::default().fg(Color::Gray)),
    )
    .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Draw article cards
fn draw_results(f: &mut Frame, app: &App, articles: &[Article], area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;
    let scroll_offset = app.scroll_offset(visible_height);

    let items: Vec<ListItem> = articles
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height / CARD_HEIGHT + 1)
        .map(|(i, article)| {
            let is_selected = i == app.selected_index();
            let number = format!("{:2}.", i + 1);

            let content = vec![
                Line::from(vec![
                    Span::styled(number, Style::default().fg(Color::Yellow)),
                    Span::raw(" "),
                    Span::styled(
                        &article.title,
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(byline(article), Style::default().fg(Color::Magenta)),
                ]),
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        truncate(&article.snippet, 100),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(truncate(&article.link, 80), Style::default().fg(Color::Blue)),
                ]),
            ];

            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(35, 35, 45))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let query = app.input.text().trim().to_string();
    let word = if articles.len() == 1 {
        "article"
    } else {
        "articles"
    };
    let title = format!(" 📰 Results for \"{}\" ({} {}) ", query, articles.len(), word);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(list, area);
}

/// Draw help bar
fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.render_state() {
        RenderState::Idle => "Type to search │ Enter: Search now │ Esc: Clear │ Ctrl+Q: Quit",
        RenderState::Loading => "⏳ Please wait... │ Esc: Cancel │ Ctrl+Q: Quit",
        RenderState::Error(_) => "Enter: Retry │ Tab: Timeframe │ Esc: Clear │ Ctrl+Q: Quit",
        RenderState::EmptyResults => {
            "Try another name │ Tab: Timeframe │ Esc: Clear │ Ctrl+Q: Quit"
        }
        RenderState::ResultsList(_) => {
            "↑/↓: Navigate │ Ctrl+B: Open in browser │ Tab: Timeframe │ Esc: Clear │ Ctrl+Q: Quit"
        }
    };

    let paragraph = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Source and date of an article on one line, whichever are known
fn byline(article: &Article) -> String {
    match (article.source.as_deref(), article.date.as_deref()) {
        (Some(source), Some(date)) => format!("{} · {}", source, date),
        (Some(source), None) => source.to_string(),
        (None, Some(date)) => date.to_string(),
        (None, None) => String::new(),
    }
}

/// Truncate string to max length
fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
