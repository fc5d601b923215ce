//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::config::Theme;
use crate::core::{format_time_of_day, format_timestamp, Clock};
use crate::tracking::{format_hms, Session, SessionStatus};
use crate::tui::app::{App, ClipboardSink, InputTarget, Tab};

/// Colors for one theme.
struct Palette {
    bg: Color,
    fg: Color,
    accent: Color,
    muted: Color,
    selected_bg: Color,
}

const fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            accent: Color::Blue,
            muted: Color::Gray,
            selected_bg: Color::LightBlue,
        },
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selected_bg: Color::DarkGray,
        },
    }
}

/// Render the application UI.
pub fn render<C: Clock, K: ClipboardSink>(frame: &mut Frame<'_>, app: &App<C, K>) {
    let colors = palette(app.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg).fg(colors.fg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(4), // Labels
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, &colors, chunks[0]);
    render_labels(frame, app, &colors, chunks[1]);
    match app.tab {
        Tab::Tracking => render_tracking(frame, app, &colors, chunks[2]),
        Tab::History | Tab::Edit => render_history(frame, app, &colors, chunks[2]),
    }
    render_status_bar(frame, app, &colors, chunks[3]);
}

fn render_tabs<C: Clock, K: ClipboardSink>(
    frame: &mut Frame<'_>,
    app: &App<C, K>,
    colors: &Palette,
    area: Rect,
) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let theme = match app.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(colors.muted))
        .highlight_style(
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent))
                .title(format!(" tracklog ({theme}) ")),
        );

    frame.render_widget(tabs, area);
}

fn render_labels<C: Clock, K: ClipboardSink>(
    frame: &mut Frame<'_>,
    app: &App<C, K>,
    colors: &Palette,
    area: Rect,
) {
    let field = |target: InputTarget, value: Option<&str>| {
        let (text, style) = match &app.input {
            Some(input) if input.target == target => (
                format!("{}_", input.buffer),
                Style::default().fg(colors.accent),
            ),
            _ => (
                value.unwrap_or("").to_string(),
                Style::default().fg(colors.fg),
            ),
        };
        Line::from(vec![
            Span::styled(
                format!("{:<7}", target.label()),
                Style::default().fg(colors.muted),
            ),
            Span::styled(text, style),
        ])
    };

    let lines = vec![
        field(InputTarget::Name, app.tracker.name()),
        field(InputTarget::Owner, app.tracker.owner()),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.muted))
        .title(" Next session ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tracking<C: Clock, K: ClipboardSink>(
    frame: &mut Frame<'_>,
    app: &App<C, K>,
    colors: &Palette,
    area: Rect,
) {
    let session = app.tracker.current();
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(colors.muted)),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format_hms(session.total_time),
            Style::default()
                .fg(status_color(session.status, colors))
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        row("Status", session.status.display_name().to_string()),
        row("Name", session.name.clone()),
        row("Owner", session.owner.clone()),
        row("Start", format_timestamp(session.start_time)),
        row("Stop", format_timestamp(session.stop_time)),
        row("Paused", format_timestamp(session.pause_time)),
        row("Resumed", format_timestamp(session.resume_time)),
        Line::default(),
    ];

    let tracking = app.tracker.is_tracking();
    let paused = app.tracker.is_paused();
    lines.push(Line::from(vec![
        control("[s] Start", !tracking, colors),
        Span::raw("  "),
        control("[p] Pause", tracking && !paused, colors),
        Span::raw("  "),
        control("[r] Resume", paused, colors),
        Span::raw("  "),
        control("[x] Stop", tracking, colors),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.fg))
        .title(" Current session ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn control<'a>(label: &'a str, enabled: bool, colors: &Palette) -> Span<'a> {
    if enabled {
        Span::styled(
            label,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(colors.muted))
    }
}

const fn status_color(status: SessionStatus, colors: &Palette) -> Color {
    match status {
        SessionStatus::Ready => colors.fg,
        SessionStatus::Active => Color::Green,
        SessionStatus::Paused => Color::Yellow,
        SessionStatus::Completed => colors.accent,
    }
}

fn history_item<'a>(session: &'a Session, colors: &Palette) -> ListItem<'a> {
    let spans = vec![
        Span::styled(
            format!("{} ", format_hms(session.total_time)),
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(session.name.as_str()),
        Span::styled(
            format!("  @{}", session.owner),
            Style::default().fg(colors.muted),
        ),
        Span::styled(
            format!(
                "  {} -> {}",
                format_timestamp(session.start_time),
                format_time_of_day(session.stop_time)
            ),
            Style::default().fg(colors.muted),
        ),
    ];
    ListItem::new(Line::from(spans))
}

fn render_history<C: Clock, K: ClipboardSink>(
    frame: &mut Frame<'_>,
    app: &App<C, K>,
    colors: &Palette,
    area: Rect,
) {
    let history = app.tracker.history();
    let title = match app.tab {
        Tab::Edit => " Edit records (n: name, o: owner) ".to_string(),
        _ => format!(" History ({} sessions) ", history.len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.fg))
        .title(title);

    if history.is_empty() {
        let empty = Paragraph::new("No tracking history yet")
            .style(Style::default().fg(colors.muted))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'_>> = history.iter().map(|s| history_item(s, colors)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(colors.selected_bg));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar<C: Clock, K: ClipboardSink>(
    frame: &mut Frame<'_>,
    app: &App<C, K>,
    colors: &Palette,
    area: Rect,
) {
    let status_text = app.status.as_deref().unwrap_or("?:help | q:quit");
    let status = Paragraph::new(status_text).style(Style::default().fg(colors.muted));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::ManualClock;
    use crate::tui::app::MockClipboardSink;
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App<ManualClock, MockClipboardSink>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn app() -> App<ManualClock, MockClipboardSink> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap());
        App::new(
            clock,
            MockClipboardSink::new(),
            &Config::default(),
            std::env::temp_dir(),
        )
    }

    #[test]
    fn test_ready_screen() {
        let screen = rendered(&app());
        assert!(screen.contains("00:00:00"));
        assert!(screen.contains("Ready"));
        assert!(screen.contains("[s] Start"));
    }

    #[test]
    fn test_empty_history_message() {
        let mut app = app();
        app.set_tab(Tab::History);
        assert!(rendered(&app).contains("No tracking history yet"));
    }

    #[test]
    fn test_history_lists_sessions() {
        let mut app = app();
        app.tracker.set_name("Deep work");
        app.start();
        app.tracker.clock().advance(chrono::Duration::seconds(75));
        app.stop();
        app.set_tab(Tab::History);

        let screen = rendered(&app);
        assert!(screen.contains("Deep work"));
        assert!(screen.contains("00:01:15"));
    }
}
