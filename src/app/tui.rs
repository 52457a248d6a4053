use std::io::{self, Stdout};

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::layout::{bar_line, title_line, url_line};
use super::types::{BOARD_TITLE, BoardState, EXIT_HINT};

/// Raw mode and the alternate screen are unwound on drop, so the terminal is
/// restored on every exit path, panics included.
pub struct TerminalGuard;

impl TerminalGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

pub fn setup_terminal() -> io::Result<(TerminalGuard, Terminal<CrosstermBackend<Stdout>>)> {
    let guard = TerminalGuard::acquire()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok((guard, terminal))
}

fn bar_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Magenta)
}

fn story_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::White)
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// One full draw pass: header bar, two rows per story, footer bar, status
/// line. Pure in `state`, so drawing the same state twice produces the same
/// grid.
pub fn draw(frame: &mut ratatui::Frame, state: &BoardState) {
    let width = state.headlines.column_width;
    let mut lines = Vec::with_capacity(state.headlines.stories.len() * 2 + 3);

    lines.push(Line::from(Span::styled(
        bar_line(BOARD_TITLE, width),
        bar_style(),
    )));
    for story in &state.headlines.stories {
        lines.push(Line::from(Span::styled(
            title_line(story, width),
            story_style(),
        )));
        lines.push(Line::from(Span::styled(url_line(story, width), link_style())));
    }
    lines.push(Line::from(Span::styled(
        bar_line(EXIT_HINT, width),
        bar_style(),
    )));
    lines.push(status_line(state));

    frame.render_widget(Paragraph::new(lines), frame.area());
}

fn status_line(state: &BoardState) -> Line<'static> {
    if let Some(err) = &state.last_error {
        return Line::from(Span::styled(
            format!("refresh failed: {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    match state.refreshed_at {
        Some(at) => Line::from(Span::styled(
            format!("updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::default(),
    }
}
