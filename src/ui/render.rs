//! Render functions for the TUI.
//!
//! The screen is a single view, top to bottom: the session location, the
//! search box, the pricing toggles, the catalog panel and the status bar.

use crate::app::App;
use crate::criteria::FilterKind;
use crate::sync::AddressBar;
use crate::util::{sanitize_line, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{catalog, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render function.
///
/// Handles terminal size validation before rendering.
pub(super) fn render<A: AddressBar>(f: &mut Frame, app: &mut App<A>) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        // Nothing of the list is on screen
        app.list_rows = 0;
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_location(f, app, chunks[0]);
    render_search(f, app, chunks[1]);
    render_toggles(f, app, chunks[2]);
    catalog::render(f, app, chunks[3]);
    status::render(f, app, chunks[4]);
}

/// The address bar line.
fn render_location<A: AddressBar>(f: &mut Frame, app: &App<A>, area: Rect) {
    let location = app.address_bar().location();
    let location = sanitize_line(&location);
    let budget = (area.width as usize).saturating_sub(2);
    let line = Line::from(vec![
        Span::styled("@ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            truncate_to_width(&location, budget).into_owned(),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_search<A: AddressBar>(f: &mut Frame, app: &App<A>, area: Rect) {
    let text = format!("{}_", sanitize_line(&app.criteria().search));
    let budget = (area.width as usize).saturating_sub(2);
    let search = Paragraph::new(truncate_to_width(&text, budget).into_owned()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Search title or creator"),
    );
    f.render_widget(search, area);
}

/// One checkbox per pricing toggle, with its function key.
fn render_toggles<A: AddressBar>(f: &mut Frame, app: &App<A>, area: Rect) {
    let filters = &app.criteria().filters;
    let mut spans = Vec::with_capacity(FilterKind::ALL.len() * 2);
    for (i, kind) in FilterKind::ALL.into_iter().enumerate() {
        let on = filters.get(kind);
        let style = if on {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mark = if on { "x" } else { " " };
        spans.push(Span::styled(
            format!("[{}] F{} {}", mark, i + 1, kind.label()),
            style,
        ));
        spans.push(Span::raw("   "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
