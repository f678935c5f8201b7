use crate::app::App;
use crate::catalog::FetchStatus;
use crate::sync::AddressBar;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

const HINTS: &str = "Type to search | F1-F3 toggle | Ctrl+R reset | Ctrl+U clear | Esc quit";

/// Render the status bar
pub fn render<A: AddressBar>(f: &mut Frame, app: &App<A>, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.status() == &FetchStatus::Loading {
        Cow::Borrowed("Fetching catalog...")
    } else {
        Cow::Borrowed(HINTS)
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
