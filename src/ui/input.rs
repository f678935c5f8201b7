//! Input handling for the TUI.
//!
//! Every key either edits the criteria (through `App::dispatch`), scrolls the
//! catalog list, or quits. Typing always goes to the search box.

use crate::app::App;
use crate::criteria::{CriteriaAction, FilterKind, Transition};
use crate::sync::AddressBar;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Maximum allowed search query length (UI layer validation)
pub(super) const MAX_SEARCH_LENGTH: usize = 256;

/// Rows moved by PageUp/PageDown when the list height is unknown.
const DEFAULT_PAGE_ROWS: usize = 10;

/// Main input dispatch function.
pub(super) fn handle_input<A: AddressBar>(
    app: &mut App<A>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return handle_control_input(app, code);
    }

    match code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::F(n) => {
            if let Some(kind) = filter_for_key(n) {
                app.dispatch(CriteriaAction::ToggleFilter(kind));
            }
        }
        KeyCode::Backspace => {
            let mut text = app.criteria().search.clone();
            if text.pop().is_some() {
                app.dispatch(CriteriaAction::SetSearch(text));
            }
        }
        KeyCode::Char(c) => {
            let current = &app.criteria().search;
            if current.chars().count() >= MAX_SEARCH_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_LENGTH
                ));
            } else {
                let mut text = current.clone();
                text.push(c);
                app.dispatch(CriteriaAction::SetSearch(text));
            }
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(page_rows(app)),
        KeyCode::PageDown => app.scroll_down(page_rows(app)),
        KeyCode::Home => app.scroll_offset = 0,
        KeyCode::End => app.scroll_to_end(),
        _ => {}
    }
    Action::Continue
}

/// Ctrl+C quits, Ctrl+R resets all criteria, Ctrl+U clears the search box.
fn handle_control_input<A: AddressBar>(app: &mut App<A>, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('c') => return Action::Quit,
        KeyCode::Char('r') => {
            if app.dispatch(CriteriaAction::Reset) == Transition::Cleared {
                app.set_status("Filters cleared");
            }
        }
        KeyCode::Char('u') => {
            app.dispatch(CriteriaAction::SetSearch(String::new()));
        }
        _ => {}
    }
    Action::Continue
}

fn filter_for_key(n: u8) -> Option<FilterKind> {
    match n {
        1 => Some(FilterKind::Paid),
        2 => Some(FilterKind::Free),
        3 => Some(FilterKind::ViewOnly),
        _ => None,
    }
}

fn page_rows<A: AddressBar>(app: &App<A>) -> usize {
    if app.list_rows == 0 {
        DEFAULT_PAGE_ROWS
    } else {
        app.list_rows
    }
}
