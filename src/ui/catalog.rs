use crate::app::App;
use crate::catalog::{FetchStatus, Item, PricingKind};
use crate::sync::AddressBar;
use crate::util::{display_width, sanitize_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const SENTINEL_TEXT: &str = "Loading more...";
const EMPTY_TEXT: &str = "No items match";
const LOADING_TEXT: &str = "Loading catalog...";

/// Render the catalog panel: loading and error states, the revealed items,
/// and the sentinel row that pulls in the next page.
///
/// Records the number of usable rows in `app.list_rows` so scrolling and
/// sentinel visibility agree with what is on screen.
pub fn render<A: AddressBar>(f: &mut Frame, app: &mut App<A>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title(app));
    let inner = block.inner(area);
    app.list_rows = inner.height as usize;

    match app.status() {
        FetchStatus::Loading => {
            let msg = Paragraph::new(LOADING_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(msg, area);
            return;
        }
        FetchStatus::Error(message) => {
            let msg = Paragraph::new(sanitize_line(message).into_owned())
                .style(Style::default().fg(Color::Red))
                .block(block);
            f.render_widget(msg, area);
            return;
        }
        FetchStatus::Ready => {}
    }

    let visible = app.visible_items();
    if visible.is_empty() {
        let msg = Paragraph::new(EMPTY_TEXT)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let width = inner.width as usize;
    let currency = app.currency_symbol();
    let mut rows: Vec<ListItem> = visible
        .iter()
        .skip(app.scroll_offset)
        .take(app.list_rows)
        .map(|item| ListItem::new(item_line(item, currency, width)))
        .collect();

    if app.sentinel_in_viewport() {
        rows.push(ListItem::new(Span::styled(
            SENTINEL_TEXT,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    f.render_widget(List::new(rows).block(block), area);
}

fn panel_title<A: AddressBar>(app: &App<A>) -> String {
    if app.status() != &FetchStatus::Ready {
        return "Catalog".to_string();
    }
    let shown = app.paginator().visible_len(app.filtered().len());
    format!(
        "Catalog - {} of {} shown ({} total)",
        shown,
        app.filtered().len(),
        app.items().len()
    )
}

/// One row: "title by creator" on the left, the price label right-aligned.
fn item_line(item: &Item, currency: &str, width: usize) -> Line<'static> {
    let price = item.price_label(currency);
    let price_width = display_width(&price);

    let title = sanitize_line(&item.title);
    let creator = sanitize_line(&item.creator);
    let left = format!("{} by {}", title, creator);
    let budget = width.saturating_sub(price_width + 1);
    let left = truncate_to_width(&left, budget).into_owned();
    let pad = width.saturating_sub(display_width(&left) + price_width);

    let price_style = match item.pricing {
        PricingKind::Paid => Style::default().fg(Color::Yellow),
        PricingKind::Free => Style::default().fg(Color::Green),
        PricingKind::ViewOnly => Style::default().fg(Color::Gray),
    };

    Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(pad)),
        Span::styled(price, price_style),
    ])
}
