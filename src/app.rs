use crate::catalog::{fetch_guarded, FetchError, FetchStatus, Item, ItemSource, ItemStore};
use crate::config::SessionSettings;
use crate::criteria::{Criteria, CriteriaAction, Transition};
use crate::filter::filter_items;
use crate::paginator::{Paginator, SentinelTrigger};
use crate::sync::{AddressBar, UrlSync};
use crate::util::catch_task_panic;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Events from background tasks
pub enum AppEvent {
    /// The catalog fetch finished (successfully or not).
    ItemsLoaded(Result<Vec<Item>, FetchError>),
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

/// One browsing session: catalog, criteria, pagination and the address bar.
///
/// All mutation goes through a handful of entry points, each of which runs
/// its side effects after the state transition has settled:
///
/// - [`App::dispatch`] - user edits to the criteria
/// - [`App::commit_items`] - the fetch result
/// - [`App::on_sentinel_visibility`] - the infinite-scroll trigger
/// - [`App::flush_location`] - the debounced address-bar write
///
/// Filtered and paginated views are derived on demand; nothing is cached.
pub struct App<A: AddressBar> {
    store: ItemStore,
    criteria: Criteria,
    paginator: Paginator,
    sentinel: SentinelTrigger,
    url_sync: UrlSync,
    address_bar: A,
    currency_symbol: String,

    /// Handle to the catalog fetch task, aborted on teardown.
    fetch_handle: Option<tokio::task::JoinHandle<()>>,

    // UI state
    /// First list row shown in the catalog panel.
    pub scroll_offset: usize,
    /// Rows available to the catalog list, updated by the renderer.
    pub list_rows: usize,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl<A: AddressBar> App<A> {
    /// Create a session and restore criteria from the address bar.
    pub fn new(address_bar: A, settings: SessionSettings) -> Self {
        let mut url_sync = UrlSync::new(settings.search_debounce);
        let criteria = url_sync.bootstrap(&address_bar);

        Self {
            store: ItemStore::new(),
            criteria,
            paginator: Paginator::new(settings.page_size),
            sentinel: SentinelTrigger::default(),
            url_sync,
            address_bar,
            currency_symbol: settings.currency_symbol,
            fetch_handle: None,
            scroll_offset: 0,
            list_rows: 0,
            status_message: None,
            needs_redraw: true,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn status(&self) -> &FetchStatus {
        self.store.status()
    }

    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn address_bar(&self) -> &A {
        &self.address_bar
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    // ------------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------------

    /// Spawn the session's single catalog fetch.
    ///
    /// The result comes back as [`AppEvent::ItemsLoaded`] on `event_tx`.
    /// Returns false if a load was already started.
    pub fn start_load(
        &mut self,
        source: Arc<dyn ItemSource>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> bool {
        let Some(token) = self.store.begin_load() else {
            return false;
        };

        tracing::debug!("Spawning catalog fetch task");
        self.fetch_handle = Some(tokio::spawn(async move {
            match catch_task_panic(fetch_guarded(source.as_ref(), &token)).await {
                Ok(Some(result)) => {
                    if let Err(e) = event_tx.send(AppEvent::ItemsLoaded(result)).await {
                        tracing::warn!(error = %e, "Failed to send catalog (receiver dropped)");
                    }
                }
                Ok(None) => tracing::debug!("Catalog fetch cancelled"),
                Err(panic_msg) => {
                    tracing::error!(task = "catalog_fetch", error = %panic_msg, "Background task panicked");
                    let _ = event_tx
                        .send(AppEvent::TaskPanicked {
                            task: "catalog_fetch",
                            error: panic_msg,
                        })
                        .await;
                }
            }
        }));
        true
    }

    /// Apply the fetch result. Discarded after teardown.
    pub fn commit_items(&mut self, result: Result<Vec<Item>, FetchError>) -> bool {
        if !self.store.commit(result) {
            return false;
        }
        self.fetch_handle = None;
        self.refresh_sentinel();
        self.needs_redraw = true;
        true
    }

    // ------------------------------------------------------------------------
    // Criteria
    // ------------------------------------------------------------------------

    /// Run a criteria action, then its effects: pagination reset and the
    /// address-bar write (immediate or debounced).
    pub fn dispatch(&mut self, action: CriteriaAction) -> Transition {
        let transition = self.criteria.apply(action);
        if !transition.is_change() {
            return transition;
        }

        // Same step as the criteria change: no stale pages survive it.
        self.paginator.reset();
        self.sentinel.rearm();
        self.scroll_offset = 0;

        self.url_sync
            .on_change(&self.criteria, transition, &mut self.address_bar);
        self.refresh_sentinel();
        self.needs_redraw = true;
        transition
    }

    /// Write the debounced location if its quiet period has passed.
    pub fn flush_location(&mut self, now: Instant) -> bool {
        let written = self.url_sync.flush_due(now, &mut self.address_bar);
        if written {
            self.needs_redraw = true;
        }
        written
    }

    /// When the pending location write becomes due, if there is one.
    pub fn location_deadline(&self) -> Option<Instant> {
        self.url_sync.deadline()
    }

    // ------------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------------

    pub fn filtered(&self) -> Vec<&Item> {
        filter_items(self.store.items(), &self.criteria)
    }

    /// The revealed prefix of the filtered list.
    pub fn visible_items(&self) -> Vec<&Item> {
        let filtered = self.filtered();
        self.paginator.page(&filtered).to_vec()
    }

    pub fn has_more(&self) -> bool {
        self.paginator.has_more(self.filtered().len())
    }

    /// The sentinel row exists only while the catalog is ready and more
    /// filtered items remain.
    pub fn sentinel_mounted(&self) -> bool {
        self.store.status() == &FetchStatus::Ready && self.has_more()
    }

    // ------------------------------------------------------------------------
    // Infinite scroll
    // ------------------------------------------------------------------------

    /// Feed one visibility sample of the sentinel row.
    ///
    /// Reveals one more page on a hidden-to-visible transition while more
    /// items remain and no fetch is in progress. Repeated `true` samples
    /// count once; see [`App::rearm_sentinel`]. Returns whether it grew.
    pub fn on_sentinel_visibility(&mut self, visible: bool) -> bool {
        self.refresh_sentinel();
        if !self.sentinel.observe(visible) || self.store.is_loading() {
            return false;
        }

        let total = self.filtered().len();
        if !self.paginator.advance(total) {
            return false;
        }
        tracing::debug!(
            pages = self.paginator.revealed_pages(),
            total,
            "Revealed next page"
        );
        self.refresh_sentinel();
        self.needs_redraw = true;
        true
    }

    /// The sentinel row was laid out again after a page was revealed.
    ///
    /// The next visible sample counts as a new transition, so a sentinel
    /// still on screen below the new page keeps filling the viewport.
    pub fn rearm_sentinel(&mut self) {
        self.sentinel.rearm();
    }

    /// Whether the sentinel row falls inside the list viewport.
    pub fn sentinel_in_viewport(&self) -> bool {
        if !self.sentinel_mounted() {
            return false;
        }
        let row = self.paginator.visible_len(self.filtered().len());
        row >= self.scroll_offset && row < self.scroll_offset + self.list_rows
    }

    fn refresh_sentinel(&mut self) {
        let mounted = self.sentinel_mounted();
        self.sentinel.set_mounted(mounted);
    }

    // ------------------------------------------------------------------------
    // Scrolling and status
    // ------------------------------------------------------------------------

    /// Last row the list can scroll to: the sentinel if mounted, else the
    /// last revealed item.
    fn max_scroll(&self) -> usize {
        let visible = self.visible_items().len();
        if self.sentinel_mounted() {
            visible
        } else {
            visible.saturating_sub(1)
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(lines)
            .min(self.max_scroll());
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message once it has been shown long enough.
    ///
    /// Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, set_at)) = &self.status_message {
            if set_at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------------

    /// End the session: cancel the fetch and drop any pending location write.
    ///
    /// Results or timers that arrive afterwards have no effect.
    pub fn teardown(&mut self) {
        self.store.teardown();
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted catalog fetch task on teardown");
        }
        self.url_sync.teardown();
        self.sentinel.set_mounted(false);
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight fetch on App drop so no orphaned task outlives the
/// event loop.
impl<A: AddressBar> Drop for App<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}
