use super::Debouncer;
use crate::criteria::{Criteria, Location, Transition};
use std::time::Duration;
use tokio::time::Instant;

/// Quiet period before a search edit reaches the address bar.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// The address bar as seen by the session.
pub trait AddressBar {
    fn location(&self) -> String;

    /// Replace the current entry in place: no navigation, no new history entry.
    fn replace(&mut self, location: &str);
}

/// In-memory address bar for the terminal front end.
///
/// Seeded from `--location`, shown in the header and printed on exit.
#[derive(Debug, Clone)]
pub struct SessionLocation {
    current: String,
    replacements: usize,
}

impl SessionLocation {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
            replacements: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Number of writes since the session started.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Default for SessionLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl AddressBar for SessionLocation {
    fn location(&self) -> String {
        self.current.clone()
    }

    fn replace(&mut self, location: &str) {
        self.current = location.to_string();
        self.replacements += 1;
    }
}

#[derive(Debug)]
enum Phase {
    Bootstrapping,
    Synchronizing { last_synced: Location },
}

/// Keeps the address bar and the criteria convergent.
///
/// Starts in a bootstrapping phase that reads the bar exactly once, then
/// mirrors every criteria transition back: toggles and resets immediately,
/// search edits after [`SEARCH_DEBOUNCE`] of quiet.
#[derive(Debug)]
pub struct UrlSync {
    phase: Phase,
    pending: Debouncer<Location>,
}

impl Default for UrlSync {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl UrlSync {
    pub fn new(search_debounce: Duration) -> Self {
        Self {
            phase: Phase::Bootstrapping,
            pending: Debouncer::new(search_debounce),
        }
    }

    pub fn is_synchronizing(&self) -> bool {
        matches!(self.phase, Phase::Synchronizing { .. })
    }

    pub fn last_synced(&self) -> Option<&Location> {
        match &self.phase {
            Phase::Synchronizing { last_synced } => Some(last_synced),
            Phase::Bootstrapping => None,
        }
    }

    /// Seed criteria from the address bar and start synchronizing.
    ///
    /// The bar itself is not rewritten; its canonical form is only recorded
    /// as the last synced location.
    pub fn bootstrap<A: AddressBar + ?Sized>(&mut self, bar: &A) -> Criteria {
        if let Phase::Synchronizing { last_synced } = &self.phase {
            tracing::warn!("Location already bootstrapped, ignoring");
            return last_synced.criteria();
        }

        let location = Location::parse(&bar.location());
        let criteria = location.criteria();
        let canonical = location.with_criteria(&criteria);
        tracing::debug!(location = %canonical, "Criteria restored from location");

        self.phase = Phase::Synchronizing {
            last_synced: canonical,
        };
        criteria
    }

    /// Mirror a settled criteria transition into the address bar.
    ///
    /// Returns true if the bar was written synchronously.
    pub fn on_change<A: AddressBar + ?Sized>(
        &mut self,
        criteria: &Criteria,
        transition: Transition,
        bar: &mut A,
    ) -> bool {
        let Phase::Synchronizing { last_synced } = &self.phase else {
            tracing::warn!("Criteria changed before location bootstrap, not syncing");
            return false;
        };
        let next = last_synced.with_criteria(criteria);

        match transition {
            Transition::Unchanged => false,
            Transition::SearchEdited => {
                tracing::trace!(location = %next, "Location write scheduled");
                self.pending.schedule(next);
                false
            }
            Transition::FiltersChanged | Transition::Cleared => {
                // The immediate write already carries the latest search text.
                self.pending.cancel();
                self.write(next, bar)
            }
        }
    }

    /// Apply the pending search write if its quiet period is over.
    pub fn flush_due<A: AddressBar + ?Sized>(&mut self, now: Instant, bar: &mut A) -> bool {
        match self.pending.take_due(now) {
            Some(next) => self.write(next, bar),
            None => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Drop any scheduled write; nothing reaches the bar afterwards.
    pub fn teardown(&mut self) {
        if self.pending.cancel().is_some() {
            tracing::debug!("Dropped pending location write on teardown");
        }
    }

    fn write<A: AddressBar + ?Sized>(&mut self, next: Location, bar: &mut A) -> bool {
        let Phase::Synchronizing { last_synced } = &mut self.phase else {
            return false;
        };
        if *last_synced == next {
            return false;
        }
        let rendered = next.to_string();
        tracing::debug!(location = %rendered, "Location replaced");
        bar.replace(&rendered);
        *last_synced = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CriteriaAction, FilterKind};
    use tokio::time;

    fn synced(initial: &str) -> (UrlSync, SessionLocation, Criteria) {
        let bar = SessionLocation::new(initial);
        let mut sync = UrlSync::default();
        let criteria = sync.bootstrap(&bar);
        (sync, bar, criteria)
    }

    #[test]
    fn test_bootstrap_reads_bar_without_writing() {
        let (sync, bar, criteria) = synced("/catalog?search=%20hat%20&free=true&junk=1");
        assert_eq!(criteria.search, "hat");
        assert!(criteria.filters.free);
        assert!(sync.is_synchronizing());
        assert_eq!(
            sync.last_synced().map(ToString::to_string).as_deref(),
            Some("/catalog?search=hat&free=true")
        );
        assert_eq!(bar.replacements(), 0);
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let (mut sync, _, _) = synced("/?paid=true");
        let other = SessionLocation::new("/?free=true");
        let criteria = sync.bootstrap(&other);
        assert!(criteria.filters.paid);
        assert!(!criteria.filters.free);
    }

    #[test]
    fn test_changes_before_bootstrap_ignored() {
        let mut sync = UrlSync::default();
        let mut bar = SessionLocation::default();
        let mut criteria = Criteria::default();
        let transition = criteria.apply(CriteriaAction::ToggleFilter(FilterKind::Paid));

        assert!(!sync.on_change(&criteria, transition, &mut bar));
        assert_eq!(bar.replacements(), 0);
    }

    #[test]
    fn test_toggle_writes_immediately() {
        let (mut sync, mut bar, mut criteria) = synced("/catalog");
        let transition = criteria.apply(CriteriaAction::ToggleFilter(FilterKind::ViewOnly));

        assert!(sync.on_change(&criteria, transition, &mut bar));
        assert_eq!(bar.current(), "/catalog?viewOnly=true");
        assert!(!sync.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_write_waits_for_quiet_period() {
        let (mut sync, mut bar, mut criteria) = synced("/catalog");
        for text in ["h", "ha", "hat"] {
            let transition = criteria.apply(CriteriaAction::SetSearch(text.into()));
            assert!(!sync.on_change(&criteria, transition, &mut bar));
            time::advance(Duration::from_millis(100)).await;
            assert!(!sync.flush_due(Instant::now(), &mut bar));
        }
        assert_eq!(bar.current(), "/catalog");

        time::advance(Duration::from_millis(200)).await;
        assert!(sync.flush_due(Instant::now(), &mut bar));
        assert_eq!(bar.current(), "/catalog?search=hat");
        assert_eq!(bar.replacements(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_cancels_pending_search_write() {
        let (mut sync, mut bar, mut criteria) = synced("/");
        let transition = criteria.apply(CriteriaAction::SetSearch("coat".into()));
        sync.on_change(&criteria, transition, &mut bar);

        let transition = criteria.apply(CriteriaAction::ToggleFilter(FilterKind::Paid));
        sync.on_change(&criteria, transition, &mut bar);
        assert_eq!(bar.current(), "/?search=coat&paid=true");

        time::advance(SEARCH_DEBOUNCE).await;
        assert!(!sync.flush_due(Instant::now(), &mut bar));
        assert_eq!(bar.replacements(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_write_skipped() {
        let (mut sync, mut bar, mut criteria) = synced("/?search=hat");
        let transition = criteria.apply(CriteriaAction::SetSearch("hat ".into()));
        sync.on_change(&criteria, transition, &mut bar);

        time::advance(SEARCH_DEBOUNCE).await;
        assert!(!sync.flush_due(Instant::now(), &mut bar));
        assert_eq!(bar.replacements(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_drops_pending_write() {
        let (mut sync, mut bar, mut criteria) = synced("/");
        let transition = criteria.apply(CriteriaAction::SetSearch("hat".into()));
        sync.on_change(&criteria, transition, &mut bar);
        sync.teardown();

        time::advance(SEARCH_DEBOUNCE * 2).await;
        assert!(!sync.flush_due(Instant::now(), &mut bar));
        assert_eq!(bar.current(), "/");
    }

    #[test]
    fn test_reset_writes_bare_path() {
        let (mut sync, mut bar, mut criteria) = synced("/shop?search=hat&paid=true");
        let transition = criteria.apply(CriteriaAction::Reset);
        assert!(sync.on_change(&criteria, transition, &mut bar));
        assert_eq!(bar.current(), "/shop");
    }
}
