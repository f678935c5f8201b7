use super::{FetchError, Item, ItemSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Lifecycle of the single catalog fetch.
///
/// Being an enum, exactly one phase holds at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Ready,
    Error(String),
}

impl FetchStatus {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchStatus::Error(msg) => Some(msg),
            FetchStatus::Loading | FetchStatus::Ready => None,
        }
    }
}

/// Owner of the fetched item collection.
///
/// The store is the only writer of raw data. It hands out a
/// [`CancellationToken`] when the load starts and refuses to commit a result
/// once that token has been cancelled by [`ItemStore::teardown`].
pub struct ItemStore {
    items: Arc<Vec<Item>>,
    status: FetchStatus,
    cancel: Option<CancellationToken>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            status: FetchStatus::Loading,
            cancel: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    /// Claim the session's one load.
    ///
    /// Returns the token the fetch must carry, or `None` if a load was
    /// already started (or the store was torn down).
    pub fn begin_load(&mut self) -> Option<CancellationToken> {
        if self.cancel.is_some() {
            tracing::debug!("Catalog load already started, ignoring");
            return None;
        }
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        Some(token)
    }

    /// Apply a fetch result.
    ///
    /// Returns `false` when the result was discarded because the store was
    /// torn down, the load was never started, or a result was already applied.
    pub fn commit(&mut self, result: Result<Vec<Item>, FetchError>) -> bool {
        let live = self
            .cancel
            .as_ref()
            .is_some_and(|token| !token.is_cancelled());
        if !live || !self.is_loading() {
            tracing::debug!("Discarding catalog result for inactive load");
            return false;
        }

        match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "Catalog ready");
                self.items = Arc::new(items);
                self.status = FetchStatus::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog fetch failed");
                self.status = FetchStatus::Error(e.to_string());
            }
        }
        true
    }

    /// Cancel the in-flight load. Later commits have no effect.
    pub fn teardown(&mut self) {
        // Never started: park a cancelled token so no load can begin.
        self.cancel
            .get_or_insert_with(CancellationToken::new)
            .cancel();
    }
}

/// Await the source unless `token` is cancelled first.
///
/// `None` means the load was torn down and the result must not be applied.
pub async fn fetch_guarded(
    source: &dyn ItemSource,
    token: &CancellationToken,
) -> Option<Result<Vec<Item>, FetchError>> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        result = source.fetch_items() => {
            if token.is_cancelled() {
                None
            } else {
                Some(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PricingKind, STATUS_ERROR_MESSAGE};
    use futures::future::{BoxFuture, FutureExt};

    struct StaticSource(Vec<Item>);

    impl ItemSource for StaticSource {
        fn fetch_items(&self) -> BoxFuture<'_, Result<Vec<Item>, FetchError>> {
            let items = self.0.clone();
            async move { Ok(items) }.boxed()
        }
    }

    struct NeverSource;

    impl ItemSource for NeverSource {
        fn fetch_items(&self) -> BoxFuture<'_, Result<Vec<Item>, FetchError>> {
            futures::future::pending().boxed()
        }
    }

    fn test_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            creator: "Adam".to_string(),
            title: format!("Item {}", id),
            pricing: PricingKind::Paid,
            image_ref: String::new(),
            price: 1.0,
        }
    }

    #[test]
    fn test_starts_loading() {
        let store = ItemStore::new();
        assert!(store.is_loading());
        assert!(store.items().is_empty());
        assert!(store.status().error_message().is_none());
    }

    #[test]
    fn test_commit_success_sets_ready() {
        let mut store = ItemStore::new();
        store.begin_load().unwrap();
        assert!(store.commit(Ok(vec![test_item("1"), test_item("2")])));
        assert_eq!(store.status(), &FetchStatus::Ready);
        assert_eq!(store.items().len(), 2);
    }

    #[test]
    fn test_status_error_uses_fixed_message() {
        let mut store = ItemStore::new();
        store.begin_load().unwrap();
        store.commit(Err(FetchError::HttpStatus(503)));
        assert_eq!(store.status().error_message(), Some(STATUS_ERROR_MESSAGE));
    }

    #[test]
    fn test_network_error_message_is_verbatim() {
        let mut store = ItemStore::new();
        store.begin_load().unwrap();
        store.commit(Err(FetchError::Connection("connection reset by peer".into())));
        assert_eq!(
            store.status().error_message(),
            Some("connection reset by peer")
        );
    }

    #[test]
    fn test_load_claimed_once() {
        let mut store = ItemStore::new();
        assert!(store.begin_load().is_some());
        assert!(store.begin_load().is_none());
    }

    #[test]
    fn test_commit_after_teardown_discarded() {
        let mut store = ItemStore::new();
        store.begin_load().unwrap();
        store.teardown();

        assert!(!store.commit(Ok(vec![test_item("1")])));
        assert!(store.is_loading());
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_teardown_before_start_blocks_load() {
        let mut store = ItemStore::new();
        store.teardown();
        assert!(store.begin_load().is_none());
        assert!(!store.commit(Ok(vec![test_item("1")])));
    }

    #[test]
    fn test_second_commit_ignored() {
        let mut store = ItemStore::new();
        store.begin_load().unwrap();
        store.commit(Ok(vec![test_item("1")]));
        assert!(!store.commit(Err(FetchError::HttpStatus(500))));
        assert_eq!(store.status(), &FetchStatus::Ready);
    }

    #[tokio::test]
    async fn test_guarded_fetch_commits_once() {
        let mut store = ItemStore::new();
        let source = StaticSource(vec![test_item("1")]);
        let token = store.begin_load().unwrap();

        let result = fetch_guarded(&source, &token).await.unwrap();
        assert!(store.commit(result));
        assert_eq!(store.items()[0].id, "1");
        assert!(store.begin_load().is_none());
    }

    #[tokio::test]
    async fn test_fetch_guarded_returns_none_when_cancelled() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move { canceller.cancel() });

        assert!(fetch_guarded(&NeverSource, &token).await.is_none());
    }
}
