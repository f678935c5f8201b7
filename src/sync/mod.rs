//! Address-bar synchronization.
//!
//! - [`debounce`] - `Debouncer`, the schedule/cancel primitive on the tokio clock
//! - [`url_sync`] - `UrlSync`, the bootstrap-then-mirror state machine, and the
//!   `AddressBar` seam it writes through

mod debounce;
mod url_sync;

pub use debounce::Debouncer;
pub use url_sync::{AddressBar, SessionLocation, UrlSync, SEARCH_DEBOUNCE};
