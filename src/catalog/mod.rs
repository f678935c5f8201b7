//! Catalog data: the item model, the remote source, and the store that owns
//! the fetched collection.
//!
//! - [`item`] - `Item` and `PricingKind`, including the wire format
//! - [`source`] - the `ItemSource` seam and its reqwest implementation
//! - [`store`] - `ItemStore`, the fetch lifecycle and its teardown guard

mod item;
mod source;
mod store;

pub use item::{Item, PricingKind};
pub use source::{FetchError, HttpItemSource, ItemSource, STATUS_ERROR_MESSAGE};
pub use store::{fetch_guarded, FetchStatus, ItemStore};
