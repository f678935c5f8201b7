//! vitrine: a terminal catalog browser.
//!
//! The session state lives in [`app::App`]: the fetched catalog, the search
//! and pricing criteria, the revealed pages and the address-bar mirror. The
//! [`ui`] module drives it from a terminal.

pub mod app;
pub mod catalog;
pub mod config;
pub mod criteria;
pub mod filter;
pub mod paginator;
pub mod sync;
pub mod ui;
pub mod util;
