//! Terminal User Interface module.
//!
//! This module provides the TUI for browsing the catalog, including:
//! - Main event loop (`run`)
//! - Input handling for search, toggles and scrolling
//! - Rendering for the location, criteria and catalog panels
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Screen layout, location line, search box and toggles
//! - `catalog` - Catalog list widget with the infinite-scroll sentinel row
//! - `status` - Status bar widget

mod catalog;
mod events;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
