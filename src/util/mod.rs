//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **Endpoint validation**: scheme and host checks for the catalog URL
//! - **Text processing**: Unicode-aware width, truncation and sanitizing of
//!   remote text before it reaches the terminal
//! - **Tasks**: panic capture for spawned background work

mod endpoint;
mod task;
mod text;

pub use endpoint::{validate_endpoint, EndpointError};
pub use task::catch_task_panic;
pub use text::{display_width, sanitize_line, truncate_to_width};
