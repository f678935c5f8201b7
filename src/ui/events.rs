//! Application event handling.
//!
//! This module processes background task completion events: the catalog
//! fetch result and task panics.

use crate::app::{App, AppEvent};
use crate::catalog::{FetchError, FetchStatus};
use crate::sync::AddressBar;

/// Handle application events from background tasks.
pub(super) fn handle_app_event<A: AddressBar>(app: &mut App<A>, event: AppEvent) {
    match event {
        AppEvent::ItemsLoaded(result) => {
            if !app.commit_items(result) {
                return;
            }
            let message = match app.status() {
                FetchStatus::Ready => Some(format!("Loaded {} items", app.items().len())),
                FetchStatus::Error(msg) => Some(format!("Error: {}", msg)),
                FetchStatus::Loading => None,
            };
            if let Some(message) = message {
                app.set_status(message);
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            // The fetch never reports back after a panic; settle the store
            // so the catalog panel leaves its loading state.
            app.commit_items(Err(FetchError::Connection(format!(
                "Internal error in {} task",
                task
            ))));
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
