//! Search text plus filter toggles, and the reducer that mutates them.
//!
//! Criteria change only through [`Criteria::apply`]; every call reports a
//! [`Transition`] so the session can decide which side effects to run
//! (location write, pagination reset) after the state has settled.

mod location;

pub use location::{Location, LocationError};

use crate::catalog::PricingKind;

/// One of the three pricing toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Paid,
    Free,
    ViewOnly,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Paid, FilterKind::Free, FilterKind::ViewOnly];

    /// Query parameter name in the location.
    pub fn param(self) -> &'static str {
        match self {
            FilterKind::Paid => "paid",
            FilterKind::Free => "free",
            FilterKind::ViewOnly => "viewOnly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Paid => "Paid",
            FilterKind::Free => "Free",
            FilterKind::ViewOnly => "View Only",
        }
    }

    pub fn matches(self, pricing: PricingKind) -> bool {
        matches!(
            (self, pricing),
            (FilterKind::Paid, PricingKind::Paid)
                | (FilterKind::Free, PricingKind::Free)
                | (FilterKind::ViewOnly, PricingKind::ViewOnly)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filters {
    pub paid: bool,
    pub free: bool,
    pub view_only: bool,
}

impl Filters {
    pub fn get(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Paid => self.paid,
            FilterKind::Free => self.free,
            FilterKind::ViewOnly => self.view_only,
        }
    }

    pub fn set(&mut self, kind: FilterKind, value: bool) {
        match kind {
            FilterKind::Paid => self.paid = value,
            FilterKind::Free => self.free = value,
            FilterKind::ViewOnly => self.view_only = value,
        }
    }

    pub fn any_active(&self) -> bool {
        self.paid || self.free || self.view_only
    }

    /// Inclusive OR across active toggles; no active toggle accepts everything.
    pub fn accepts(&self, pricing: PricingKind) -> bool {
        !self.any_active()
            || FilterKind::ALL
                .iter()
                .any(|&kind| self.get(kind) && kind.matches(pricing))
    }
}

/// Everything that decides which items are visible.
///
/// `search` holds the text as typed. Consumers trim it: the filter engine
/// and the location both see [`Criteria::search_term`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search: String,
    pub filters: Filters,
}

/// User-level operations on [`Criteria`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaAction {
    SetSearch(String),
    ToggleFilter(FilterKind),
    SetFilter(FilterKind, bool),
    /// Clear search and all toggles in one step.
    Reset,
}

/// What an action changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// Only the search text moved. Location writes are debounced.
    SearchEdited,
    /// A toggle flipped. Location writes are immediate.
    FiltersChanged,
    /// Reset to defaults. Location writes are immediate.
    Cleared,
}

impl Transition {
    pub fn is_change(self) -> bool {
        self != Transition::Unchanged
    }
}

impl Criteria {
    pub fn search_term(&self) -> &str {
        self.search.trim()
    }

    pub fn is_default(&self) -> bool {
        self.search_term().is_empty() && !self.filters.any_active()
    }

    /// The form this criteria takes after a trip through the location.
    pub fn canonical(&self) -> Criteria {
        Criteria {
            search: self.search_term().to_string(),
            filters: self.filters,
        }
    }

    /// Reducer: apply `action` in place and report what changed.
    pub fn apply(&mut self, action: CriteriaAction) -> Transition {
        match action {
            CriteriaAction::SetSearch(text) => {
                if self.search == text {
                    return Transition::Unchanged;
                }
                self.search = text;
                Transition::SearchEdited
            }
            CriteriaAction::ToggleFilter(kind) => {
                let value = !self.filters.get(kind);
                self.filters.set(kind, value);
                Transition::FiltersChanged
            }
            CriteriaAction::SetFilter(kind, value) => {
                if self.filters.get(kind) == value {
                    return Transition::Unchanged;
                }
                self.filters.set(kind, value);
                Transition::FiltersChanged
            }
            CriteriaAction::Reset => {
                if *self == Criteria::default() {
                    return Transition::Unchanged;
                }
                *self = Criteria::default();
                Transition::Cleared
            }
        }
    }
}
