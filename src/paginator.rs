//! Incremental reveal of the filtered list.
//!
//! [`Paginator`] counts revealed pages. [`SentinelTrigger`] turns a stream of
//! "is the sentinel row on screen" samples into at most one advance request
//! per visibility transition.

/// Items revealed per page.
pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    revealed_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            revealed_pages: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn revealed_pages(&self) -> usize {
        self.revealed_pages
    }

    pub fn reset(&mut self) {
        self.revealed_pages = 1;
    }

    /// How many of `total` filtered items are on screen.
    pub fn visible_len(&self, total: usize) -> usize {
        self.revealed_pages
            .saturating_mul(self.page_size)
            .min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_len(total) < total
    }

    /// Reveal one more page if anything is left. Returns whether it grew.
    pub fn advance(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.revealed_pages += 1;
        true
    }

    pub fn page<'a, T>(&self, filtered: &'a [T]) -> &'a [T] {
        &filtered[..self.visible_len(filtered.len())]
    }
}

/// Edge detector for the sentinel row.
///
/// Only a hidden-to-visible transition while attached fires. Attaching and
/// detaching mirror the sentinel being mounted; a detached trigger never
/// fires. [`SentinelTrigger::rearm`] forgets the last sample so a sentinel
/// that stays on screen after a page is added fires again.
#[derive(Debug, Clone, Default)]
pub struct SentinelTrigger {
    attached: bool,
    visible: bool,
}

impl SentinelTrigger {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Subscribe or unsubscribe to match whether the sentinel is mounted.
    pub fn set_mounted(&mut self, mounted: bool) {
        if self.attached != mounted {
            tracing::trace!(mounted, "Sentinel mount changed");
        }
        self.attached = mounted;
        if !mounted {
            self.visible = false;
        }
    }

    pub fn rearm(&mut self) {
        self.visible = false;
    }

    /// Feed one visibility sample; returns true when a page should be added.
    pub fn observe(&mut self, visible: bool) -> bool {
        if !self.attached {
            return false;
        }
        let fired = visible && !self.visible;
        self.visible = visible;
        fired
    }
}
