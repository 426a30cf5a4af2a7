//! Sentinel-driven infinite scroll trigger.
//!
//! The host reports whether the end-of-list sentinel intersects the viewport.
//! The trigger turns those reports into at most one `fetch_next` per armed
//! period, de-duplicating on controller state rather than on time.

use super::controller::FetchPhase;

/// Decides when the next page should be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfiniteScrollTrigger {
    sentinel_visible: bool,
    armed: bool,
}

impl Default for InfiniteScrollTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl InfiniteScrollTrigger {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sentinel_visible: false,
            armed: true,
        }
    }

    /// Records a visibility report. Returns `true` when the caller should
    /// request the next page.
    pub fn observe(&mut self, visible: bool, phase: FetchPhase) -> bool {
        self.sentinel_visible = visible;
        self.try_fire(phase)
    }

    /// New items were appended. Re-arms, and fires right away if the sentinel
    /// is still on screen.
    pub fn on_items_appended(&mut self, phase: FetchPhase) -> bool {
        self.armed = true;
        self.try_fire(phase)
    }

    /// A fetch failed. Re-arms without firing; the next visibility report or
    /// an explicit retry drives the following attempt.
    pub fn on_fetch_failed(&mut self) {
        self.armed = true;
    }

    /// Pagination restarted for a new identity.
    pub fn reset(&mut self) {
        self.armed = true;
    }

    #[must_use]
    pub const fn sentinel_visible(&self) -> bool {
        self.sentinel_visible
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    fn try_fire(&mut self, phase: FetchPhase) -> bool {
        if self.sentinel_visible && self.armed && phase == FetchPhase::Ready {
            tracing::debug!("sentinel visible, requesting next page");
            self.armed = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_while_visible() {
        let mut trigger = InfiniteScrollTrigger::new();
        assert!(trigger.observe(true, FetchPhase::Ready));
        assert!(!trigger.observe(true, FetchPhase::Fetching { page: 2 }));
        assert!(!trigger.observe(true, FetchPhase::Ready));
    }

    #[test]
    fn waits_for_ready_controller() {
        let mut trigger = InfiniteScrollTrigger::new();
        assert!(!trigger.observe(true, FetchPhase::Fetching { page: 1 }));
        assert!(!trigger.observe(true, FetchPhase::Exhausted));
        assert!(trigger.is_armed());
    }

    #[test]
    fn rearms_after_append() {
        let mut trigger = InfiniteScrollTrigger::new();
        assert!(trigger.observe(true, FetchPhase::Ready));
        trigger.observe(false, FetchPhase::Fetching { page: 2 });
        assert!(!trigger.on_items_appended(FetchPhase::Ready));
        assert!(trigger.observe(true, FetchPhase::Ready));
    }

    #[test]
    fn still_visible_sentinel_loads_continuously() {
        let mut trigger = InfiniteScrollTrigger::new();
        assert!(trigger.observe(true, FetchPhase::Ready));
        assert!(trigger.on_items_appended(FetchPhase::Ready));
        assert!(!trigger.on_items_appended(FetchPhase::Exhausted));
    }

    #[test]
    fn failure_does_not_retry_by_itself() {
        let mut trigger = InfiniteScrollTrigger::new();
        assert!(trigger.observe(true, FetchPhase::Ready));
        trigger.on_fetch_failed();
        assert!(trigger.is_armed());
        assert!(trigger.observe(true, FetchPhase::Ready));
    }
}
