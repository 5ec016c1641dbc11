//! Platform abstraction layer
//!
//! Frame scheduling differs between the browser (`requestAnimationFrame`) and
//! headless runs (tests, the native demo). The frame loop only sees the
//! `Scheduler` trait.

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{FrameCallback, RafScheduler};

/// Requests the next frame callback
pub trait Scheduler {
    type Handle: Copy + std::fmt::Debug;

    /// Ask for one more frame; `None` if the platform refused
    fn request_tick(&mut self) -> Option<Self::Handle>;

    /// Drop a request that has not fired yet (no-op for fired handles)
    fn cancel_tick(&mut self, handle: Self::Handle);
}

/// Scheduler driven by hand
///
/// Requests queue up until the owner calls `take_due`, which plays the part of
/// the display refresh.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    pending: Vec<u64>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the oldest pending request, if any
    pub fn take_due(&mut self) -> Option<u64> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Requests that have neither fired nor been cancelled
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    type Handle = u64;

    fn request_tick(&mut self) -> Option<u64> {
        self.next_handle += 1;
        self.requested += 1;
        self.pending.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_tick(&mut self, handle: u64) {
        if let Some(i) = self.pending.iter().position(|&h| h == handle) {
            self.pending.remove(i);
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_fire_in_order() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_tick().unwrap();
        let b = scheduler.request_tick().unwrap();
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.take_due(), Some(a));
        assert_eq!(scheduler.take_due(), Some(b));
        assert_eq!(scheduler.take_due(), None);
    }

    #[test]
    fn test_cancel_only_counts_pending_handles() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_tick().unwrap();
        scheduler.cancel_tick(a);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancelled(), 1);

        // Already gone
        scheduler.cancel_tick(a);
        assert_eq!(scheduler.cancelled(), 1);
        assert_eq!(scheduler.requested(), 1);
    }
}
