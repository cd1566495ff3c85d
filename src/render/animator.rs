//! Per-frame task scheduling.
//!
//! The shell repaints once per display frame and, on each frame, advances
//! whatever tasks are still live. A task is identified by a `FrameHandle`
//! issued here; cancelling the handle is how a task is stopped. A task
//! that finds its handle dead on the next frame must not touch state, so
//! cancellation is observable and no stale step ever lands.
//!
//! Two tasks use this today:
//! - the camera focus tween (one in flight at a time, cancelled by any
//!   competing camera operation)
//! - the audio visualiser loop (started once, never cancelled)

use std::collections::HashSet;

/// Token for one scheduled task.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    live: HashSet<u64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task and return its handle.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.live.insert(self.next_id);
        FrameHandle(self.next_id)
    }

    /// Cancel a task. Returns `false` if it was already dead.
    pub fn cancel(&mut self, handle: &FrameHandle) -> bool {
        self.live.remove(&handle.0)
    }

    pub fn is_live(&self, handle: &FrameHandle) -> bool {
        self.live.contains(&handle.0)
    }

    /// Number of live tasks. The shell keeps repainting while this is > 0.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Cosine ease-in-out on [0, 1].
pub fn ease_in_out_cos(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    0.5 - 0.5 * (std::f32::consts::PI * t).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_handles_stay_dead() {
        let mut s = FrameScheduler::new();
        let a = s.request();
        let b = s.request();
        assert_ne!(a, b);
        assert!(s.is_live(&a));
        assert!(s.cancel(&a));
        assert!(!s.is_live(&a));
        assert!(!s.cancel(&a));
        assert!(s.is_live(&b));
        assert_eq!(s.live_count(), 1);

        // Ids are never reused.
        let c = s.request();
        assert!(c.id() > b.id());
    }

    #[test]
    fn easing_endpoints_and_symmetry() {
        assert!(ease_in_out_cos(0.0).abs() < 1e-6);
        assert!((ease_in_out_cos(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out_cos(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_cos(0.25) + ease_in_out_cos(0.75) - 1.0).abs() < 1e-5);
        assert_eq!(ease_in_out_cos(-1.0), 0.0);
        assert!((ease_in_out_cos(2.0) - 1.0).abs() < 1e-6);
    }
}
