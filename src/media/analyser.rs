//! Audio analyser and the waveform visualiser loop.
//!
//! The visualiser is a frame task that is started once and never cancelled
//! or paused. It reads the analyser on every frame regardless of playback
//! state; silence simply reads as zeros.

use crate::render::animator::{FrameHandle, FrameScheduler};

/// Source of frequency magnitudes, each in [0, 1].
pub trait Analyser {
    fn read(&mut self, now: f64, out: &mut [f32]);
}

/// Analyser without a real signal: a few drifting partials whose
/// loudness follows the level it is given.
#[derive(Debug, Clone)]
pub struct SyntheticAnalyser {
    level: f32,
}

impl SyntheticAnalyser {
    pub fn new() -> Self {
        Self { level: 0.0 }
    }

    /// Set loudness in [0, 1]. Zero reads as silence.
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for SyntheticAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyser for SyntheticAnalyser {
    fn read(&mut self, now: f64, out: &mut [f32]) {
        let n = out.len().max(1) as f32;
        let t = now as f32;
        for (i, v) in out.iter_mut().enumerate() {
            let x = i as f32 / n;
            // Energy falls off towards the high bins.
            let envelope = (1.0 - x).powf(1.5);
            let wobble = 0.5
                + 0.25 * (t * 3.1 + x * 17.0).sin()
                + 0.25 * (t * 5.3 - x * 29.0).sin();
            *v = (self.level * envelope * wobble).clamp(0.0, 1.0);
        }
    }
}

/// Bar heights for the waveform strip, refreshed every frame.
#[derive(Debug)]
pub struct Visualizer {
    handle: Option<FrameHandle>,
    bins: Vec<f32>,
}

impl Visualizer {
    pub fn new(bins: usize) -> Self {
        Self {
            handle: None,
            bins: vec![0.0; bins.max(1)],
        }
    }

    /// Start the loop. Calling again while running does nothing.
    pub fn start(&mut self, sched: &mut FrameScheduler) {
        if self.handle.is_none() {
            self.handle = Some(sched.request());
            log::debug!("visualiser started");
        }
    }

    pub fn is_running(&self, sched: &FrameScheduler) -> bool {
        self.handle.as_ref().is_some_and(|h| sched.is_live(h))
    }

    /// One frame of the loop. Returns `false` when not running.
    pub fn frame(
        &mut self,
        sched: &FrameScheduler,
        analyser: &mut impl Analyser,
        now: f64,
    ) -> bool {
        if !self.is_running(sched) {
            return false;
        }
        analyser.read(now, &mut self.bins);
        true
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Vertical scale of bar `i`: a resting height plus the magnitude.
    pub fn bar_scale(&self, i: usize) -> f32 {
        0.2 + self.bins.get(i).copied().unwrap_or(0.0)
    }

    /// RMS of the current bins.
    pub fn level(&self) -> f32 {
        let sum: f32 = self.bins.iter().map(|v| v * v).sum();
        (sum / self.bins.len() as f32).sqrt()
    }
}
