//! Video playback clock.
//!
//! The shell does not decode video, so a session's "video" is a timeline of
//! nominal length that advances with the frame clock. It backs the
//! scrubber, the play/pause toggle and the mute toggle, and reports the
//! natural end once.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    source: Option<String>,
    duration: f32,
    position: f32,
    paused: bool,
    muted: bool,
    ended: bool,
}

impl Playback {
    /// Starts muted, like an autoplaying background clip.
    pub fn new() -> Self {
        Self {
            source: None,
            duration: 0.0,
            position: 0.0,
            paused: false,
            muted: true,
            ended: false,
        }
    }

    pub fn open(&mut self, src: &str, duration_secs: f32) {
        self.source = Some(src.to_string());
        self.duration = duration_secs.max(0.1);
        self.position = 0.0;
        self.paused = false;
        self.muted = false;
        self.ended = false;
        log::debug!("playing {} ({:.0}s)", src, self.duration);
    }

    pub fn close(&mut self) {
        if let Some(src) = self.source.take() {
            log::debug!("closed {}", src);
        }
        self.position = 0.0;
        self.ended = false;
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Sound is coming out: open, running and not muted.
    pub fn is_audible(&self) -> bool {
        self.is_open() && !self.paused && !self.muted && !self.ended
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Position as a fraction of the duration, for the scrubber.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Toggle play/pause. Also unmutes, since pressing play means "I want
    /// to hear this".
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            self.muted = false;
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Jump to `fraction` of the duration.
    pub fn seek(&mut self, fraction: f32) {
        if !self.is_open() || !fraction.is_finite() {
            return;
        }
        self.position = fraction.clamp(0.0, 1.0) * self.duration;
        self.ended = false;
    }

    /// Advance the clock by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Option<PlaybackEvent> {
        if !self.is_open() || self.paused || self.ended || !(dt > 0.0) {
            return None;
        }
        self.position += dt;
        if self.position >= self.duration {
            self.position = self.duration;
            self.ended = true;
            return Some(PlaybackEvent::Ended);
        }
        None
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}
