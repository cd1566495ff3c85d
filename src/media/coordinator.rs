//! Node → media session state machine.
//!
//! At most one node is active at a time. Its session may hold a video, a
//! photo marquee, both, or neither (marker only). Opening a session always
//! tears the previous one down first, and every exit path (re-click,
//! click-away, natural video end) runs the same teardown.
//!
//! The coordinator owns no media itself. It drives a [`MediaSink`], which
//! the shell implements over its playback, marquee and node-marker state.

use crate::taxonomy::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaState {
    Idle,
    VideoActive(String),
    MarqueeActive(String),
    Both { video: String, marquee: String },
}

impl MediaState {
    pub fn video(&self) -> Option<&str> {
        match self {
            Self::VideoActive(src) | Self::Both { video: src, .. } => Some(src),
            _ => None,
        }
    }

    pub fn marquee(&self) -> Option<&str> {
        match self {
            Self::MarqueeActive(name) | Self::Both { marquee: name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::VideoActive(_) => "video",
            Self::MarqueeActive(_) => "marquee",
            Self::Both { .. } => "video + marquee",
        }
    }
}

/// Where a node's media comes from.
pub trait MediaResolver {
    /// Photo locations for the node, in display order.
    fn photos(&self, name: &str) -> Vec<String>;
    /// Whether the node has a photo set at all (it may still be empty).
    fn has_photos(&self, name: &str) -> bool;
    /// A node-specific video. Placeholder and suppressed links are `None`.
    fn video(&self, name: &str) -> Option<String>;
}

/// Effects requested by the coordinator.
pub trait MediaSink {
    fn mark_active(&mut self, node: NodeId);
    fn clear_active(&mut self);
    fn open_video(&mut self, src: &str);
    fn close_video(&mut self);
    fn show_marquee(&mut self, name: &str, urls: Vec<String>);
    fn clear_marquee(&mut self);
}

/// What a background click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAway {
    /// A session was open and has been closed.
    Closed,
    /// Nothing was open; the caller should re-centre the camera.
    Recenter,
}

#[derive(Debug)]
pub struct MediaCoordinator {
    state: MediaState,
    active: Option<NodeId>,
}

impl Default for MediaCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaCoordinator {
    pub fn new() -> Self {
        Self {
            state: MediaState::Idle,
            active: None,
        }
    }

    pub fn state(&self) -> &MediaState {
        &self.state
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn click_node(
        &mut self,
        node: NodeId,
        name: &str,
        resolver: &impl MediaResolver,
        sink: &mut impl MediaSink,
    ) -> &MediaState {
        if self.active == Some(node) {
            log::debug!("{} clicked again, closing", name);
            self.teardown(sink);
            return &self.state;
        }

        self.teardown(sink);

        // Marker goes on before any media starts loading.
        sink.mark_active(node);
        self.active = Some(node);

        let marquee = if resolver.has_photos(name) {
            sink.show_marquee(name, resolver.photos(name));
            Some(name.to_string())
        } else {
            None
        };
        let video = resolver.video(name);
        if let Some(src) = &video {
            sink.open_video(src);
        }

        self.state = match (video, marquee) {
            (Some(video), Some(marquee)) => MediaState::Both { video, marquee },
            (Some(video), None) => MediaState::VideoActive(video),
            (None, Some(marquee)) => MediaState::MarqueeActive(marquee),
            (None, None) => MediaState::Idle,
        };
        log::info!("{} opened ({})", name, self.state.label());
        &self.state
    }

    pub fn click_away(&mut self, sink: &mut impl MediaSink) -> ClickAway {
        if self.is_active() {
            self.teardown(sink);
            ClickAway::Closed
        } else {
            ClickAway::Recenter
        }
    }

    /// The video reached its end.
    pub fn video_ended(&mut self, sink: &mut impl MediaSink) {
        if self.state.video().is_some() {
            self.teardown(sink);
        }
    }

    /// Close everything. A no-op when nothing is open.
    pub fn teardown(&mut self, sink: &mut impl MediaSink) {
        if self.state.video().is_some() {
            sink.close_video();
        }
        if self.state.marquee().is_some() {
            sink.clear_marquee();
        }
        if self.active.take().is_some() {
            sink.clear_active();
        }
        self.state = MediaState::Idle;
    }
}
