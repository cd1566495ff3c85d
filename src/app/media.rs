//! Media side of `AtlasApp`: the sink the coordinator drives, plus the
//! marquee strip and waveform painters.

use eframe::egui;

use subculture_atlas::config::AtlasConfig;
use subculture_atlas::media::coordinator::MediaSink;
use subculture_atlas::media::playback::{Playback, PlaybackEvent};
use subculture_atlas::net::image::LoadRequest;
use subculture_atlas::render::marquee::Marquee;
use subculture_atlas::taxonomy::NodeId;

use super::AtlasApp;

/// Playback clock, marquee and active-node marker.
pub struct MediaDeck {
    pub playback: Playback,
    pub marquee: Marquee,
    pub active: Option<NodeId>,
    /// Loads requested by the marquee, handed to the loader next frame.
    pub pending_loads: Vec<LoadRequest>,
    clip_seconds: f32,
}

impl MediaDeck {
    pub fn new(config: &AtlasConfig, width: f32) -> Self {
        Self {
            playback: Playback::new(),
            marquee: Marquee::new(width, config.marquee_height, config.marquee_speed),
            active: None,
            pending_loads: Vec::new(),
            clip_seconds: config.video_clip_seconds,
        }
    }

    /// Returns `true` when the video reached its natural end this frame.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.playback.advance(dt) == Some(PlaybackEvent::Ended)
    }

    /// Something the play/pause button can act on.
    pub fn has_media(&self) -> bool {
        self.playback.is_open() || self.marquee.node().is_some()
    }

    pub fn is_running(&self) -> bool {
        if self.playback.is_open() {
            !self.playback.is_paused()
        } else {
            !self.marquee.is_paused()
        }
    }

    /// Play/pause drives the video clock and the marquee scroll together.
    pub fn toggle_play(&mut self, now: f64) {
        let running = self.is_running();
        if self.playback.is_open() {
            self.playback.toggle_pause();
        }
        if running {
            self.marquee.pause(now);
        } else {
            self.marquee.resume(now);
        }
    }

    pub fn set_width(&mut self, width: f32) {
        if let Some(request) = self.marquee.set_width(width) {
            self.pending_loads.push(request);
        }
    }

    /// Step to the next width preset and return its index. Without media
    /// there is no strip to rebuild, so the preset stays put.
    pub fn cycle_width(&mut self, widths: &[f32], idx: usize) -> usize {
        if !self.has_media() || widths.is_empty() {
            return idx;
        }
        let next = (idx + 1) % widths.len();
        self.set_width(widths[next]);
        next
    }
}

impl MediaSink for MediaDeck {
    fn mark_active(&mut self, node: NodeId) {
        self.active = Some(node);
    }

    fn clear_active(&mut self) {
        self.active = None;
    }

    fn open_video(&mut self, src: &str) {
        self.playback.open(src, self.clip_seconds);
    }

    fn close_video(&mut self) {
        self.playback.close();
    }

    fn show_marquee(&mut self, name: &str, urls: Vec<String>) {
        if let Some(request) = self.marquee.show(name, urls) {
            self.pending_loads.push(request);
        }
    }

    fn clear_marquee(&mut self) {
        self.marquee.hide();
        self.pending_loads.clear();
    }
}

impl AtlasApp {
    /// Photo strip along the bottom-left of `canvas`.
    pub fn draw_marquee(&self, ui: &egui::Ui, canvas: egui::Rect, now: f64) {
        let marquee = &self.deck.marquee;
        if marquee.node().is_none() {
            return;
        }
        let width = marquee.visible_width().min(canvas.width());
        let strip = egui::Rect::from_min_size(
            egui::pos2(canvas.left(), canvas.bottom() - marquee.height()),
            egui::vec2(width, marquee.height()),
        );
        let painter = ui.painter_at(strip);
        painter.rect_filled(strip, 0.0, egui::Color32::from_black_alpha(160));

        if let Some(text) = marquee.status().indicator() {
            painter.text(
                strip.center(),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(180),
            );
            return;
        }

        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        for slot in marquee.placements(now) {
            let frame = &marquee.frames()[slot.frame];
            let Some(tex) = self.photo_textures.get(&frame.url) else {
                continue;
            };
            let rect = egui::Rect::from_min_size(
                egui::pos2(strip.left() + slot.x, strip.top()),
                egui::vec2(slot.width, strip.height()),
            );
            painter.image(tex.id(), rect, uv, egui::Color32::WHITE);
        }
    }

    /// Waveform bars in the top-right of `canvas`. Clicking toggles mute.
    pub fn draw_waveform(&mut self, ui: &mut egui::Ui, canvas: egui::Rect) {
        let size = egui::vec2(160.0, 36.0);
        let rect = egui::Rect::from_min_size(
            egui::pos2(canvas.right() - size.x - 12.0, canvas.top() + 12.0),
            size,
        );
        let response = ui.interact(rect, ui.id().with("waveform"), egui::Sense::click());
        if response.clicked() {
            self.deck.playback.toggle_mute();
        }

        let painter = ui.painter_at(rect);
        let color = if self.deck.playback.is_muted() {
            egui::Color32::from_gray(90)
        } else {
            egui::Color32::from_rgb(255, 105, 180)
        };
        let bins = self.visualizer.bins().len().min(32);
        if bins == 0 {
            return;
        }
        let bar_w = rect.width() / bins as f32;
        for i in 0..bins {
            let h = (self.visualizer.bar_scale(i) * rect.height()).min(rect.height());
            let x = rect.left() + i as f32 * bar_w;
            let bar = egui::Rect::from_min_max(
                egui::pos2(x + 1.0, rect.center().y - h * 0.5),
                egui::pos2(x + bar_w - 1.0, rect.center().y + h * 0.5),
            );
            painter.rect_filled(bar, 1.0, color);
        }
        response.on_hover_text(if self.deck.playback.is_muted() {
            "Unmute"
        } else {
            "Mute"
        });
    }
}
