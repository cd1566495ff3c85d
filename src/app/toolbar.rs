//! Toolbar rendering for `AtlasApp`.
//!
//! Zoom buttons, marquee width preset, play/pause, the playback scrubber
//! and the stats toggle. Also hosts the stats side panel.

use eframe::egui;

use subculture_atlas::config::RING_COUNT;

use super::AtlasApp;
use crate::ui::{external_url, format_clock, truncate_str};

impl AtlasApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            if ui
                .add(egui::Button::new("\u{2212}").min_size(egui::vec2(28.0, 24.0)))
                .on_hover_text("Zoom out")
                .clicked()
            {
                self.camera.zoom_out(&mut self.scheduler);
            }
            if ui
                .add(egui::Button::new("+").min_size(egui::vec2(28.0, 24.0)))
                .on_hover_text("Zoom in")
                .clicked()
            {
                self.camera.zoom_in(&mut self.scheduler);
            }
            ui.label(format!("{:.0}%", self.camera.scale() * 100.0));

            ui.separator();

            // Marquee width preset
            let widths = &self.config.marquee_widths;
            if !widths.is_empty() {
                let current = widths[self.width_idx % widths.len()];
                if ui
                    .add_enabled(
                        self.deck.has_media(),
                        egui::Button::new(format!("{:.0}px", current)),
                    )
                    .on_hover_text("Photo strip width")
                    .clicked()
                {
                    self.width_idx = self.deck.cycle_width(widths, self.width_idx);
                }
            }

            ui.separator();

            // Play / pause
            let label = if self.deck.is_running() { "\u{275A}\u{275A}" } else { "\u{25B6}" };
            if ui
                .add_enabled(
                    self.deck.has_media(),
                    egui::Button::new(label).min_size(egui::vec2(32.0, 24.0)),
                )
                .clicked()
            {
                self.deck.toggle_play(now);
            }

            // Scrubber
            let playback = &mut self.deck.playback;
            let mut progress = playback.progress();
            let scrubber = ui.add_enabled(
                playback.is_open(),
                egui::Slider::new(&mut progress, 0.0..=1.0).show_value(false),
            );
            if scrubber.changed() {
                playback.seek(progress);
            }
            ui.monospace(format!(
                "{} / {}",
                format_clock(playback.position()),
                format_clock(playback.duration())
            ));

            if let (Some(src), Some(source)) = (playback.source(), &self.source) {
                ui.hyperlink_to(
                    format!("{} \u{2197}", truncate_str(src, 32)),
                    external_url(source, src),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut self.show_stats, "Stats");
            });
        });
    }

    pub fn draw_stats_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Taxonomy");
        ui.separator();

        if let Some(atlas) = &self.atlas {
            ui.label(format!("Nodes: {}", atlas.node_count()));
            ui.label(format!("Edges: {}", atlas.edge_count()));
            for ring in 0..RING_COUNT {
                ui.label(format!("Ring {}: {}", ring, atlas.ring_counts[ring]));
            }
        } else if self.loading {
            ui.spinner();
        }

        ui.separator();
        ui.heading("Camera");
        ui.label(format!("Scale: {:.3}", self.camera.scale()));
        let pan = self.camera.pan();
        ui.label(format!("Pan: ({:.0}, {:.0})", pan.x, pan.y));
        if self.camera.is_focusing() {
            ui.colored_label(egui::Color32::from_rgb(100, 150, 255), "Focusing");
        }
        ui.label(format!("Frame tasks: {}", self.scheduler.live_count()));

        ui.separator();
        ui.heading("Media");
        ui.label(format!("State: {}", self.coordinator.state().label()));
        if let (Some(id), Some(atlas)) = (self.coordinator.active(), &self.atlas) {
            if let Some(node) = atlas.taxonomy.get(id) {
                ui.label(format!("Active: {}", node.name));
            }
        }
        ui.label(format!("Marquee: {:?}", self.deck.marquee.status()));
        ui.label(format!(
            "Photos: {} loaded, {} batches in flight",
            self.photo_textures.len(),
            self.image_loader.in_flight()
        ));
        if let Some(catalog) = &self.catalog {
            let manifest = if catalog.manifest().is_loaded() { "loaded" } else { "pending" };
            ui.label(format!("Manifest: {}", manifest));
        }
        ui.label(format!("Level: {:.2}", self.visualizer.level()));
    }
}
