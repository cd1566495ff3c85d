//! Diagram canvas for `AtlasApp`.
//!
//! - `draw_content`: spinner / error / canvas dispatcher
//! - `handle_input`: drag pan, wheel zoom, clicks
//! - `paint_diagram`: edges, nodes and labels in screen space

use std::collections::HashSet;

use eframe::egui;
use eframe::egui::{Color32, Pos2, Rect, Stroke};

use subculture_atlas::media::color::{lighten, NEUTRAL};
use subculture_atlas::media::coordinator::ClickAway;
use subculture_atlas::render::layout::label_anchor;
use subculture_atlas::taxonomy::NodeId;

use super::AtlasApp;
use crate::ui::{paint_cubic, paint_label};

/// Labels smaller than this on screen are skipped.
const MIN_LABEL_PX: f32 = 5.0;
/// Click tolerance around a node disc, in screen pixels.
const HIT_SLOP_PX: f32 = 3.0;

impl AtlasApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, now: f64) {
        if let Some(error) = &self.error {
            ui.centered_and_justified(|ui| {
                ui.colored_label(Color32::from_rgb(255, 80, 80), error);
            });
            return;
        }
        if self.atlas.is_none() {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas = response.rect;
        if canvas.size() != self.camera.viewport() {
            self.camera.frame_to_window(&mut self.scheduler, canvas.size());
        }

        self.handle_input(ui, &response, canvas, now);
        self.paint_diagram(&painter, canvas);
        self.draw_marquee(ui, canvas, now);
        self.draw_waveform(ui, canvas);
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, canvas: Rect, now: f64) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.camera.pan_by(&mut self.scheduler, delta);
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom(&mut self.scheduler, (scroll * 0.002).exp());
            }
            if let Some(pointer) = response.hover_pos() {
                let world = self.camera.screen_to_world(pointer - canvas.min.to_vec2());
                if self.interactive_at(world).is_some() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
            }
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let world = self.camera.screen_to_world(pointer - canvas.min.to_vec2());
                self.handle_click(world, now);
            }
        }
    }

    fn node_at(&self, world: Pos2) -> Option<NodeId> {
        let atlas = self.atlas.as_ref()?;
        let slop = HIT_SLOP_PX / self.camera.scale();
        atlas
            .taxonomy
            .hit_test(world, &self.config.node_radii, slop, |_| true)
    }

    fn interactive_at(&self, world: Pos2) -> Option<NodeId> {
        let (atlas, catalog) = (self.atlas.as_ref()?, self.catalog.as_ref()?);
        let slop = HIT_SLOP_PX / self.camera.scale();
        atlas.taxonomy.hit_test(world, &self.config.node_radii, slop, |n| {
            catalog.maps.is_interactive(&n.name)
        })
    }

    /// Interactive node → media. Plain node → focus on it. Background →
    /// close the open session, or focus the clicked point when idle.
    fn handle_click(&mut self, world: Pos2, now: f64) {
        let (Some(atlas), Some(catalog)) = (&self.atlas, &self.catalog) else {
            return;
        };

        if let Some(id) = self.interactive_at(world) {
            let name = &atlas.taxonomy.node(id).name;
            self.coordinator.click_node(id, name, catalog, &mut self.deck);
            return;
        }

        if let Some(id) = self.node_at(world) {
            let pos = atlas.taxonomy.node(id).pos;
            self.camera.focus(&mut self.scheduler, pos, now);
            return;
        }

        if self.coordinator.click_away(&mut self.deck) == ClickAway::Recenter {
            self.camera.focus(&mut self.scheduler, world, now);
        }
    }

    fn paint_diagram(&self, painter: &egui::Painter, canvas: Rect) {
        let Some(atlas) = &self.atlas else {
            return;
        };
        let maps = self.catalog.as_ref().map(|c| &c.maps);
        let color_of = |name: &str| maps.and_then(|m| m.color(name));
        let to_screen = |p: Pos2| canvas.min + self.camera.world_to_screen(p).to_vec2();
        let scale = self.camera.scale();
        let tax = &atlas.taxonomy;

        // The active node and its ancestors, for highlighting the path in.
        let active = self.deck.active;
        let lit: HashSet<NodeId> = active
            .map(|id| {
                let mut chain = tax.ancestors(id);
                chain.push(id);
                chain.into_iter().collect()
            })
            .unwrap_or_default();
        let active_color = active
            .and_then(|id| color_of(&tax.node(id).name))
            .unwrap_or(Color32::WHITE);

        for edge in &atlas.edges {
            let stroke = if lit.contains(&edge.child) {
                Stroke::new(2.0, active_color)
            } else {
                Stroke::new(1.0, Color32::from_gray(70))
            };
            for segment in &edge.segments {
                paint_cubic(painter, segment.points.map(&to_screen), stroke);
            }
        }

        for (id, node) in tax.iter() {
            let color = color_of(&node.name);
            let fill = color.unwrap_or(NEUTRAL);
            let depth = node.depth() as usize;
            let r = self.config.node_radii[depth.min(self.config.node_radii.len() - 1)] * scale;
            let center = to_screen(node.pos);

            if active == Some(id) {
                let ring = Stroke::new(2.0, Color32::WHITE);
                painter.circle(center, r * 1.4, lighten(fill, 0.3), ring);
            } else {
                painter.circle_filled(center, r, fill);
            }

            let font = (if depth == 0 { 14.0 } else { 10.0 }) * scale;
            if font < MIN_LABEL_PX {
                continue;
            }
            let mut anchor = label_anchor(node, &atlas.geometry, self.config.label_offset);
            anchor.pos = to_screen(anchor.pos);
            let text_color = color.unwrap_or(Color32::from_gray(150));
            paint_label(painter, &anchor, r + 2.0, &node.name, font, text_color);
        }
    }
}
