//! Camera / viewport: pan + uniform zoom over the diagram.
//!
//! `screen = world * scale + pan`, with screen coordinates relative to the
//! viewport's top-left corner. Zoom is anchored on the diagram centre, not
//! on the cursor. Focus animates pan only, over a distance-dependent
//! duration, driven by [`Camera::tick`] once per frame.

use egui::emath::TSTransform;
use egui::{Pos2, Vec2};

use super::animator::{ease_in_out_cos, FrameHandle, FrameScheduler};
use crate::config::AtlasConfig;

/// World-space room kept around the outer ring for leaf labels.
const FRAME_MARGIN: f32 = 100.0;

#[derive(Debug)]
struct FocusTween {
    handle: FrameHandle,
    from: Vec2,
    to: Vec2,
    start: f64,
    duration: f64,
}

#[derive(Debug)]
pub struct Camera {
    scale: f32,
    pan: Vec2,
    viewport: Vec2,
    established: bool,
    /// Fixed diagram centre (world).
    anchor: Pos2,
    /// World diameter the initial framing should fit.
    extent: f32,
    min_scale: f32,
    max_scale: f32,
    target_fill: f32,
    zoom_step: f32,
    focus_min_ms: f32,
    focus_max_ms: f32,
    focus_ms_per_px: f32,
    tween: Option<FocusTween>,
}

impl Camera {
    pub fn from_config(config: &AtlasConfig) -> Self {
        Self {
            scale: 1.0,
            pan: Vec2::ZERO,
            viewport: Vec2::ZERO,
            established: false,
            anchor: Pos2::new(config.center[0], config.center[1]),
            extent: 2.0 * (config.outer_radius() + FRAME_MARGIN),
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            target_fill: config.target_fill,
            zoom_step: config.zoom_step,
            focus_min_ms: config.focus_min_ms,
            focus_max_ms: config.focus_max_ms,
            focus_ms_per_px: config.focus_ms_per_px,
            tween: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    pub fn is_focusing(&self) -> bool {
        self.tween.is_some()
    }

    pub fn focus_handle(&self) -> Option<&FrameHandle> {
        self.tween.as_ref().map(|t| &t.handle)
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    fn cancel_focus(&mut self, sched: &mut FrameScheduler) {
        if let Some(tween) = self.tween.take() {
            sched.cancel(&tween.handle);
        }
    }

    /// Initial/responsive framing: fit the diagram to `target_fill` of the
    /// viewport width and centre it.
    pub fn frame_to_window(&mut self, sched: &mut FrameScheduler, viewport: Vec2) {
        self.cancel_focus(sched);
        self.viewport = viewport;
        self.scale = self.clamp_scale(self.target_fill * viewport.x / self.extent);
        self.pan = viewport * 0.5 - self.anchor.to_vec2() * self.scale;
        self.established = true;
        log::debug!(
            "camera framed to {:.0}x{:.0}, scale {:.3}",
            viewport.x,
            viewport.y,
            self.scale
        );
    }

    /// Multiply scale by `factor` (clamped), keeping the diagram centre
    /// where it is on screen.
    pub fn zoom(&mut self, sched: &mut FrameScheduler, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        self.cancel_focus(sched);
        let anchor_screen = self.world_to_screen(self.anchor);
        self.scale = self.clamp_scale(self.scale * factor);
        self.pan = anchor_screen.to_vec2() - self.anchor.to_vec2() * self.scale;
    }

    pub fn zoom_in(&mut self, sched: &mut FrameScheduler) {
        self.zoom(sched, self.zoom_step);
    }

    pub fn zoom_out(&mut self, sched: &mut FrameScheduler) {
        self.zoom(sched, 1.0 / self.zoom_step);
    }

    /// Drag-pan by a screen delta.
    pub fn pan_by(&mut self, sched: &mut FrameScheduler, delta: Vec2) {
        self.cancel_focus(sched);
        self.pan += delta;
    }

    /// Pan that puts `world` at the viewport centre at the current scale.
    pub fn centering_pan(&self, world: Pos2) -> Vec2 {
        self.viewport * 0.5 - world.to_vec2() * self.scale
    }

    /// Tween length for a pan of `distance_px` screen pixels.
    pub fn focus_duration_ms(&self, distance_px: f32) -> f32 {
        (distance_px * self.focus_ms_per_px).clamp(self.focus_min_ms, self.focus_max_ms)
    }

    /// Start animating towards `world` at the viewport centre. Any tween
    /// already in flight is cancelled first.
    pub fn focus(&mut self, sched: &mut FrameScheduler, world: Pos2, now: f64) {
        self.cancel_focus(sched);
        let to = self.centering_pan(world);
        let duration_ms = self.focus_duration_ms((to - self.pan).length());
        self.tween = Some(FocusTween {
            handle: sched.request(),
            from: self.pan,
            to,
            start: now,
            duration: f64::from(duration_ms) / 1000.0,
        });
    }

    /// Advance the focus tween. Returns `true` while still animating.
    pub fn tick(&mut self, sched: &mut FrameScheduler, now: f64) -> bool {
        let Some(tween) = &self.tween else {
            return false;
        };
        if !sched.is_live(&tween.handle) {
            // Cancelled from outside: drop without applying a step.
            self.tween = None;
            return false;
        }

        let t = if tween.duration > 0.0 {
            ((now - tween.start) / tween.duration).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        if t >= 1.0 {
            self.pan = tween.to;
            self.cancel_focus(sched);
            return false;
        }
        self.pan = tween.from + (tween.to - tween.from) * ease_in_out_cos(t);
        true
    }

    pub fn transform(&self) -> TSTransform {
        TSTransform::new(self.pan, self.scale)
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        self.transform().mul_pos(world)
    }

    /// Invert the current transform. Before the first framing there is no
    /// transform yet, so the diagram centre is returned.
    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        if !self.established || self.scale <= 0.0 {
            return self.anchor;
        }
        self.transform().inverse().mul_pos(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn framed() -> (Camera, FrameScheduler) {
        let mut sched = FrameScheduler::new();
        let mut cam = Camera::from_config(&AtlasConfig::default());
        cam.frame_to_window(&mut sched, vec2(1200.0, 800.0));
        (cam, sched)
    }

    fn near(a: Pos2, b: Pos2) -> bool {
        a.distance(b) < 1e-2
    }

    #[test]
    fn framing_fills_width_and_centres_anchor() {
        let (cam, _) = framed();
        let expected = 0.9 * 1200.0 / (2.0 * (600.0 + FRAME_MARGIN));
        assert!((cam.scale() - expected).abs() < 1e-5);
        assert!(near(cam.world_to_screen(cam.anchor()), pos2(600.0, 400.0)));
    }

    #[test]
    fn framing_respects_scale_bounds() {
        let mut sched = FrameScheduler::new();
        let mut cam = Camera::from_config(&AtlasConfig::default());
        cam.frame_to_window(&mut sched, vec2(10.0, 10.0));
        assert_eq!(cam.scale(), 0.15);
        cam.frame_to_window(&mut sched, vec2(100_000.0, 10.0));
        assert_eq!(cam.scale(), 5.0);
    }

    #[test]
    fn zoom_then_inverse_restores_state() {
        let (mut cam, mut sched) = framed();
        cam.pan_by(&mut sched, vec2(37.0, -12.5));
        let (s0, p0) = (cam.scale(), cam.pan());
        cam.zoom(&mut sched, 1.7);
        assert!((cam.scale() - s0 * 1.7).abs() < 1e-5);
        cam.zoom(&mut sched, 1.0 / 1.7);
        assert!((cam.scale() - s0).abs() < 1e-5);
        assert!((cam.pan() - p0).length() < 1e-3);
    }

    #[test]
    fn zoom_keeps_diagram_centre_fixed() {
        let (mut cam, mut sched) = framed();
        cam.pan_by(&mut sched, vec2(-80.0, 45.0));
        let before = cam.world_to_screen(cam.anchor());
        cam.zoom_in(&mut sched);
        assert!(near(cam.world_to_screen(cam.anchor()), before));
        cam.zoom_out(&mut sched);
        cam.zoom_out(&mut sched);
        assert!(near(cam.world_to_screen(cam.anchor()), before));
    }

    #[test]
    fn zoom_clamps_and_ignores_bad_factors() {
        let (mut cam, mut sched) = framed();
        cam.zoom(&mut sched, 1000.0);
        assert_eq!(cam.scale(), 5.0);
        cam.zoom(&mut sched, 1e-6);
        assert_eq!(cam.scale(), 0.15);
        cam.zoom(&mut sched, 0.0);
        cam.zoom(&mut sched, f32::NAN);
        assert_eq!(cam.scale(), 0.15);
    }

    #[test]
    fn focus_converges_on_viewport_centre() {
        let (mut cam, mut sched) = framed();
        let target = pos2(950.0, 300.0);
        cam.focus(&mut sched, target, 10.0);
        assert!(cam.is_focusing());
        let mut now = 10.0;
        while cam.tick(&mut sched, now) {
            now += 1.0 / 60.0;
            assert!(now < 11.0, "tween never finished");
        }
        assert!(!cam.is_focusing());
        assert!(near(cam.world_to_screen(target), pos2(600.0, 400.0)));
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn focus_duration_is_clamped() {
        let (cam, _) = framed();
        assert_eq!(cam.focus_duration_ms(0.0), 150.0);
        assert_eq!(cam.focus_duration_ms(600.0), 300.0);
        assert_eq!(cam.focus_duration_ms(50_000.0), 600.0);
    }

    #[test]
    fn short_focus_finishes_at_min_duration() {
        let (mut cam, mut sched) = framed();
        let target = cam.anchor() + vec2(1.0, 0.0);
        cam.focus(&mut sched, target, 0.0);
        assert!(cam.tick(&mut sched, 0.1));
        assert!(!cam.tick(&mut sched, 0.15));
        assert!(near(cam.world_to_screen(target), pos2(600.0, 400.0)));
    }

    #[test]
    fn zero_length_focus_lands_without_nan() {
        let mut sched = FrameScheduler::new();
        let mut cam = Camera::from_config(&AtlasConfig {
            focus_min_ms: 0.0,
            focus_max_ms: 0.0,
            ..AtlasConfig::default()
        });
        cam.frame_to_window(&mut sched, vec2(1200.0, 800.0));
        let target = pos2(900.0, 500.0);
        cam.focus(&mut sched, target, 3.0);
        assert!(!cam.tick(&mut sched, 3.0));
        assert!(cam.pan().x.is_finite() && cam.pan().y.is_finite());
        assert!(near(cam.world_to_screen(target), pos2(600.0, 400.0)));
    }

    #[test]
    fn new_focus_cancels_the_old_one() {
        let (mut cam, mut sched) = framed();
        cam.focus(&mut sched, pos2(100.0, 100.0), 0.0);
        let first = cam.focus_handle().unwrap().id();
        cam.tick(&mut sched, 0.05);
        cam.focus(&mut sched, pos2(1200.0, 900.0), 0.05);
        assert_ne!(cam.focus_handle().unwrap().id(), first);
        assert_eq!(sched.live_count(), 1);
        while cam.tick(&mut sched, 10.0) {}
        assert!(near(cam.world_to_screen(pos2(1200.0, 900.0)), pos2(600.0, 400.0)));
    }

    #[test]
    fn cancelled_tween_never_steps_again() {
        let (mut cam, mut sched) = framed();
        cam.focus(&mut sched, pos2(0.0, 0.0), 0.0);
        assert!(cam.tick(&mut sched, 0.05));
        let frozen = cam.pan();
        let handle_live = sched.cancel(cam.focus_handle().unwrap());
        assert!(handle_live);
        assert!(!cam.tick(&mut sched, 0.1));
        assert_eq!(cam.pan(), frozen);
        assert!(!cam.is_focusing());
    }

    #[test]
    fn drag_cancels_focus() {
        let (mut cam, mut sched) = framed();
        cam.focus(&mut sched, pos2(0.0, 0.0), 0.0);
        cam.pan_by(&mut sched, vec2(5.0, 5.0));
        let after_drag = cam.pan();
        assert!(!cam.tick(&mut sched, 0.3));
        assert_eq!(cam.pan(), after_drag);
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn screen_to_world_inverts_and_falls_back() {
        let cam = Camera::from_config(&AtlasConfig::default());
        assert_eq!(cam.screen_to_world(pos2(3.0, 4.0)), cam.anchor());

        let (mut cam, mut sched) = framed();
        cam.zoom(&mut sched, 2.3);
        cam.pan_by(&mut sched, vec2(-40.0, 12.0));
        let world = pos2(812.0, 455.0);
        let back = cam.screen_to_world(cam.world_to_screen(world));
        assert!(back.distance(world) < 1e-2);
    }
}
