//! Looping photo strip.
//!
//! The strip holds two identical sequences laid back to back. Each sequence
//! repeats the loaded photos cyclically until it spans at least twice the
//! visible width, and the strip scrolls left by one sequence width per loop.
//! Since the second copy starts exactly where the first ends, wrapping the
//! offset back to zero shows the same pixels and the loop has no seam.

use crate::net::image::{ImageData, LoadBatch, LoadRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeStatus {
    Hidden,
    Loading,
    Ready,
    /// The node has no photos.
    Empty,
    /// Every photo failed to load.
    Failed,
}

impl MarqueeStatus {
    /// Passive indicator text, if the status calls for one.
    pub fn indicator(self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading images…"),
            Self::Empty => Some("No images available"),
            Self::Failed => Some("Failed to load images"),
            Self::Hidden | Self::Ready => None,
        }
    }
}

/// A loaded photo, sized for the strip height.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub url: String,
    pub width: f32,
}

/// Where one slot lands on screen, relative to the strip's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub frame: usize,
    pub x: f32,
    pub width: f32,
}

/// Slot order for one sequence: frame indices cycled (`i % len`) until the
/// summed width covers twice `visible_width`.
pub fn build_sequence(widths: &[f32], visible_width: f32) -> Vec<usize> {
    let cycle: f32 = widths.iter().sum();
    if widths.is_empty() || cycle <= 0.0 {
        return Vec::new();
    }
    let target = 2.0 * visible_width.max(0.0);
    let mut slots = Vec::new();
    let mut covered = 0.0;
    let mut i = 0;
    while covered < target || slots.is_empty() {
        let frame = i % widths.len();
        slots.push(frame);
        covered += widths[frame];
        i += 1;
    }
    slots
}

#[derive(Debug)]
pub struct Marquee {
    status: MarqueeStatus,
    node: Option<String>,
    urls: Vec<String>,
    generation: u64,
    visible_width: f32,
    height: f32,
    speed: f32,
    frames: Vec<Frame>,
    sequence: Vec<usize>,
    sequence_width: f32,
    started_at: f64,
    paused_at: Option<f64>,
}

impl Marquee {
    pub fn new(visible_width: f32, height: f32, speed: f32) -> Self {
        Self {
            status: MarqueeStatus::Hidden,
            node: None,
            urls: Vec::new(),
            generation: 0,
            visible_width,
            height,
            speed: speed.max(1.0),
            frames: Vec::new(),
            sequence: Vec::new(),
            sequence_width: 0.0,
            started_at: 0.0,
            paused_at: None,
        }
    }

    pub fn status(&self) -> MarqueeStatus {
        self.status
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn visible_width(&self) -> f32 {
        self.visible_width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn sequence_width(&self) -> f32 {
        self.sequence_width
    }

    /// Seconds for one full loop.
    pub fn loop_duration(&self) -> f32 {
        self.sequence_width / self.speed
    }

    /// Show `node`'s photos. Returns the load to run, or `None` when there
    /// is nothing to load.
    pub fn show(&mut self, node: &str, urls: Vec<String>) -> Option<LoadRequest> {
        self.reset();
        self.node = Some(node.to_string());
        self.urls = urls;
        self.start_load()
    }

    /// Change the visible width. A shown strip is rebuilt from scratch.
    pub fn set_width(&mut self, width: f32) -> Option<LoadRequest> {
        self.visible_width = width.max(0.0);
        if self.node.is_none() {
            return None;
        }
        self.generation += 1;
        self.clear_frames();
        self.start_load()
    }

    /// Clear everything. Loads still in flight are ignored on arrival.
    pub fn hide(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.status = MarqueeStatus::Hidden;
        self.node = None;
        self.urls.clear();
        self.paused_at = None;
        self.clear_frames();
    }

    /// Drops loaded content. A pause survives, so a rebuilt strip stays
    /// in step with the play/pause control.
    fn clear_frames(&mut self) {
        self.frames.clear();
        self.sequence.clear();
        self.sequence_width = 0.0;
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Freeze the scroll at its position at `now`.
    pub fn pause(&mut self, now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Continue scrolling from where `pause` froze it.
    pub fn resume(&mut self, now: f64) {
        if let Some(at) = self.paused_at.take() {
            self.started_at += (now - at).max(0.0);
        }
    }

    fn start_load(&mut self) -> Option<LoadRequest> {
        if self.urls.is_empty() {
            self.status = MarqueeStatus::Empty;
            return None;
        }
        self.status = MarqueeStatus::Loading;
        Some(LoadRequest {
            generation: self.generation,
            urls: self.urls.clone(),
        })
    }

    /// Take a finished batch. Returns the decoded photos for upload, or
    /// `None` when the batch answers an abandoned request.
    pub fn accept(&mut self, batch: LoadBatch, now: f64) -> Option<Vec<(String, ImageData)>> {
        if batch.generation != self.generation || self.status != MarqueeStatus::Loading {
            log::debug!("dropping stale photo batch (generation {})", batch.generation);
            return None;
        }

        self.frames = batch
            .loaded
            .iter()
            .filter(|(_, data)| data.height > 0)
            .map(|(url, data)| Frame {
                url: url.clone(),
                width: data.width as f32 * self.height / data.height as f32,
            })
            .collect();

        if self.frames.is_empty() {
            self.status = MarqueeStatus::Failed;
            return Some(Vec::new());
        }

        let widths: Vec<f32> = self.frames.iter().map(|f| f.width).collect();
        self.sequence = build_sequence(&widths, self.visible_width);
        self.sequence_width = self.sequence.iter().map(|&i| widths[i]).sum();
        self.started_at = now;
        // A strip loaded while paused starts frozen at its first frame.
        if self.paused_at.is_some() {
            self.paused_at = Some(now);
        }
        self.status = MarqueeStatus::Ready;
        log::debug!(
            "marquee ready: {} photos, {} slots, {:.1}s loop",
            self.frames.len(),
            self.sequence.len(),
            self.loop_duration()
        );
        Some(batch.loaded)
    }

    /// Scroll offset at `now`, in [0, sequence_width).
    pub fn offset(&self, now: f64) -> f32 {
        if self.sequence_width <= 0.0 {
            return 0.0;
        }
        let now = self.paused_at.unwrap_or(now);
        let elapsed = (now - self.started_at).max(0.0);
        let travelled = elapsed * f64::from(self.speed);
        travelled.rem_euclid(f64::from(self.sequence_width)) as f32
    }

    /// Slots that intersect the visible window at `now`, from both copies.
    pub fn placements(&self, now: f64) -> Vec<Placement> {
        if self.status != MarqueeStatus::Ready {
            return Vec::new();
        }
        let offset = self.offset(now);
        let mut out = Vec::new();
        let mut x = -offset;
        for _copy in 0..2 {
            for &frame in &self.sequence {
                let width = self.frames[frame].width;
                if x + width > 0.0 && x < self.visible_width {
                    out.push(Placement { frame, x, width });
                }
                x += width;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(w: u32, h: u32) -> ImageData {
        ImageData {
            width: w,
            height: h,
            rgba: vec![0; (w * h * 4) as usize],
        }
    }

    fn batch(generation: u64, sizes: &[(u32, u32)], failed: usize) -> LoadBatch {
        LoadBatch {
            generation,
            loaded: sizes
                .iter()
                .enumerate()
                .map(|(i, &(w, h))| (format!("p{}.jpg", i), data(w, h)))
                .collect(),
            failed,
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{}.jpg", i)).collect()
    }

    #[test]
    fn three_images_wrap_into_eight_slots() {
        let seq = build_sequence(&[100.0, 100.0, 100.0], 400.0);
        assert_eq!(seq, vec![0, 1, 2, 0, 1, 2, 0, 1]);
    }

    #[test]
    fn sequence_degenerate_inputs() {
        assert!(build_sequence(&[], 400.0).is_empty());
        assert!(build_sequence(&[0.0, 0.0], 400.0).is_empty());
        assert_eq!(build_sequence(&[50.0], 0.0), vec![0]);
    }

    #[test]
    fn ready_strip_loops_over_sequence_width() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        assert_eq!(m.status(), MarqueeStatus::Loading);

        let pixels = m.accept(batch(req.generation, &[(100, 100); 3], 0), 10.0).unwrap();
        assert_eq!(pixels.len(), 3);
        assert_eq!(m.status(), MarqueeStatus::Ready);
        assert_eq!(m.sequence().len(), 8);
        assert_eq!(m.sequence_width(), 800.0);
        assert_eq!(m.loop_duration(), 16.0);

        assert_eq!(m.offset(10.0), 0.0);
        assert_eq!(m.offset(12.0), 100.0);
        // One full loop later the strip is back where it started.
        assert!(m.offset(26.0).abs() < 1e-3);
    }

    #[test]
    fn second_copy_follows_first_without_gap() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        m.accept(batch(req.generation, &[(100, 100); 3], 0), 0.0);

        // Near the end of a loop the window straddles both copies.
        let p = m.placements(15.0);
        assert!(!p.is_empty());
        for pair in p.windows(2) {
            assert!((pair[0].x + pair[0].width - pair[1].x).abs() < 1e-3);
        }
        let right = p.last().unwrap();
        assert!(right.x + right.width >= 400.0);
        assert!(p[0].x <= 0.0);
    }

    #[test]
    fn partial_failure_keeps_remaining_photos() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        m.accept(batch(req.generation, &[(200, 100)], 2), 0.0);
        assert_eq!(m.status(), MarqueeStatus::Ready);
        assert_eq!(m.frames().len(), 1);
        assert_eq!(m.frames()[0].width, 200.0);
    }

    #[test]
    fn total_failure_and_empty_sets_settle() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(2)).unwrap();
        assert_eq!(m.accept(batch(req.generation, &[], 2), 0.0).unwrap().len(), 0);
        assert_eq!(m.status(), MarqueeStatus::Failed);
        assert_eq!(m.status().indicator(), Some("Failed to load images"));

        assert!(m.show("Punk", Vec::new()).is_none());
        assert_eq!(m.status(), MarqueeStatus::Empty);
        assert_eq!(m.status().indicator(), Some("No images available"));
    }

    #[test]
    fn stale_batches_are_ignored() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let first = m.show("Goth", urls(3)).unwrap();
        let second = m.show("Punk", urls(1)).unwrap();
        assert_ne!(first.generation, second.generation);
        assert!(m.accept(batch(first.generation, &[(100, 100); 3], 0), 0.0).is_none());
        assert_eq!(m.status(), MarqueeStatus::Loading);
        assert_eq!(m.node(), Some("Punk"));
    }

    #[test]
    fn width_change_rebuilds_current_node() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        m.accept(batch(req.generation, &[(100, 100); 3], 0), 0.0);

        let rebuild = m.set_width(200.0).unwrap();
        assert_eq!(rebuild.urls, urls(3));
        assert_eq!(m.status(), MarqueeStatus::Loading);
        assert!(m.frames().is_empty());
        assert!(m.accept(batch(req.generation, &[(100, 100); 3], 0), 0.0).is_none());

        m.accept(batch(rebuild.generation, &[(100, 100); 3], 0), 0.0);
        assert_eq!(m.sequence().len(), 4);
    }

    #[test]
    fn pause_freezes_scroll() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        m.accept(batch(req.generation, &[(100, 100); 3], 0), 0.0);
        m.pause(2.0);
        assert!(m.is_paused());
        assert_eq!(m.offset(5.0), 100.0);
        m.resume(5.0);
        assert_eq!(m.offset(6.0), 150.0);
    }

    #[test]
    fn width_change_while_paused_stays_paused() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        m.accept(batch(req.generation, &[(100, 100); 3], 0), 0.0);
        m.pause(1.0);

        let rebuild = m.set_width(200.0).unwrap();
        assert!(m.is_paused());
        m.accept(batch(rebuild.generation, &[(100, 100); 3], 0), 2.0);
        assert!(m.is_paused());
        assert_eq!(m.offset(2.0), 0.0);
        assert_eq!(m.offset(4.0), 0.0);

        m.resume(4.0);
        assert_eq!(m.offset(6.0), 100.0);
    }

    #[test]
    fn showing_a_new_node_clears_pause() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        m.show("Goth", urls(3));
        m.pause(1.0);
        m.show("Punk", urls(1));
        assert!(!m.is_paused());
        m.pause(2.0);
        m.hide();
        assert!(!m.is_paused());
    }

    #[test]
    fn hide_resets_and_blocks_late_loads() {
        let mut m = Marquee::new(400.0, 100.0, 50.0);
        let req = m.show("Goth", urls(3)).unwrap();
        m.hide();
        assert_eq!(m.status(), MarqueeStatus::Hidden);
        assert_eq!(m.node(), None);
        assert!(m.set_width(600.0).is_none());
        assert!(m.accept(batch(req.generation, &[(100, 100); 3], 0), 0.0).is_none());
        assert!(m.frames().is_empty());
        assert!(m.placements(1.0).is_empty());
    }
}
