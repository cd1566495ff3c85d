//! `AtlasApp`: the top-level egui application state.
//!
//! This module declares the `AtlasApp` struct, its constructor and the
//! background load. Methods are split across the sibling sub-modules:
//!
//! - `toolbar`: zoom, width preset, playback and stats controls
//! - `content`: the diagram canvas and its input handling
//! - `media`: the media sink, marquee strip and waveform

pub mod content;
pub mod media;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::{mpsc, Arc};

use eframe::egui;

use subculture_atlas::config::AtlasConfig;
use subculture_atlas::engine::pipeline::{Atlas, AtlasEngine};
use subculture_atlas::error::{AtlasError, Result};
use subculture_atlas::media::analyser::{SyntheticAnalyser, Visualizer};
use subculture_atlas::media::coordinator::MediaCoordinator;
use subculture_atlas::media::lookup::{MediaCatalog, NameMaps};
use subculture_atlas::net::fetch::AssetSource;
use subculture_atlas::net::image::ImageLoader;
use subculture_atlas::net::manifest::PhotoManifest;
use subculture_atlas::render::animator::FrameScheduler;
use subculture_atlas::render::camera::Camera;

use media::MediaDeck;

type Loaded = Result<(Atlas, NameMaps)>;

pub struct AtlasApp {
    pub config: AtlasConfig,
    pub source: Option<AssetSource>,
    pub atlas: Option<Atlas>,
    pub catalog: Option<MediaCatalog>,
    pub error: Option<String>,
    pub loading: bool,
    pub load_rx: Option<mpsc::Receiver<Loaded>>,
    pub camera: Camera,
    pub scheduler: FrameScheduler,
    pub coordinator: MediaCoordinator,
    pub deck: MediaDeck,
    pub image_loader: ImageLoader,
    pub photo_textures: HashMap<String, egui::TextureHandle>,
    pub analyser: SyntheticAnalyser,
    pub visualizer: Visualizer,
    pub width_idx: usize,
    pub show_stats: bool,
}

impl AtlasApp {
    /// A config error is shown in place of the diagram; defaults keep the
    /// rest of the shell usable.
    pub fn new(config: Result<AtlasConfig>) -> Self {
        let (config, error) = match config {
            Ok(c) => (c, None),
            Err(e) => {
                log::error!("config: {}", e);
                (AtlasConfig::default(), Some(e.to_string()))
            }
        };

        let mut scheduler = FrameScheduler::new();
        let mut visualizer = Visualizer::new(config.analyser_bins);
        visualizer.start(&mut scheduler);

        let width = config.marquee_widths.first().copied().unwrap_or(480.0);
        let mut app = Self {
            camera: Camera::from_config(&config),
            deck: MediaDeck::new(&config, width),
            image_loader: ImageLoader::new((config.marquee_height * 2.0) as u32),
            source: None,
            atlas: None,
            catalog: None,
            error,
            loading: false,
            load_rx: None,
            scheduler,
            coordinator: MediaCoordinator::new(),
            photo_textures: HashMap::new(),
            analyser: SyntheticAnalyser::new(),
            visualizer,
            width_idx: 0,
            show_stats: false,
            config,
        };
        if app.error.is_none() {
            app.start_load();
        }
        app
    }

    fn start_load(&mut self) {
        let source = match AssetSource::parse(&self.config.asset_root) {
            Ok(s) => s,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };

        let manifest = Arc::new(PhotoManifest::new(
            source.clone(),
            &self.config.manifest_file,
            &self.config.photo_root,
        ));
        // Fetch the manifest off the UI thread so the first click does not
        // block on it.
        let warm = Arc::clone(&manifest);
        std::thread::spawn(move || {
            warm.entries();
        });

        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        let thread_source = source.clone();
        std::thread::spawn(move || {
            let engine = AtlasEngine::new(config.clone());
            let result = engine
                .load(&thread_source)
                .map(|atlas| (atlas, NameMaps::load(&thread_source, &config)));
            let _ = tx.send(result);
        });

        self.source = Some(source);
        self.catalog = Some(MediaCatalog::new(NameMaps::default(), manifest));
        self.load_rx = Some(rx);
        self.loading = true;
    }

    pub fn check_load(&mut self) {
        let Some(rx) = &self.load_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(AtlasError::Config(String::from("loader thread exited")))
            }
        };
        self.load_rx = None;
        self.loading = false;

        match result {
            Ok((atlas, maps)) => {
                if let Some(catalog) = &mut self.catalog {
                    catalog.maps = maps;
                }
                self.atlas = Some(atlas);
                self.error = None;
            }
            Err(e) => {
                log::error!("loading taxonomy: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Push queued photo loads to the loader and take finished batches.
    pub fn pump_photos(&mut self, ctx: &egui::Context, now: f64) {
        for request in self.deck.pending_loads.drain(..) {
            self.image_loader.submit(request);
        }

        for batch in self.image_loader.poll() {
            let Some(photos) = self.deck.marquee.accept(batch, now) else {
                continue;
            };
            // A fresh batch replaces the strip's textures wholesale.
            self.photo_textures.clear();
            for (url, data) in photos {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [data.width as usize, data.height as usize],
                    &data.rgba,
                );
                let tex = ctx.load_texture(
                    format!("photo_{}", url),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                self.photo_textures.insert(url, tex);
            }
        }

        if self.deck.marquee.frames().is_empty() && !self.photo_textures.is_empty() {
            self.photo_textures.clear();
        }
    }

    /// Advance per-frame tasks: playback clock, visualiser, camera tween.
    pub fn tick(&mut self, now: f64, dt: f32) {
        if self.deck.advance(dt) {
            log::debug!("video ended");
            self.coordinator.video_ended(&mut self.deck);
        }

        let level = if self.deck.playback.is_audible() { 1.0 } else { 0.0 };
        self.analyser.set_level(level);
        self.visualizer.frame(&self.scheduler, &mut self.analyser, now);

        self.camera.tick(&mut self.scheduler, now);
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load();

        let (now, dt) = ctx.input(|i| (i.time, i.stable_dt.min(0.1)));
        self.pump_photos(ctx, now);
        self.tick(now, dt);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, now);
        });

        if self.show_stats {
            egui::SidePanel::right("stats")
                .default_width(220.0)
                .show(ctx, |ui| {
                    self.draw_stats_panel(ui);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_rgb(12, 12, 16)))
            .show(ctx, |ui| {
                self.draw_content(ui, now);
            });

        if self.scheduler.live_count() > 0 || self.loading || self.image_loader.in_flight() > 0 {
            ctx.request_repaint();
        }
    }
}
