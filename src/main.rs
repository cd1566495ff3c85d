mod app;
mod ui;

use eframe::egui;

use subculture_atlas::config::AtlasConfig;

use app::AtlasApp;

fn main() {
    env_logger::init();

    let config = AtlasConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Subculture Atlas"),
        ..Default::default()
    };

    eframe::run_native(
        "Subculture Atlas",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(AtlasApp::new(config)))
        }),
    )
    .expect("Failed to start Subculture Atlas");
}
