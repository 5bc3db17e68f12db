use circuit_helmet::{app::CircuitApp, config::Settings, sink, APP_NAME};
use eframe::egui;
use eyre::{eyre, WrapErr};
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().wrap_err("loading settings")?;
    let sink = sink::from_settings(&settings).wrap_err("setting up the record sink")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Box::new(CircuitApp::new(cc, &settings, sink))),
    )
    .map_err(|err| eyre!("{err}"))
}
