//! Application entry point — Reclist Generator GUI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Resolve file locations against the working directory.
//! 3. Load the settings file (writes defaults on first run).
//! 4. Initialise translations (creates `lang/*.json` on first run).
//! 5. Run [`eframe::run_native`] — blocks until the window is closed.

use eframe::egui;
use reclist_gen_gui::{
    app::{install_cjk_font, ReclistApp},
    config::{AppPaths, Settings},
    i18n::TranslationStore,
};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Reclist Generator GUI starting up");

    let paths = AppPaths::new();

    let settings = Settings::load_from(&paths.settings_file).unwrap_or_else(|e| {
        log::warn!("failed to load settings ({e:#}); using defaults");
        Settings::default()
    });

    let mut translations = TranslationStore::new(paths.lang_dir.clone());
    translations.preload_all();
    let title = translations.get("title");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 700.0])
            .with_resizable(false),
        ..Default::default()
    };

    let app = ReclistApp::new(paths, translations, settings);

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            install_cjk_font(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
