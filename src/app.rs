//! Reclist Generator window — egui/eframe application.
//!
//! # Architecture
//!
//! [`ReclistApp`] owns the composition-root state: the [`TranslationStore`],
//! the [`AppPaths`], and a draft [`Settings`] record that the widgets edit in
//! place. The draft is committed to disk only on the two explicit commit
//! points the original tool has:
//!
//! * **Start Generation** — save, then spawn the generator on a worker
//!   thread; the [`GenerationResult`] comes back over an mpsc channel so the
//!   event loop never blocks on the external process.
//! * **Exit** — save on window close.
//!
//! Every label is pulled from the [`TranslationStore`] each frame, so a
//! language switch repaints the whole UI with no extra bookkeeping.

use std::sync::mpsc;

use eframe::egui;

use crate::config::{AppPaths, Settings, PROJECT_URL};
use crate::generator::{GenerationInvoker, GenerationResult};
use crate::i18n::TranslationStore;

// ---------------------------------------------------------------------------
// ReclistApp
// ---------------------------------------------------------------------------

/// eframe application — the generator configuration window.
pub struct ReclistApp {
    /// Resolved file locations (settings file, lang dir, readme).
    paths: AppPaths,
    /// Message tables + current language.
    translations: TranslationStore,
    /// The record the widgets edit; written to disk on commit points only.
    draft: Settings,
    /// Receiver for the in-flight generation, if any.
    generation_rx: Option<mpsc::Receiver<GenerationResult>>,
    /// Localized (title, body) of the currently shown message dialog.
    dialog: Option<(String, String)>,
}

impl ReclistApp {
    /// Build the app from already-initialized stores.
    pub fn new(paths: AppPaths, translations: TranslationStore, settings: Settings) -> Self {
        Self {
            paths,
            translations,
            draft: settings,
            generation_rx: None,
            dialog: None,
        }
    }

    /// True while a generator run is in flight.
    fn is_generating(&self) -> bool {
        self.generation_rx.is_some()
    }

    // ── Commit points ────────────────────────────────────────────────────

    /// Flush the draft record to disk.
    fn commit_settings(&self) {
        if let Err(e) = self.draft.save_to(&self.paths.settings_file) {
            // Losing a save is bad but not fatal; the draft stays editable.
            log::error!("failed to save settings: {e:#}");
        }
    }

    /// Save settings, then hand the invocation to a worker thread.
    fn start_generation(&mut self) {
        self.commit_settings();

        let invoker = GenerationInvoker::new(&self.paths);
        let (tx, rx) = mpsc::channel();
        self.generation_rx = Some(rx);

        std::thread::Builder::new()
            .name("generation".into())
            .spawn(move || {
                let _ = tx.send(invoker.run());
            })
            .expect("failed to spawn generation thread");
    }

    /// Poll the worker channel and turn a finished run into a dialog.
    fn poll_generation(&mut self) {
        let Some(rx) = &self.generation_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => GenerationResult::UnexpectedFailure(
                "generation thread ended without reporting a result".into(),
            ),
        };
        self.generation_rx = None;

        let t = &mut self.translations;
        self.dialog = Some(match result {
            GenerationResult::Success => {
                (t.get("generation_success"), t.get("success_message"))
            }
            GenerationResult::ProcessFailure(code) => {
                let detail = format!("exit status {code}");
                (
                    t.get("generation_failed"),
                    localized_failure(t, "error_message", &detail),
                )
            }
            GenerationResult::UnexpectedFailure(detail) => (
                t.get("generation_failed"),
                localized_failure(t, "unknown_error", &detail),
            ),
        });
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_menu_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(self.translations.get("menu_language"), |ui| {
                let current = self.translations.current_language();
                let mut selected = None;
                for (code, name) in TranslationStore::available_languages() {
                    if ui.radio(code == current.code(), name).clicked() {
                        selected = Some(code);
                        ui.close_menu();
                    }
                }
                if let Some(code) = selected {
                    self.translations.set_language(code);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(
                        self.translations.get("title"),
                    ));
                }
            });

            ui.menu_button(self.translations.get("menu_help"), |ui| {
                if ui.button(self.translations.get("menu_readme")).clicked() {
                    self.open_readme();
                    ui.close_menu();
                }
                if ui.button(self.translations.get("menu_github")).clicked() {
                    if let Err(e) = webbrowser::open(PROJECT_URL) {
                        log::warn!("cannot open project page: {e}");
                    }
                    ui.close_menu();
                }
            });
        });
    }

    fn draw_path_settings(&mut self, ui: &mut egui::Ui) {
        let heading = self.translations.get("path_settings");
        ui.group(|ui| {
            ui.strong(heading);

            let input_label = self.translations.get("input_file_path");
            let browse = self.translations.get("browse");
            ui.horizontal(|ui| {
                ui.label(input_label);
                ui.text_edit_singleline(&mut self.draft.reclist.input_path);
                if ui.button(&browse).clicked() {
                    if let Some(file) = rfd::FileDialog::new()
                        .add_filter("INI Files", &["ini"])
                        .pick_file()
                    {
                        self.draft.reclist.input_path = file.display().to_string();
                    }
                }
            });

            let reclist_label = self.translations.get("reclist_output_path");
            ui.horizontal(|ui| {
                ui.label(reclist_label);
                ui.text_edit_singleline(&mut self.draft.reclist.reclist_output_path);
                if ui.button(&browse).clicked() {
                    if let Some(file) = rfd::FileDialog::new()
                        .add_filter("Text Files", &["txt"])
                        .save_file()
                    {
                        self.draft.reclist.reclist_output_path = file.display().to_string();
                    }
                }
            });

            let oto_label = self.translations.get("oto_output_path");
            ui.horizontal(|ui| {
                ui.label(oto_label);
                ui.text_edit_singleline(&mut self.draft.oto.oto_output_path);
                if ui.button(&browse).clicked() {
                    if let Some(file) = rfd::FileDialog::new()
                        .add_filter("INI Files", &["ini"])
                        .save_file()
                    {
                        self.draft.oto.oto_output_path = file.display().to_string();
                    }
                }
            });
        });
    }

    fn draw_reclist_settings(&mut self, ui: &mut egui::Ui) {
        let heading = self.translations.get("reclist_settings");
        ui.group(|ui| {
            ui.strong(heading);

            let length_label = self.translations.get("length_per_line");
            ui.horizontal(|ui| {
                ui.label(length_label);
                ui.add(int_field(&mut self.draft.reclist.length, 1..=20));
            });

            let cv_head = self.translations.get("include_cv_head");
            let vv = self.translations.get("include_vv");
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.draft.reclist.include_cv_head, cv_head);
                ui.checkbox(&mut self.draft.reclist.include_vv, vv);
            });

            let underbar = self.translations.get("use_underbar");
            let planb = self.translations.get("planb");
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.draft.reclist.use_underbar, underbar);
                ui.checkbox(&mut self.draft.reclist.use_planb, planb);
            });
        });
    }

    fn draw_oto_settings(&mut self, ui: &mut egui::Ui) {
        let heading = self.translations.get("oto_settings");
        ui.group(|ui| {
            ui.strong(heading);

            let cv_label = self.translations.get("max_same_cv");
            ui.horizontal(|ui| {
                ui.label(cv_label);
                ui.add(int_field(&mut self.draft.oto.max_of_same_cv, 1..=10));
            });

            let vc_label = self.translations.get("max_same_vc");
            ui.horizontal(|ui| {
                ui.label(vc_label);
                ui.add(int_field(&mut self.draft.oto.max_of_same_vc, 1..=10));
            });

            let blank_label = self.translations.get("preset_blank");
            ui.horizontal(|ui| {
                ui.label(blank_label);
                ui.add(int_field(&mut self.draft.oto.preset_blank, 0..=5000));
            });

            let bpm_label = self.translations.get("bpm");
            ui.horizontal(|ui| {
                ui.label(bpm_label);
                ui.add(int_field(&mut self.draft.oto.bpm, 60..=200));
            });

            let vccv = self.translations.get("divide_vccv");
            ui.checkbox(&mut self.draft.oto.devide_vccv, vccv);
        });
    }

    fn draw_buttons(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if ui.button(self.translations.get("exit")).clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = self.translations.get("start_generation");
                let button = ui.add_enabled(!self.is_generating(), egui::Button::new(label));
                if button.clicked() {
                    self.start_generation();
                }
                if self.is_generating() {
                    ui.spinner();
                }
            });
        });
    }

    fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some((title, body)) = self.dialog.clone() else {
            return;
        };
        let mut close = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(body);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            });

        if close {
            self.dialog = None;
        }
    }

    // ── OS integration ───────────────────────────────────────────────────

    /// Open the bundled readme with the OS default handler. Fire-and-forget.
    fn open_readme(&self) {
        if !self.paths.readme_file.exists() {
            log::warn!("readme not found at {}", self.paths.readme_file.display());
            return;
        }
        if let Err(e) = open::that(&self.paths.readme_file) {
            log::warn!("cannot open readme: {e}");
        }
    }
}

impl eframe::App for ReclistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_generation();

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            self.draw_menu_bar(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_path_settings(ui);
            ui.add_space(8.0);
            self.draw_reclist_settings(ui);
            ui.add_space(8.0);
            self.draw_oto_settings(ui);
            ui.add_space(12.0);
            self.draw_buttons(ui, ctx);
        });

        self.draw_dialog(ctx);

        // The worker thread cannot wake the event loop, so keep polling at a
        // low rate while a run is in flight.
        if self.is_generating() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.commit_settings();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Numeric entry clamped to the widget range for user input, but showing a
/// hand-edited out-of-range value from the file untouched.
fn int_field(value: &mut i64, range: std::ops::RangeInclusive<i64>) -> egui::DragValue<'_> {
    egui::DragValue::new(value)
        .range(range)
        .clamp_existing_to_range(false)
        .speed(1)
}

/// Localize a failure message, interpolating `detail`.
///
/// A placeholder/argument mismatch here means the template on disk was edited
/// out of sync with the code; log it loudly and fall back to the raw detail
/// so the user still sees what happened.
fn localized_failure(t: &mut TranslationStore, key: &str, detail: &str) -> String {
    match t.get_with(key, &[detail]) {
        Ok(msg) => msg,
        Err(e) => {
            log::error!("translation template mismatch: {e}");
            detail.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Install a CJK-capable font so the Chinese UI renders.
///
/// egui's bundled fonts have no CJK coverage, so we look for a well-known
/// system font and prepend it to the proportional family. If none is found
/// the UI still runs, just with tofu for Chinese labels.
pub fn install_cjk_font(ctx: &egui::Context) {
    const CANDIDATES: &[&str] = &[
        // Windows
        "C:\\Windows\\Fonts\\msyh.ttc",
        "C:\\Windows\\Fonts\\simhei.ttf",
        // macOS
        "/System/Library/Fonts/PingFang.ttc",
        "/System/Library/Fonts/STHeiti Light.ttc",
        // Linux
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    ];

    for path in CANDIDATES {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        log::info!("using CJK font {path}");

        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("cjk".into(), egui::FontData::from_owned(bytes).into());
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .insert(0, "cjk".into());
        }
        ctx.set_fonts(fonts);
        return;
    }

    log::warn!("no CJK font found; Chinese labels will not render correctly");
}
