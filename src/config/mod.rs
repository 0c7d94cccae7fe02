//! Configuration module.
//!
//! Provides the typed [`Settings`] record with INI persistence via
//! `Settings::load_from` / `Settings::save_to`, and [`AppPaths`] for the
//! working-directory file layout shared with the external generator.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, GENERATOR_SCRIPT, PROJECT_URL, SETTINGS_FILE};
pub use settings::{OtoConfig, ReclistConfig, Settings};
