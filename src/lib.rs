//! Reclist Generator GUI — configuration front-end for the external
//! `reclist-gen-cvvc` recording-list/OTO generator.
//!
//! The app itself generates nothing: it edits and persists the settings file
//! the generator consumes ([`config`]), localizes the UI ([`i18n`]), and
//! spawns the generator process ([`generator`]). The egui window lives in
//! [`app`].

pub mod app;
pub mod config;
pub mod generator;
pub mod i18n;
