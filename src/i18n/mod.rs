//! Localization module.
//!
//! [`TranslationStore`] serves per-language message tables loaded from
//! `lang/<code>.json`, synthesizing and persisting built-in defaults when a
//! file is missing. Lookups never fail: an unknown key is returned verbatim.

mod builtin;
mod store;

pub use store::{FormatError, Language, TranslationStore};
