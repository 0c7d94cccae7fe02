//! Lazy-loading translation store with on-disk defaulting.
//!
//! Each supported language has a `lang/<code>.json` file holding a flat
//! key→text map. A language's table is loaded the first time it is needed and
//! cached for the rest of the process. A missing file is synthesized from the
//! built-in table and written out so translators can hand-edit it; a corrupt
//! file falls back to the built-in table without overwriting the user's file.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::builtin;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// The closed set of supported UI languages, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Chinese (the original UI language).
    Zh,
    /// English.
    En,
}

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    /// The code used for the `lang/<code>.json` file name.
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Name shown in the language menu, in the language itself.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Zh => "中文",
            Language::En => "English",
        }
    }

    /// Look up a language by its code. `None` for anything outside the set.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

// ---------------------------------------------------------------------------
// FormatError
// ---------------------------------------------------------------------------

/// A template's `{}` placeholder count disagreed with the supplied arguments.
///
/// This is a programmer error (the call site and the template drifted apart),
/// so it is propagated rather than swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("template {key:?} has {placeholders} placeholder(s) but {arguments} argument(s) were supplied")]
pub struct FormatError {
    /// The message key whose template mismatched.
    pub key: String,
    /// Number of `{}` placeholders in the stored template.
    pub placeholders: usize,
    /// Number of arguments supplied by the caller.
    pub arguments: usize,
}

// ---------------------------------------------------------------------------
// TranslationStore
// ---------------------------------------------------------------------------

/// Per-language message tables with a current-language pointer.
///
/// Owned by the composition root and handed to whatever needs localized text;
/// all state is explicit, nothing is process-global.
pub struct TranslationStore {
    lang_dir: PathBuf,
    current: Language,
    tables: HashMap<Language, BTreeMap<String, String>>,
}

impl TranslationStore {
    /// Create a store reading tables from `lang_dir`. No file I/O happens
    /// until a table is first needed (or [`preload_all`](Self::preload_all)
    /// is called).
    pub fn new(lang_dir: impl Into<PathBuf>) -> Self {
        Self {
            lang_dir: lang_dir.into(),
            current: Language::Zh,
            tables: HashMap::new(),
        }
    }

    /// The language currently used for lookups.
    pub fn current_language(&self) -> Language {
        self.current
    }

    /// The supported languages with their display names, in menu order.
    pub fn available_languages() -> impl Iterator<Item = (&'static str, &'static str)> {
        Language::ALL.into_iter().map(|l| (l.code(), l.display_name()))
    }

    /// Switch the current language.
    ///
    /// Unknown codes are ignored (the menu only offers valid codes; anything
    /// else is not worth failing over). Switching to the language already
    /// selected changes nothing and touches no files.
    pub fn set_language(&mut self, code: &str) {
        match Language::from_code(code) {
            Some(lang) => self.current = lang,
            None => log::warn!("ignoring unsupported language code {code:?}"),
        }
    }

    /// Load every supported language's table now, creating missing
    /// `lang/<code>.json` files. Called once at startup so that all table
    /// files exist even before the user ever switches language.
    pub fn preload_all(&mut self) {
        for lang in Language::ALL {
            self.ensure_loaded(lang);
        }
    }

    /// Look up `key` in the current language.
    ///
    /// An unknown key comes back as the key itself — a missing translation
    /// degrades the UI text but is never an error.
    pub fn get(&mut self, key: &str) -> String {
        self.ensure_loaded(self.current);
        self.tables[&self.current]
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Look up `key` and fill its positional `{}` placeholders with `args`.
    ///
    /// # Errors
    ///
    /// [`FormatError`] when the template's placeholder count differs from
    /// `args.len()` — callers must keep the two in sync.
    pub fn get_with(&mut self, key: &str, args: &[&str]) -> Result<String, FormatError> {
        let template = self.get(key);
        let placeholders = template.matches("{}").count();
        if placeholders != args.len() {
            return Err(FormatError {
                key: key.to_string(),
                placeholders,
                arguments: args.len(),
            });
        }

        let mut out = String::with_capacity(template.len());
        let mut pieces = template.split("{}");
        if let Some(first) = pieces.next() {
            out.push_str(first);
        }
        for (piece, arg) in pieces.zip(args) {
            out.push_str(arg);
            out.push_str(piece);
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    fn ensure_loaded(&mut self, lang: Language) {
        if self.tables.contains_key(&lang) {
            return;
        }
        let table = self.load_table(lang);
        self.tables.insert(lang, table);
    }

    fn load_table(&self, lang: Language) -> BTreeMap<String, String> {
        let path = self.lang_dir.join(format!("{}.json", lang.code()));

        match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(table) => {
                    log::debug!("loaded translation table {}", path.display());
                    table
                }
                Err(e) => {
                    // Keep the user's file; they may be mid-edit.
                    log::warn!(
                        "translation file {} is invalid JSON ({e}), using built-in table",
                        path.display()
                    );
                    builtin::table(lang)
                }
            },
            Err(_) => {
                let table = builtin::table(lang);
                self.write_table(&path, &table);
                table
            }
        }
    }

    /// Persist a synthesized table so translators have a file to edit.
    /// Failure to write only costs that convenience, so it is logged and
    /// otherwise ignored.
    fn write_table(&self, path: &std::path::Path, table: &BTreeMap<String, String>) {
        let result = fs::create_dir_all(&self.lang_dir)
            .map_err(anyhow::Error::from)
            .and_then(|()| {
                let json = serde_json::to_string_pretty(table)?;
                fs::write(path, json)?;
                Ok(())
            });
        match result {
            Ok(()) => log::info!("wrote default translation table {}", path.display()),
            Err(e) => log::warn!("cannot write translation table {}: {e}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &std::path::Path) -> TranslationStore {
        TranslationStore::new(dir.join("lang"))
    }

    #[test]
    fn preload_creates_table_files_for_all_languages() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());

        store.preload_all();

        for lang in Language::ALL {
            let path = dir.path().join("lang").join(format!("{}.json", lang.code()));
            assert!(path.exists(), "{} missing", path.display());

            let text = std::fs::read_to_string(&path).expect("read");
            let parsed: BTreeMap<String, String> =
                serde_json::from_str(&text).expect("valid JSON");
            for key in builtin::table(lang).keys() {
                assert!(parsed.contains_key(key), "{key} missing from {}", path.display());
            }
        }
    }

    #[test]
    fn unknown_key_falls_back_to_the_key_itself() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());

        for (code, _) in TranslationStore::available_languages() {
            store.set_language(code);
            assert_eq!(store.get("no_such_key"), "no_such_key");
        }
    }

    #[test]
    fn lookup_uses_the_current_language() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());

        store.set_language("en");
        assert_eq!(store.get("browse"), "Browse");

        store.set_language("zh");
        assert_eq!(store.get("browse"), "浏览");
    }

    #[test]
    fn unsupported_language_code_is_a_no_op() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());

        store.set_language("en");
        store.set_language("tlh");
        assert_eq!(store.current_language(), Language::En);
        assert_eq!(store.get("exit"), "Exit");
    }

    #[test]
    fn repeated_switch_to_same_language_does_no_extra_io() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());

        store.set_language("en");
        assert_eq!(store.get("exit"), "Exit");

        // Remove the backing files; the cached table must keep serving and
        // must not be re-read or re-written.
        std::fs::remove_dir_all(dir.path().join("lang")).expect("remove lang dir");
        store.set_language("en");
        assert_eq!(store.get("exit"), "Exit");
        assert!(!dir.path().join("lang").exists());
    }

    #[test]
    fn hand_edited_table_overrides_builtin() {
        let dir = tempdir().expect("temp dir");
        let lang_dir = dir.path().join("lang");
        std::fs::create_dir_all(&lang_dir).expect("mkdir");
        std::fs::write(lang_dir.join("en.json"), r#"{"browse": "Pick..."}"#).expect("write");

        let mut store = store_in(dir.path());
        store.set_language("en");

        assert_eq!(store.get("browse"), "Pick...");
        // Keys dropped by the hand edit degrade to the raw key.
        assert_eq!(store.get("exit"), "exit");
    }

    #[test]
    fn corrupt_table_falls_back_without_overwriting_the_file() {
        let dir = tempdir().expect("temp dir");
        let lang_dir = dir.path().join("lang");
        std::fs::create_dir_all(&lang_dir).expect("mkdir");
        std::fs::write(lang_dir.join("zh.json"), "{ not json").expect("write");

        let mut store = store_in(dir.path());
        assert_eq!(store.get("browse"), "浏览");

        let text = std::fs::read_to_string(lang_dir.join("zh.json")).expect("read");
        assert_eq!(text, "{ not json");
    }

    #[test]
    fn get_with_interpolates_in_order() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());
        store.set_language("en");

        let msg = store
            .get_with("error_message", &["exit status 3"])
            .expect("one arg matches one placeholder");
        assert_eq!(msg, "Error during generation: exit status 3");
    }

    #[test]
    fn get_with_mismatched_argument_count_is_a_format_error() {
        let dir = tempdir().expect("temp dir");
        let mut store = store_in(dir.path());
        store.set_language("en");

        let err = store
            .get_with("error_message", &["a", "b"])
            .expect_err("two args against one placeholder");
        assert_eq!(err.placeholders, 1);
        assert_eq!(err.arguments, 2);

        // Zero-placeholder templates reject any argument.
        assert!(store.get_with("exit", &["x"]).is_err());
        // And accept zero arguments.
        assert_eq!(store.get_with("exit", &[]).as_deref(), Ok("Exit"));
    }
}
