//! Typed settings record and INI persistence.
//!
//! The settings file is the wire contract with the external generator: two
//! sections, `[RECLIST]` and `[OTOSET]`, with booleans written as the literal
//! strings `True`/`False` and integers as plain decimal text. Paths are
//! written exactly as the user typed them — no normalization, no quoting.
//!
//! Range limits (e.g. `length` 1–20) are enforced by the input widgets only.
//! `load` deliberately accepts out-of-range persisted values as-is so that a
//! hand-edited file reaches the generator unchanged; only text that does not
//! parse at all falls back to the field default.

use std::path::Path;

use anyhow::{Context, Result};
use ini::{EscapePolicy, Ini, ParseOption};

const RECLIST_SECTION: &str = "RECLIST";
const OTOSET_SECTION: &str = "OTOSET";

// Paths may contain backslashes and quotes; take them verbatim in both
// directions.
const PARSE_OPTION: ParseOption = ParseOption {
    enabled_quote: false,
    enabled_escape: false,
    enabled_indented_mutiline_value: false,
    enabled_preserve_key_leading_whitespace: false,
};

// ---------------------------------------------------------------------------
// ReclistConfig
// ---------------------------------------------------------------------------

/// The `[RECLIST]` section — what to generate and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclistConfig {
    /// Source presamp file consumed by the generator.
    pub input_path: String,
    /// Where the generated recording list is written.
    pub reclist_output_path: String,
    /// Entries per reclist line (widget range 1–20).
    pub length: i64,
    /// Generate a head entry for every CV.
    pub include_cv_head: bool,
    /// Generate every VV connection.
    pub include_vv: bool,
    /// Separate entries with underbars.
    pub use_underbar: bool,
    /// Use the alternative arrangement scheme.
    pub use_planb: bool,
}

impl Default for ReclistConfig {
    fn default() -> Self {
        Self {
            input_path: "./presamp.ini".into(),
            reclist_output_path: "Reclist.txt".into(),
            length: 8,
            include_cv_head: true,
            include_vv: true,
            use_underbar: true,
            use_planb: false,
        }
    }
}

// ---------------------------------------------------------------------------
// OtoConfig
// ---------------------------------------------------------------------------

/// The `[OTOSET]` section — oto.ini generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtoConfig {
    /// Where the generated oto.ini is written.
    pub oto_output_path: String,
    /// Maximum entries per identical CV (widget range 1–10).
    pub max_of_same_cv: i64,
    /// Maximum entries per identical VC (widget range 1–10).
    pub max_of_same_vc: i64,
    /// Leading blank in milliseconds (widget range 0–5000).
    pub preset_blank: i64,
    /// Recording tempo (widget range 60–200).
    pub bpm: i64,
    /// Split VCCV entries.
    pub devide_vccv: bool,
}

impl Default for OtoConfig {
    fn default() -> Self {
        Self {
            oto_output_path: "oto.ini".into(),
            max_of_same_cv: 1,
            max_of_same_vc: 1,
            preset_blank: 1250,
            bpm: 130,
            devide_vccv: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Top-level settings record, persisted as `reclist-gen-cvvc.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// `[RECLIST]` section.
    pub reclist: ReclistConfig,
    /// `[OTOSET]` section.
    pub oto: OtoConfig,
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing file yields the default record, which is written back
    /// immediately so the generator always finds a settings file on disk. A
    /// file that cannot be parsed as INI at all yields the defaults without
    /// touching the file (the next save overwrites it anyway). Both cases are
    /// logged, never surfaced as a failure.
    ///
    /// # Errors
    ///
    /// Only I/O failures (unreadable file, failed first-run write) propagate.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "settings file {} not found, writing defaults",
                path.display()
            );
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        match Ini::load_from_file_opt(path, PARSE_OPTION) {
            Ok(ini) => Ok(Self::from_ini(&ini)),
            Err(ini::Error::Io(e)) => {
                Err(e).with_context(|| format!("cannot read {}", path.display()))
            }
            Err(ini::Error::Parse(e)) => {
                log::warn!(
                    "settings file {} is corrupt ({e}), using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the full record to `path`, overwriting both sections wholesale.
    ///
    /// Sections other than `[RECLIST]` and `[OTOSET]` already present in the
    /// file are carried over untouched, so a future generator version can keep
    /// its own sections alongside ours.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut ini = if path.exists() {
            Ini::load_from_file_opt(path, PARSE_OPTION).unwrap_or_default()
        } else {
            Ini::new()
        };

        ini.delete(Some(RECLIST_SECTION));
        ini.delete(Some(OTOSET_SECTION));

        ini.with_section(Some(RECLIST_SECTION))
            .set("input_path", self.reclist.input_path.as_str())
            .set("reclist_output_path", self.reclist.reclist_output_path.as_str())
            .set("length", self.reclist.length.to_string())
            .set("include_cv_head", fmt_bool(self.reclist.include_cv_head))
            .set("include_vv", fmt_bool(self.reclist.include_vv))
            .set("use_underbar", fmt_bool(self.reclist.use_underbar))
            .set("use_planb", fmt_bool(self.reclist.use_planb));

        ini.with_section(Some(OTOSET_SECTION))
            .set("oto_output_path", self.oto.oto_output_path.as_str())
            .set("oto_max_of_same_cv", self.oto.max_of_same_cv.to_string())
            .set("oto_max_of_same_vc", self.oto.max_of_same_vc.to_string())
            .set("oto_preset_blank", self.oto.preset_blank.to_string())
            .set("oto_bpm", self.oto.bpm.to_string())
            .set("oto_devide_vccv", fmt_bool(self.oto.devide_vccv));

        ini.write_to_file_policy(path, EscapePolicy::Nothing)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    fn from_ini(ini: &Ini) -> Self {
        let d = Self::default();
        let rec = ini.section(Some(RECLIST_SECTION));
        let oto = ini.section(Some(OTOSET_SECTION));

        Self {
            reclist: ReclistConfig {
                input_path: get_str(rec, "input_path", &d.reclist.input_path),
                reclist_output_path: get_str(
                    rec,
                    "reclist_output_path",
                    &d.reclist.reclist_output_path,
                ),
                length: get_int(rec, "length", d.reclist.length),
                include_cv_head: get_bool(rec, "include_cv_head", d.reclist.include_cv_head),
                include_vv: get_bool(rec, "include_vv", d.reclist.include_vv),
                use_underbar: get_bool(rec, "use_underbar", d.reclist.use_underbar),
                use_planb: get_bool(rec, "use_planb", d.reclist.use_planb),
            },
            oto: OtoConfig {
                oto_output_path: get_str(oto, "oto_output_path", &d.oto.oto_output_path),
                max_of_same_cv: get_int(oto, "oto_max_of_same_cv", d.oto.max_of_same_cv),
                max_of_same_vc: get_int(oto, "oto_max_of_same_vc", d.oto.max_of_same_vc),
                preset_blank: get_int(oto, "oto_preset_blank", d.oto.preset_blank),
                bpm: get_int(oto, "oto_bpm", d.oto.bpm),
                devide_vccv: get_bool(oto, "oto_devide_vccv", d.oto.devide_vccv),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

fn fmt_bool(v: bool) -> &'static str {
    if v {
        "True"
    } else {
        "False"
    }
}

fn get_str(section: Option<&ini::Properties>, key: &str, default: &str) -> String {
    section
        .and_then(|s| s.get(key))
        .map_or_else(|| default.to_string(), str::to_string)
}

/// The generator understands exactly `True` / `False` (case-sensitive).
fn get_bool(section: Option<&ini::Properties>, key: &str, default: bool) -> bool {
    match section.and_then(|s| s.get(key)) {
        Some("True") => true,
        Some("False") => false,
        Some(other) => {
            log::warn!("settings key {key} has non-boolean value {other:?}, using default");
            default
        }
        None => default,
    }
}

fn get_int(section: Option<&ini::Properties>, key: &str, default: i64) -> i64 {
    match section.and_then(|s| s.get(key)) {
        Some(text) => text.parse().unwrap_or_else(|_| {
            log::warn!("settings key {key} has non-integer value {text:?}, using default");
            default
        }),
        None => default,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_writes_defaults_and_returns_them() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("reclist-gen-cvvc.ini");

        let settings = Settings::load_from(&path).expect("load");

        assert_eq!(settings, Settings::default());
        assert!(path.exists(), "first load must recreate the file");

        // And the written file must parse back into the same defaults.
        let reloaded = Settings::load_from(&path).expect("reload");
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn default_values() {
        let s = Settings::default();
        assert_eq!(s.reclist.input_path, "./presamp.ini");
        assert_eq!(s.reclist.reclist_output_path, "Reclist.txt");
        assert_eq!(s.reclist.length, 8);
        assert!(s.reclist.include_cv_head);
        assert!(s.reclist.include_vv);
        assert!(s.reclist.use_underbar);
        assert!(!s.reclist.use_planb);
        assert_eq!(s.oto.oto_output_path, "oto.ini");
        assert_eq!(s.oto.max_of_same_cv, 1);
        assert_eq!(s.oto.max_of_same_vc, 1);
        assert_eq!(s.oto.preset_blank, 1250);
        assert_eq!(s.oto.bpm, 130);
        assert!(s.oto.devide_vccv);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        let mut s = Settings::default();
        s.reclist.input_path = "D:\\voicebank\\presamp.ini".into();
        s.reclist.length = 12;
        s.reclist.use_planb = true;
        s.reclist.include_vv = false;
        s.oto.oto_output_path = "out/oto.ini".into();
        s.oto.bpm = 95;
        s.oto.preset_blank = 0;
        s.oto.devide_vccv = false;

        s.save_to(&path).expect("save");
        let loaded = Settings::load_from(&path).expect("load");

        assert_eq!(loaded, s);
    }

    #[test]
    fn booleans_persist_as_literal_true_false() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        Settings::default().save_to(&path).expect("save");
        let text = std::fs::read_to_string(&path).expect("read");

        assert!(text.contains("include_cv_head=True"));
        assert!(text.contains("use_planb=False"));
        // Never the lowercase spellings the generator would not recognize.
        assert!(!text.contains("=true"));
        assert!(!text.contains("=false"));
    }

    #[test]
    fn saved_bytes_are_stable_across_reload() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        let mut s = Settings::default();
        s.reclist.length = 20;
        s.save_to(&path).expect("save");
        let first = std::fs::read(&path).expect("read");

        let loaded = Settings::load_from(&path).expect("load");
        loaded.save_to(&path).expect("save again");
        let second = std::fs::read(&path).expect("read again");

        assert_eq!(first, second);
    }

    #[test]
    fn length_boundaries_round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        for boundary in [1, 20] {
            let mut s = Settings::default();
            s.reclist.length = boundary;
            s.save_to(&path).expect("save");
            assert_eq!(Settings::load_from(&path).expect("load").reclist.length, boundary);
        }
    }

    #[test]
    fn out_of_range_values_survive_unclamped() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        // Simulate a hand edit far outside the widget range.
        let mut s = Settings::default();
        s.reclist.length = 999;
        s.oto.bpm = -5;
        s.save_to(&path).expect("save");

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded.reclist.length, 999);
        assert_eq!(loaded.oto.bpm, -5);
    }

    #[test]
    fn unparseable_fields_fall_back_to_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        std::fs::write(
            &path,
            "[RECLIST]\nlength=eight\ninclude_vv=yes\ninput_path=custom.ini\n",
        )
        .expect("write");

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded.reclist.length, 8);
        assert!(loaded.reclist.include_vv);
        // Parseable fields in the same file are still honored.
        assert_eq!(loaded.reclist.input_path, "custom.ini");
        // Missing [OTOSET] section falls back entirely.
        assert_eq!(loaded.oto, OtoConfig::default());
    }

    #[test]
    fn foreign_sections_survive_save() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        std::fs::write(&path, "[FUTURE]\nsome_key=some_value\n").expect("write");

        Settings::default().save_to(&path).expect("save");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("[FUTURE]"));
        assert!(text.contains("some_key=some_value"));
        assert!(text.contains("[RECLIST]"));
        assert!(text.contains("[OTOSET]"));
    }

    #[test]
    fn windows_path_is_not_escaped() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        let mut s = Settings::default();
        s.reclist.input_path = "C:\\UTAU\\voice\\presamp.ini".into();
        s.save_to(&path).expect("save");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("input_path=C:\\UTAU\\voice\\presamp.ini"));

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded.reclist.input_path, "C:\\UTAU\\voice\\presamp.ini");
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.ini");

        std::fs::write(&path, "[RECLIST\nnot an ini at all").expect("write");

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded, Settings::default());
    }
}
