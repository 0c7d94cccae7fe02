//! Application file locations.
//!
//! Everything the app touches lives relative to its working directory, the
//! same directory the external generator runs in:
//!
//! ```text
//! ./reclist-gen-cvvc.ini   settings (shared with the generator)
//! ./lang/<code>.json       translation tables
//! ./readme.txt             bundled documentation (optional)
//! ./reclist-gen-cvvc.py    the generator script itself
//! ```

use std::path::PathBuf;

/// Name of the settings file read by both the GUI and the generator.
pub const SETTINGS_FILE: &str = "reclist-gen-cvvc.ini";

/// Name of the generator script spawned on "Start Generation".
pub const GENERATOR_SCRIPT: &str = "reclist-gen-cvvc.py";

/// Project page opened from the Help menu.
pub const PROJECT_URL: &str = "http://github.com/sdercolin/reclist-gen-cvvc/";

/// Holds all resolved application file/directory paths.
///
/// Constructed against an arbitrary root so tests can point everything at a
/// temp directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory the app (and the generator) operate in.
    pub work_dir: PathBuf,
    /// Full path to `reclist-gen-cvvc.ini`.
    pub settings_file: PathBuf,
    /// Directory holding one `<code>.json` per supported language.
    pub lang_dir: PathBuf,
    /// Full path to the optional `readme.txt`.
    pub readme_file: PathBuf,
}

impl AppPaths {
    /// Resolve all paths under `work_dir`.
    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            settings_file: work_dir.join(SETTINGS_FILE),
            lang_dir: work_dir.join("lang"),
            readme_file: work_dir.join("readme.txt"),
            work_dir,
        }
    }

    /// Resolve against the process working directory.
    ///
    /// Falls back to `.` when the working directory cannot be read (should be
    /// extremely rare in practice).
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(cwd)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_under_given_root() {
        let paths = AppPaths::in_dir("/tmp/reclist-test");
        assert_eq!(
            paths.settings_file,
            PathBuf::from("/tmp/reclist-test").join(SETTINGS_FILE)
        );
        assert!(paths.lang_dir.ends_with("lang"));
        assert!(paths
            .readme_file
            .file_name()
            .is_some_and(|n| n == "readme.txt"));
    }
}
