//! External generator invocation.
//!
//! The actual reclist/OTO generation lives in a separate process
//! (`reclist-gen-cvvc.py`); its only input is the settings file this app
//! saved beforehand, and its outputs are the reclist and oto files named in
//! there. This module spawns that process and classifies how it ended.
//!
//! One call, one spawn: no retry, no timeout, no cancellation, no output
//! capture. The UI decides what to do with a failure.

use std::path::PathBuf;
use std::process::Command;

use crate::config::{AppPaths, GENERATOR_SCRIPT};

// ---------------------------------------------------------------------------
// GenerationResult
// ---------------------------------------------------------------------------

/// How a generator run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// The process exited with status 0.
    Success,
    /// The process ran but exited non-zero.
    ProcessFailure(i32),
    /// The process could not be run at all (missing interpreter/script,
    /// OS-level spawn error) or died without an exit status.
    UnexpectedFailure(String),
}

// ---------------------------------------------------------------------------
// GenerationInvoker
// ---------------------------------------------------------------------------

/// Spawns the external generator synchronously.
///
/// The working directory is pinned to the app's working directory so relative
/// paths in the settings file resolve exactly as they did in the GUI.
#[derive(Debug, Clone)]
pub struct GenerationInvoker {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
}

impl GenerationInvoker {
    /// The stock invoker: `python reclist-gen-cvvc.py` in the app directory.
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            program: python_interpreter().into(),
            args: vec![GENERATOR_SCRIPT.into()],
            work_dir: paths.work_dir.clone(),
        }
    }

    /// Invoker for an arbitrary command (tests use stub commands).
    pub fn with_command(
        program: impl Into<String>,
        args: Vec<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            work_dir: work_dir.into(),
        }
    }

    /// Run the generator and wait for it to finish.
    ///
    /// Blocks for the whole run; call from a worker thread when a UI is
    /// attached. The caller must have saved the settings file first.
    pub fn run(&self) -> GenerationResult {
        log::info!(
            "running generator: {} {} (in {})",
            self.program,
            self.args.join(" "),
            self.work_dir.display()
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.work_dir)
            .status();

        match status {
            Ok(status) if status.success() => {
                log::info!("generator finished successfully");
                GenerationResult::Success
            }
            Ok(status) => match status.code() {
                Some(code) => {
                    log::warn!("generator exited with status {code}");
                    GenerationResult::ProcessFailure(code)
                }
                None => {
                    log::warn!("generator terminated without an exit status");
                    GenerationResult::UnexpectedFailure(format!(
                        "process terminated abnormally: {status}"
                    ))
                }
            },
            Err(e) => {
                log::error!("cannot spawn generator {}: {e}", self.program);
                GenerationResult::UnexpectedFailure(e.to_string())
            }
        }
    }
}

/// Interpreter used to run the generator script.
fn python_interpreter() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
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
    fn missing_executable_is_an_unexpected_failure() {
        let dir = tempdir().expect("temp dir");
        let invoker = GenerationInvoker::with_command(
            "definitely-not-an-installed-program",
            vec![],
            dir.path(),
        );

        match invoker.run() {
            GenerationResult::UnexpectedFailure(detail) => {
                assert!(!detail.is_empty(), "detail must carry the OS error text");
            }
            other => panic!("expected UnexpectedFailure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let dir = tempdir().expect("temp dir");
        let invoker =
            GenerationInvoker::with_command("sh", vec!["-c".into(), "exit 0".into()], dir.path());
        assert_eq!(invoker.run(), GenerationResult::Success);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_reports_the_code() {
        let dir = tempdir().expect("temp dir");
        let invoker =
            GenerationInvoker::with_command("sh", vec!["-c".into(), "exit 3".into()], dir.path());
        assert_eq!(invoker.run(), GenerationResult::ProcessFailure(3));
    }

    #[cfg(unix)]
    #[test]
    fn generator_runs_in_the_configured_directory() {
        let dir = tempdir().expect("temp dir");
        let invoker = GenerationInvoker::with_command(
            "sh",
            vec!["-c".into(), "test -f reclist-gen-cvvc.ini".into()],
            dir.path(),
        );

        // No settings file yet: the probe fails.
        assert!(matches!(invoker.run(), GenerationResult::ProcessFailure(_)));

        // After a save in that directory it succeeds, proving cwd placement.
        let settings_path = dir.path().join("reclist-gen-cvvc.ini");
        crate::config::Settings::default()
            .save_to(&settings_path)
            .expect("save");
        assert_eq!(invoker.run(), GenerationResult::Success);
    }
}
