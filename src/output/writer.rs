//! Output Targets
//!
//! Writes the export to the first target that accepts it. When every target
//! fails the rendered text travels back inside the error so it is not lost.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveTime};
use tracing::{info, warn};

use crate::error::ShiftSheetError;

/// Prefix of generated export files; also used to skip old exports when
/// listing input candidates
pub const EXPORT_FILE_PREFIX: &str = "shifter_import";

/// A place the export may be written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A file path; parent directories are not created
    File(PathBuf),
}

impl OutputTarget {
    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::File(path) => path,
        }
    }

    fn write(&self, text: &str) -> std::io::Result<()> {
        let mut file = File::create(self.path())?;
        file.write_all(text.as_bytes())?;
        file.flush()
    }
}

/// `shifter_import_<HH-MM-SS>.txt` for the given wall-clock time
pub fn export_file_name(time: NaiveTime) -> String {
    format!("{}_{}.txt", EXPORT_FILE_PREFIX, time.format("%H-%M-%S"))
}

/// The desktop of the current user, then the working directory
///
/// The desktop is skipped when no home directory is known.
pub fn default_targets(file_name: &str) -> Vec<OutputTarget> {
    let mut targets = Vec::new();
    if let Some(home) = home_dir() {
        targets.push(OutputTarget::File(home.join("Desktop").join(file_name)));
    }
    targets.push(OutputTarget::File(PathBuf::from(file_name)));
    targets
}

/// Default targets named after the current local time
pub(crate) fn default_targets_now() -> Vec<OutputTarget> {
    default_targets(&export_file_name(Local::now().time()))
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Writes `text` to the first target that succeeds
///
/// # Returns
///
/// * `Ok(PathBuf)` - the path that was written
/// * `Err(ShiftSheetError::OutputTargetUnavailable)` - every target failed;
///   the error carries `text` unchanged
pub fn write_with_fallback(
    targets: &[OutputTarget],
    text: &str,
) -> Result<PathBuf, ShiftSheetError> {
    let mut attempted = Vec::with_capacity(targets.len());

    for target in targets {
        attempted.push(target.path().to_path_buf());
        match target.write(text) {
            Ok(()) => {
                info!(path = %target.path().display(), "export written");
                return Ok(target.path().to_path_buf());
            }
            Err(e) => {
                warn!(path = %target.path().display(), error = %e, "output target failed");
            }
        }
    }

    Err(ShiftSheetError::OutputTargetUnavailable {
        attempted,
        rendered: text.to_string(),
    })
}
