//! Case-file diagnostic sink.
//!
//! Persists a finished failure record to disk as a small human-readable
//! report: the original fault message and the backtrace captured at the
//! failure point. The configured destination is used when it can be
//! recreated; otherwise the record goes to a freshly created temporary file
//! so it is never silently dropped.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::capture::Failure;

/// Prefix for temporary case files created when no destination is configured
/// or the configured one is unwritable.
const TEMP_PREFIX: &str = "triage-case-";

/// Writes a failure record to the destination hint, falling back to a
/// temporary file, and returns the path actually written.
///
/// An existing file at the destination is removed and recreated, so each
/// dispatch leaves exactly one report there. The temporary fallback file is
/// kept on disk (not deleted on drop); it is the diagnostic artifact.
///
/// # Errors
///
/// Returns an error only when no writable destination can be obtained at
/// all, or the write itself fails. Callers treat that as fatal: dropping a
/// failure record defeats the purpose of capturing it.
pub fn persist(failure: &Failure, destination: Option<&Path>) -> io::Result<PathBuf> {
    let (mut file, path) = match destination.and_then(recreate) {
        Some(opened) => opened,
        None => {
            let (file, path) = tempfile::Builder::new()
                .prefix(TEMP_PREFIX)
                .tempfile()?
                .keep()
                .map_err(|e| e.error)?;
            (file, path)
        }
    };

    write_report(&mut file, failure)?;
    debug!(path = %path.display(), "case file written");
    Ok(path)
}

/// Removes and recreates the destination file. `None` means the destination
/// is unwritable and the caller should fall back to a temporary file.
fn recreate(path: &Path) -> Option<(File, PathBuf)> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(_) => return None,
    }
    File::create(path).ok().map(|file| (file, path.to_path_buf()))
}

fn write_report(file: &mut File, failure: &Failure) -> io::Result<()> {
    writeln!(file, "FAILURE: {}", failure.fault().message())?;
    writeln!(file, "STACK TRACE:\n{}", failure.trace())?;
    Ok(())
}
