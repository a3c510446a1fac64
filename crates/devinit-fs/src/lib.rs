//! Existence-gated file scaffolding.
//!
//! A template is written only when nothing exists at its path, so re-running
//! never overwrites user edits.

pub mod templates;

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use templates::Template;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' exists but is not a regular file", .path.display())]
    NotAFile { path: PathBuf },
}

/// What [`ensure_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    Existing,
}

/// Create `path` with `content` unless something already exists there.
///
/// The body is written to a temporary sibling and linked into place without
/// clobbering, so an interrupted or failed write never leaves a partial file
/// at `path` and the next run creates it again.
pub fn ensure_file(path: &Path, content: &str) -> Result<EnsureOutcome, ScaffoldError> {
    ensure_file_with(path, |f| f.write_all(content.as_bytes()))
}

fn write_error(path: &Path, source: io::Error) -> ScaffoldError {
    ScaffoldError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn existing(path: &Path) -> Result<Option<EnsureOutcome>, ScaffoldError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(EnsureOutcome::Existing)),
        Ok(_) => Err(ScaffoldError::NotAFile {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(write_error(path, e)),
    }
}

fn ensure_file_with<F>(path: &Path, fill: F) -> Result<EnsureOutcome, ScaffoldError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    if let Some(outcome) = existing(path)? {
        return Ok(outcome);
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".devinit-")
        .tempfile_in(dir)
        .map_err(|e| write_error(path, e))?;
    fill(staged.as_file_mut()).map_err(|e| write_error(path, e))?;
    staged.as_file_mut().flush().map_err(|e| write_error(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| write_error(path, e))?;
    }

    match staged.persist_noclobber(path) {
        Ok(_) => {
            tracing::debug!(path = %path.display(), "created");
            Ok(EnsureOutcome::Created)
        }
        // Lost a race with another writer; whatever is there now wins.
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => match existing(path)? {
            Some(outcome) => Ok(outcome),
            None => Err(write_error(path, e.error)),
        },
        Err(e) => Err(write_error(path, e.error)),
    }
}

/// Ensure every template under `project_dir`, in order. Stops at the first
/// failure.
pub fn scaffold(
    project_dir: &Path,
    templates: &[Template],
) -> Result<Vec<(PathBuf, EnsureOutcome)>, ScaffoldError> {
    templates
        .iter()
        .map(|t| {
            let path = project_dir.join(&t.path);
            ensure_file(&path, &t.body).map(|outcome| (path, outcome))
        })
        .collect()
}
