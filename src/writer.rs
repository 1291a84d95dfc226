use crate::errors::{FileOperation, IoError};
use std::{fs::OpenOptions, io::Write, path::Path};

/// Why a file was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Something already lives at the target path.
    AlreadyExists,
    /// The template store has no blob for the key.
    MissingTemplate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped(SkipReason),
}

/// Writes `content` to `path` unless `path` already exists or there is no content.
///
/// Missing parent directories are created. An existing file is never
/// modified: the file is opened with `create_new`, so the existence check and
/// the creation happen in a single call and a concurrent writer that gets
/// there first turns this call into a skip.
///
/// # Errors
///
/// Returns an [`IoError`] if a parent directory cannot be created or the file
/// cannot be written.
pub fn write_if_absent(path: &Path, content: Option<&str>) -> Result<WriteOutcome, IoError> {
    if path.exists() {
        log::debug!("skipping existing file: {}", path.display());
        return Ok(WriteOutcome::Skipped(SkipReason::AlreadyExists));
    }

    let Some(content) = content else {
        return Ok(WriteOutcome::Skipped(SkipReason::MissingTemplate));
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(IoError::on(FileOperation::Mkdir, parent))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::Skipped(SkipReason::AlreadyExists));
        }
        Err(error) => return Err(IoError::new(FileOperation::Write, path.to_path_buf(), error)),
    };

    file.write_all(content.as_bytes())
        .map_err(IoError::on(FileOperation::Write, path))?;

    Ok(WriteOutcome::Written)
}
