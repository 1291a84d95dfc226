use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("writing a file")]
    Write,
    #[error("creating a directory")]
    Mkdir,
    #[error("removing a file")]
    Remove,
}
/// A filesystem call that failed for environmental reasons (permissions, disk, bad path).
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(modgen::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }

    /// Returns a closure suitable for `map_err` that tags an [`std::io::Error`]
    /// with `operation` and `path`.
    pub fn on(operation: FileOperation, path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |error| Self::new(operation, path.to_path_buf(), error)
    }
}

/// The identifier handed to a scaffold command is unusable as a class name.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid name '{name}'")]
#[diagnostic(
    code(modgen::invalid_name),
    help("Names must start with a letter and contain only letters, digits and underscores, e.g. 'Invoice'")
)]
pub struct InvalidName {
    pub name: String,
}
