use std::path::PathBuf;

#[derive(Debug)]
pub enum MaterializeError {
    /// A directory could not be created. Directories created before the
    /// failure are left in place.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Two nodes in the same sibling group share a name.
    DuplicateNode { parent: PathBuf, name: String },
}

impl std::error::Error for MaterializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterializeError::CreateDir { source, .. } => Some(source),
            MaterializeError::DuplicateNode { .. } => None,
        }
    }
}

impl std::fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MaterializeError::CreateDir { path, source } => {
                write!(f, "unable to create directory '{}': {}", path.display(), source)
            }
            MaterializeError::DuplicateNode { parent, name } => {
                let parent = if parent.as_os_str().is_empty() {
                    "<root>".to_string()
                } else {
                    parent.display().to_string()
                };
                write!(f, "duplicate node '{}' under {}", name, parent)
            }
        }
    }
}
