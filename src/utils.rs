use std::path::{Component, Path, PathBuf};

use crate::errors::InvalidName;

/// Lexically removes `.` segments and resolves `..` against the preceding
/// segment, without touching the filesystem. A `..` with no segment left to
/// cancel is kept, so relative paths may still point above their base.
pub fn normalize_path(source: impl AsRef<Path>) -> PathBuf {
    let mut new_path = PathBuf::new();

    for component in source.as_ref().components() {
        match component {
            // Skip the current-dir marker "."
            Component::CurDir => {}

            // For "..", pop the last normal component if there is one
            Component::ParentDir => match new_path.components().next_back() {
                Some(Component::Normal(_)) => {
                    new_path.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => new_path.push(".."),
            },

            // For normal components, push them
            other => new_path.push(other.as_os_str()),
        }
    }

    new_path
}

/// Checks that `name` can be used as a class name and as a directory slug.
pub fn validate_name(name: &str) -> Result<(), InvalidName> {
    lazy_static::lazy_static! {
        static ref IDENTIFIER_REGEX: regex::Regex =
            regex::Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("a valid regex pattern");
    }

    if IDENTIFIER_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(InvalidName {
            name: name.to_string(),
        })
    }
}
