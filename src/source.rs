use crate::{
    errors::{FileOperation, IoError},
    template::{TemplateError, TemplateStore},
};
use git2::Repository;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STUB_FILE_EXTENSION: &str = "stub";

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("I/O error within source domain")]
    #[diagnostic(code(modgen::source::io))]
    Io(#[from] IoError),

    #[error("stub directory not found: '{path}'")]
    #[diagnostic(
        code(modgen::source::not_found),
        help("Point `stubs` in modgen.toml at a directory containing `module/` and `repo/` stubs")
    )]
    NotFound { path: PathBuf },

    #[error("unable to clone repo at: '{url}': {source}")]
    #[diagnostic(
        code(modgen::source::git_clone),
        help("Make sure that username and project name are correct")
    )]
    GitClone {
        url: String,
        path: PathBuf,
        source: git2::Error,
    },

    #[error("invalid github prefix provided: {url}")]
    #[diagnostic(
        code(modgen::source::invalid_git_prefix),
        help("Valid git prefix are: ['gh', 'gl']")
    )]
    InvalidGitPrefix { url: String },
}

/// A directory of stub files, local or cloned from git.
///
/// Stubs are grouped by scaffold kind: `<root>/module/<key>.stub`,
/// `<root>/repo/<key>.stub`.
#[derive(Debug)]
pub struct StubSource {
    pub root: PathBuf,
    // keeps a cloned checkout alive for as long as the source is in use
    _checkout: Option<tempfile::TempDir>,
}
impl StubSource {
    fn is_git(source: &str) -> bool {
        lazy_static::lazy_static! {
            static ref GIT_URL_REGEX: regex::Regex = regex::Regex::new(
                r"(?x)        # Enable extended mode
                ^(?:
                    # 1) gh:account/repo
                    gh:[^/]+/[^/]+
                    |
                    # 2) gl:account/repo
                    gl:[^/]+/[^/]+
                    |
                    # 3) git@host:account/repo.git
                    git@[A-Za-z0-9._-]+:[^/]+/[^/]+\.git
                    |
                    # 4) git+http(s)://...
                    git\+https?://.*
                )$"
            ).expect("a valid regex pattern");
        }

        GIT_URL_REGEX.is_match(source)
    }

    fn expand_git_url(url: &str) -> Result<String, SourceError> {
        if let Some(stripped) = url.strip_prefix("gh:") {
            Ok(format!("https://github.com/{}.git", stripped))
        } else if let Some(stripped) = url.strip_prefix("gl:") {
            Ok(format!("https://gitlab.com/{}.git", stripped))
        } else if let Some(stripped) = url.strip_prefix("git+") {
            Ok(stripped.to_string())
        } else if url.starts_with("git@") {
            Ok(url.to_string())
        } else {
            Err(SourceError::InvalidGitPrefix {
                url: url.to_string(),
            })
        }
    }

    /// Resolves `reference` to a stub directory. Relative local paths are
    /// taken relative to `project_root`; git references are cloned into a
    /// temporary directory that lives as long as the returned value.
    pub fn build_from(reference: &str, project_root: &Path) -> Result<Self, SourceError> {
        if StubSource::is_git(reference) {
            let checkout = tempfile::tempdir()
                .map_err(|error| IoError::new(FileOperation::Mkdir, PathBuf::new(), error))?;

            let expanded_url = StubSource::expand_git_url(reference)?;

            log::debug!("cloning stubs from {}", expanded_url);

            Repository::clone(&expanded_url, checkout.path()).map_err(|err| {
                SourceError::GitClone {
                    url: expanded_url.clone(),
                    path: checkout.path().to_path_buf(),
                    source: err,
                }
            })?;

            return Ok(StubSource {
                root: checkout.path().to_path_buf(),
                _checkout: Some(checkout),
            });
        }

        let root = project_root.join(reference);

        if !root.is_dir() {
            return Err(SourceError::NotFound { path: root });
        }

        Ok(StubSource {
            root,
            _checkout: None,
        })
    }

    /// The stubs of one scaffold kind.
    pub fn group(&self, name: &str) -> StubGroup {
        StubGroup {
            dir: self.root.join(name),
        }
    }
}

/// One `<root>/<group>/` directory of stubs, addressed by key.
#[derive(Debug, Clone)]
pub struct StubGroup {
    pub dir: PathBuf,
}
impl TemplateStore for StubGroup {
    fn load(&self, key: &str) -> Result<Option<String>, TemplateError> {
        let path = self.dir.join(format!("{}.{}", key, STUB_FILE_EXTENSION));

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(IoError::new(FileOperation::Read, path, error).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_git() {
        assert!(StubSource::is_git("gh:acme/stubs"));
        assert!(StubSource::is_git("gl:acme/stubs"));
        assert!(StubSource::is_git("git@github.com:acme/stubs.git"));
        assert!(StubSource::is_git("git+https://example.com/acme/stubs.git"));
        assert!(!StubSource::is_git("stubs"));
        assert!(!StubSource::is_git("./resources/stubs"));
    }

    #[test]
    fn test_expand_git_url() {
        assert_eq!(
            StubSource::expand_git_url("gh:acme/stubs").unwrap(),
            "https://github.com/acme/stubs.git"
        );
        assert_eq!(
            StubSource::expand_git_url("git+https://example.com/acme/stubs.git").unwrap(),
            "https://example.com/acme/stubs.git"
        );
        assert!(StubSource::expand_git_url("bitbucket:acme/stubs").is_err());
    }

    #[test]
    fn test_local_source_loads_group_stubs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("stubs/module")).unwrap();
        std::fs::write(tmp.path().join("stubs/module/readme.stub"), "# YourName").unwrap();

        let source = StubSource::build_from("stubs", tmp.path()).unwrap();
        let group = source.group("module");

        assert_eq!(group.load("readme").unwrap().as_deref(), Some("# YourName"));
        assert!(group.load("composer").unwrap().is_none());
    }

    #[test]
    fn test_missing_local_source_is_error() {
        let tmp = tempfile::tempdir().unwrap();

        let result = StubSource::build_from("nope", tmp.path());

        assert!(matches!(result, Err(SourceError::NotFound { .. })));
    }
}
