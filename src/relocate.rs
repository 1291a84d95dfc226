use crate::{
    errors::{FileOperation, IoError},
    template::Substitutions,
    writer::{write_if_absent, WriteOutcome},
};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RelocateError {
    #[error("I/O error while relocating generated files")]
    #[diagnostic(code(modgen::relocate::io))]
    Io(#[from] IoError),

    #[error("expected generated {kind} at '{path}' but it does not exist")]
    #[diagnostic(
        code(modgen::relocate::generator_output_missing),
        help("The artifact generator reported success without writing its file; run it by hand to see why")
    )]
    GeneratorOutputMissing { kind: ArtifactKind, path: PathBuf },
}

/// Files the artifact generator writes, by where it writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Controller,
    Request,
    Resource,
}
impl ArtifactKind {
    /// Path of the generated file relative to an application (or module) source root.
    pub fn relative_path(&self, name: &str) -> PathBuf {
        match self {
            ArtifactKind::Model => PathBuf::from("Models").join(format!("{}.php", name)),
            ArtifactKind::Controller => {
                PathBuf::from("Http/Controllers").join(format!("{}Controller.php", name))
            }
            ArtifactKind::Request => {
                PathBuf::from("Http/Requests").join(format!("{}Request.php", name))
            }
            ArtifactKind::Resource => {
                PathBuf::from("Http/Resources").join(format!("{}Resource.php", name))
            }
        }
    }
}
impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Controller => "controller",
            ArtifactKind::Request => "request",
            ArtifactKind::Resource => "resource",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationEntry {
    pub from: PathBuf,
    pub to: PathBuf,
    pub outcome: WriteOutcome,
}

/// Moves the `kind` artifact for `name` from `app_root` into `target_base`,
/// rewriting it with `rewrite` on the way.
///
/// The source file is always removed. If a file already exists at the
/// destination it is kept as is and the entry's outcome is a skip.
///
/// # Errors
///
/// [`RelocateError::GeneratorOutputMissing`] if the generator did not leave a
/// file at the default path; [`RelocateError::Io`] for any other read, write
/// or delete failure.
pub fn relocate(
    kind: ArtifactKind,
    name: &str,
    app_root: &Path,
    target_base: &Path,
    rewrite: &Substitutions,
) -> Result<RelocationEntry, RelocateError> {
    let relative = kind.relative_path(name);
    let from = app_root.join(&relative);
    let to = target_base.join(&relative);

    let content = match std::fs::read_to_string(&from) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(RelocateError::GeneratorOutputMissing { kind, path: from });
        }
        Err(error) => return Err(IoError::new(FileOperation::Read, from, error).into()),
    };

    let outcome = write_if_absent(&to, Some(rewrite.apply(&content).as_str()))?;

    std::fs::remove_file(&from).map_err(IoError::on(FileOperation::Remove, &from))?;

    log::debug!("relocated {} {} -> {}", kind, from.display(), to.display());

    Ok(RelocationEntry { from, to, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::SkipReason;

    fn generated(app: &Path, kind: ArtifactKind, name: &str, content: &str) -> PathBuf {
        let path = app.join(kind.relative_path(name));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_relocate_rewrites_and_moves() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path().join("app");
        let module = tmp.path().join("modules/billing/src");
        let source = generated(
            &app,
            ArtifactKind::Model,
            "Invoice",
            "namespace App\\Models;\nuse App\\Support\\HasApp;\n",
        );

        let entry = relocate(
            ArtifactKind::Model,
            "Invoice",
            &app,
            &module,
            &Substitutions::none().with("App", "Billing"),
        )
        .unwrap();

        assert_eq!(entry.outcome, WriteOutcome::Written);
        assert_eq!(entry.to, module.join("Models/Invoice.php"));
        assert!(!source.exists());
        assert_eq!(
            std::fs::read_to_string(&entry.to).unwrap(),
            "namespace Billing\\Models;\nuse Billing\\Support\\HasBilling;\n"
        );
    }

    #[test]
    fn test_missing_generated_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();

        let error = relocate(
            ArtifactKind::Controller,
            "Invoice",
            &tmp.path().join("app"),
            &tmp.path().join("modules/billing/src"),
            &Substitutions::none(),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            RelocateError::GeneratorOutputMissing {
                kind: ArtifactKind::Controller,
                ..
            }
        ));
    }

    #[test]
    fn test_existing_destination_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path().join("app");
        let module = tmp.path().join("modules/billing/src");
        let source = generated(&app, ArtifactKind::Request, "Invoice", "generated");
        let existing = generated(&module, ArtifactKind::Request, "Invoice", "hand edited");

        let entry = relocate(
            ArtifactKind::Request,
            "Invoice",
            &app,
            &module,
            &Substitutions::none(),
        )
        .unwrap();

        assert_eq!(
            entry.outcome,
            WriteOutcome::Skipped(SkipReason::AlreadyExists)
        );
        assert_eq!(std::fs::read_to_string(existing).unwrap(), "hand edited");
        assert!(!source.exists());
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            ArtifactKind::Controller.relative_path("Invoice"),
            PathBuf::from("Http/Controllers/InvoiceController.php")
        );
        assert_eq!(
            ArtifactKind::Resource.relative_path("Invoice"),
            PathBuf::from("Http/Resources/InvoiceResource.php")
        );
    }
}
