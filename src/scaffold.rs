use crate::{
    blueprints::{Blueprint, Manifest, RepoBlueprint},
    generator::{Artifact, ArtifactGenerator, GeneratorError},
    relocate::{relocate, ArtifactKind, RelocateError},
    report::Report,
    template::{Placeholders, Renderer, Substitutions, TemplateError, TemplateStore},
    utils::normalize_path,
    writer::{write_if_absent, WriteOutcome},
};
use arbor::{errors::MaterializeError, materialize, TreeSpec};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error("unable to create directory structure: {0}")]
    #[diagnostic(
        code(modgen::scaffold::tree),
        help("Directories created before the failure were left in place")
    )]
    Tree(#[from] MaterializeError),

    #[error("Module {module} does not exist!")]
    #[diagnostic(
        code(modgen::scaffold::missing_module),
        help("Create it first with `modgen module {module}`")
    )]
    MissingModule { module: String, path: PathBuf },

    #[error("{} file(s) could not be generated", .failures.len())]
    #[diagnostic(code(modgen::scaffold::incomplete))]
    Incomplete {
        report: Report,
        #[related]
        failures: Vec<FileFailure>,
    },

    #[error("unable to generate the artifacts for {name}")]
    #[diagnostic(
        code(modgen::scaffold::artifacts),
        help("Files listed as created were kept; fix the cause and run again to fill in the rest")
    )]
    Artifacts {
        name: String,
        report: Report,
        #[related]
        failures: Vec<FileFailure>,
        #[source]
        #[diagnostic_source]
        source: ArtifactError,
    },
}
impl ScaffoldError {
    /// What was done before the run failed, when anything was.
    pub fn report(&self) -> Option<&Report> {
        match self {
            ScaffoldError::Incomplete { report, .. } | ScaffoldError::Artifacts { report, .. } => {
                Some(report)
            }
            _ => None,
        }
    }
}

/// Running the generator or moving its output into a module failed.
#[derive(Debug, Error, Diagnostic)]
pub enum ArtifactError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Relocate(#[from] RelocateError),
}

/// A single manifest entry that failed to render or write.
#[derive(Debug, Error, Diagnostic)]
#[error("unable to generate '{}' from stub '{key}'", .path.display())]
#[diagnostic(code(modgen::scaffold::file))]
pub struct FileFailure {
    pub key: String,
    pub path: PathBuf,
    #[source]
    #[diagnostic_source]
    pub source: TemplateError,
}

/// Which variant of a bundle to produce and where to put it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Also generate controller, migration, request and resource.
    pub full: bool,
    /// Place the bundle inside this module instead of the application root.
    pub module: Option<String>,
}

/// One scaffold invocation: the identifier to substitute and the root to populate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldTarget {
    pub name: String,
    pub base_path: PathBuf,
    pub options: ScaffoldOptions,
}

/// Materializes `tree` under `root`, then renders and writes every `manifest` entry.
///
/// Output paths are rendered with `path_subs`, stub contents with
/// `content_subs`. Entries are independent: a failing entry is recorded and
/// the rest are still attempted. Existing files are never touched.
///
/// # Errors
///
/// [`ScaffoldError::Tree`] if a directory cannot be created (no file is
/// written in that case), [`ScaffoldError::Incomplete`] if any entry failed.
pub fn scaffold(
    root: &Path,
    tree: &TreeSpec,
    manifest: &Manifest,
    renderer: &Renderer,
    path_subs: &Substitutions,
    content_subs: &Substitutions,
) -> Result<Report, ScaffoldError> {
    let mut report = Report::new();

    report.directories(materialize(tree, root)?);

    let failures = write_manifest(
        root,
        manifest,
        renderer,
        path_subs,
        content_subs,
        &mut report,
    );

    finish(report, failures)
}

fn finish(report: Report, failures: Vec<FileFailure>) -> Result<Report, ScaffoldError> {
    if failures.is_empty() {
        Ok(report)
    } else {
        Err(ScaffoldError::Incomplete { report, failures })
    }
}

fn write_manifest(
    root: &Path,
    manifest: &Manifest,
    renderer: &Renderer,
    path_subs: &Substitutions,
    content_subs: &Substitutions,
    report: &mut Report,
) -> Vec<FileFailure> {
    let mut failures = Vec::new();

    for (key, relative) in manifest {
        let rendered_path = path_subs.apply(relative);
        let path = root.join(rendered_path.trim_start_matches('/'));

        let outcome = renderer
            .render(key, content_subs)
            .and_then(|content| {
                write_if_absent(&path, content.as_deref()).map_err(TemplateError::from)
            });

        match outcome {
            Ok(outcome) => report.file(path, outcome),
            Err(error) => {
                log::warn!("failed to generate {}: {}", path.display(), error);
                failures.push(FileFailure {
                    key: key.clone(),
                    path,
                    source: error,
                });
            }
        }
    }

    failures
}

/// Creates the module `<base_path>/<lowercase name>` from `blueprint`.
pub fn scaffold_module(
    target: &ScaffoldTarget,
    blueprint: &Blueprint,
    store: &dyn TemplateStore,
    placeholders: &Placeholders,
) -> Result<Report, ScaffoldError> {
    let root = target.base_path.join(target.name.to_lowercase());
    let subs = placeholders.for_name(&target.name);

    log::info!("scaffolding module {} in {}", target.name, root.display());

    scaffold(
        &root,
        &blueprint.tree,
        &blueprint.files,
        &Renderer::new(store),
        &subs,
        &subs,
    )
}

/// Resolves where a repository bundle goes: the `src` directory of an existing
/// module, or the application root when no module is given.
pub fn resolve_repository_root(
    app_root: &Path,
    modules_root: &Path,
    module: Option<&str>,
) -> Result<PathBuf, ScaffoldError> {
    let Some(module) = module else {
        return Ok(app_root.to_path_buf());
    };

    let path = modules_root.join(module.to_lowercase()).join("src");

    if !path.is_dir() {
        return Err(ScaffoldError::MissingModule {
            module: module.to_string(),
            path,
        });
    }

    Ok(path)
}

/// Everything a repository scaffold needs besides the target itself.
pub struct RepoContext<'a> {
    /// Default location the artifact generator writes into.
    pub app_root: &'a Path,
    /// Namespace marker rewritten to the module name inside a module.
    pub root_token: &'a str,
    pub placeholders: &'a Placeholders,
    pub store: &'a dyn TemplateStore,
    pub generator: &'a dyn ArtifactGenerator,
}

/// Writes a repository/service bundle for `target.name` into `target.base_path`.
///
/// In the application root the shared tree and base classes are created
/// first. Inside a module (`base_path` differs from the application root)
/// they already exist, the root token in stubs is rewritten to the module
/// name and the generator's output is relocated into the module.
pub fn scaffold_repository(
    target: &ScaffoldTarget,
    blueprint: &RepoBlueprint,
    ctx: &RepoContext,
) -> Result<Report, ScaffoldError> {
    let name = target.name.as_str();
    let renderer = Renderer::new(ctx.store);
    let path_subs = ctx.placeholders.for_name(name);

    let in_app_root = normalize_path(&target.base_path) == normalize_path(ctx.app_root);
    let module = match (&target.options.module, in_app_root) {
        (Some(module), false) => Some(module.as_str()),
        _ => None,
    };

    let mut report = Report::new();
    let mut failures = Vec::new();

    if module.is_none() {
        report.directories(materialize(&blueprint.tree, &target.base_path)?);

        failures.extend(write_manifest(
            &target.base_path,
            &blueprint.base_files,
            &renderer,
            &Substitutions::none(),
            &Substitutions::none(),
            &mut report,
        ));
    }

    let content_subs = match module {
        Some(module) => path_subs.clone().with(ctx.root_token, module),
        None => path_subs.clone(),
    };

    failures.extend(write_manifest(
        &target.base_path,
        &blueprint.files,
        &renderer,
        &path_subs,
        &content_subs,
        &mut report,
    ));

    if let Err(source) = generate_artifacts(target, module, ctx, &mut report) {
        return Err(ScaffoldError::Artifacts {
            name: name.to_string(),
            report,
            failures,
            source,
        });
    }

    finish(report, failures)
}

fn generate_artifacts(
    target: &ScaffoldTarget,
    module: Option<&str>,
    ctx: &RepoContext,
    report: &mut Report,
) -> Result<(), ArtifactError> {
    let name = target.name.as_str();
    let full = target.options.full;

    let mut artifacts = vec![Artifact::Model {
        name: name.to_string(),
        full,
    }];
    let mut kinds = vec![ArtifactKind::Model];

    if full {
        artifacts.push(Artifact::Request {
            name: name.to_string(),
        });
        artifacts.push(Artifact::Resource {
            name: name.to_string(),
        });
        kinds.extend([
            ArtifactKind::Controller,
            ArtifactKind::Request,
            ArtifactKind::Resource,
        ]);
    }

    for artifact in &artifacts {
        log::info!("generating {:?}", artifact);
        ctx.generator.generate(artifact)?;
    }

    let Some(module) = module else {
        return Ok(());
    };

    let rewrite = Substitutions::none().with(ctx.root_token, module);

    for kind in kinds {
        let entry = relocate(kind, name, ctx.app_root, &target.base_path, &rewrite)?;

        match entry.outcome {
            WriteOutcome::Written => report.moved(entry.from, entry.to),
            skipped => report.file(entry.to, skipped),
        }
    }

    Ok(())
}
