use crate::{
    config::{Config, ConfigError},
    errors::InvalidName,
    generator::ArtifactGenerator,
    report::Report,
    scaffold::{self, RepoContext, ScaffoldError, ScaffoldOptions, ScaffoldTarget},
    source::{SourceError, StubSource},
    utils::{normalize_path, validate_name},
};
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ModgenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidName(#[from] InvalidName),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scaffold(#[from] ScaffoldError),
}
impl ModgenError {
    /// The partial report of a scaffold that stopped after writing files.
    pub fn report(&self) -> Option<&Report> {
        match self {
            ModgenError::Scaffold(error) => error.report(),
            _ => None,
        }
    }
}

/// Creates the module `name` under `path` (default: the configured modules
/// directory), relative to `project_root`.
///
/// # Errors
///
/// Returns a [`ModgenError`] if:
///
/// - `name` is not a valid identifier.
/// - The stub source cannot be resolved.
/// - A directory cannot be created, or one or more files cannot be written.
pub fn make_module(
    project_root: &Path,
    config: &Config,
    name: &str,
    path: Option<&Path>,
) -> Result<Report, ModgenError> {
    validate_name(name)?;

    let base_path = match path {
        Some(path) => project_root.join(normalize_path(path)),
        None => config.modules_root(project_root),
    };

    let source = StubSource::build_from(&config.stubs, project_root)?;

    let target = ScaffoldTarget {
        name: name.to_string(),
        base_path,
        options: ScaffoldOptions::default(),
    };

    let report = scaffold::scaffold_module(
        &target,
        &config.module_blueprint(),
        &source.group("module"),
        &config.placeholders,
    )?;

    Ok(report)
}

/// Creates the repository, service and model for `name`, either in the
/// application root or inside an existing `module`. With `all`, also the
/// migration, controller, request and resource.
///
/// # Errors
///
/// Returns a [`ModgenError`] if:
///
/// - `name` or `module` is not a valid identifier.
/// - `module` is given but does not exist; nothing is written in that case.
/// - The stub source cannot be resolved.
/// - The artifact generator fails or does not produce its files.
/// - A file cannot be read, written or removed.
pub fn make_repo(
    project_root: &Path,
    config: &Config,
    name: &str,
    all: bool,
    module: Option<&str>,
    generator: &dyn ArtifactGenerator,
) -> Result<Report, ModgenError> {
    validate_name(name)?;
    if let Some(module) = module {
        validate_name(module)?;
    }

    let app_root = config.app_root(project_root);

    let base_path = scaffold::resolve_repository_root(
        &app_root,
        &config.modules_root(project_root),
        module,
    )?;

    let source = StubSource::build_from(&config.stubs, project_root)?;
    let store = source.group("repo");

    let target = ScaffoldTarget {
        name: name.to_string(),
        base_path,
        options: ScaffoldOptions {
            full: all,
            module: module.map(str::to_string),
        },
    };

    let ctx = RepoContext {
        app_root: &app_root,
        root_token: &config.root_token,
        placeholders: &config.placeholders,
        store: &store,
        generator,
    };

    let report = scaffold::scaffold_repository(&target, &config.repo_blueprint(), &ctx)?;

    Ok(report)
}
