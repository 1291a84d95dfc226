use crate::{
    blueprints::{self, Blueprint, Manifest, RepoBlueprint},
    errors::{FileOperation, IoError},
    generator::GeneratorConfig,
    template::Placeholders,
    utils::normalize_path,
};
use arbor::{Node, TreeSpec};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "modgen.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(modgen::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(modgen::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A tree node as written in TOML: a string is a leaf directory, a table maps
/// branch names to their children.
///
/// ```toml
/// structure = ["config", { database = ["migrations"] }, "routes"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawNode {
    Leaf(String),
    Branches(IndexMap<String, Vec<RawNode>>),
}

fn into_tree(raw: Vec<RawNode>) -> TreeSpec {
    TreeSpec::new(into_nodes(raw))
}

fn into_nodes(raw: Vec<RawNode>) -> Vec<Node> {
    raw.into_iter()
        .flat_map(|node| match node {
            RawNode::Leaf(name) => vec![Node::Leaf(name)],
            RawNode::Branches(branches) => branches
                .into_iter()
                .map(|(name, children)| Node::branch(name, into_nodes(children)))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModuleOverrides {
    pub structure: Option<Vec<RawNode>>,
    pub files: Option<Manifest>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepoOverrides {
    pub structure: Option<Vec<RawNode>>,
    pub base_files: Option<Manifest>,
    pub files: Option<Manifest>,
}

/// Per-project settings read from `modgen.toml`. Every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Local directory (relative to the project root) or git reference holding the stubs.
    pub stubs: String,
    /// Where modules are created.
    pub modules_path: PathBuf,
    /// The application source root the artifact generator writes into.
    pub app_path: PathBuf,
    /// Namespace marker in generated code that is rewritten to a module's name.
    pub root_token: String,
    pub placeholders: Placeholders,
    pub generator: GeneratorConfig,
    pub module: ModuleOverrides,
    pub repo: RepoOverrides,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            stubs: "app/Console/Commands/stubs".to_string(),
            modules_path: PathBuf::from("modules"),
            app_path: PathBuf::from("app"),
            root_token: "App".to_string(),
            placeholders: Placeholders::default(),
            generator: GeneratorConfig::default(),
            module: ModuleOverrides::default(),
            repo: RepoOverrides::default(),
        }
    }
}
impl Config {
    /// Reads `explicit`, or `<project_root>/modgen.toml` when it exists.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = project_root.join(CONFIG_FILE_NAME);
                if !path.is_file() {
                    log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Config::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(IoError::on(FileOperation::Read, &path))?;

        Config::parse(&content, &path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    }

    pub fn modules_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(normalize_path(&self.modules_path))
    }

    pub fn app_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(normalize_path(&self.app_path))
    }

    /// The built-in module blueprint with any `[module]` overrides applied.
    pub fn module_blueprint(&self) -> Blueprint {
        let mut blueprint = blueprints::module();

        if let Some(structure) = &self.module.structure {
            blueprint.tree = into_tree(structure.clone());
        }
        if let Some(files) = &self.module.files {
            blueprint.files = files.clone();
        }

        blueprint
    }

    /// The built-in repository blueprint with any `[repo]` overrides applied.
    pub fn repo_blueprint(&self) -> RepoBlueprint {
        let mut blueprint = blueprints::repository();

        if let Some(structure) = &self.repo.structure {
            blueprint.tree = into_tree(structure.clone());
        }
        if let Some(files) = &self.repo.base_files {
            blueprint.base_files = files.clone();
        }
        if let Some(files) = &self.repo.files {
            blueprint.files = files.clone();
        }

        blueprint
    }
}
