use errors::MaterializeError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
pub mod errors;

/// A single directory in a [`TreeSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A directory without further structure.
    Leaf(String),
    /// A directory containing further structure.
    Branch { name: String, children: Vec<Node> },
}
impl Node {
    pub fn leaf(name: impl Into<String>) -> Self {
        Node::Leaf(name.into())
    }

    pub fn branch(name: impl Into<String>, children: impl IntoIterator<Item = Node>) -> Self {
        Node::Branch {
            name: name.into(),
            children: children.into_iter().collect(),
        }
    }

    /// The directory name this node stands for.
    pub fn name(&self) -> &str {
        match self {
            Node::Leaf(name) => name,
            Node::Branch { name, .. } => name,
        }
    }
}

/// Declarative description of a directory hierarchy.
///
/// Every node, leaf or branch, denotes exactly one directory. Node names must be
/// unique within a sibling group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSpec {
    pub nodes: Vec<Node>,
}
impl TreeSpec {
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Checks that no sibling group contains the same name twice.
    pub fn validate(&self) -> Result<(), MaterializeError> {
        validate_siblings(&self.nodes, Path::new(""))
    }

    /// Every directory this tree describes, relative to the root, in depth-first order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        collect_paths(&self.nodes, Path::new(""), &mut paths);
        paths
    }
}

fn validate_siblings(nodes: &[Node], parent: &Path) -> Result<(), MaterializeError> {
    let mut seen = HashSet::new();

    for node in nodes {
        if !seen.insert(node.name()) {
            return Err(MaterializeError::DuplicateNode {
                parent: parent.to_path_buf(),
                name: node.name().to_string(),
            });
        }

        if let Node::Branch { name, children } = node {
            validate_siblings(children, &parent.join(name))?;
        }
    }

    Ok(())
}

fn collect_paths(nodes: &[Node], parent: &Path, paths: &mut Vec<PathBuf>) {
    for node in nodes {
        let path = parent.join(node.name());
        paths.push(path.clone());

        if let Node::Branch { children, .. } = node {
            collect_paths(children, &path, paths);
        }
    }
}

/// Creates `root` and every directory described by `spec` beneath it.
///
/// The walk is depth-first: a branch's own directory is created before its
/// children. Directories that already exist are left untouched, so running
/// this against a complete tree performs no filesystem mutation. Returns the
/// directories that were actually created.
///
/// # Example
/// ```
/// use arbor::{materialize, Node, TreeSpec};
///
/// let tmp = tempfile::tempdir().unwrap();
/// let spec = TreeSpec::new([
///     Node::leaf("config"),
///     Node::branch("database", [Node::leaf("migrations")]),
/// ]);
///
/// let created = materialize(&spec, tmp.path()).unwrap();
/// assert_eq!(created.len(), 3);
/// assert!(tmp.path().join("database/migrations").is_dir());
///
/// let created = materialize(&spec, tmp.path()).unwrap();
/// assert!(created.is_empty());
/// ```
///
/// # Errors
///
/// Returns [`MaterializeError::DuplicateNode`] before touching the filesystem
/// when `spec` is invalid, and [`MaterializeError::CreateDir`] when a
/// directory cannot be created. Nothing created so far is removed.
pub fn materialize(spec: &TreeSpec, root: &Path) -> Result<Vec<PathBuf>, MaterializeError> {
    spec.validate()?;

    let mut created = Vec::new();

    ensure_dir(root, &mut created)?;

    materialize_nodes(&spec.nodes, root, &mut created)?;

    Ok(created)
}

fn materialize_nodes(
    nodes: &[Node],
    path: &Path,
    created: &mut Vec<PathBuf>,
) -> Result<(), MaterializeError> {
    for node in nodes {
        let new_path = path.join(node.name());

        ensure_dir(&new_path, created)?;

        if let Node::Branch { children, .. } = node {
            materialize_nodes(children, &new_path, created)?;
        }
    }

    Ok(())
}

/// Creates `path` (and any missing parents) unless it is already a directory.
fn ensure_dir(path: &Path, created: &mut Vec<PathBuf>) -> Result<(), MaterializeError> {
    if path.is_dir() {
        return Ok(());
    }

    match std::fs::create_dir_all(path) {
        Ok(()) => {
            created.push(path.to_path_buf());
            Ok(())
        }
        // lost a race against another process creating the same directory
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(error) => Err(MaterializeError::CreateDir {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}
