//! Built-in directory trees and file manifests for each scaffold kind.
//!
//! Manifest keys name a stub (`<stubs>/<kind>/<key>.stub`); values are output
//! paths relative to the scaffold root and may contain placeholder tokens.

use arbor::{Node, TreeSpec};
use indexmap::IndexMap;

/// Template key to relative output path, in write order.
pub type Manifest = IndexMap<String, String>;

/// Layout of a self-contained module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub tree: TreeSpec,
    pub files: Manifest,
}

/// Layout of a repository/service bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoBlueprint {
    /// Created only when scaffolding into the application root.
    pub tree: TreeSpec,
    /// Shared base classes, copied verbatim and only into the application root.
    pub base_files: Manifest,
    /// Per-name repository files.
    pub files: Manifest,
}

fn manifest(entries: &[(&str, &str)]) -> Manifest {
    entries
        .iter()
        .map(|(key, path)| (key.to_string(), path.to_string()))
        .collect()
}

pub fn module() -> Blueprint {
    let tree = TreeSpec::new([Node::branch(
        "src",
        [
            Node::leaf("config"),
            Node::branch("database", [Node::leaf("migrations")]),
            Node::branch(
                "Http",
                [
                    Node::leaf("Controllers"),
                    Node::leaf("Requests"),
                    Node::leaf("Resources"),
                ],
            ),
            Node::leaf("Models"),
            Node::branch(
                "Repositories",
                [Node::leaf("Contracts"), Node::leaf("Eloquents")],
            ),
            Node::leaf("Services"),
            Node::branch(
                "resources",
                [
                    Node::leaf("css"),
                    Node::leaf("js"),
                    Node::branch("lang", [Node::leaf("en")]),
                    Node::leaf("views"),
                ],
            ),
            Node::leaf("routes"),
        ],
    )]);

    let files = manifest(&[
        ("config", "src/config/your_name.php"),
        ("controller", "src/Http/Controllers/Controller.php"),
        ("interface", "src/Repositories/Contracts/BaseRepository.php"),
        ("eloquent", "src/Repositories/Eloquents/EloquentBaseRepository.php"),
        ("service", "src/Services/BaseService.php"),
        ("model", "src/Models/Model.php"),
        ("provider", "src/YourNameServiceProvider.php"),
        ("api", "src/routes/api.php"),
        ("web", "src/routes/web.php"),
        ("composer", "composer.json"),
        ("readme", "readme.md"),
    ]);

    Blueprint { tree, files }
}

pub fn repository() -> RepoBlueprint {
    let tree = TreeSpec::new([
        Node::branch(
            "Repositories",
            [Node::leaf("Contracts"), Node::leaf("Eloquents")],
        ),
        Node::leaf("Services"),
    ]);

    let base_files = manifest(&[
        (
            "interface_base_file",
            "Repositories/Contracts/BaseRepository.php",
        ),
        (
            "eloquent_base_file",
            "Repositories/Eloquents/EloquentBaseRepository.php",
        ),
        ("service_base_file", "Services/BaseService.php"),
    ]);

    let files = manifest(&[
        ("interface_file", "Repositories/Contracts/YourNameRepository.php"),
        (
            "eloquent_file",
            "Repositories/Eloquents/EloquentYourNameRepository.php",
        ),
        ("service_file", "Services/YourNameService.php"),
    ]);

    RepoBlueprint {
        tree,
        base_files,
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_trees_are_valid() {
        assert!(module().tree.validate().is_ok());
        assert!(repository().tree.validate().is_ok());
    }

    #[test]
    fn test_module_files_land_inside_the_tree() {
        let blueprint = module();
        let dirs = blueprint.tree.paths();

        for path in blueprint.files.values() {
            let parent = std::path::Path::new(path).parent().unwrap();
            assert!(
                parent.as_os_str().is_empty() || dirs.iter().any(|dir| dir == parent),
                "{path} is outside the module tree"
            );
        }
    }
}
