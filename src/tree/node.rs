//! Tree node types and handles.

use crate::paths;
use crate::resource::ResourceType;

/// Stable handle into the tree arena. Handles survive detach/attach; nodes
/// are never removed from the arena, so a handle never dangles within the
/// tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Node payload: a directory, a typed resource leaf, or a plain file leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Directory in the project tree. `resource_root` marks the directory a
    /// resource type owns as its namespace root.
    Directory {
        path: String,
        resource_root: Option<ResourceType>,
    },
    /// Typed resource leaf. `id` is scoped to `kind`'s namespace and does
    /// not repeat the type root directory.
    Resource { kind: ResourceType, id: String },
    /// Plain file with no database entry.
    File { path: String },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

impl NodeKind {
    /// Structural path of the node within the whole tree. For resources this
    /// is the type root followed by the id.
    pub fn tree_path(&self) -> String {
        match self {
            NodeKind::Directory { path, .. } => path.clone(),
            NodeKind::File { path } => path.clone(),
            NodeKind::Resource { kind, id } => paths::join(kind.dir_name(), id),
        }
    }

    /// Leaf name shown in the tree.
    pub fn leaf(&self) -> &str {
        match self {
            NodeKind::Directory { path, .. } => paths::leaf_of(path),
            NodeKind::File { path } => paths::leaf_of(path),
            NodeKind::Resource { id, .. } => paths::leaf_of(id),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_path_of_resource_includes_type_root() {
        let kind = NodeKind::Resource {
            kind: ResourceType::Sprite,
            id: "enemies/soldier".to_string(),
        };
        assert_eq!(kind.tree_path(), "sprites/enemies/soldier");
        assert_eq!(kind.leaf(), "soldier");
    }

    #[test]
    fn test_tree_path_of_directory_is_its_path() {
        let kind = NodeKind::Directory {
            path: "maps/old".to_string(),
            resource_root: None,
        };
        assert_eq!(kind.tree_path(), "maps/old");
        assert_eq!(kind.leaf(), "old");
        assert!(kind.is_directory());
    }
}
