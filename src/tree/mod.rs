//! In-memory project tree.
//!
//! Arena of nodes addressed by stable `NodeId` handles; parent/child
//! relations are handle references, so detach and attach are cheap and
//! reversible. The tree is a view: structural mutation here never touches
//! the resource database.

pub mod builder;
mod node;

pub use builder::TreeBuilder;
pub use node::{NodeId, NodeKind};

use crate::error::TreeError;
use crate::paths;
use crate::resource::ResourceType;
use node::Node;

/// The project tree. The root is an unnamed directory (path `""`); type
/// roots and plain files hang below it.
#[derive(Debug, Clone)]
pub struct QuestTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for QuestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestTree {
    /// Empty tree: a root directory and nothing else.
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Directory {
                path: String::new(),
                resource_root: None,
            },
        };
        QuestTree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::StaleHandle(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id.0).ok_or(TreeError::StaleHandle(id))
    }

    /// Payload of `id`.
    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, TreeError> {
        Ok(&self.node(id)?.kind)
    }

    /// Parent of `id`; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    /// Children of `id`, in insertion order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.node(id)?.children)
    }

    /// Lookup by structural path. Only nodes reachable from the root are
    /// found; absence is `None`, not an error.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root);
        }
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            for &child in &self.nodes[id.0].children {
                if self.nodes[child.0].kind.tree_path() == path {
                    return Some(child);
                }
                stack.push(child);
            }
        }
        None
    }

    /// Number of nodes reachable from the root, the root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[id.0].children.iter().copied());
        }
        count
    }

    /// Remove `id` from its parent's children. The node keeps its payload
    /// and handle; detaching the root is a programmer error.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = match self.node(id)?.parent {
            Some(parent) => parent,
            None if id == self.root => return Err(TreeError::DetachRoot),
            None => return Err(TreeError::AlreadyDetached),
        };
        self.node_mut(parent)?.children.retain(|&child| child != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Insert a detached `id` under `new_parent` and rewrite its stored path
    /// or id from the parent's location plus `leaf`. Directories cascade the
    /// rewrite through their whole subtree, keeping every descendant's
    /// stored path equal to the slash-join of its ancestors' names.
    pub fn attach(&mut self, id: NodeId, new_parent: NodeId, leaf: &str) -> Result<(), TreeError> {
        let parent_path = match self.node(new_parent)?.kind {
            NodeKind::Directory { ref path, .. } => path.clone(),
            _ => return Err(TreeError::AttachTargetNotDirectory),
        };
        if self.node(id)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }
        self.rewrite_location(id, &parent_path, leaf)?;
        self.node_mut(new_parent)?.children.push(id);
        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    fn rewrite_location(
        &mut self,
        id: NodeId,
        parent_path: &str,
        leaf: &str,
    ) -> Result<(), TreeError> {
        let new_kind = match self.node(id)?.kind.clone() {
            NodeKind::Directory { resource_root, .. } => NodeKind::Directory {
                path: paths::join(parent_path, leaf),
                resource_root,
            },
            NodeKind::File { .. } => NodeKind::File {
                path: paths::join(parent_path, leaf),
            },
            NodeKind::Resource { kind, .. } => {
                // the id is scoped inside the type root: drop that segment
                // from the parent path before joining
                let prefix = paths::strip_root(parent_path, kind.dir_name())
                    .ok_or(TreeError::ResourceOutsideTypeRoot)?;
                NodeKind::Resource {
                    kind,
                    id: paths::join(prefix, leaf),
                }
            }
        };
        self.node_mut(id)?.kind = new_kind;

        let children = self.node(id)?.children.clone();
        if !children.is_empty() {
            let own_path = self.node(id)?.kind.tree_path();
            for child in children {
                let child_leaf = self.node(child)?.kind.leaf().to_string();
                self.rewrite_location(child, &own_path, &child_leaf)?;
            }
        }
        Ok(())
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create and attach a directory child.
    pub fn add_directory(
        &mut self,
        parent: NodeId,
        leaf: &str,
        resource_root: Option<ResourceType>,
    ) -> Result<NodeId, TreeError> {
        let id = self.push_node(NodeKind::Directory {
            path: String::new(),
            resource_root,
        });
        self.attach(id, parent, leaf)?;
        Ok(id)
    }

    /// Create and attach a resource leaf. The parent must lie under the
    /// type's root directory.
    pub fn add_resource(
        &mut self,
        parent: NodeId,
        kind: ResourceType,
        leaf: &str,
    ) -> Result<NodeId, TreeError> {
        let id = self.push_node(NodeKind::Resource {
            kind,
            id: String::new(),
        });
        self.attach(id, parent, leaf)?;
        Ok(id)
    }

    /// Create and attach a plain-file leaf.
    pub fn add_file(&mut self, parent: NodeId, leaf: &str) -> Result<NodeId, TreeError> {
        let id = self.push_node(NodeKind::File {
            path: String::new(),
        });
        self.attach(id, parent, leaf)?;
        Ok(id)
    }

    /// Sort every directory's children: directories first, then leaves, each
    /// group by leaf name. Display order only; correctness never depends on
    /// it.
    pub(crate) fn sort_children(&mut self) {
        for index in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by_key(|&child| {
                let kind = &self.nodes[child.0].kind;
                (!kind.is_directory(), kind.leaf().to_string())
            });
            self.nodes[index].children = children;
        }
    }
}
