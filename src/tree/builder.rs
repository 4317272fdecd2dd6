//! Builds the project tree from the database snapshot and a scan of the
//! data directory.

use super::{NodeId, QuestTree};
use crate::error::TreeError;
use crate::paths;
use crate::registry::ProjectDatabase;
use crate::resource::ResourceType;
use tracing::debug;

/// Assembles a `QuestTree` the way the editor presents a project: one root
/// directory per resource type, intermediate directories materialized from
/// id prefixes, then the plain directories and files the scan found.
/// Deterministic for a given database and scan.
pub struct TreeBuilder<'a> {
    database: &'a ProjectDatabase,
    directories: Vec<String>,
    files: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(database: &'a ProjectDatabase) -> Self {
        Self {
            database,
            directories: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Relative slash paths of scanned directories, so empty directories
    /// still show up in the tree.
    pub fn with_directories(mut self, directories: Vec<String>) -> Self {
        self.directories = directories;
        self
    }

    /// Relative slash paths of scanned plain files. Paths already
    /// represented by a resource or directory node are skipped.
    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn build(self) -> Result<QuestTree, TreeError> {
        let mut tree = QuestTree::new();
        let root = tree.root();

        for kind in ResourceType::ALL {
            let type_root = tree.add_directory(root, kind.dir_name(), Some(kind))?;
            for id in self.database.ids_of(kind) {
                let parent =
                    ensure_directories(&mut tree, type_root, paths::directory_of(id))?;
                tree.add_resource(parent, kind, paths::leaf_of(id))?;
            }
        }

        let mut directories = self.directories;
        directories.sort();
        for dir in directories {
            if tree.find(&dir).is_none() {
                ensure_directories(&mut tree, root, &dir)?;
            }
        }

        let mut files = self.files;
        files.sort();
        for file in files {
            if tree.find(&file).is_some() {
                continue;
            }
            let parent = ensure_directories(&mut tree, root, paths::directory_of(&file))?;
            tree.add_file(parent, paths::leaf_of(&file))?;
        }

        tree.sort_children();
        debug!(nodes = tree.node_count(), "built project tree");
        Ok(tree)
    }
}

/// Walk `relative` below `base`, creating directory nodes for the segments
/// that do not exist yet. Returns the innermost directory.
fn ensure_directories(
    tree: &mut QuestTree,
    base: NodeId,
    relative: &str,
) -> Result<NodeId, TreeError> {
    let mut current = base;
    if relative.is_empty() {
        return Ok(current);
    }
    for segment in relative.split('/') {
        let base_path = tree.kind(current)?.tree_path();
        let child_path = paths::join(&base_path, segment);
        current = match tree.find(&child_path) {
            Some(existing) if tree.kind(existing)?.is_directory() => existing,
            Some(_) => return Err(TreeError::AttachTargetNotDirectory),
            None => tree.add_directory(current, segment, None)?,
        };
    }
    Ok(current)
}
