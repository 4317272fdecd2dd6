//! Cross-checks between the tree and the database.
//!
//! The invariants the relocation engine relies on: stored paths equal the
//! slash-join of ancestor names, tree paths are unique, resource leaves are
//! 1:1 with database entries and live under their type root.

use crate::error::TreeError;
use crate::paths;
use crate::registry::ProjectDatabase;
use crate::resource::ResourceType;
use crate::tree::{NodeId, NodeKind, QuestTree};
use std::collections::BTreeSet;

/// Validate `tree` against `database`. Returns one message per violation;
/// an empty list means the project is consistent.
pub fn check_project(
    tree: &QuestTree,
    database: &ProjectDatabase,
) -> Result<Vec<String>, TreeError> {
    let mut violations = Vec::new();
    let mut seen_paths = BTreeSet::new();
    let mut seen_resources = BTreeSet::new();

    walk(tree, tree.root(), &mut |node| {
        let kind = tree.kind(node)?;
        let path = kind.tree_path();

        if node != tree.root() {
            let parent = tree
                .parent(node)?
                .ok_or(TreeError::AlreadyDetached)?;
            let parent_path = tree.kind(parent)?.tree_path();
            let expected = paths::join(&parent_path, kind.leaf());
            if path != expected {
                violations.push(format!(
                    "stale path: '{}' should be '{}' under its parent",
                    path, expected
                ));
            }
        }

        if !seen_paths.insert(path.clone()) {
            violations.push(format!("duplicate tree path: '{}'", path));
        }

        if let NodeKind::Resource { kind, id } = kind {
            if !database.contains(*kind, id) {
                violations.push(format!("{} '{}' has no database entry", kind, id));
            }
            if !seen_resources.insert((*kind, id.clone())) {
                violations.push(format!("duplicate {} '{}' in the tree", kind, id));
            }
        }
        Ok(())
    })?;

    for kind in ResourceType::ALL {
        for id in database.ids_of(kind) {
            if !seen_resources.contains(&(kind, id.to_string())) {
                violations.push(format!("{} '{}' has no tree node", kind, id));
            }
        }
    }

    Ok(violations)
}

fn walk(
    tree: &QuestTree,
    node: NodeId,
    visit: &mut impl FnMut(NodeId) -> Result<(), TreeError>,
) -> Result<(), TreeError> {
    visit(node)?;
    for &child in tree.children(node)? {
        walk(tree, child, visit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResourceDeclaration;
    use crate::resource::ResourceType::{Map, Sprite};
    use crate::tree::TreeBuilder;

    #[test]
    fn test_consistent_project_has_no_violations() {
        let mut db = ProjectDatabase::new();
        db.declare(Sprite, "enemies/soldier", ResourceDeclaration::default())
            .unwrap();
        db.declare(Map, "dungeon1", ResourceDeclaration::default()).unwrap();
        let tree = TreeBuilder::new(&db)
            .with_files(vec!["main.lua".to_string()])
            .build()
            .unwrap();

        assert_eq!(check_project(&tree, &db).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_database_entry_without_node_reported() {
        let mut db = ProjectDatabase::new();
        db.declare(Sprite, "soldier", ResourceDeclaration::default()).unwrap();
        let tree = TreeBuilder::new(&ProjectDatabase::new()).build().unwrap();

        let violations = check_project(&tree, &db).unwrap();
        assert_eq!(violations, vec!["sprite 'soldier' has no tree node".to_string()]);
    }

    #[test]
    fn test_node_without_database_entry_reported() {
        let db = ProjectDatabase::new();
        let mut tree = TreeBuilder::new(&db).build().unwrap();
        let sprites = tree.find("sprites").unwrap();
        tree.add_resource(sprites, Sprite, "phantom").unwrap();

        let violations = check_project(&tree, &db).unwrap();
        assert_eq!(
            violations,
            vec!["sprite 'phantom' has no database entry".to_string()]
        );
    }
}
