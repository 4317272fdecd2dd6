//! TOML persistence for the project database.
//!
//! The snapshot lives in `project_db.toml` at the project root, one table
//! per resource type keyed by the type label:
//!
//! ```toml
//! [sprite."enemies/soldier"]
//! description = "Basic soldier"
//! ```
//!
//! BTreeMap ordering keeps the file diff-stable across saves.

use super::{ProjectDatabase, ResourceDeclaration};
use crate::error::QuestError;
use crate::resource::ResourceType;
use std::collections::BTreeMap;
use std::path::Path;

/// Database file name, relative to the project root.
pub const DATABASE_FILE: &str = "project_db.toml";

/// On-disk shape: type label -> id -> declaration.
type RawDatabase = BTreeMap<String, BTreeMap<String, ResourceDeclaration>>;

/// Load a database snapshot. An unknown type label is a parse-level failure,
/// not something to silently drop.
pub fn load(path: &Path) -> Result<ProjectDatabase, QuestError> {
    let content = std::fs::read_to_string(path).map_err(|source| QuestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawDatabase = toml::from_str(&content).map_err(|source| QuestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    from_raw(raw)
}

/// Save a database snapshot.
pub fn save(database: &ProjectDatabase, path: &Path) -> Result<(), QuestError> {
    let raw = to_raw(database);
    let content = toml::to_string_pretty(&raw).map_err(|source| QuestError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(|source| QuestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn from_raw(raw: RawDatabase) -> Result<ProjectDatabase, QuestError> {
    let mut database = ProjectDatabase::new();
    for (label, entries) in raw {
        let kind = ResourceType::parse(&label)
            .ok_or_else(|| QuestError::UnknownResourceType(label.clone()))?;
        for (id, declaration) in entries {
            database
                .declare(kind, &id, declaration)
                .map_err(|_| QuestError::DuplicateResource {
                    kind,
                    id: id.clone(),
                })?;
        }
    }
    Ok(database)
}

fn to_raw(database: &ProjectDatabase) -> RawDatabase {
    let mut raw = RawDatabase::new();
    for kind in ResourceType::ALL {
        let ids = database.ids_of(kind);
        if ids.is_empty() {
            continue;
        }
        let entries = ids
            .into_iter()
            .map(|id| {
                let declaration = database
                    .get(kind, id)
                    .cloned()
                    .unwrap_or_default();
                (id.to_string(), declaration)
            })
            .collect();
        raw.insert(kind.label().to_string(), entries);
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceType::{Map, Sprite};

    fn sample_database() -> ProjectDatabase {
        let mut db = ProjectDatabase::new();
        db.declare(Sprite, "enemies/soldier", ResourceDeclaration::described("Soldier"))
            .unwrap();
        db.declare(Sprite, "heroes/knight", ResourceDeclaration::described("Knight"))
            .unwrap();
        db.declare(Map, "dungeon1", ResourceDeclaration::described("First dungeon"))
            .unwrap();
        db
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATABASE_FILE);

        let db = sample_database();
        save(&db, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(
            loaded.get(Sprite, "enemies/soldier").unwrap().description,
            "Soldier"
        );
        assert_eq!(loaded.get(Map, "dungeon1").unwrap().description, "First dungeon");
    }

    #[test]
    fn test_load_unknown_type_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATABASE_FILE);
        std::fs::write(&path, "[shader.\"glow\"]\ndescription = \"x\"\n").unwrap();

        let err = load(&path);
        assert!(matches!(err, Err(QuestError::UnknownResourceType(_))));
    }

    #[test]
    fn test_snapshot_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.toml");
        let path_b = dir.path().join("b.toml");

        let db = sample_database();
        save(&db, &path_a).unwrap();
        save(&load(&path_a).unwrap(), &path_b).unwrap();

        let a = std::fs::read_to_string(&path_a).unwrap();
        let b = std::fs::read_to_string(&path_b).unwrap();
        assert_eq!(a, b);
    }
}
