//! Quest project facade: root directory, properties, database, and the
//! data-directory scan the tree is built from.

use crate::error::{FileMoveError, QuestError};
use crate::registry::{persistence, ProjectDatabase};
use crate::relocate::FileMover;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Properties file name, relative to the project root.
pub const PROPERTIES_FILE: &str = "quest.toml";

/// Directory holding the quest data the tree mirrors.
pub const DATA_DIR: &str = "data";

/// Quest metadata from `quest.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestProperties {
    /// Version of the project layout this quest was written for.
    pub format_version: String,

    /// Title shown by the editor.
    pub title: String,

    /// Directory the engine writes savegames into, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_dir: Option<String>,
}

/// Directories and files found under the data directory, as relative slash
/// paths.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

/// An opened quest project: canonical root, properties, and the resource
/// database.
#[derive(Debug)]
pub struct QuestProject {
    root: PathBuf,
    properties: QuestProperties,
    database: ProjectDatabase,
}

impl QuestProject {
    /// Open the project at `root`. Requires `quest.toml`; a missing database
    /// file means an empty database, matching a freshly created project.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, QuestError> {
        let root = dunce::canonicalize(root.as_ref()).map_err(|source| QuestError::Read {
            path: root.as_ref().to_path_buf(),
            source,
        })?;
        let properties_path = root.join(PROPERTIES_FILE);
        if !properties_path.is_file() {
            return Err(QuestError::NotAProject(root));
        }
        let content =
            std::fs::read_to_string(&properties_path).map_err(|source| QuestError::Read {
                path: properties_path.clone(),
                source,
            })?;
        let properties: QuestProperties =
            toml::from_str(&content).map_err(|source| QuestError::Parse {
                path: properties_path,
                source,
            })?;

        let database_path = root.join(persistence::DATABASE_FILE);
        let database = if database_path.is_file() {
            persistence::load(&database_path)?
        } else {
            ProjectDatabase::new()
        };

        debug!(root = %root.display(), resources = database.len(), "opened quest project");
        Ok(Self {
            root,
            properties,
            database,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn properties(&self) -> &QuestProperties {
        &self.properties
    }

    pub fn database(&self) -> &ProjectDatabase {
        &self.database
    }

    pub fn database_mut(&mut self) -> &mut ProjectDatabase {
        &mut self.database
    }

    /// Persist the database snapshot back to the project root.
    pub fn save_database(&self) -> Result<(), QuestError> {
        persistence::save(&self.database, &self.root.join(persistence::DATABASE_FILE))
    }

    /// Walk the data directory. Hidden entries are skipped with their whole
    /// subtree; a missing data directory scans as empty.
    pub fn scan(&self) -> Result<ScanResult, QuestError> {
        let data_dir = self.data_dir();
        let mut result = ScanResult::default();
        if !data_dir.is_dir() {
            return Ok(result);
        }
        let walker = WalkDir::new(&data_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !entry.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = entry.map_err(|source| QuestError::Read {
                path: data_dir.clone(),
                source: source.into(),
            })?;
            let relative = match entry.path().strip_prefix(&data_dir) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let slash_path = relative
                .iter()
                .map(|segment| segment.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_dir() {
                result.directories.push(slash_path);
            } else if entry.file_type().is_file() {
                result.files.push(slash_path);
            }
        }
        Ok(result)
    }
}

/// Moves files inside the project data directory with `std::fs::rename`.
/// Refuses to overwrite an existing destination.
#[derive(Debug)]
pub struct SystemFileMover {
    data_dir: PathBuf,
}

impl SystemFileMover {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

impl FileMover for SystemFileMover {
    fn move_file(&mut self, old_path: &str, new_path: &str) -> Result<(), FileMoveError> {
        let from = self.data_dir.join(old_path);
        let to = self.data_dir.join(new_path);
        if !from.exists() {
            return Err(FileMoveError::SourceMissing(old_path.to_string()));
        }
        if to.exists() {
            return Err(FileMoveError::DestinationExists(new_path.to_string()));
        }
        std::fs::rename(&from, &to).map_err(|source| FileMoveError::Io {
            from: old_path.to_string(),
            to: new_path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_quest_toml(root: &Path) {
        fs::write(
            root.join(PROPERTIES_FILE),
            "format_version = \"1.6\"\ntitle = \"Test Quest\"\n",
        )
        .unwrap();
    }

    #[test]
    fn test_open_requires_quest_toml() {
        let dir = tempfile::tempdir().unwrap();
        let err = QuestProject::open(dir.path());
        assert!(matches!(err, Err(QuestError::NotAProject(_))));
    }

    #[test]
    fn test_open_reads_properties_and_empty_database() {
        let dir = tempfile::tempdir().unwrap();
        write_quest_toml(dir.path());

        let project = QuestProject::open(dir.path()).unwrap();
        assert_eq!(project.properties().title, "Test Quest");
        assert_eq!(project.properties().format_version, "1.6");
        assert_eq!(project.properties().write_dir, None);
        assert!(project.database().is_empty());
    }

    #[test]
    fn test_scan_splits_directories_and_files() {
        let dir = tempfile::tempdir().unwrap();
        write_quest_toml(dir.path());
        let data = dir.path().join(DATA_DIR);
        fs::create_dir_all(data.join("maps/old")).unwrap();
        fs::write(data.join("maps/dungeon1.dat"), "x").unwrap();
        fs::write(data.join("main.lua"), "-- entry").unwrap();
        fs::create_dir_all(data.join(".git")).unwrap();
        fs::write(data.join(".git/config"), "hidden").unwrap();

        let project = QuestProject::open(dir.path()).unwrap();
        let scan = project.scan().unwrap();

        assert_eq!(scan.directories, vec!["maps", "maps/old"]);
        assert_eq!(scan.files, vec!["main.lua", "maps/dungeon1.dat"]);
    }

    #[test]
    fn test_scan_without_data_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_quest_toml(dir.path());

        let project = QuestProject::open(dir.path()).unwrap();
        let scan = project.scan().unwrap();
        assert!(scan.directories.is_empty());
        assert!(scan.files.is_empty());
    }

    #[test]
    fn test_system_file_mover_renames() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().to_path_buf();
        fs::create_dir_all(data.join("maps/old")).unwrap();
        fs::write(data.join("maps/dungeon1.dat"), "payload").unwrap();

        let mut mover = SystemFileMover::new(data.clone());
        mover.move_file("maps/dungeon1.dat", "maps/old/dungeon1.dat").unwrap();

        assert!(!data.join("maps/dungeon1.dat").exists());
        assert_eq!(
            fs::read_to_string(data.join("maps/old/dungeon1.dat")).unwrap(),
            "payload"
        );
    }

    #[test]
    fn test_system_file_mover_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().to_path_buf();
        fs::create_dir_all(data.join("maps/old")).unwrap();
        fs::write(data.join("maps/dungeon1.dat"), "new").unwrap();
        fs::write(data.join("maps/old/dungeon1.dat"), "existing").unwrap();

        let mut mover = SystemFileMover::new(data.clone());
        let err = mover.move_file("maps/dungeon1.dat", "maps/old/dungeon1.dat");

        assert!(matches!(err, Err(FileMoveError::DestinationExists(_))));
        assert_eq!(
            fs::read_to_string(data.join("maps/old/dungeon1.dat")).unwrap(),
            "existing"
        );
    }

    #[test]
    fn test_system_file_mover_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut mover = SystemFileMover::new(dir.path().to_path_buf());
        let err = mover.move_file("ghost.dat", "elsewhere.dat");
        assert!(matches!(err, Err(FileMoveError::SourceMissing(_))));
    }

    #[test]
    fn test_save_database_roundtrip() {
        use crate::registry::ResourceDeclaration;
        use crate::resource::ResourceType::Sprite;

        let dir = tempfile::tempdir().unwrap();
        write_quest_toml(dir.path());

        let mut project = QuestProject::open(dir.path()).unwrap();
        project
            .database_mut()
            .declare(Sprite, "enemies/soldier", ResourceDeclaration::described("Soldier"))
            .unwrap();
        project.save_database().unwrap();

        let reloaded = QuestProject::open(dir.path()).unwrap();
        assert!(reloaded.database().contains(Sprite, "enemies/soldier"));
    }
}
