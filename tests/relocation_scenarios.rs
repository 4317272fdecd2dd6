//! End-to-end relocation scenarios against a real project on disk.

use questree::relocate::{ConfirmRelocation, DropOutcome, FnConfirm, Rejection};
use questree::resource::ResourceType::Sprite;
use questree::session::ProjectSession;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn accept_all() -> impl ConfirmRelocation {
    FnConfirm(|_: &str, _: &str, _: &str| true)
}

/// A small quest: one sprite nested under `enemies/`, a heroes directory to
/// move it into, and a loose map data file.
fn sample_quest() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("quest.toml"),
        "format_version = \"1.6\"\ntitle = \"Sample Quest\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("project_db.toml"),
        concat!(
            "[sprite.\"enemies/soldier\"]\n",
            "description = \"Basic soldier\"\n",
            "\n",
            "[map.\"dungeon1\"]\n",
            "description = \"First dungeon\"\n",
        ),
    )
    .unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("sprites/heroes")).unwrap();
    fs::create_dir_all(data.join("maps/old")).unwrap();
    fs::write(data.join("maps/dungeon1.dat"), "dungeon payload").unwrap();
    dir
}

fn read_db(root: &Path) -> String {
    fs::read_to_string(root.join("project_db.toml")).unwrap()
}

#[test]
fn sprite_dropped_into_heroes_gets_flattened_id() {
    let quest = sample_quest();
    let session = ProjectSession::open(quest.path()).unwrap();
    let soldier = session.find("sprites/enemies/soldier").unwrap();
    let heroes = session.find("sprites/heroes").unwrap();

    struct Recording(Vec<(String, String, String)>);
    impl ConfirmRelocation for Recording {
        fn confirm(&mut self, type_label: &str, old_id: &str, new_id: &str) -> bool {
            self.0.push((
                type_label.to_string(),
                old_id.to_string(),
                new_id.to_string(),
            ));
            true
        }
    }
    let mut confirm = Recording(Vec::new());

    let outcome = session.relocate(soldier, heroes, &mut confirm).unwrap();

    assert_eq!(outcome, DropOutcome::Applied { node: soldier });
    assert_eq!(
        confirm.0,
        vec![(
            "sprite".to_string(),
            "enemies/soldier".to_string(),
            "heroes/soldier".to_string()
        )]
    );
    assert!(session.with_project(|p| p.database().contains(Sprite, "heroes/soldier")));
    let snapshot = read_db(quest.path());
    assert!(snapshot.contains("heroes/soldier"));
    assert!(snapshot.contains("Basic soldier"));
}

#[test]
fn sprite_dropped_onto_map_directory_is_a_type_mismatch() {
    let quest = sample_quest();
    let session = ProjectSession::open(quest.path()).unwrap();
    let soldier = session.find("sprites/enemies/soldier").unwrap();
    let maps = session.find("maps").unwrap();

    let outcome = session
        .relocate(soldier, maps, &mut accept_all())
        .unwrap();

    assert_eq!(outcome, DropOutcome::Rejected(Rejection::TypeMismatch));
    assert!(session.with_project(|p| p.database().contains(Sprite, "enemies/soldier")));
}

#[test]
fn file_dropped_into_directory_moves_on_disk() {
    let quest = sample_quest();
    let session = ProjectSession::open(quest.path()).unwrap();
    let file = session.find("maps/dungeon1.dat").unwrap();
    let old = session.find("maps/old").unwrap();

    let outcome = session.relocate(file, old, &mut accept_all()).unwrap();

    assert!(outcome.is_applied());
    let data = quest.path().join("data");
    assert!(!data.join("maps/dungeon1.dat").exists());
    assert_eq!(
        fs::read_to_string(data.join("maps/old/dungeon1.dat")).unwrap(),
        "dungeon payload"
    );
    assert_eq!(session.find("maps/old/dungeon1.dat"), Some(file));
}

#[test]
fn directory_drag_is_always_rejected() {
    let quest = sample_quest();
    let session = ProjectSession::open(quest.path()).unwrap();
    let old = session.find("maps/old").unwrap();

    for target in ["maps", "sprites", "sprites/heroes"] {
        let target = session.find(target).unwrap();
        let outcome = session.relocate(old, target, &mut accept_all()).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Rejected(Rejection::CannotMoveDirectory)
        );
    }
}

#[test]
fn drop_onto_current_directory_changes_nothing_anywhere() {
    let quest = sample_quest();
    let before = read_db(quest.path());
    let session = ProjectSession::open(quest.path()).unwrap();
    let soldier = session.find("sprites/enemies/soldier").unwrap();
    let enemies = session.find("sprites/enemies").unwrap();

    let outcome = session
        .relocate(soldier, enemies, &mut accept_all())
        .unwrap();

    assert_eq!(outcome, DropOutcome::Rejected(Rejection::NoOpIdentical));
    assert_eq!(before, read_db(quest.path()));
    assert_eq!(session.find("sprites/enemies/soldier"), Some(soldier));
}

#[test]
fn occupied_destination_id_leaves_everything_untouched() {
    let quest = sample_quest();
    // occupy the destination id
    fs::write(
        quest.path().join("project_db.toml"),
        concat!(
            "[sprite.\"enemies/soldier\"]\n",
            "description = \"Basic soldier\"\n",
            "\n",
            "[sprite.\"heroes/soldier\"]\n",
            "description = \"Veteran\"\n",
        ),
    )
    .unwrap();
    let session = ProjectSession::open(quest.path()).unwrap();
    let soldier = session.find("sprites/enemies/soldier").unwrap();
    let heroes = session.find("sprites/heroes").unwrap();
    let enemies = session.find("sprites/enemies").unwrap();

    let outcome = session
        .relocate(soldier, heroes, &mut accept_all())
        .unwrap();

    assert!(matches!(
        outcome,
        DropOutcome::Rejected(Rejection::RegistryMoveFailed(_))
    ));
    assert_eq!(
        session.with_tree(|tree| tree.parent(soldier).unwrap()),
        Some(enemies)
    );
    assert!(session.with_project(|p| p.database().contains(Sprite, "enemies/soldier")));
}

#[test]
fn reopened_session_sees_the_applied_move() {
    let quest = sample_quest();
    {
        let session = ProjectSession::open(quest.path()).unwrap();
        let soldier = session.find("sprites/enemies/soldier").unwrap();
        let heroes = session.find("sprites/heroes").unwrap();
        session
            .relocate(soldier, heroes, &mut accept_all())
            .unwrap();
    }

    let reopened = ProjectSession::open(quest.path()).unwrap();
    assert!(reopened.find("sprites/heroes/soldier").is_some());
    assert!(reopened.find("sprites/enemies/soldier").is_none());
}
