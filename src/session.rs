//! Project session: serializes relocations behind a single lock.
//!
//! One relocation runs to completion, confirmation round-trip included,
//! before another may start. The lock covers the database rename and the
//! tree restructure together, so the transactional pairing survives if a
//! session is ever shared across threads.

use crate::error::QuestError;
use crate::project::{QuestProject, SystemFileMover};
use crate::relocate::{ConfirmRelocation, DropOutcome, RelocationEngine};
use crate::tree::{NodeId, NodeKind, QuestTree, TreeBuilder};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct SessionState {
    project: QuestProject,
    tree: QuestTree,
    mover: SystemFileMover,
}

/// Shared handle to one open project and its tree.
#[derive(Clone)]
pub struct ProjectSession {
    state: Arc<Mutex<SessionState>>,
}

impl ProjectSession {
    /// Open the project at `root` and build its tree from the database and
    /// a fresh data-directory scan.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, QuestError> {
        let project = QuestProject::open(root)?;
        let scan = project.scan()?;
        let tree = TreeBuilder::new(project.database())
            .with_directories(scan.directories)
            .with_files(scan.files)
            .build()?;
        let mover = SystemFileMover::new(project.data_dir());
        Ok(Self {
            state: Arc::new(Mutex::new(SessionState {
                project,
                tree,
                mover,
            })),
        })
    }

    /// Run one drop attempt to completion under the session lock. An
    /// applied resource move persists the database before the lock is
    /// released.
    pub fn relocate(
        &self,
        dragged: NodeId,
        drop_target: NodeId,
        confirm: &mut dyn ConfirmRelocation,
    ) -> Result<DropOutcome, QuestError> {
        let mut guard = self.state.lock();
        let SessionState {
            project,
            tree,
            mover,
        } = &mut *guard;

        let dragged_resource = matches!(tree.kind(dragged)?, NodeKind::Resource { .. });
        let outcome = RelocationEngine::new(tree, project.database_mut(), mover, confirm)
            .attempt_drop(dragged, drop_target)?;

        if dragged_resource && outcome.is_applied() {
            project.save_database()?;
        }
        Ok(outcome)
    }

    /// Lookup by structural path.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.state.lock().tree.find(path)
    }

    /// Read access to the tree.
    pub fn with_tree<T>(&self, f: impl FnOnce(&QuestTree) -> T) -> T {
        f(&self.state.lock().tree)
    }

    /// Read access to the project.
    pub fn with_project<T>(&self, f: impl FnOnce(&QuestProject) -> T) -> T {
        f(&self.state.lock().project)
    }

    /// Read access to the tree and project under one lock acquisition.
    pub fn with_state<T>(&self, f: impl FnOnce(&QuestTree, &QuestProject) -> T) -> T {
        let guard = self.state.lock();
        f(&guard.tree, &guard.project)
    }
}
