//! Resource-tree relocation engine.
//!
//! The single entry point a drag layer calls: validate a dragged node
//! against a drop target, compute the new identifier or path, ask the user,
//! then apply the database rename and the tree restructure as one
//! transaction. Database first, tree second; the tree is never touched when
//! the authoritative move fails.

use crate::error::{FileMoveError, RegistryError, RelocateError, TreeError};
use crate::paths;
use crate::registry::ResourceRegistry;
use crate::resource::ResourceType;
use crate::tree::{NodeId, NodeKind, QuestTree};
use std::fmt;
use tracing::{debug, info};

/// Why a drop was not applied. Expected outcomes, not errors: no tag here
/// leaves the tree or the database corrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Node dropped onto itself.
    SelfDrop,
    /// Drop location does not resolve to a directory.
    NotADirectory,
    /// Resource dropped outside its own type's root directory.
    TypeMismatch,
    /// Computed destination equals the current location.
    NoOpIdentical,
    /// The confirmation callback declined.
    UserDeclined,
    /// Directories do not relocate via drag-and-drop.
    CannotMoveDirectory,
    /// The database rejected the rename; the tree was left untouched.
    RegistryMoveFailed(RegistryError),
    /// The filesystem move failed; the tree was left untouched.
    FileMoveFailed(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::SelfDrop => write!(f, "a node cannot be dropped onto itself"),
            Rejection::NotADirectory => write!(f, "the drop location is not a directory"),
            Rejection::TypeMismatch => {
                write!(f, "a resource can only move within its own type's directory")
            }
            Rejection::NoOpIdentical => write!(f, "the node is already there"),
            Rejection::UserDeclined => write!(f, "declined"),
            Rejection::CannotMoveDirectory => {
                write!(f, "directories cannot be moved by drag-and-drop")
            }
            Rejection::RegistryMoveFailed(err) => write!(f, "{}", err),
            Rejection::FileMoveFailed(err) => write!(f, "{}", err),
        }
    }
}

/// Outcome of one drop attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The move was applied; `node` still addresses the moved node.
    Applied { node: NodeId },
    Rejected(Rejection),
}

impl DropOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DropOutcome::Applied { .. })
    }
}

/// Blocking user confirmation for a resource id change. No timeout: the
/// engine waits until the callback decides.
pub trait ConfirmRelocation {
    /// Present `(type label, old id, new id)` and wait for a decision.
    fn confirm(&mut self, type_label: &str, old_id: &str, new_id: &str) -> bool;
}

/// Adapter so a closure can stand in for the confirmation dialog, e.g. a
/// scripted answer in tests.
pub struct FnConfirm<F>(pub F);

impl<F: FnMut(&str, &str, &str) -> bool> ConfirmRelocation for FnConfirm<F> {
    fn confirm(&mut self, type_label: &str, old_id: &str, new_id: &str) -> bool {
        (self.0)(type_label, old_id, new_id)
    }
}

/// Filesystem move collaborator. Paths are relative slash paths below the
/// project data directory.
pub trait FileMover {
    fn move_file(&mut self, old_path: &str, new_path: &str) -> Result<(), FileMoveError>;
}

/// Relocation engine over one tree and its collaborators. Everything is
/// borrowed mutably for the duration of one drop, which keeps the apply
/// step non-reentrant by construction.
pub struct RelocationEngine<'a> {
    tree: &'a mut QuestTree,
    registry: &'a mut dyn ResourceRegistry,
    mover: &'a mut dyn FileMover,
    confirm: &'a mut dyn ConfirmRelocation,
}

impl<'a> RelocationEngine<'a> {
    pub fn new(
        tree: &'a mut QuestTree,
        registry: &'a mut dyn ResourceRegistry,
        mover: &'a mut dyn FileMover,
        confirm: &'a mut dyn ConfirmRelocation,
    ) -> Self {
        Self {
            tree,
            registry,
            mover,
            confirm,
        }
    }

    /// Attempt to drop `dragged` onto `drop_target`. Expected rejections
    /// come back as `DropOutcome::Rejected`; only invariant breaches (stale
    /// handles) surface as errors.
    pub fn attempt_drop(
        &mut self,
        dragged: NodeId,
        drop_target: NodeId,
    ) -> Result<DropOutcome, RelocateError> {
        if dragged == drop_target {
            return Ok(DropOutcome::Rejected(Rejection::SelfDrop));
        }
        let target_dir = match self.effective_target(drop_target)? {
            Some(dir) => dir,
            None => return Ok(DropOutcome::Rejected(Rejection::NotADirectory)),
        };
        match self.tree.kind(dragged)?.clone() {
            NodeKind::Resource { kind, id } => self.drop_resource(dragged, target_dir, kind, &id),
            NodeKind::Directory { .. } => {
                Ok(DropOutcome::Rejected(Rejection::CannotMoveDirectory))
            }
            NodeKind::File { path } => self.drop_file(dragged, target_dir, &path),
        }
    }

    /// Resolve the directory a drop lands in: dropping onto a resource means
    /// "into its containing folder", dropping onto a plain file means "next
    /// to this file".
    fn effective_target(&self, drop_target: NodeId) -> Result<Option<NodeId>, RelocateError> {
        let mut current = drop_target;
        if matches!(self.tree.kind(current)?, NodeKind::Resource { .. }) {
            match self.tree.parent(current)? {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
        if matches!(self.tree.kind(current)?, NodeKind::File { .. }) {
            match self.tree.parent(current)? {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
        match self.tree.kind(current)? {
            NodeKind::Directory { .. } => Ok(Some(current)),
            _ => Ok(None),
        }
    }

    fn directory_path(&self, id: NodeId) -> Result<String, RelocateError> {
        match self.tree.kind(id)? {
            NodeKind::Directory { path, .. } => Ok(path.clone()),
            _ => Err(TreeError::AttachTargetNotDirectory.into()),
        }
    }

    fn drop_resource(
        &mut self,
        dragged: NodeId,
        target_dir: NodeId,
        kind: ResourceType,
        old_id: &str,
    ) -> Result<DropOutcome, RelocateError> {
        let target_path = self.directory_path(target_dir)?;

        // a resource only relocates inside its own type's subtree
        let prefix = match paths::strip_root(&target_path, kind.dir_name()) {
            Some(prefix) => prefix,
            None => return Ok(DropOutcome::Rejected(Rejection::TypeMismatch)),
        };

        // only the innermost segment of the old id survives the move: a
        // resource nested several levels deep flattens to one level under
        // the new location
        let leaf_id = paths::leaf_of(old_id);
        let new_id = paths::join(prefix, leaf_id);
        if new_id == old_id {
            return Ok(DropOutcome::Rejected(Rejection::NoOpIdentical));
        }

        if !self.confirm.confirm(kind.label(), old_id, &new_id) {
            debug!(kind = kind.label(), old_id, new_id = %new_id, "relocation declined");
            return Ok(DropOutcome::Rejected(Rejection::UserDeclined));
        }

        // database first: the tree only changes once the rename is
        // authoritative
        if let Err(err) = self.registry.move_resource(kind, old_id, &new_id) {
            debug!(kind = kind.label(), old_id, new_id = %new_id, %err, "registry rejected move");
            return Ok(DropOutcome::Rejected(Rejection::RegistryMoveFailed(err)));
        }
        self.tree.detach(dragged)?;
        self.tree.attach(dragged, target_dir, leaf_id)?;

        info!(kind = kind.label(), old_id, new_id = %new_id, "resource relocated");
        Ok(DropOutcome::Applied { node: dragged })
    }

    fn drop_file(
        &mut self,
        dragged: NodeId,
        target_dir: NodeId,
        old_path: &str,
    ) -> Result<DropOutcome, RelocateError> {
        let target_path = self.directory_path(target_dir)?;
        let leaf = paths::leaf_of(old_path);
        let new_path = paths::join(&target_path, leaf);
        if new_path == old_path {
            return Ok(DropOutcome::Rejected(Rejection::NoOpIdentical));
        }

        // filesystem first; the tree stays untouched on failure
        if let Err(err) = self.mover.move_file(old_path, &new_path) {
            debug!(old_path, new_path = %new_path, %err, "file move failed");
            return Ok(DropOutcome::Rejected(Rejection::FileMoveFailed(err.to_string())));
        }
        self.tree.detach(dragged)?;
        self.tree.attach(dragged, target_dir, leaf)?;

        info!(old_path, new_path = %new_path, "file relocated");
        Ok(DropOutcome::Applied { node: dragged })
    }
}
