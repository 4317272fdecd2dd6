//! Error types for questree.
//!
//! Expected drop rejections are plain values on the relocation engine
//! (`relocate::Rejection`), not errors; the enums here cover hard failures:
//! I/O, malformed project files, and structural misuse of the tree.

use crate::relocate::Rejection;
use crate::resource::ResourceType;
use crate::tree::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for project loading, persistence, and CLI operations.
#[derive(Debug, Error)]
pub enum QuestError {
    #[error("not a quest project: {0} (missing quest.toml)")]
    NotAProject(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("duplicate resource in database file: {kind} '{id}'")]
    DuplicateResource { kind: ResourceType, id: String },

    #[error("no node at '{0}'")]
    NoSuchNode(String),

    #[error("move rejected: {0}")]
    MoveRejected(Rejection),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid logging configuration: {0}")]
    Logging(String),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Relocate(#[from] RelocateError),
}

/// Failures from the resource database. `AlreadyExists` and `NotFound` are
/// the expected outcomes the relocation engine turns into drop rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: ResourceType, id: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: ResourceType, id: String },
}

/// Structural misuse of the tree: stale handles, detaching the root,
/// attaching under a leaf. These indicate caller bugs, not user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("stale node handle {0:?}")]
    StaleHandle(NodeId),

    #[error("cannot detach the tree root")]
    DetachRoot,

    #[error("node is already detached")]
    AlreadyDetached,

    #[error("node is still attached")]
    AlreadyAttached,

    #[error("attach target is not a directory")]
    AttachTargetNotDirectory,

    #[error("resource attached outside its type root directory")]
    ResourceOutsideTypeRoot,
}

/// Failures from the filesystem move collaborator.
#[derive(Debug, Error)]
pub enum FileMoveError {
    #[error("source does not exist: {0}")]
    SourceMissing(String),

    #[error("destination already exists: {0}")]
    DestinationExists(String),

    #[error("failed to move {from} to {to}: {source}")]
    Io {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
}

/// Hard failures from the relocation engine. Expected rejections never take
/// this path; only invariant breaches do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelocateError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}
