//! Questree: resource tree management for quest projects.
//!
//! A quest project pairs a filesystem-like data tree with a flat, typed
//! database of resource identifiers that encode directory structure inside
//! the identifier string itself. The relocation engine keeps both sides
//! consistent when a tree node is moved.

pub mod error;
pub mod logging;
pub mod paths;
pub mod project;
pub mod registry;
pub mod relocate;
pub mod resource;
pub mod session;
pub mod tooling;
pub mod tree;
pub mod validate;
