//! Tooling layer: the command-line surface over the relocation core.
//!
//! The CLI owns no business logic; like any drag layer, it only resolves
//! tree coordinates and invokes the engine, then renders the outcome.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
