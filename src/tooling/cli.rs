//! Command-line interface.
//!
//! Project-scoped commands over the open session. `move` is the
//! drag-and-drop stand-in: it resolves two tree paths and hands them to the
//! relocation engine, exactly as a drag gesture would.

use crate::error::QuestError;
use crate::relocate::{ConfirmRelocation, DropOutcome};
use crate::resource::ResourceType;
use crate::session::ProjectSession;
use crate::tooling::format;
use crate::validate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Questree CLI - resource tree management for quest projects
#[derive(Parser)]
#[command(name = "questree")]
#[command(about = "Resource tree management for quest projects")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the project tree
    Tree,
    /// Show per-type resource counts
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List resources of one type
    List {
        /// Resource type (map, tileset, sprite, ...)
        kind: String,
    },
    /// Validate tree and database invariants
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Move a resource or file onto a directory
    Move {
        /// Tree path of the node to move
        source: String,
        /// Tree path of the drop target
        target: String,
        /// Apply without asking for confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// One row of `status --format json`.
#[derive(Serialize)]
struct StatusEntry {
    kind: String,
    root: String,
    count: usize,
}

/// `status --format json` output.
#[derive(Serialize)]
struct StatusOutput {
    title: String,
    resources: Vec<StatusEntry>,
    total: usize,
    tree_nodes: usize,
}

/// `check --format json` output.
#[derive(Serialize)]
struct CheckOutput {
    valid: bool,
    violations: Vec<String>,
}

/// Confirmation through an interactive terminal prompt.
struct PromptConfirm;

impl ConfirmRelocation for PromptConfirm {
    fn confirm(&mut self, type_label: &str, old_id: &str, new_id: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(format!(
                "Change the id of the {} '{}' to '{}'?",
                type_label, old_id, new_id
            ))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Confirmation that always accepts (`--yes`).
struct AutoConfirm;

impl ConfirmRelocation for AutoConfirm {
    fn confirm(&mut self, type_label: &str, old_id: &str, new_id: &str) -> bool {
        info!(type_label, old_id, new_id, "auto-confirmed");
        true
    }
}

/// Execution context holding the open session.
pub struct CliContext {
    session: ProjectSession,
}

impl CliContext {
    pub fn new(project_root: PathBuf) -> Result<Self, QuestError> {
        Ok(Self {
            session: ProjectSession::open(project_root)?,
        })
    }

    /// Execute one command, returning its rendered output. A rejected move
    /// comes back as an error so the binary can exit nonzero.
    pub fn execute(&self, command: &Commands) -> Result<String, QuestError> {
        match command {
            Commands::Tree => Ok(self
                .session
                .with_tree(|tree| format::format_tree(tree))?),
            Commands::Status { format } => self.status(format),
            Commands::List { kind } => {
                let kind = ResourceType::parse(kind)
                    .ok_or_else(|| QuestError::UnknownResourceType(kind.clone()))?;
                Ok(self
                    .session
                    .with_project(|p| format::format_resource_list_text(p.database(), kind)))
            }
            Commands::Check { format } => self.check(format),
            Commands::Move {
                source,
                target,
                yes,
            } => self.relocate(source, target, *yes),
        }
    }

    fn status(&self, output_format: &str) -> Result<String, QuestError> {
        self.session.with_state(|tree, project| {
            let nodes = tree.node_count();
            match output_format {
                "json" => {
                    let output = StatusOutput {
                        title: project.properties().title.clone(),
                        resources: ResourceType::ALL
                            .into_iter()
                            .map(|kind| StatusEntry {
                                kind: kind.label().to_string(),
                                root: kind.dir_name().to_string(),
                                count: project.database().count_of(kind),
                            })
                            .collect(),
                        total: project.database().len(),
                        tree_nodes: nodes,
                    };
                    Ok(serde_json::to_string_pretty(&output)?)
                }
                _ => Ok(format::format_status_text(
                    &project.properties().title,
                    project.database(),
                    nodes,
                )),
            }
        })
    }

    fn check(&self, output_format: &str) -> Result<String, QuestError> {
        let violations = self
            .session
            .with_state(|tree, project| validate::check_project(tree, project.database()))?;
        match output_format {
            "json" => {
                let output = CheckOutput {
                    valid: violations.is_empty(),
                    violations,
                };
                Ok(serde_json::to_string_pretty(&output)?)
            }
            _ => Ok(format::format_check_text(&violations)),
        }
    }

    fn relocate(&self, source: &str, target: &str, yes: bool) -> Result<String, QuestError> {
        let dragged = self
            .session
            .find(source)
            .ok_or_else(|| QuestError::NoSuchNode(source.to_string()))?;
        let drop_target = self
            .session
            .find(target)
            .ok_or_else(|| QuestError::NoSuchNode(target.to_string()))?;

        let outcome = if yes {
            self.session.relocate(dragged, drop_target, &mut AutoConfirm)?
        } else {
            self.session.relocate(dragged, drop_target, &mut PromptConfirm)?
        };

        match outcome {
            DropOutcome::Applied { node } => {
                let new_path = self
                    .session
                    .with_tree(|tree| tree.kind(node).map(|kind| kind.tree_path()))?;
                Ok(format!("Moved '{}' to '{}'.", source, new_path))
            }
            DropOutcome::Rejected(rejection) => Err(QuestError::MoveRejected(rejection)),
        }
    }
}
