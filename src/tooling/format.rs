//! Text rendering for CLI output.

use crate::error::TreeError;
use crate::registry::ProjectDatabase;
use crate::resource::ResourceType;
use crate::tree::{NodeId, NodeKind, QuestTree};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Render the tree as indented text: directories bold, resources tagged
/// with their type label.
pub fn format_tree(tree: &QuestTree) -> Result<String, TreeError> {
    let mut out = String::new();
    render_node(tree, tree.root(), 0, &mut out)?;
    Ok(out)
}

fn render_node(
    tree: &QuestTree,
    node: NodeId,
    depth: usize,
    out: &mut String,
) -> Result<(), TreeError> {
    let kind = tree.kind(node)?;
    let indent = "  ".repeat(depth);
    match kind {
        NodeKind::Directory { path, resource_root } => {
            let name = if path.is_empty() {
                "."
            } else {
                crate::paths::leaf_of(path)
            };
            match resource_root {
                Some(kind) => out.push_str(&format!(
                    "{}{}/  [{}]\n",
                    indent,
                    name.bold(),
                    kind.label()
                )),
                None => out.push_str(&format!("{}{}/\n", indent, name.bold())),
            }
        }
        NodeKind::Resource { kind, id } => out.push_str(&format!(
            "{}{}  ({})\n",
            indent,
            crate::paths::leaf_of(id),
            kind.label().cyan()
        )),
        NodeKind::File { path } => {
            out.push_str(&format!("{}{}\n", indent, crate::paths::leaf_of(path)))
        }
    }
    for &child in tree.children(node)? {
        render_node(tree, child, depth + 1, out)?;
    }
    Ok(())
}

/// Section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Per-type resource counts as a table.
pub fn format_status_text(title: &str, database: &ProjectDatabase, nodes: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(title)));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Root", "Resources"]);
    for kind in ResourceType::ALL {
        table.add_row(vec![
            kind.label().to_string(),
            format!("{}/", kind.dir_name()),
            database.count_of(kind).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!(
        "\nTotal: {} resources, {} tree nodes\n",
        database.len(),
        nodes
    ));
    out
}

/// Ids and descriptions of one type as a table.
pub fn format_resource_list_text(database: &ProjectDatabase, kind: ResourceType) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("{} resources", kind.label()))
    ));
    let ids = database.ids_of(kind);
    if ids.is_empty() {
        out.push_str("None declared.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Description"]);
    for id in ids {
        let description = database
            .get(kind, id)
            .map(|declaration| declaration.description.clone())
            .unwrap_or_default();
        table.add_row(vec![id.to_string(), description]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Check results as text: either a green OK or one line per violation.
pub fn format_check_text(violations: &[String]) -> String {
    if violations.is_empty() {
        return format!("{}\n", "Project is consistent.".green());
    }
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        format!("{} violation(s) found:", violations.len()).red()
    ));
    for violation in violations {
        out.push_str(&format!("  - {}\n", violation));
    }
    out
}
