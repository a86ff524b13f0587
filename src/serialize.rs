use crate::grid::build_grid;
use crate::node::{ContentTree, NodeId, NodeKind};

/// Convert a run of sibling nodes, starting at `start`, into plain text that
/// follows the rendered layout.
///
/// Tables become tab-separated rows, lists are flattened to one line per entry
/// regardless of depth, paragraphs are followed by a blank line and other
/// blocks by a single newline. Internal newlines are removed from everything
/// except preformatted blocks. `None` serializes to an empty string.
pub fn serialize(tree: &ContentTree, start: Option<NodeId>) -> String {
    let mut out = String::new();
    let mut current = start;

    while let Some(id) = current {
        let kind = tree.kind(id);

        match (kind, tree.first_child(id)) {
            (NodeKind::Table, _) => out.push_str(&table_to_text(tree, id)),
            (kind, Some(child)) if kind.is_list_family() => {
                out.push_str(serialize(tree, Some(child)).trim());
                out.push('\n');
            }
            _ => emit_block(tree, id, kind, &mut out),
        }

        current = tree.next_sibling(id);
    }

    out
}

/// Serialize a whole document, starting at the first child of its container.
pub fn serialize_document(tree: &ContentTree) -> String {
    serialize(tree, tree.first_child(tree.root()))
}

fn emit_block(tree: &ContentTree, id: NodeId, kind: NodeKind, out: &mut String) {
    let text = tree.text_content(id);
    let text = text.trim();

    if kind == NodeKind::Preformatted {
        if !text.is_empty() {
            out.push_str(text);
            out.push('\n');
        }
    } else {
        let flat = text.replace('\n', "");
        if !flat.is_empty() {
            out.push_str(&flat);
            out.push('\n');
        }
    }

    if kind == NodeKind::Paragraph {
        out.push('\n');
    }
}

/// Rows joined by newlines, then one trailing newline, so a table without
/// rows still contributes a blank line.
fn table_to_text(tree: &ContentTree, table: NodeId) -> String {
    let rows: Vec<String> = build_grid(tree, table)
        .iter()
        .map(|row| row.join("\t"))
        .collect();
    let mut out = rows.join("\n");
    out.push('\n');
    out
}
