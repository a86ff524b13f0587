//! Loading a rendered content tree from JSON.
//!
//! Hosts that already hold a rendered document (for example a browser view
//! with merged table cells) can describe it as nested objects:
//!
//! ```json
//! { "kind": "table", "children": [
//!     { "kind": "table_body", "children": [
//!         { "kind": "table_row", "children": [
//!             { "kind": "table_data_cell", "text": "X", "colspan": 2 }
//!         ] }
//!     ] }
//! ] }
//! ```
//!
//! The top level is an array of block objects, a single block object, or a
//! `generic` object (or one without a `kind`) acting as the container whose
//! children are the document's blocks.

use serde::Deserialize;
use serde_json::Value;

use crate::error::TreeError;
use crate::node::{ContentTree, NodeId, NodeKind, parse_span};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Blocks(Vec<JsonNode>),
    Node(JsonNode),
}

#[derive(Debug, Deserialize)]
struct JsonNode {
    #[serde(default)]
    kind: NodeKind,
    #[serde(default)]
    text: String,
    #[serde(default, alias = "columnSpan", alias = "colSpan")]
    colspan: Option<Value>,
    #[serde(default, alias = "rowSpan")]
    rowspan: Option<Value>,
    #[serde(default)]
    children: Vec<JsonNode>,
}

impl ContentTree {
    /// Build a tree from its JSON description.
    ///
    /// Unknown kinds load as `Generic`. Spans are read from table cells only;
    /// values may be numbers or strings, and anything that is not a positive
    /// integer is a span of 1.
    pub fn from_json(json: &str) -> Result<ContentTree, TreeError> {
        let document: JsonDocument = serde_json::from_str(json)?;
        let mut tree = ContentTree::new();
        let root = tree.root();

        match document {
            JsonDocument::Node(node) if node.kind == NodeKind::Generic => {
                tree.push_str(root, &node.text);
                for child in &node.children {
                    append_node(&mut tree, root, child);
                }
            }
            JsonDocument::Node(node) => append_node(&mut tree, root, &node),
            JsonDocument::Blocks(blocks) => {
                for block in &blocks {
                    append_node(&mut tree, root, block);
                }
            }
        }

        log::debug!("loaded content tree with {} nodes", tree.len());
        Ok(tree)
    }
}

fn append_node(tree: &mut ContentTree, parent: NodeId, node: &JsonNode) {
    let id = tree.append(parent, node.kind);
    tree.push_str(id, &node.text);

    if node.kind.is_table_cell() && (node.colspan.is_some() || node.rowspan.is_some()) {
        tree.set_spans(
            id,
            span_value(node.colspan.as_ref()),
            span_value(node.rowspan.as_ref()),
        );
    }

    for child in &node.children {
        append_node(tree, id, child);
    }
}

fn span_value(value: Option<&Value>) -> u32 {
    match value {
        None | Some(Value::Null) => 1,
        Some(Value::String(s)) => parse_span(s),
        Some(Value::Number(n)) => parse_span(&n.to_string()),
        Some(other) => {
            log::debug!("ignoring non-numeric span attribute {}", other);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::serialize_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_root_children_become_blocks() {
        let tree = ContentTree::from_json(
            r#"{ "children": [
                { "kind": "paragraph", "text": "one" },
                { "kind": "heading", "text": "two" }
            ] }"#,
        )
        .unwrap();

        let kinds: Vec<_> = tree.children(tree.root()).map(|c| tree.kind(c)).collect();
        assert_eq!(kinds, vec![NodeKind::Paragraph, NodeKind::Generic]);
        assert_eq!(serialize_document(&tree), "one\n\ntwo\n");
    }

    #[test]
    fn single_block_root() {
        let tree = ContentTree::from_json(
            r#"{ "kind": "unordered_list", "children": [
                { "kind": "list_item", "text": "only" }
            ] }"#,
        )
        .unwrap();
        let list = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(list), NodeKind::UnorderedList);
        assert_eq!(serialize_document(&tree), "only\n");
    }

    #[test]
    fn array_root() {
        let tree = ContentTree::from_json(
            r#"[ { "kind": "preformatted", "text": "a\n b" }, { "text": "c" } ]"#,
        )
        .unwrap();
        assert_eq!(serialize_document(&tree), "a\n b\nc\n");
    }

    #[test]
    fn spans_accept_numbers_and_strings() {
        let tree = ContentTree::from_json(
            r#"[ { "kind": "table_data_cell", "colspan": "3", "rowSpan": 2 } ]"#,
        )
        .unwrap();
        let cell = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.node(cell).column_span(), 3);
        assert_eq!(tree.node(cell).row_span(), 2);
    }

    #[test]
    fn malformed_spans_are_one() {
        let tree = ContentTree::from_json(
            r#"[
                { "kind": "table_data_cell", "colspan": -2, "rowspan": "abc" },
                { "kind": "table_data_cell", "colspan": true, "rowspan": 0 },
                { "kind": "table_data_cell", "colspan": 2.7, "rowspan": null }
            ]"#,
        )
        .unwrap();
        let spans: Vec<_> = tree
            .children(tree.root())
            .map(|c| (tree.node(c).column_span(), tree.node(c).row_span()))
            .collect();
        assert_eq!(spans, vec![(1, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn spans_outside_cells_are_ignored() {
        let tree = ContentTree::from_json(r#"[ { "kind": "paragraph", "colspan": 4 } ]"#).unwrap();
        let p = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.node(p).column_span(), 1);
    }

    #[test]
    fn merged_table_round_trips_to_grid_text() {
        let tree = ContentTree::from_json(
            r#"[ { "kind": "table", "children": [
                { "kind": "table_head", "children": [
                    { "kind": "table_row", "children": [
                        { "kind": "table_header_cell", "text": "a" },
                        { "kind": "table_header_cell", "text": "b" },
                        { "kind": "table_header_cell", "text": "c" }
                    ] }
                ] },
                { "kind": "table_body", "children": [
                    { "kind": "table_row", "children": [
                        { "kind": "table_data_cell", "text": "X", "colspan": 2 },
                        { "kind": "table_data_cell", "text": "Y" }
                    ] }
                ] }
            ] } ]"#,
        )
        .unwrap();
        assert_eq!(serialize_document(&tree), "a\tb\tc\nX\t\tY\n");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = ContentTree::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
    }
}
