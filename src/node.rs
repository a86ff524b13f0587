use serde::Deserialize;

/// Largest column span a table cell may declare. Larger values are clamped.
pub const MAX_COLUMN_SPAN: u32 = 1000;
/// Largest row span a table cell may declare. Larger values are clamped.
pub const MAX_ROW_SPAN: u32 = 65534;

/// Handle to a node stored in a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The kind of a rendered content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeaderCell,
    TableDataCell,
    UnorderedList,
    OrderedList,
    ListItem,
    Paragraph,
    Preformatted,
    /// Any other block or inline element, including plain text runs.
    #[default]
    #[serde(other)]
    Generic,
}

impl NodeKind {
    /// Lists and list items are flattened by recursing into their children.
    pub fn is_list_family(self) -> bool {
        matches!(
            self,
            NodeKind::UnorderedList | NodeKind::OrderedList | NodeKind::ListItem
        )
    }

    pub fn is_table_cell(self) -> bool {
        matches!(self, NodeKind::TableHeaderCell | NodeKind::TableDataCell)
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Table => "table",
            NodeKind::TableHead => "table_head",
            NodeKind::TableBody => "table_body",
            NodeKind::TableRow => "table_row",
            NodeKind::TableHeaderCell => "table_header_cell",
            NodeKind::TableDataCell => "table_data_cell",
            NodeKind::UnorderedList => "unordered_list",
            NodeKind::OrderedList => "ordered_list",
            NodeKind::ListItem => "list_item",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Preformatted => "preformatted",
            NodeKind::Generic => "generic",
        }
    }
}

/// A single node of the rendered document.
///
/// Nodes only ever link to nodes appended after them, so sibling and child
/// chains are acyclic by construction.
#[derive(Debug, Clone)]
pub struct ContentNode {
    kind: NodeKind,
    /// Text owned directly by this node (text runs), not including children.
    text: String,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    column_span: u32,
    row_span: u32,
    /// Created by [`ContentTree::append_text`]; later adjacent text extends it.
    text_run: bool,
}

impl ContentNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            first_child: None,
            last_child: None,
            next_sibling: None,
            column_span: 1,
            row_span: 1,
            text_run: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn own_text(&self) -> &str {
        &self.text
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn column_span(&self) -> u32 {
        self.column_span
    }

    pub fn row_span(&self) -> u32 {
        self.row_span
    }

    pub fn is_text_run(&self) -> bool {
        self.text_run
    }
}

/// Arena holding a rendered document.
///
/// The arena always contains a `Generic` container at [`ContentTree::root`];
/// the document's blocks are its children.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![ContentNode::new(NodeKind::Generic)],
        }
    }

    /// The container node. Serialization of a whole document starts at its
    /// first child.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, including the container.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the container has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].first_child.is_none()
    }

    pub fn node(&self, id: NodeId) -> &ContentNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Flattened text of a node and all of its descendants, without markup.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        out.push_str(&self.nodes[id.0].text);
        for child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Create a node of `kind` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ContentNode::new(kind));

        match self.nodes[parent.0].last_child {
            Some(last) => self.nodes[last.0].next_sibling = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        self.nodes[parent.0].last_child = Some(id);
        id
    }

    /// Append `text` to `parent` as a `Generic` text run.
    ///
    /// Adjacent text forms a single run: if the last child of `parent` is a
    /// childless text run, `text` extends it and its id is returned.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(last) = self.nodes[parent.0].last_child {
            let node = &mut self.nodes[last.0];
            if node.text_run && node.first_child.is_none() {
                node.text.push_str(text);
                return last;
            }
        }

        let id = self.append(parent, NodeKind::Generic);
        let node = &mut self.nodes[id.0];
        node.text_run = true;
        node.text.push_str(text);
        id
    }

    /// Append text to a node's own text.
    pub fn push_str(&mut self, id: NodeId, text: &str) {
        self.nodes[id.0].text.push_str(text);
    }

    /// Set the spans of a table cell. Zero is treated as one and values above
    /// the HTML limits are clamped.
    pub fn set_spans(&mut self, id: NodeId, column_span: u32, row_span: u32) {
        let node = &mut self.nodes[id.0];
        node.column_span = column_span.clamp(1, MAX_COLUMN_SPAN);
        node.row_span = row_span.clamp(1, MAX_ROW_SPAN);
    }

    /// Deep-copy the sibling run `first..=last` into a new tree, as children of
    /// its container. The copy of `last` has no next sibling.
    ///
    /// `last` must be reachable from `first` through sibling links; if it is
    /// not, the copy runs to the end of the sibling chain.
    pub fn detach(&self, first: NodeId, last: NodeId) -> ContentTree {
        let mut out = ContentTree::new();
        let root = out.root();
        let mut current = Some(first);
        while let Some(id) = current {
            self.copy_into(id, &mut out, root);
            if id == last {
                break;
            }
            current = self.next_sibling(id);
        }
        out
    }

    fn copy_into(&self, src: NodeId, dst: &mut ContentTree, dst_parent: NodeId) {
        let node = &self.nodes[src.0];
        let copy = dst.append(dst_parent, node.kind);
        dst.push_str(copy, &node.text);
        dst.set_spans(copy, node.column_span, node.row_span);
        dst.nodes[copy.0].text_run = node.text_run;
        for child in self.children(src) {
            self.copy_into(child, dst, copy);
        }
    }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    tree: &'a ContentTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Parse a `colspan`/`rowspan` attribute value.
///
/// Leading whitespace is skipped and the leading run of ASCII digits is used.
/// Anything that does not yield a positive integer is a span of 1.
pub fn parse_span(value: &str) -> u32 {
    let digits: &str = {
        let trimmed = value.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    match digits.parse::<u64>() {
        Ok(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => {
            log::debug!("ignoring malformed span attribute {:?}", value);
            1
        }
    }
}
