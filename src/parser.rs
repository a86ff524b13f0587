use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::config::MarkdownConfig;
use crate::node::{ContentTree, NodeId, NodeKind};

/// Strip YAML frontmatter from the beginning of markdown content
fn strip_frontmatter(markdown: &str) -> &str {
    if !markdown.starts_with("---") {
        return markdown;
    }
    // Find the closing ---
    if let Some(end) = markdown[3..].find("\n---") {
        // Skip past the closing --- and the rest of its line
        let after_frontmatter = &markdown[3 + end + 4..];
        match after_frontmatter.find('\n') {
            Some(newline) => after_frontmatter[newline..].trim_start_matches('\n'),
            None => "",
        }
    } else {
        markdown
    }
}

fn options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    if config.tables {
        options.insert(Options::ENABLE_TABLES);
    }
    if config.tasklists {
        options.insert(Options::ENABLE_TASKLISTS);
    }
    if config.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if config.footnotes {
        options.insert(Options::ENABLE_FOOTNOTES);
    }
    options
}

/// Parse markdown text into a content tree
pub fn parse(markdown: &str, config: &MarkdownConfig) -> ContentTree {
    let markdown = if config.strip_frontmatter {
        strip_frontmatter(markdown)
    } else {
        markdown
    };
    let parser = Parser::new_ext(markdown, options(config));
    let mut state = ParseState::new();

    for event in parser {
        process_event(event, &mut state);
    }

    if state.stack.len() > 1 {
        log::warn!("{} elements left open after parsing", state.stack.len() - 1);
    }

    state.tree
}

struct ParseState {
    tree: ContentTree,
    // Open elements, innermost last. The container is always at the bottom.
    stack: Vec<NodeId>,

    // Table state
    in_table_head: bool,
    table_body: Option<NodeId>,

    // Rendered images have no text content
    image_depth: usize,
}

impl ParseState {
    fn new() -> Self {
        let tree = ContentTree::new();
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
            in_table_head: false,
            table_body: None,
            image_depth: 0,
        }
    }

    fn current(&self) -> NodeId {
        // The container is never popped
        self.stack[self.stack.len() - 1]
    }

    fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = self.tree.append(self.current(), kind);
        self.stack.push(id);
        id
    }

    fn close(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn text(&mut self, text: &str) {
        if self.image_depth > 0 || text.is_empty() {
            return;
        }
        self.tree.append_text(self.current(), text);
    }

    /// A leaf element holding `text`, like inline code.
    fn leaf(&mut self, text: &str) {
        if self.image_depth > 0 {
            return;
        }
        let id = self.tree.append(self.current(), NodeKind::Generic);
        self.tree.append_text(id, text);
    }
}

/// Text of a raw HTML chunk with its tags removed.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn process_event(event: Event, state: &mut ParseState) {
    match event {
        // Paragraphs
        Event::Start(Tag::Paragraph) => {
            state.open(NodeKind::Paragraph);
        }

        // Code blocks: a preformatted block wrapping the code element
        Event::Start(Tag::CodeBlock(_)) => {
            state.open(NodeKind::Preformatted);
            state.open(NodeKind::Generic);
        }
        Event::End(TagEnd::CodeBlock) => {
            state.close();
            state.close();
        }

        // Lists
        Event::Start(Tag::List(first_item)) => {
            if first_item.is_some() {
                state.open(NodeKind::OrderedList);
            } else {
                state.open(NodeKind::UnorderedList);
            }
        }
        Event::Start(Tag::Item) => {
            state.open(NodeKind::ListItem);
        }

        // Task list checkboxes
        Event::TaskListMarker(checked) => {
            state.text(if checked { "[x] " } else { "[ ] " });
        }

        // Tables
        Event::Start(Tag::Table(_)) => {
            state.open(NodeKind::Table);
            state.table_body = None;
        }
        Event::End(TagEnd::Table) => {
            state.table_body = None;
            state.close();
        }

        // The head holds its cells directly; wrap them in a row
        Event::Start(Tag::TableHead) => {
            state.in_table_head = true;
            state.open(NodeKind::TableHead);
            state.open(NodeKind::TableRow);
        }
        Event::End(TagEnd::TableHead) => {
            state.in_table_head = false;
            state.close();
            state.close();
        }

        // Body rows share one body section, created by the first row
        Event::Start(Tag::TableRow) => {
            let table = state.current();
            let body = match state.table_body {
                Some(body) => body,
                None => {
                    let body = state.tree.append(table, NodeKind::TableBody);
                    state.table_body = Some(body);
                    body
                }
            };
            let row = state.tree.append(body, NodeKind::TableRow);
            state.stack.push(row);
        }

        Event::Start(Tag::TableCell) => {
            if state.in_table_head {
                state.open(NodeKind::TableHeaderCell);
            } else {
                state.open(NodeKind::TableDataCell);
            }
        }

        // Raw HTML keeps only its text
        Event::Html(html) | Event::InlineHtml(html) => {
            state.text(&strip_tags(&html));
        }

        Event::Start(Tag::Image { .. }) => {
            state.open(NodeKind::Generic);
            state.image_depth += 1;
        }
        Event::End(TagEnd::Image) => {
            state.image_depth = state.image_depth.saturating_sub(1);
            state.close();
        }

        // Headings, block quotes, emphasis, links and the rest
        Event::Start(_) => {
            state.open(NodeKind::Generic);
        }
        Event::End(_) => {
            state.close();
        }

        // Text content
        Event::Text(text) => {
            state.text(&text);
        }

        // Inline code and math
        Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
            state.leaf(&code);
        }

        Event::FootnoteReference(label) => {
            state.leaf(&format!("[{label}]"));
        }

        // Soft/hard breaks
        Event::SoftBreak | Event::HardBreak => {
            state.text("\n");
        }

        // Horizontal rule
        Event::Rule => {
            state.tree.append(state.current(), NodeKind::Generic);
        }
    }
}
