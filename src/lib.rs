mod clipboard;
mod config;
mod copy;
mod error;
mod grid;
mod node;
mod parser;
mod selection;
mod serialize;
mod spans;
mod tree_json;

pub use clipboard::{
    Clipboard, CommandClipboard, MemoryClipboard, Osc52Clipboard, StdoutClipboard,
    clipboard_from_config,
};
pub use config::{CONFIG_ENV, ClipboardBackend, ClipboardConfig, Config, MarkdownConfig};
pub use copy::{CopyOutcome, copy_target, selection_text};
pub use error::{ClipboardError, ConfigError, CopyError, SelectionError, TreeError};
pub use grid::build_grid;
pub use node::{ContentNode, ContentTree, NodeId, NodeKind, parse_span};
pub use selection::{BlockRange, Fragment, OutlineEntry, Target, outline};
pub use serialize::{serialize, serialize_document};
pub use spans::SpanOccupancy;

/// Parse markdown text into a content tree using default config.
pub fn parse(markdown: &str) -> ContentTree {
    parse_with_config(markdown, &Config::compiled_default())
}

/// Parse markdown text into a content tree with custom config.
pub fn parse_with_config(markdown: &str, config: &Config) -> ContentTree {
    parser::parse(markdown, &config.markdown)
}

/// Convert markdown to layout-preserving plain text using default config.
pub fn markdown_to_text(markdown: &str) -> String {
    markdown_to_text_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to layout-preserving plain text with custom config.
pub fn markdown_to_text_with_config(markdown: &str, config: &Config) -> String {
    let tree = parse_with_config(markdown, config);
    serialize_document(&tree)
}
