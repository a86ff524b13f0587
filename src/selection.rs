use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::SelectionError;
use crate::node::{ContentTree, NodeId, NodeKind};
use crate::serialize::serialize;

/// Half-open range of top-level block indices. `end: None` runs to the last
/// block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl BlockRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// The range covering only block `index`.
    pub fn single(index: usize) -> Self {
        Self::new(index, index + 1)
    }
}

impl FromStr for BlockRange {
    type Err = SelectionError;

    /// Accepts `N`, `N..M`, `N..` and `..M`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SelectionError::InvalidRange(s.to_string());
        let index = |part: &str| part.trim().parse::<usize>().map_err(|_| invalid());

        match s.split_once("..") {
            None => Ok(Self::single(index(s)?)),
            Some((start, end)) => {
                let start = if start.trim().is_empty() {
                    0
                } else {
                    index(start)?
                };
                let end = if end.trim().is_empty() {
                    None
                } else {
                    Some(index(end)?)
                };
                Ok(Self { start, end })
            }
        }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}..{}", self.start, end),
            None => write!(f, "{}..", self.start),
        }
    }
}

/// What a copy action should serialize.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// The whole document, starting at the container's first child.
    #[default]
    Document,
    /// One fragment per range of top-level blocks.
    Blocks(Vec<BlockRange>),
}

/// A selected subtree ready for serialization.
#[derive(Debug, Clone)]
pub struct Fragment<'a> {
    tree: Cow<'a, ContentTree>,
}

impl Fragment<'_> {
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// The node serialization starts at, if the fragment has any content.
    pub fn start(&self) -> Option<NodeId> {
        self.tree.first_child(self.tree.root())
    }

    pub fn to_text(&self) -> String {
        serialize(&self.tree, self.start())
    }
}

impl Target {
    /// Resolve the target against a document, one result per range.
    ///
    /// Each range is resolved on its own, so a bad range fails alone and the
    /// other ranges still yield their fragments.
    pub fn acquire<'a>(&self, tree: &'a ContentTree) -> Vec<Result<Fragment<'a>, SelectionError>> {
        match self {
            Target::Document => vec![Ok(Fragment {
                tree: Cow::Borrowed(tree),
            })],
            Target::Blocks(ranges) => {
                let blocks: Vec<NodeId> = tree.children(tree.root()).collect();
                ranges
                    .iter()
                    .map(|range| select_blocks(tree, &blocks, *range))
                    .collect()
            }
        }
    }
}

fn select_blocks<'a>(
    tree: &ContentTree,
    blocks: &[NodeId],
    range: BlockRange,
) -> Result<Fragment<'a>, SelectionError> {
    let start = range.start;
    let end = range.end.unwrap_or(blocks.len());

    if end <= start {
        return Err(SelectionError::EmptyRange { start, end });
    }
    if end > blocks.len() {
        return Err(SelectionError::OutOfBounds {
            start,
            end,
            len: blocks.len(),
        });
    }

    log::debug!("selecting blocks {start}..{end}");
    Ok(Fragment {
        tree: Cow::Owned(tree.detach(blocks[start], blocks[end - 1])),
    })
}

/// One top-level block, as listed by [`outline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub index: usize,
    pub kind: NodeKind,
    pub preview: String,
}

const PREVIEW_CHARS: usize = 60;

/// List the document's top-level blocks, to help pick block ranges.
pub fn outline(tree: &ContentTree) -> Vec<OutlineEntry> {
    tree.children(tree.root())
        .enumerate()
        .map(|(index, id)| OutlineEntry {
            index,
            kind: tree.kind(id),
            preview: preview(&tree.text_content(id)),
        })
        .collect()
}

fn preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}
