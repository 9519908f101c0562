//! Document structure: which block encloses a line.
//!
//! Every query parses the text afresh with the tree-sitter Markdown block
//! grammar. Blocks are plain values with line and offset bounds; they are never
//! kept across edits because the document changes between drags.

pub mod descendants;
pub mod index;

pub use descendants::{BlockGroup, GroupSpan, collect_descendants};
pub use index::{BlockIndex, Section, SectionKind};

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::{Node, Parser, Tree};
use tree_sitter_md::LANGUAGE;

use crate::error::{DragError, Result};
use crate::text::{LineIndex, trim_end_offset};

/// Syntactic unit that can be dragged or dropped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    ListItem,
    Paragraph,
}

impl BlockKind {
    fn node_kind(self) -> &'static str {
        match self {
            BlockKind::ListItem => "list_item",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

/// A list item or paragraph with 1-based inclusive lines and byte offsets.
///
/// `end_offset` points just past the last non-whitespace byte of the block, so
/// trailing blank lines and the final line terminator are never included.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub start_line: usize,
    pub end_line: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Start line of the nearest enclosing list item
    pub parent_start_line: Option<usize>,
    /// Existing `^id` suffix, if the block already has one
    pub stable_id: Option<String>,
}

impl Block {
    pub fn height(&self) -> usize {
        self.end_line - self.start_line
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn lines(&self) -> RangeInclusive<usize> {
        self.start_line..=self.end_line
    }
}

/// Which end a list item block is cut at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extent {
    /// The item together with its nested lists
    Full,
    /// The item up to where its first nested list begins
    Own,
}

/// Find the narrowest block of `kind` whose lines contain `line`.
///
/// Nested lists give several list items around the same line; the innermost
/// one is the block the user grabbed. Ties go to the first in document order.
/// Returns `None` when no such block exists, e.g. for a blank line.
pub fn resolve_block(text: &str, line: usize, kind: BlockKind) -> Result<Option<Block>> {
    let tree = parse(text)?;
    let lines = LineIndex::new(text);

    let mut nodes = Vec::new();
    collect_nodes(tree.root_node(), kind.node_kind(), &mut nodes);

    let mut best: Option<Block> = None;
    for node in nodes {
        let block = block_from_node(text, &lines, node, kind, Extent::Full)?;
        if block.contains_line(line) && best.as_ref().is_none_or(|b| block.height() < b.height())
        {
            best = Some(block);
        }
    }

    log::trace!("resolved {kind:?} at line {line}: {best:?}");
    Ok(best)
}

pub(crate) fn parse(text: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&LANGUAGE.into())?;
    parser.parse(text, None).ok_or(DragError::ParseFailed)
}

/// Pre-order collection of all nodes of one kind
pub(crate) fn collect_nodes<'t>(node: Node<'t>, kind: &str, out: &mut Vec<Node<'t>>) {
    if node.kind() == kind {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_nodes(child, kind, out);
    }
}

pub(crate) fn block_from_node(
    text: &str,
    lines: &LineIndex,
    node: Node<'_>,
    kind: BlockKind,
    extent: Extent,
) -> Result<Block> {
    let start_offset = node.start_byte();
    let full_end = trim_end_offset(text, start_offset, node.end_byte());
    let own_end = match kind {
        BlockKind::ListItem => own_item_end(text, node),
        BlockKind::Paragraph => full_end,
    };
    let end_offset = match extent {
        Extent::Full => full_end,
        Extent::Own => own_end,
    };

    let parent_start_line = enclosing_list_item(node)
        .map(|parent| lines.line_of(parent.start_byte()))
        .transpose()?;

    Ok(Block {
        kind,
        start_line: lines.line_of(start_offset)?,
        end_line: lines.line_of(end_offset)?,
        start_offset,
        end_offset,
        parent_start_line,
        stable_id: detect_stable_id(&text[start_offset..own_end]),
    })
}

/// End of a list item's own content, before its first nested list
fn own_item_end(text: &str, node: Node<'_>) -> usize {
    let start = node.start_byte();
    let mut cursor = node.walk();
    let nested = node
        .children(&mut cursor)
        .find(|child| child.kind() == "list")
        .map(|list| list.start_byte());
    trim_end_offset(text, start, nested.unwrap_or(node.end_byte()))
}

fn enclosing_list_item<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.kind() == "list_item" {
            return Some(ancestor);
        }
        current = ancestor.parent();
    }
    None
}

/// Trailing ` ^id` marker at the end of a block's own text
pub(crate) fn detect_stable_id(own_text: &str) -> Option<String> {
    static BLOCK_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = BLOCK_ID_REGEX.get_or_init(|| {
        Regex::new(r"(?:^|\s)\^([A-Za-z0-9-]+)$").expect("Invalid block id regex")
    });
    regex
        .captures(own_text.trim_end())
        .map(|captures| captures[1].to_string())
}
