use tree_sitter::Node;

use crate::error::Result;
use crate::structure::{Block, BlockKind, Extent, block_from_node, collect_nodes, parse};
use crate::text::{LineIndex, trim_end_offset};

/// Top-level section type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    List,
    Paragraph,
    Heading,
    Code,
    Other,
}

impl SectionKind {
    fn from_node_kind(kind: &str) -> Self {
        match kind {
            "list" => SectionKind::List,
            "paragraph" => SectionKind::Paragraph,
            "atx_heading" | "setext_heading" => SectionKind::Heading,
            "fenced_code_block" | "indented_code_block" => SectionKind::Code,
            _ => SectionKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub start_line: usize,
    pub end_line: usize,
}

impl Section {
    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// Flat view of a document's list items and top-level sections.
///
/// Items are stored in document order with their *own* extent: a parent item
/// ends where its first nested list begins. Children point at their parent via
/// `parent_start_line`, so the hierarchy is rebuilt with
/// [`collect_descendants`](crate::structure::collect_descendants).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockIndex {
    items: Vec<Block>,
    sections: Vec<Section>,
}

impl BlockIndex {
    pub fn build(text: &str) -> Result<Self> {
        let tree = parse(text)?;
        let lines = LineIndex::new(text);

        let mut nodes = Vec::new();
        collect_nodes(tree.root_node(), "list_item", &mut nodes);
        let items = nodes
            .into_iter()
            .map(|node| block_from_node(text, &lines, node, BlockKind::ListItem, Extent::Own))
            .collect::<Result<Vec<_>>>()?;

        let mut sections = Vec::new();
        collect_sections(text, &lines, tree.root_node(), &mut sections)?;

        Ok(Self { items, sections })
    }

    pub fn items(&self) -> &[Block] {
        &self.items
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Index of the list item whose own lines contain `line`
    pub fn item_at_line(&self, line: usize) -> Option<usize> {
        self.items.iter().position(|item| item.contains_line(line))
    }

    /// Index of the list item starting on `line`
    pub fn item_starting_at(&self, line: usize) -> Option<usize> {
        self.items.iter().position(|item| item.start_line == line)
    }

    pub fn section_at_line(&self, line: usize) -> Option<&Section> {
        self.sections.iter().find(|section| section.contains_line(line))
    }

    pub fn stable_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| item.stable_id.as_deref())
    }
}

fn collect_sections(
    text: &str,
    lines: &LineIndex,
    node: Node<'_>,
    sections: &mut Vec<Section>,
) -> Result<()> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            // Heading sections wrap the heading and everything under it
            "section" => collect_sections(text, lines, child, sections)?,
            kind => {
                let start = child.start_byte();
                let end = trim_end_offset(text, start, child.end_byte());
                if text[start..end].trim().is_empty() {
                    continue;
                }
                sections.push(Section {
                    kind: SectionKind::from_node_kind(kind),
                    start_line: lines.line_of(start)?,
                    end_line: lines.line_of(end)?,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_items_use_own_extent_and_parent_lines() {
        let text = "- A\n\t- B\n\t\t- C\n- D ^keep\n";
        let index = BlockIndex::build(text).unwrap();
        let items = index.items();

        assert_eq!(items.len(), 4);
        assert_eq!(
            items
                .iter()
                .map(|i| (i.start_line, i.end_line, i.parent_start_line))
                .collect::<Vec<_>>(),
            vec![(1, 1, None), (2, 2, Some(1)), (3, 3, Some(2)), (4, 4, None)]
        );
        assert_eq!(&text[items[0].start_offset..items[0].end_offset], "- A");
        assert_eq!(items[3].stable_id.as_deref(), Some("keep"));
        assert_eq!(index.stable_ids().collect::<Vec<_>>(), vec!["keep"]);
    }

    #[test]
    fn test_quoted_items_end_on_their_own_lines() {
        let text = "> - A\n> - B\n> - C\n";
        let index = BlockIndex::build(text).unwrap();

        assert_eq!(
            index
                .items()
                .iter()
                .map(|i| (i.start_line, i.end_line))
                .collect::<Vec<_>>(),
            vec![(1, 1), (2, 2), (3, 3)]
        );
        assert_eq!(index.item_at_line(2), Some(1));
    }

    #[test]
    fn test_item_at_line() {
        let index = BlockIndex::build("- A\n\t- B\n\nplain\n").unwrap();

        assert_eq!(index.item_at_line(1), Some(0));
        assert_eq!(index.item_at_line(2), Some(1));
        assert_eq!(index.item_at_line(4), None);
        assert_eq!(index.item_starting_at(2), Some(1));
    }

    #[test]
    fn test_sections_have_kind_discriminator() {
        let text = "# Title\n\nIntro text\n\n- one\n- two\n\n```\ncode\n```\n";
        let index = BlockIndex::build(text).unwrap();
        let kinds: Vec<_> = index.sections().iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                SectionKind::Heading,
                SectionKind::Paragraph,
                SectionKind::List,
                SectionKind::Code
            ]
        );
        assert_eq!(index.section_at_line(6).map(|s| s.kind), Some(SectionKind::List));
        assert_eq!(index.section_at_line(2), None);
    }

    #[test]
    fn test_empty_document() {
        let index = BlockIndex::build("").unwrap();
        assert!(index.items().is_empty());
        assert!(index.sections().is_empty());
    }
}
