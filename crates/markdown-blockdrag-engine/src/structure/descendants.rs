use std::collections::HashSet;

use crate::structure::Block;

/// Line and offset extremes over every member of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpan {
    pub from_line: usize,
    pub to_line: usize,
    pub from_offset: usize,
    pub to_offset: usize,
}

/// Root blocks plus everything nested under them, as indices into a flat
/// block list. Roots come first and no index appears twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockGroup {
    members: Vec<usize>,
    span: Option<GroupSpan>,
}

impl BlockGroup {
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// `None` for an empty group
    pub fn span(&self) -> Option<GroupSpan> {
        self.span
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub fn blocks<'a>(&'a self, all: &'a [Block]) -> impl Iterator<Item = &'a Block> + 'a {
        self.members.iter().map(move |&index| &all[index])
    }
}

/// Gather `roots` and all their transitive children from `all`.
///
/// Children reference their parent by start line only. Each round takes the
/// start lines of the previous round's additions and picks every block not yet
/// visited whose `parent_start_line` is one of them; the loop ends on a round
/// that adds nothing. Root indices past the end of `all` are ignored.
pub fn collect_descendants(roots: &[usize], all: &[Block]) -> BlockGroup {
    let mut visited = vec![false; all.len()];
    let mut members = Vec::new();

    for &root in roots {
        if root < all.len() && !visited[root] {
            visited[root] = true;
            members.push(root);
        }
    }

    let mut frontier = members.clone();
    while !frontier.is_empty() {
        let parent_lines: HashSet<usize> = frontier.iter().map(|&i| all[i].start_line).collect();

        frontier = all
            .iter()
            .enumerate()
            .filter(|&(i, block)| {
                !visited[i]
                    && block
                        .parent_start_line
                        .is_some_and(|parent| parent_lines.contains(&parent))
            })
            .map(|(i, _)| i)
            .collect();

        for &i in &frontier {
            visited[i] = true;
            members.push(i);
        }
    }

    let span = span_of(&members, all);
    BlockGroup { members, span }
}

fn span_of(members: &[usize], all: &[Block]) -> Option<GroupSpan> {
    let mut blocks = members.iter().map(|&i| &all[i]);
    let first = blocks.next()?;
    let initial = GroupSpan {
        from_line: first.start_line,
        to_line: first.end_line,
        from_offset: first.start_offset,
        to_offset: first.end_offset,
    };
    Some(blocks.fold(initial, |span, block| GroupSpan {
        from_line: span.from_line.min(block.start_line),
        to_line: span.to_line.max(block.end_line),
        from_offset: span.from_offset.min(block.start_offset),
        to_offset: span.to_offset.max(block.end_offset),
    }))
}
