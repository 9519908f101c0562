use crate::error::Result;
use crate::structure::{BlockIndex, GroupSpan, collect_descendants};
use crate::text::LineIndex;

/// Pointer distance past the indentation, in pixels, that selects nesting
const NEST_THRESHOLD: f64 = 2.0;

/// Where a drop lands relative to the hovered item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropMode {
    /// As a child of the hovered item
    #[default]
    Current,
    /// As a sibling of the hovered item
    Parent,
}

impl DropMode {
    /// Extra tab levels added when rebasing dropped text
    pub fn nesting_adjustment(self) -> usize {
        match self {
            DropMode::Current => 1,
            DropMode::Parent => 0,
        }
    }

    /// Nest when the pointer is right of the line's indentation.
    pub fn from_pointer(pointer_x: f64, line_left: f64, indent_width: f64) -> Self {
        if indent_width + NEST_THRESHOLD < pointer_x - line_left {
            DropMode::Current
        } else {
            DropMode::Parent
        }
    }
}

/// A highlighted line. `landing` marks the line the drop will follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMark {
    pub line: usize,
    /// Start offset of the line
    pub offset: usize,
    pub landing: bool,
}

/// Line marks for both drop modes, precomputed on drag-enter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightState {
    pub current: Vec<LineMark>,
    pub parent: Vec<LineMark>,
}

impl HighlightState {
    pub fn for_mode(&self, mode: DropMode) -> &[LineMark] {
        match mode {
            DropMode::Current => &self.current,
            DropMode::Parent => &self.parent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.parent.is_empty()
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.parent.clear();
    }
}

/// Marks for dropping onto `hovered_line`.
///
/// `current` covers the hovered item and its descendants and lands after the
/// item's own last line. `parent` covers the parent item's whole group and
/// lands on the hovered line; a top-level item reuses `current`.
pub fn project_highlights(text: &str, hovered_line: usize) -> Result<HighlightState> {
    let index = BlockIndex::build(text)?;
    let Some(item) = index.item_at_line(hovered_line) else {
        return Ok(HighlightState::default());
    };
    let lines = LineIndex::new(text);
    let block = &index.items()[item];

    let current = match collect_descendants(&[item], index.items()).span() {
        Some(span) => line_marks(&lines, span, block.end_line)?,
        None => Vec::new(),
    };

    let parent_item = block
        .parent_start_line
        .and_then(|line| index.item_starting_at(line));
    let parent = match parent_item {
        Some(parent) => match collect_descendants(&[parent], index.items()).span() {
            Some(span) => line_marks(&lines, span, hovered_line)?,
            None => current.clone(),
        },
        None => current.clone(),
    };

    Ok(HighlightState { current, parent })
}

fn line_marks(lines: &LineIndex, span: GroupSpan, landing_line: usize) -> Result<Vec<LineMark>> {
    (span.from_line..=span.to_line)
        .map(|line| {
            Ok(LineMark {
                line,
                offset: lines.line_start(line)?,
                landing: line == landing_line,
            })
        })
        .collect()
}
