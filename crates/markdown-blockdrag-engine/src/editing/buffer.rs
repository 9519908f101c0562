use std::ops::Range;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::Patch;
use crate::error::{DragError, Result};

/// Identity of an open text buffer (one editor pane).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct BufferId(pub Uuid);

impl BufferId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BufferId {
    fn default() -> Self {
        Self::new()
    }
}

/// A line of a buffer: 1-based number and its byte range without terminator.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: usize,
    pub from: usize,
    pub to: usize,
    pub text: String,
}

/// Replace `range` (in pre-edit coordinates) with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub insert: String,
}

impl TextEdit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            insert: text.into(),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            insert: String::new(),
        }
    }
}

/// The text buffer behind an editor pane.
pub trait TextBuffer {
    fn id(&self) -> BufferId;

    /// Document name used in embed references, e.g. the file's base name
    fn name(&self) -> &str;

    fn text(&self) -> String;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Line containing `offset`; `GeometryOutOfRange` past the end.
    fn line_at(&self, offset: usize) -> Result<Line>;

    /// Apply a batch of edits atomically. All ranges refer to the text as it
    /// was before the batch.
    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<Patch>;

    fn focus(&mut self) {}
}

/// The buffers a drop touches: one when dragging within a pane, two otherwise.
pub enum Buffers<'a> {
    Same(&'a mut dyn TextBuffer),
    Split {
        source: &'a mut dyn TextBuffer,
        destination: &'a mut dyn TextBuffer,
    },
}

impl<'a> Buffers<'a> {
    pub fn is_same(&self) -> bool {
        matches!(self, Buffers::Same(_))
    }

    pub fn source(&self) -> &(dyn TextBuffer + 'a) {
        match self {
            Buffers::Same(buffer) => &**buffer,
            Buffers::Split { source, .. } => &**source,
        }
    }

    pub fn destination(&self) -> &(dyn TextBuffer + 'a) {
        match self {
            Buffers::Same(buffer) => &**buffer,
            Buffers::Split { destination, .. } => &**destination,
        }
    }

    pub fn destination_mut(&mut self) -> &mut (dyn TextBuffer + 'a) {
        match self {
            Buffers::Same(buffer) => &mut **buffer,
            Buffers::Split { destination, .. } => &mut **destination,
        }
    }
}

/// Sort a batch into ascending, non-overlapping replacements.
///
/// An insertion at the start of a deletion is folded into that deletion so the
/// pair becomes one replacement; inserted texts at one offset keep batch order.
pub fn normalize_edits(edits: &[TextEdit], len: usize) -> Result<Vec<TextEdit>> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let mut merged: Vec<TextEdit> = Vec::with_capacity(sorted.len());
    for edit in sorted {
        let Range { start, end } = edit.range;
        if start > end || end > len {
            return Err(DragError::EditOutOfBounds { start, end, len });
        }
        match merged.last_mut() {
            Some(last) if last.range.start == start => {
                last.range.end = last.range.end.max(end);
                last.insert.push_str(&edit.insert);
            }
            Some(last) if start < last.range.end => {
                return Err(DragError::OverlappingEdits { offset: start });
            }
            _ => merged.push(edit.clone()),
        }
    }
    Ok(merged)
}
