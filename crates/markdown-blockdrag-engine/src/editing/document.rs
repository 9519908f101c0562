use xi_rope::delta::Builder;
use xi_rope::{Delta, LinesMetric, Rope, RopeInfo};

use crate::editing::buffer::{BufferId, Line, TextBuffer, TextEdit, normalize_edits};
use crate::editing::Patch;
use crate::error::{DragError, Result};

/// In-memory Markdown buffer backed by an xi-rope.
///
/// The rope is the single source of truth: bytes are kept verbatim and every
/// change is compiled into one `Delta`, so a batch of edits either applies as a
/// whole or not at all.
///
/// ```rust
/// # use markdown_blockdrag_engine::editing::{Document, TextBuffer, TextEdit};
/// let mut doc = Document::from_bytes("notes", b"- A\n- C\n").unwrap();
/// let patch = doc.apply_edits(&[TextEdit::insert(3, "\n- B")]).unwrap();
///
/// assert_eq!(doc.text(), "- A\n- B\n- C\n");
/// assert_eq!(patch.version, 1);
/// ```
#[derive(Clone)]
pub struct Document {
    /// Entire document as UTF-8
    pub(crate) buffer: Rope,
    id: BufferId,
    name: String,
    /// Incremented on each applied batch
    version: u64,
    focused: bool,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(name, text))
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            id: BufferId::new(),
            name: name.into(),
            version: 0,
            focused: false,
        }
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn compile_edits(&self, edits: &[TextEdit]) -> Result<Delta<RopeInfo>> {
        let mut builder = Builder::new(self.buffer.len());
        for edit in normalize_edits(edits, self.buffer.len())? {
            if edit.insert.is_empty() {
                builder.delete(edit.range);
            } else {
                builder.replace(edit.range, Rope::from(edit.insert.as_str()));
            }
        }
        Ok(builder.build())
    }
}

impl TextBuffer for Document {
    fn id(&self) -> BufferId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn line_at(&self, offset: usize) -> Result<Line> {
        let len = self.buffer.len();
        if offset > len {
            return Err(DragError::GeometryOutOfRange { offset, len });
        }

        let row = self.buffer.line_of_offset(offset);
        let from = self.buffer.offset_of_line(row);
        let mut to = if row < self.buffer.measure::<LinesMetric>() {
            self.buffer.offset_of_line(row + 1) - 1
        } else {
            len
        };
        let mut text = self.buffer.slice_to_cow(from..to).into_owned();
        if text.ends_with('\r') {
            text.pop();
            to -= 1;
        }

        Ok(Line {
            number: row + 1,
            from,
            to,
            text,
        })
    }

    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<Patch> {
        if edits.is_empty() {
            return Ok(Patch {
                changed: Vec::new(),
                version: self.version,
            });
        }

        let delta = self.compile_edits(edits)?;

        // Track changed ranges for the patch
        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                xi_rope::delta::DeltaElement::Copy(from, to) => {
                    cursor += to - from;
                }
                xi_rope::delta::DeltaElement::Insert(inserted) => {
                    let start = cursor;
                    let end = cursor + inserted.len();
                    changed.push(start..end);
                    cursor = end;
                }
            }
        }

        self.buffer = delta.apply(&self.buffer);
        self.version += 1;

        Ok(Patch {
            changed,
            version: self.version,
        })
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("text", &self.buffer.to_string())
            .finish()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Compare buffer content as strings since Rope has no content equality
        self.buffer.to_string() == other.buffer.to_string()
            && self.id == other.id
            && self.name == other.name
            && self.version == other.version
    }
}
