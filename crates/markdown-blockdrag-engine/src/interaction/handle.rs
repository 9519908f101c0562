use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::structure::{BlockIndex, SectionKind};
use crate::text::LineIndex;

/// Shown in drag previews for lines with no visible text
pub const EMPTY_PREVIEW: &str = "...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Gutter marker for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleMarker {
    /// Placeholder keeping the gutter width; not draggable
    Empty,
    Grip {
        line: usize,
        direction: TextDirection,
        preview: String,
    },
}

impl HandleMarker {
    pub fn is_draggable(&self) -> bool {
        matches!(self, HandleMarker::Grip { .. })
    }
}

/// Marker for `line`: a grip on non-blank lines inside a list section.
pub fn handle_for_line(index: &BlockIndex, line: usize, line_text: &str) -> HandleMarker {
    if line_text.trim().is_empty() {
        return HandleMarker::Empty;
    }
    match index.section_at_line(line) {
        Some(section) if section.kind == SectionKind::List => HandleMarker::Grip {
            line,
            direction: text_direction(line_text),
            preview: drag_preview(line_text),
        },
        _ => HandleMarker::Empty,
    }
}

/// Markers for every line of `text`, in line order
pub fn handle_markers(text: &str) -> Result<Vec<HandleMarker>> {
    let index = BlockIndex::build(text)?;
    let lines = LineIndex::new(text);
    (1..=lines.line_count())
        .map(|line| Ok(handle_for_line(&index, line, lines.line_text(text, line)?)))
        .collect()
}

/// Right-to-left when the text contains Hebrew, Arabic, Syriac, Thaana, N'Ko or
/// Arabic presentation forms.
pub fn text_direction(text: &str) -> TextDirection {
    static RTL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = RTL_REGEX.get_or_init(|| {
        Regex::new(
            r"[\x{0590}-\x{05FF}\x{0600}-\x{06FF}\x{0700}-\x{074F}\x{0750}-\x{077F}\x{08A0}-\x{08FF}\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFF}]",
        )
        .expect("Invalid RTL regex")
    });
    if regex.is_match(text) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

pub fn drag_preview(line_text: &str) -> String {
    match line_text.trim() {
        "" => EMPTY_PREVIEW.to_string(),
        trimmed => trimmed.to_string(),
    }
}
