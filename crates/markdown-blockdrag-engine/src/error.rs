use thiserror::Error;

/// Failures that can escape the engine.
///
/// "Nothing to drag here" is not an error: resolution misses are reported as
/// `None` and self-targeted drops as a no-op outcome.
#[derive(Debug, Error)]
pub enum DragError {
    #[error("position {offset} is outside the document (length {len})")]
    GeometryOutOfRange { offset: usize, len: usize },

    #[error("line {line} is outside the document ({line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },

    #[error("failed to load the markdown grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("markdown parser produced no tree")]
    ParseFailed,

    #[error("edit {start}..{end} lies outside the buffer (length {len})")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    #[error("edits overlap at offset {offset}")]
    OverlappingEdits { offset: usize },
}

pub type Result<T> = std::result::Result<T, DragError>;
