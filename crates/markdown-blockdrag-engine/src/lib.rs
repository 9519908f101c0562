pub mod editing;
pub mod error;
pub mod interaction;
pub mod structure;
pub mod text;

// Re-export key types for easier usage
pub use editing::{Document, TextBuffer, TextEdit};
pub use error::{DragError, Result};
pub use interaction::{DragController, DropMode, DropPolicy, Modifiers, OperationKind};
pub use structure::{Block, BlockIndex, BlockKind, resolve_block};
