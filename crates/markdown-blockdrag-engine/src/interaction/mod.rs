//! Host-facing drag interaction: which operation a drop performs, what is
//! highlighted while hovering, gutter handles and the drag session itself.

pub mod handle;
pub mod highlight;
pub mod policy;
pub mod session;

pub use handle::{
    HandleMarker, TextDirection, drag_preview, handle_for_line, handle_markers, text_direction,
};
pub use highlight::{DropMode, HighlightState, LineMark, project_highlights};
pub use policy::{DropPolicy, ModifierClass, Modifiers, OperationKind, decide_operation};
pub use session::{DragController, DragPayload, DragSession, DropOutcome, PointerGeometry};
