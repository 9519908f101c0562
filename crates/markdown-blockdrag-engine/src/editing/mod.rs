/*!
 * # Editing
 *
 * Everything that changes text lives here.
 *
 * ## Buffers
 * - A host pane is a **`TextBuffer`**: identity, name, text, line geometry and
 *   atomic batch edits
 * - **`Document`** is the in-memory implementation over an `xi_rope::Rope`;
 *   a batch compiles into one **Delta**, so it applies entirely or not at all
 * - Edit offsets always refer to the text before the batch
 *
 * ## Anchors
 * - A block becomes addressable through a trailing ` ^id` marker
 * - Ids are six base-36 characters from an **`IdSource`**; an existing id is
 *   always reused
 *
 * ## Transfers
 * - **`compute_transfer`** turns a drop into a **`TransferPlan`**: edits for the
 *   source buffer and for the destination buffer
 * - Move and copy rebase tab indentation onto the destination; embed links to
 *   the anchored source block
 * - **`TransferPlan::apply`** applies one batch for a shared buffer, otherwise
 *   the source first and then the destination
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_blockdrag_engine::editing::*;
 * use markdown_blockdrag_engine::interaction::{DropMode, OperationKind};
 *
 * let mut doc = Document::from_text("notes", "- A\n\t- B\n- C\n");
 * let operation = DragOperation {
 *     source_line: 2,
 *     source_buffer: doc.id(),
 *     destination_line: 3,
 *     destination_buffer: doc.id(),
 *     mode: DropMode::Current,
 *     kind: OperationKind::Move,
 * };
 *
 * let text = doc.text();
 * let source = SourceDocument { text: &text, name: doc.name() };
 * let outcome = compute_transfer(&operation, source, &text, &mut RandomIds).unwrap();
 *
 * if let TransferOutcome::Edits(plan) = outcome {
 *     plan.apply(&mut Buffers::Same(&mut doc)).unwrap();
 * }
 * assert_eq!(doc.text(), "- A\n- C\n\t- B\n");
 * ```
 */

pub mod anchors;
pub mod buffer;
pub mod document;
pub mod patch;
pub mod transfer;

pub use anchors::{AnchorRecord, IdSource, RandomIds, assign_anchor};
pub use buffer::{BufferId, Buffers, Line, TextBuffer, TextEdit, normalize_edits};
pub use document::Document;
pub use patch::Patch;
pub use transfer::{
    AppliedEdits, DragOperation, NoOpReason, SourceDocument, TransferOutcome, TransferPlan,
    compute_transfer, embed_reference, rebase_indent,
};
