use crate::editing::anchors::{IdSource, assign_anchor};
use crate::editing::buffer::{BufferId, Buffers, TextEdit, normalize_edits};
use crate::editing::Patch;
use crate::error::Result;
use crate::interaction::{DropMode, OperationKind};
use crate::structure::{BlockIndex, BlockKind, collect_descendants, resolve_block};
use crate::text::{LineIndex, leading_tabs};

/// A drop resolved to concrete lines and an operation, consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOperation {
    pub source_line: usize,
    pub source_buffer: BufferId,
    pub destination_line: usize,
    pub destination_buffer: BufferId,
    pub mode: DropMode,
    pub kind: OperationKind,
}

impl DragOperation {
    pub fn same_buffer(&self) -> bool {
        self.source_buffer == self.destination_buffer
    }
}

/// Text of the dragged-from buffer and the name embeds refer to it by.
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    pub text: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The policy mapped the modifiers to `none`
    PolicyNone,
    SourceUnresolved,
    DestinationUnresolved,
    /// Dropped onto the dragged block itself in the same buffer
    SelfTarget,
    /// Drop arrived without a drag in progress
    NoSession,
    /// The drop names a source buffer other than the one the drag started in
    SourceMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Edits(TransferPlan),
    NoOp(NoOpReason),
}

/// Edits for both ends of a drop. Offsets refer to the pre-edit texts.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    pub kind: OperationKind,
    pub source_edits: Vec<TextEdit>,
    pub destination_edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppliedEdits {
    /// Source and destination share a buffer and were edited in one batch
    Combined(Patch),
    Separate { source: Patch, destination: Patch },
}

impl TransferPlan {
    /// Apply the plan to its buffers.
    ///
    /// A shared buffer receives one batch. With two buffers the destination
    /// edits are validated first, then the source is edited, then the
    /// destination, so a bad plan touches neither buffer.
    pub fn apply(&self, buffers: &mut Buffers<'_>) -> Result<AppliedEdits> {
        match buffers {
            Buffers::Same(buffer) => {
                let mut batch = self.source_edits.clone();
                batch.extend(self.destination_edits.iter().cloned());
                Ok(AppliedEdits::Combined(buffer.apply_edits(&batch)?))
            }
            Buffers::Split {
                source,
                destination,
            } => {
                normalize_edits(&self.destination_edits, destination.len())?;
                let source_patch = source.apply_edits(&self.source_edits)?;
                let destination_patch = destination.apply_edits(&self.destination_edits)?;
                Ok(AppliedEdits::Separate {
                    source: source_patch,
                    destination: destination_patch,
                })
            }
        }
    }
}

/// Work out the edits for dropping `operation.source_line` onto
/// `operation.destination_line`.
///
/// `destination_text` is the source text again when both ends share a buffer.
pub fn compute_transfer(
    operation: &DragOperation,
    source: SourceDocument<'_>,
    destination_text: &str,
    ids: &mut dyn IdSource,
) -> Result<TransferOutcome> {
    if operation.kind == OperationKind::None {
        return Ok(TransferOutcome::NoOp(NoOpReason::PolicyNone));
    }

    let Some(block) = resolve_block(source.text, operation.source_line, BlockKind::ListItem)?
    else {
        return Ok(TransferOutcome::NoOp(NoOpReason::SourceUnresolved));
    };

    let destination_lines = LineIndex::new(destination_text);
    if !destination_lines.contains_line(operation.destination_line) {
        return Ok(TransferOutcome::NoOp(NoOpReason::DestinationUnresolved));
    }

    if operation.same_buffer() && block.contains_line(operation.destination_line) {
        return Ok(TransferOutcome::NoOp(NoOpReason::SelfTarget));
    }

    let target = insertion_offset(
        destination_text,
        &destination_lines,
        operation.destination_line,
    )?;

    let plan = match operation.kind {
        OperationKind::Embed => {
            let index = BlockIndex::build(source.text)?;
            let Some(root) = index.item_at_line(operation.source_line) else {
                return Ok(TransferOutcome::NoOp(NoOpReason::SourceUnresolved));
            };
            let group = collect_descendants(&[root], index.items());
            let existing: Vec<&str> = index.stable_ids().collect();
            let anchor = assign_anchor(&index.items()[root], &group, &existing, ids);

            TransferPlan {
                kind: OperationKind::Embed,
                destination_edits: vec![TextEdit::insert(
                    target,
                    embed_reference(source.name, &anchor.stable_id),
                )],
                source_edits: anchor.insertion.into_iter().collect(),
            }
        }
        kind => {
            let source_lines = LineIndex::new(source.text);
            let line_start = source_lines.line_start(block.start_line)?;
            let source_indent =
                leading_tabs(source_lines.line_text(source.text, block.start_line)?);
            let destination_indent = leading_tabs(
                destination_lines.line_text(destination_text, operation.destination_line)?,
            );

            let span = format!("\n{}", &source.text[line_start..block.end_offset]);
            let moved = rebase_indent(
                &span,
                source_indent,
                destination_indent,
                operation.mode.nesting_adjustment(),
            );

            let source_edits = if kind == OperationKind::Move {
                let keep_from = if operation.same_buffer() {
                    target
                } else {
                    source.text.len()
                };
                vec![TextEdit::delete(deletion_range(
                    source.text,
                    line_start,
                    block.end_offset,
                    keep_from,
                ))]
            } else {
                Vec::new()
            };

            TransferPlan {
                kind,
                source_edits,
                destination_edits: vec![TextEdit::insert(target, moved)],
            }
        }
    };

    log::debug!(
        "{:?} line {} -> line {} ({:?}): {} source edit(s), {} destination edit(s)",
        plan.kind,
        operation.source_line,
        operation.destination_line,
        operation.mode,
        plan.source_edits.len(),
        plan.destination_edits.len()
    );
    Ok(TransferOutcome::Edits(plan))
}

/// Shift the tab depth of every line in `span` from `source_indent` to
/// `destination_indent`, one level deeper when `adjustment` is 1.
///
/// `span` starts with a newline, so every line's indentation is preceded by
/// one and a single replacement rewrites them all.
pub fn rebase_indent(
    span: &str,
    source_indent: usize,
    destination_indent: usize,
    adjustment: usize,
) -> String {
    let strip = source_indent.saturating_sub(destination_indent + adjustment);
    let add = (destination_indent + adjustment).saturating_sub(source_indent);
    if strip == add {
        return span.to_string();
    }
    span.replace(
        &format!("\n{}", "\t".repeat(strip)),
        &format!("\n{}", "\t".repeat(add)),
    )
}

/// Bytes removed when a block moves away: the block plus the terminator before
/// it. A block that starts the text takes the blank lines after it instead, up
/// to `keep_from` at most.
fn deletion_range(
    text: &str,
    line_start: usize,
    end: usize,
    keep_from: usize,
) -> std::ops::Range<usize> {
    let bytes = text.as_bytes();
    if line_start == 0 {
        let mut cut = end;
        while let Some(newline) = text[cut..].find('\n') {
            if !text[cut..cut + newline].trim().is_empty() {
                break;
            }
            cut += newline + 1;
        }
        return 0..cut.min(keep_from.max(end));
    }
    let preceding = if line_start >= 2 && &bytes[line_start - 2..line_start] == b"\r\n" {
        2
    } else {
        1
    };
    line_start - preceding..end
}

/// End of the paragraph around `line`, or the end of the line itself
fn insertion_offset(text: &str, lines: &LineIndex, line: usize) -> Result<usize> {
    match resolve_block(text, line, BlockKind::Paragraph)? {
        Some(paragraph) => Ok(paragraph.end_offset),
        None => Ok(lines.line_range(text, line)?.end),
    }
}

pub fn embed_reference(document_name: &str, stable_id: &str) -> String {
    format!(" ![[{document_name}#^{stable_id}]]")
}
