use serde::{Deserialize, Serialize};

use crate::editing::{
    AppliedEdits, Buffers, BufferId, DragOperation, IdSource, NoOpReason, RandomIds,
    SourceDocument, TextBuffer, TransferOutcome, compute_transfer,
};
use crate::error::{DragError, Result};
use crate::interaction::handle::drag_preview;
use crate::interaction::highlight::{DropMode, HighlightState, LineMark, project_highlights};
use crate::interaction::policy::{DropPolicy, Modifiers, OperationKind, decide_operation};
use crate::text::LineIndex;

/// Data attached to a drag when it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub source_line: usize,
    pub source_buffer: BufferId,
    pub preview: String,
}

/// Pointer position over a line, in host pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGeometry {
    pub pointer_x: f64,
    pub line_left: f64,
    /// Width of the hovered line's indentation
    pub indent_width: f64,
}

/// State that lives from drag-start to drop or cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub payload: DragPayload,
    pub mode: DropMode,
    pub highlights: HighlightState,
    /// Buffer and line the highlights were projected for
    pub hovered: Option<(BufferId, usize)>,
}

impl DragSession {
    fn new(payload: DragPayload) -> Self {
        Self {
            payload,
            mode: DropMode::default(),
            highlights: HighlightState::default(),
            hovered: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Applied {
        kind: OperationKind,
        edits: AppliedEdits,
    },
    NoOp(NoOpReason),
}

/// Drives drag events for a host editor.
///
/// At most one drag is in flight. Every terminal event (drop or end) leaves the
/// controller without a session, so highlights and mode are reset for the next
/// drag.
pub struct DragController {
    policy: DropPolicy,
    session: Option<DragSession>,
    ids: Box<dyn IdSource>,
}

impl DragController {
    pub fn new(policy: DropPolicy) -> Self {
        Self::with_id_source(policy, Box::new(RandomIds))
    }

    pub fn with_id_source(policy: DropPolicy, ids: Box<dyn IdSource>) -> Self {
        Self {
            policy,
            session: None,
            ids,
        }
    }

    pub fn policy(&self) -> &DropPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: DropPolicy) {
        self.policy = policy;
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Begin dragging `line` of `buffer`. A stale session is replaced.
    pub fn on_drag_start(&mut self, buffer: &dyn TextBuffer, line: usize) -> Result<DragPayload> {
        let text = buffer.text();
        let line_text = LineIndex::new(&text).line_text(&text, line)?;
        let payload = DragPayload {
            source_line: line,
            source_buffer: buffer.id(),
            preview: drag_preview(line_text),
        };

        if self.session.is_some() {
            log::debug!("replacing unfinished drag session");
        }
        log::debug!("drag start: line {line} of {}", buffer.name());
        self.session = Some(DragSession::new(payload.clone()));
        Ok(payload)
    }

    /// Pick the drop mode from the pointer position; `Current` with no drag.
    pub fn on_drag_over(&mut self, geometry: PointerGeometry) -> DropMode {
        let Some(session) = self.session.as_mut() else {
            return DropMode::default();
        };
        let mode =
            DropMode::from_pointer(geometry.pointer_x, geometry.line_left, geometry.indent_width);
        if mode != session.mode {
            log::debug!("drop mode {:?} -> {mode:?}", session.mode);
            session.mode = mode;
        }
        mode
    }

    /// Recompute highlights for the line under `offset`.
    ///
    /// Offsets outside the buffer leave the current highlights in place.
    pub fn on_drag_enter(&mut self, buffer: &dyn TextBuffer, offset: usize) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let line = match buffer.line_at(offset) {
            Ok(line) => line.number,
            Err(DragError::GeometryOutOfRange { .. }) => return Ok(()),
            Err(err) => return Err(err),
        };
        let hovered = (buffer.id(), line);
        if session.hovered == Some(hovered) {
            return Ok(());
        }

        session.highlights = project_highlights(&buffer.text(), line)?;
        session.hovered = Some(hovered);
        Ok(())
    }

    /// Finish the drag by dropping at `drop_offset` of the destination buffer.
    ///
    /// The session ends here whatever the outcome. When edits are applied the
    /// destination buffer gets focus.
    pub fn on_drop(
        &mut self,
        modifiers: Modifiers,
        drop_offset: usize,
        mut buffers: Buffers<'_>,
    ) -> Result<DropOutcome> {
        let Some(session) = self.session.take() else {
            return Ok(DropOutcome::NoOp(NoOpReason::NoSession));
        };

        let source_buffer = buffers.source().id();
        if source_buffer != session.payload.source_buffer {
            log::warn!(
                "drop names {} as source but the drag started in another buffer",
                buffers.source().name()
            );
            return Ok(DropOutcome::NoOp(NoOpReason::SourceMismatch));
        }

        let destination_line = match buffers.destination().line_at(drop_offset) {
            Ok(line) => line.number,
            Err(DragError::GeometryOutOfRange { .. }) => {
                return Ok(DropOutcome::NoOp(NoOpReason::DestinationUnresolved));
            }
            Err(err) => return Err(err),
        };

        let destination_buffer = buffers.destination().id();
        let kind = decide_operation(
            modifiers,
            source_buffer == destination_buffer,
            &self.policy,
        );
        let operation = DragOperation {
            source_line: session.payload.source_line,
            source_buffer,
            destination_line,
            destination_buffer,
            mode: session.mode,
            kind,
        };

        let source_text = buffers.source().text();
        let source_name = buffers.source().name().to_string();
        let destination_text = if buffers.is_same() {
            source_text.clone()
        } else {
            buffers.destination().text()
        };
        let outcome = compute_transfer(
            &operation,
            SourceDocument {
                text: &source_text,
                name: &source_name,
            },
            &destination_text,
            &mut *self.ids,
        )?;

        match outcome {
            TransferOutcome::Edits(plan) => {
                let edits = plan.apply(&mut buffers)?;
                buffers.destination_mut().focus();
                Ok(DropOutcome::Applied { kind, edits })
            }
            TransferOutcome::NoOp(reason) => {
                log::debug!("drop ignored: {reason:?}");
                Ok(DropOutcome::NoOp(reason))
            }
        }
    }

    /// Drop the session after a cancelled or completed drag. Safe to repeat.
    pub fn on_drag_end(&mut self) {
        if self.session.take().is_some() {
            log::debug!("drag ended");
        }
    }

    /// Marks for the active mode; empty with no drag in flight
    pub fn active_highlights(&self) -> &[LineMark] {
        match &self.session {
            Some(session) => session.highlights.for_mode(session.mode),
            None => &[],
        }
    }

    pub fn mode(&self) -> DropMode {
        self.session
            .as_ref()
            .map(|session| session.mode)
            .unwrap_or_default()
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DropPolicy::default())
    }
}
