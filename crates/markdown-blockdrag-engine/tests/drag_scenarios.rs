//! End-to-end drags through the controller, the way a host editor drives it:
//! start, drag-over, drag-enter, then drop or cancel.

use markdown_blockdrag_engine::editing::{
    AppliedEdits, Buffers, Document, IdSource, NoOpReason, TextBuffer,
};
use markdown_blockdrag_engine::interaction::{
    DragController, DropMode, DropOutcome, DropPolicy, Modifiers, OperationKind,
    PointerGeometry,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Hands out `id001`, `id002`, ...
struct Counter(usize);

impl IdSource for Counter {
    fn next_id(&mut self) -> String {
        self.0 += 1;
        format!("id{:03}", self.0)
    }
}

fn controller() -> DragController {
    DragController::with_id_source(DropPolicy::default(), Box::new(Counter(0)))
}

fn pointer(mode: DropMode) -> PointerGeometry {
    let pointer_x = match mode {
        DropMode::Current => 200.0,
        DropMode::Parent => 0.0,
    };
    PointerGeometry {
        pointer_x,
        line_left: 0.0,
        indent_width: 16.0,
    }
}

/// Byte offset of the start of 1-based `line`
fn offset_of_line(text: &str, line: usize) -> usize {
    text.split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum()
}

fn drag_within(
    doc: &mut Document,
    source_line: usize,
    destination_line: usize,
    mode: DropMode,
    modifiers: Modifiers,
) -> DropOutcome {
    let mut controller = controller();
    controller.on_drag_start(&*doc, source_line).unwrap();
    controller.on_drag_over(pointer(mode));
    let offset = offset_of_line(&doc.text(), destination_line);
    controller.on_drag_enter(&*doc, offset).unwrap();
    controller
        .on_drop(modifiers, offset, Buffers::Same(doc))
        .unwrap()
}

#[test]
fn test_move_nested_item_under_following_sibling() {
    let mut doc = Document::from_text("notes", "- A\n\t- B\n- C\n");

    drag_within(&mut doc, 2, 3, DropMode::Current, Modifiers::default());

    assert_eq!(doc.text(), "- A\n- C\n\t- B\n");
}

#[test]
fn test_move_nested_item_out_as_sibling() {
    let mut doc = Document::from_text("notes", "- A\n\t- B\n- C\n");

    drag_within(&mut doc, 2, 1, DropMode::Parent, Modifiers::default());

    assert_eq!(doc.text(), "- A\n- B\n- C\n");
}

#[test]
fn test_move_subtree_keeps_relative_indentation() {
    let mut doc = Document::from_text("notes", "- A\n\t- B\n\t\t- C\n- D\n\t- E\n");

    drag_within(&mut doc, 2, 5, DropMode::Current, Modifiers::default());

    assert_eq!(doc.text(), "- A\n- D\n\t- E\n\t\t- B\n\t\t\t- C\n");
}

#[test]
fn test_move_first_item_leaves_no_blank_line() {
    let mut doc = Document::from_text("notes", "- A\n- B\n- C\n");

    drag_within(&mut doc, 1, 3, DropMode::Parent, Modifiers::default());

    assert_eq!(doc.text(), "- B\n- C\n- A\n");
}

#[test]
fn test_move_within_blockquote_list() {
    let mut doc = Document::from_text("notes", "> - A\n> - B\n> - C\n> - D\n");

    let outcome = drag_within(&mut doc, 3, 4, DropMode::Parent, Modifiers::default());

    assert!(matches!(
        outcome,
        DropOutcome::Applied {
            kind: OperationKind::Move,
            ..
        }
    ));
    assert_eq!(doc.text(), "> - A\n> - B\n> - D\n> - C\n");
}

#[test]
fn test_move_first_item_drops_following_blank_lines() {
    let mut doc = Document::from_text("notes", "- A\n\n- B\n\n- C\n");

    drag_within(&mut doc, 1, 5, DropMode::Parent, Modifiers::default());

    assert_eq!(doc.text(), "- B\n\n- C\n- A\n");
}

#[test]
fn test_shift_copies() {
    let mut doc = Document::from_text("notes", "- A\n- B\n");

    let outcome = drag_within(&mut doc, 1, 2, DropMode::Current, Modifiers::shift());

    assert!(matches!(
        outcome,
        DropOutcome::Applied {
            kind: OperationKind::Copy,
            ..
        }
    ));
    assert_eq!(doc.text(), "- A\n- B\n\t- A\n");
}

#[rstest]
#[case(1, 1)]
#[case(1, 2)]
#[case(2, 3)]
fn test_dropping_block_onto_itself_changes_nothing(
    #[case] source_line: usize,
    #[case] destination_line: usize,
) {
    let text = "- A\n\t- B\n\t\t- C\n- D\n";
    let mut doc = Document::from_text("notes", text);

    let outcome = drag_within(
        &mut doc,
        source_line,
        destination_line,
        DropMode::Current,
        Modifiers::default(),
    );

    assert_eq!(outcome, DropOutcome::NoOp(NoOpReason::SelfTarget));
    assert_eq!(doc.text(), text);
}

#[test]
fn test_embed_across_panes_anchors_once() {
    let mut source = Document::from_text("Projects", "- Plan\n\t- Step one\n");
    let mut destination = Document::from_text("Today", "- Review\n");
    let mut controller = controller();

    for _ in 0..2 {
        controller.on_drag_start(&source, 2).unwrap();
        controller.on_drag_enter(&destination, 0).unwrap();
        let outcome = controller
            .on_drop(
                Modifiers::default(),
                0,
                Buffers::Split {
                    source: &mut source,
                    destination: &mut destination,
                },
            )
            .unwrap();
        assert!(matches!(
            outcome,
            DropOutcome::Applied {
                kind: OperationKind::Embed,
                edits: AppliedEdits::Separate { .. }
            }
        ));
    }

    assert_eq!(source.text(), "- Plan\n\t- Step one ^id001\n");
    assert_eq!(source.text().matches('^').count(), 1);
    assert_eq!(
        destination.text(),
        "- Review ![[Projects#^id001]] ![[Projects#^id001]]\n"
    );
    assert!(destination.is_focused());
    assert!(!source.is_focused());
}

#[test]
fn test_move_between_panes() {
    let mut source = Document::from_text("a", "- A\n\t- B\n");
    let mut destination = Document::from_text("b", "- X\n");
    let mut controller = DragController::with_id_source(
        DropPolicy {
            different_panes: OperationKind::Move,
            ..DropPolicy::default()
        },
        Box::new(Counter(0)),
    );

    controller.on_drag_start(&source, 2).unwrap();
    controller.on_drag_over(pointer(DropMode::Parent));
    controller
        .on_drop(
            Modifiers::default(),
            1,
            Buffers::Split {
                source: &mut source,
                destination: &mut destination,
            },
        )
        .unwrap();

    assert_eq!(source.text(), "- A\n");
    assert_eq!(destination.text(), "- X\n- B\n");
    assert_eq!((source.version(), destination.version()), (1, 1));
}

#[test]
fn test_cancelled_drag_resets_state() {
    let mut doc = Document::from_text("notes", "- A\n\t- B\n- C\n");
    let mut controller = controller();

    controller.on_drag_start(&doc, 1).unwrap();
    controller.on_drag_over(pointer(DropMode::Parent));
    controller.on_drag_enter(&doc, 9).unwrap();
    assert!(!controller.active_highlights().is_empty());

    controller.on_drag_end();

    assert!(controller.active_highlights().is_empty());
    assert_eq!(controller.mode(), DropMode::Current);
    let outcome = controller
        .on_drop(Modifiers::default(), 9, Buffers::Same(&mut doc))
        .unwrap();
    assert_eq!(outcome, DropOutcome::NoOp(NoOpReason::NoSession));
    assert_eq!(doc.version(), 0);
}

#[test]
fn test_drop_on_trailing_empty_line() {
    let mut doc = Document::from_text("notes", "- A\n- B\n");

    drag_within(&mut doc, 1, 3, DropMode::Parent, Modifiers::default());

    assert_eq!(doc.text(), "- B\n\n- A");
}
