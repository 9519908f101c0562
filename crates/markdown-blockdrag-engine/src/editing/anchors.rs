use uuid::Uuid;

use crate::editing::TextEdit;
use crate::structure::{Block, BlockGroup, GroupSpan};

const ID_LEN: usize = 6;
const MAX_ID_ATTEMPTS: usize = 16;
const ID_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Supplier of fresh block ids
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Six lowercase base-36 characters taken from a random v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let mut value = Uuid::new_v4().as_u128();
        (0..ID_LEN)
            .map(|_| {
                let digit = (value % 36) as usize;
                value /= 36;
                ID_DIGITS[digit] as char
            })
            .collect()
    }
}

/// Identity of a block plus the patch that writes it into the text.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRecord {
    pub stable_id: String,
    /// `" ^id"` after the block's own end; `None` when the id already exists
    pub insertion: Option<TextEdit>,
    /// Lines and offsets covered by the block and its descendants
    pub span: Option<GroupSpan>,
}

impl AnchorRecord {
    pub fn is_new(&self) -> bool {
        self.insertion.is_some()
    }
}

/// Make `block` addressable.
///
/// A block that already carries an id keeps it and needs no edit, so anchoring
/// the same block twice writes the suffix once. New ids are redrawn while they
/// collide with one in `existing_ids`.
pub fn assign_anchor(
    block: &Block,
    group: &BlockGroup,
    existing_ids: &[&str],
    ids: &mut dyn IdSource,
) -> AnchorRecord {
    if let Some(id) = &block.stable_id {
        return AnchorRecord {
            stable_id: id.clone(),
            insertion: None,
            span: group.span(),
        };
    }

    let mut id = ids.next_id();
    let mut attempts = 1;
    while existing_ids.contains(&id.as_str()) && attempts < MAX_ID_ATTEMPTS {
        id = ids.next_id();
        attempts += 1;
    }
    if existing_ids.contains(&id.as_str()) {
        log::warn!("block id {id} still collides after {attempts} attempts");
    }

    AnchorRecord {
        insertion: Some(TextEdit::insert(block.end_offset, format!(" ^{id}"))),
        stable_id: id,
        span: group.span(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Document, TextBuffer};
    use crate::structure::{BlockIndex, collect_descendants};
    use pretty_assertions::assert_eq;

    struct Sequence(Vec<&'static str>);

    impl IdSource for Sequence {
        fn next_id(&mut self) -> String {
            self.0.remove(0).to_string()
        }
    }

    fn anchor_line(text: &str, line: usize, ids: &mut dyn IdSource) -> AnchorRecord {
        let index = BlockIndex::build(text).unwrap();
        let root = index.item_at_line(line).unwrap();
        let group = collect_descendants(&[root], index.items());
        let taken: Vec<&str> = index.stable_ids().collect();
        assign_anchor(&index.items()[root], &group, &taken, ids)
    }

    #[test]
    fn test_random_ids_are_short_base36() {
        let mut ids = RandomIds;
        for _ in 0..20 {
            let id = ids.next_id();
            assert_eq!(id.len(), ID_LEN);
            assert!(id.bytes().all(|b| ID_DIGITS.contains(&b)));
        }
    }

    #[test]
    fn test_new_anchor_inserts_after_own_content() {
        let text = "- A\n\t- B\n\t\t- C\n- D\n";
        let record = anchor_line(text, 2, &mut Sequence(vec!["abc123"]));

        assert_eq!(record.stable_id, "abc123");
        assert_eq!(record.insertion, Some(TextEdit::insert(8, " ^abc123")));
        let span = record.span.unwrap();
        assert_eq!((span.from_line, span.to_line), (2, 3));
    }

    #[test]
    fn test_anchoring_twice_reuses_id_without_edit() {
        let mut doc = Document::from_text("notes", "- A\n\t- B\n");
        let first = anchor_line(&doc.text(), 2, &mut Sequence(vec!["first1"]));
        doc.apply_edits(&first.insertion.clone().into_iter().collect::<Vec<_>>())
            .unwrap();
        assert_eq!(doc.text(), "- A\n\t- B ^first1\n");

        let second = anchor_line(&doc.text(), 2, &mut Sequence(vec!["other2"]));

        assert_eq!(second.stable_id, "first1");
        assert_eq!(second.insertion, None);
        assert!(!second.is_new());
    }

    #[test]
    fn test_colliding_id_is_redrawn() {
        let text = "- A ^aaaaaa\n- B\n";
        let record = anchor_line(text, 2, &mut Sequence(vec!["aaaaaa", "bbbbbb"]));

        assert_eq!(record.stable_id, "bbbbbb");
    }
}
