use serde::{Deserialize, Serialize};

/// What a drop does with the dragged block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Move,
    Copy,
    Embed,
    None,
}

/// Modifier keys held at drop time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }

    /// Shift wins whenever it is held, even together with alt or meta.
    pub fn class(self) -> ModifierClass {
        if self.shift {
            ModifierClass::Shift
        } else if self.alt || self.meta {
            ModifierClass::AltOrMeta
        } else {
            ModifierClass::Simple
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierClass {
    Shift,
    AltOrMeta,
    Simple,
}

/// User-configurable mapping from modifier class to operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPolicy {
    pub same_pane: OperationKind,
    pub different_panes: OperationKind,
    pub shift: OperationKind,
    pub alt_or_meta: OperationKind,
}

impl Default for DropPolicy {
    fn default() -> Self {
        Self {
            same_pane: OperationKind::Move,
            different_panes: OperationKind::Embed,
            shift: OperationKind::Copy,
            alt_or_meta: OperationKind::None,
        }
    }
}

/// Map the held modifiers and whether both ends share a pane to an operation.
pub fn decide_operation(
    modifiers: Modifiers,
    same_buffer: bool,
    policy: &DropPolicy,
) -> OperationKind {
    match modifiers.class() {
        ModifierClass::Shift => policy.shift,
        ModifierClass::AltOrMeta => policy.alt_or_meta,
        ModifierClass::Simple if same_buffer => policy.same_pane,
        ModifierClass::Simple => policy.different_panes,
    }
}
