/// Result of applying a batch of edits
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Ranges holding inserted text, in post-edit coordinates
    pub changed: Vec<std::ops::Range<usize>>,
    pub version: u64,
}
