use crate::models::{BlockType, Note};

/// Entries shown by the collapsed structure panel before the "+N" counter.
pub const COLLAPSED_LIMIT: usize = 10;

/// One row of the structure panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutlineEntry {
    pub block_id: String,
    pub block_type: BlockType,
    pub label: String,
}

/// A row per block, labelled by its content or, when empty, by its type name.
pub fn outline(note: &Note) -> Vec<OutlineEntry> {
    note.blocks
        .iter()
        .map(|b| {
            let content = b.content.trim();
            OutlineEntry {
                block_id: b.id.clone(),
                block_type: b.block_type(),
                label: if content.is_empty() {
                    b.block_type().display_name()
                } else {
                    content.to_string()
                },
            }
        })
        .collect()
}

/// The first `limit` rows plus how many were left out.
pub fn collapsed_outline(note: &Note, limit: usize) -> (Vec<OutlineEntry>, usize) {
    let mut entries = outline(note);
    let hidden = entries.len().saturating_sub(limit);
    entries.truncate(limit);
    (entries, hidden)
}
