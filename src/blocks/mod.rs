//! Pure transforms over a note's block sequence.
//!
//! Every function takes the note by reference and returns a new `Note`; the input
//! is never modified. Stale block ids are tolerated: the result is then an
//! unchanged copy, except for `insert_after`, which falls back to appending.

use crate::models::{Block, BlockKind, BlockType, MoveDirection, Note, Properties};
use crate::util::{generate_id, now};

/// A fresh block of `kind` holding `content`, with default properties.
pub fn create_block(kind: BlockType, content: &str) -> Block {
    Block {
        id: generate_id(),
        kind: BlockKind::from(kind),
        content: content.to_string(),
        properties: Properties::new(),
        children: vec![],
    }
}

/// A fresh, empty block of `kind`.
pub fn new_block(kind: BlockType) -> Block {
    create_block(kind, "")
}

/// A note holding a single empty paragraph. `title` defaults to "Untitled".
pub fn create_note(title: Option<&str>) -> Note {
    let ts = now();
    Note {
        id: generate_id(),
        title: title.unwrap_or("Untitled").to_string(),
        emoji: None,
        cover_image: None,
        blocks: vec![new_block(BlockType::Paragraph)],
        tags: vec![],
        created_at: ts,
        updated_at: ts,
        pinned: false,
        parent_id: None,
    }
}

pub fn find_block<'a>(note: &'a Note, block_id: &str) -> Option<&'a Block> {
    note.blocks.iter().find(|b| b.id == block_id)
}

/// Place `new_block` right after `target_block_id`, or at the end when the target is gone.
pub fn insert_after(note: &Note, target_block_id: &str, new_block: Block) -> Note {
    let mut next = note.clone();
    match next.block_index(target_block_id) {
        Some(idx) => next.blocks.insert(idx + 1, new_block),
        None => next.blocks.push(new_block),
    }
    next.touch();
    next
}

pub fn update_content(note: &Note, block_id: &str, content: &str) -> Note {
    edit_block(note, block_id, |b| b.content = content.to_string())
}

/// Retype a block. Content and properties are kept.
pub fn change_type(note: &Note, block_id: &str, new_type: BlockType) -> Note {
    edit_block(note, block_id, |b| b.retype(new_type))
}

pub fn delete_block(note: &Note, block_id: &str) -> Note {
    let Some(idx) = note.block_index(block_id) else {
        return note.clone();
    };

    let mut next = note.clone();
    next.blocks.remove(idx);
    next.touch();
    next
}

/// Swap a block with its neighbour. The first block can't go up, the last can't go down.
pub fn move_block(note: &Note, block_id: &str, direction: MoveDirection) -> Note {
    let Some(idx) = note.block_index(block_id) else {
        return note.clone();
    };

    let neighbour = match direction {
        MoveDirection::Up if idx > 0 => idx - 1,
        MoveDirection::Down if idx + 1 < note.blocks.len() => idx + 1,
        _ => return note.clone(),
    };

    let mut next = note.clone();
    next.blocks.swap(idx, neighbour);
    next.touch();
    next
}

/// Flip the `checked` flag of a to-do block. Other kinds are left alone.
pub fn toggle_checked(note: &Note, block_id: &str) -> Note {
    match find_block(note, block_id).map(|b| &b.kind) {
        Some(BlockKind::ToDo { .. }) => edit_block(note, block_id, |b| {
            if let BlockKind::ToDo { checked } = &mut b.kind {
                *checked = !*checked;
            }
        }),
        _ => note.clone(),
    }
}

/// Add an empty block of `kind` after `anchor`, or after the last block when no anchor
/// is given. An empty note gets it as its only block.
///
/// Returns the new note and the id of the inserted block.
pub fn add_block(note: &Note, kind: BlockType, anchor: Option<&str>) -> (Note, String) {
    let block = new_block(kind);
    let id = block.id.clone();

    let next = match anchor.or_else(|| note.blocks.last().map(|b| b.id.as_str())) {
        Some(anchor_id) => insert_after(note, anchor_id, block),
        None => {
            let mut next = note.clone();
            next.blocks = vec![block];
            next.touch();
            next
        }
    };

    (next, id)
}

fn edit_block(note: &Note, block_id: &str, edit: impl FnOnce(&mut Block)) -> Note {
    let Some(idx) = note.block_index(block_id) else {
        return note.clone();
    };

    let mut next = note.clone();
    edit(&mut next.blocks[idx]);
    next.touch();
    next
}
