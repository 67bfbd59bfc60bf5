use crate::models::{Block, BlockKind, Note, NoteCollection, Properties};
use crate::util::{generate_id, now};
use chrono::{DateTime, Duration, Utc};

fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

fn block(kind: BlockKind, content: &str) -> Block {
    Block {
        id: generate_id(),
        kind,
        content: content.to_string(),
        properties: Properties::new(),
        children: vec![],
    }
}

fn todo(content: &str, checked: bool) -> Block {
    block(BlockKind::ToDo { checked }, content)
}

fn note(
    title: &str,
    emoji: &str,
    blocks: Vec<Block>,
    tags: &[&str],
    created: i64,
    updated: i64,
    pinned: bool,
) -> Note {
    Note {
        id: generate_id(),
        title: title.to_string(),
        emoji: Some(emoji.to_string()),
        cover_image: None,
        blocks,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: days_ago(created),
        updated_at: days_ago(updated),
        pinned,
        parent_id: None,
    }
}

fn welcome_blocks() -> Vec<Block> {
    vec![
        block(BlockKind::Heading1, "Getting Started with Creative Notes"),
        block(
            BlockKind::Paragraph,
            "This is a Notion-inspired application for taking structured creative notes. \
             It provides a canvas for your ideas to flow while keeping them organized.",
        ),
        block(BlockKind::Heading2, "Key Features"),
        block(
            BlockKind::BulletList,
            "Block-based editing for flexible content creation",
        ),
        block(
            BlockKind::BulletList,
            "Multiple view options: document, kanban, and mind map",
        ),
        block(
            BlockKind::BulletList,
            "Smart linking between notes to create a knowledge graph",
        ),
        block(BlockKind::Heading2, "Getting Started"),
        block(
            BlockKind::Paragraph,
            "To create a new note, click the + button in the sidebar.",
        ),
        block(BlockKind::Divider, ""),
        block(
            BlockKind::Quote,
            "Creativity is intelligence having fun. - Albert Einstein",
        ),
    ]
}

/// Notes written on first run: a pinned guide, a project list and a reading list.
pub fn sample_notes() -> Vec<Note> {
    vec![
        note(
            "Welcome to Creative Notes",
            "👋",
            welcome_blocks(),
            &["welcome", "guide"],
            0,
            0,
            true,
        ),
        note(
            "Project Ideas",
            "💡",
            vec![
                block(BlockKind::Heading1, "Project Ideas"),
                block(
                    BlockKind::Paragraph,
                    "A collection of potential project ideas to explore.",
                ),
                todo("Mobile app for plant care tracking", false),
                todo("Interactive data visualization tool", true),
                todo("Recipe collection with AI-powered suggestions", false),
            ],
            &["projects", "ideas"],
            2,
            1,
            false,
        ),
        note(
            "Reading List",
            "📚",
            vec![
                block(BlockKind::Heading1, "Books to Read"),
                todo("Atomic Habits by James Clear", true),
                todo("The Design of Everyday Things by Don Norman", false),
                todo("Deep Work by Cal Newport", false),
            ],
            &["reading", "books"],
            5,
            3,
            false,
        ),
    ]
}

/// Collections written on first run, pointing at the second and third sample notes.
pub fn sample_collections(notes: &[Note]) -> Vec<NoteCollection> {
    let member = |idx: usize| notes.get(idx).map(|n| n.id.clone()).into_iter().collect();

    vec![
        NoteCollection {
            id: generate_id(),
            title: "Personal Projects".to_string(),
            emoji: Some("🚀".to_string()),
            cover_image: None,
            description: Some("Ideas and plans for personal projects".to_string()),
            notes: member(1),
            created_at: days_ago(5),
            updated_at: days_ago(2),
            pinned: true,
        },
        NoteCollection {
            id: generate_id(),
            title: "Learning Resources".to_string(),
            emoji: Some("🧠".to_string()),
            cover_image: None,
            description: Some("Books, courses, and other learning materials".to_string()),
            notes: member(2),
            created_at: days_ago(10),
            updated_at: days_ago(3),
            pinned: false,
        },
    ]
}
