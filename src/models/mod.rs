use crate::util::next_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Closed set of block tags.
///
/// The string form is the tag persisted under `"type"` in local storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    #[strum(serialize = "heading-1")]
    Heading1,
    #[strum(serialize = "heading-2")]
    Heading2,
    #[strum(serialize = "heading-3")]
    Heading3,
    BulletList,
    NumberedList,
    ToDo,
    Quote,
    Divider,
    Image,
    Code,
    ConceptMap,
    MoodBoard,
    Sketch,
}

impl BlockType {
    /// Types offered in the "add block" and "turn into" menus.
    pub fn menu_items() -> Vec<BlockType> {
        BlockType::iter().filter(|t| !t.is_canvas()).collect()
    }

    /// Canvas kinds exist in stored data but have no editor yet.
    pub fn is_canvas(self) -> bool {
        matches!(
            self,
            BlockType::ConceptMap | BlockType::MoodBoard | BlockType::Sketch
        )
    }

    /// Human readable name: the tag split on `-` with each word capitalised.
    pub fn display_name(self) -> String {
        self.as_ref()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Hint shown in an empty block of this type.
    pub fn placeholder(self) -> &'static str {
        match self {
            BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => "Heading",
            BlockType::BulletList | BlockType::NumberedList => "List item",
            BlockType::ToDo => "To-do item",
            BlockType::Quote => "Quote",
            BlockType::Code => "// Code",
            BlockType::Image => "Paste an image URL...",
            BlockType::Paragraph
            | BlockType::Divider
            | BlockType::ConceptMap
            | BlockType::MoodBoard
            | BlockType::Sketch => "",
        }
    }

    /// Short marker used by the structure panel.
    pub fn glyph(self) -> &'static str {
        match self {
            BlockType::Paragraph => "¶",
            BlockType::Heading1 => "H1",
            BlockType::Heading2 => "H2",
            BlockType::Heading3 => "H3",
            BlockType::BulletList => "•",
            BlockType::NumberedList => "1.",
            BlockType::ToDo => "☐",
            BlockType::Quote => "❝",
            BlockType::Divider => "—",
            BlockType::Image => "▣",
            BlockType::Code => "</>",
            BlockType::ConceptMap => "◎",
            BlockType::MoodBoard => "▦",
            BlockType::Sketch => "✎",
        }
    }
}

/// A block's type together with the data only that type carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    ToDo { checked: bool },
    Quote,
    Divider,
    Image,
    Code,
    ConceptMap,
    MoodBoard,
    Sketch,
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Paragraph => BlockType::Paragraph,
            BlockKind::Heading1 => BlockType::Heading1,
            BlockKind::Heading2 => BlockType::Heading2,
            BlockKind::Heading3 => BlockType::Heading3,
            BlockKind::BulletList => BlockType::BulletList,
            BlockKind::NumberedList => BlockType::NumberedList,
            BlockKind::ToDo { .. } => BlockType::ToDo,
            BlockKind::Quote => BlockType::Quote,
            BlockKind::Divider => BlockType::Divider,
            BlockKind::Image => BlockType::Image,
            BlockKind::Code => BlockType::Code,
            BlockKind::ConceptMap => BlockType::ConceptMap,
            BlockKind::MoodBoard => BlockType::MoodBoard,
            BlockKind::Sketch => BlockType::Sketch,
        }
    }

    /// `Some(checked)` for to-dos.
    pub fn checked(&self) -> Option<bool> {
        match self {
            BlockKind::ToDo { checked } => Some(*checked),
            _ => None,
        }
    }
}

impl From<BlockType> for BlockKind {
    fn from(t: BlockType) -> Self {
        match t {
            BlockType::Paragraph => BlockKind::Paragraph,
            BlockType::Heading1 => BlockKind::Heading1,
            BlockType::Heading2 => BlockKind::Heading2,
            BlockType::Heading3 => BlockKind::Heading3,
            BlockType::BulletList => BlockKind::BulletList,
            BlockType::NumberedList => BlockKind::NumberedList,
            BlockType::ToDo => BlockKind::ToDo { checked: false },
            BlockType::Quote => BlockKind::Quote,
            BlockType::Divider => BlockKind::Divider,
            BlockType::Image => BlockKind::Image,
            BlockType::Code => BlockKind::Code,
            BlockType::ConceptMap => BlockKind::ConceptMap,
            BlockType::MoodBoard => BlockKind::MoodBoard,
            BlockType::Sketch => BlockKind::Sketch,
        }
    }
}

/// Block properties keyed as in stored JSON.
pub type Properties = serde_json::Map<String, serde_json::Value>;

const CHECKED: &str = "checked";

/// One typed unit of note content.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "BlockRecord", into = "BlockRecord")]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub content: String,
    /// Stored properties the current kind does not model, such as a former
    /// to-do's `checked` flag. Never holds a key the kind itself carries.
    pub properties: Properties,
    /// Nested blocks. Stored data may carry them; the editor never creates any.
    pub children: Vec<Block>,
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Switch to `new_type` without losing data: the old kind's fields move into
    /// `properties` and the new kind takes its fields back out of them.
    pub fn retype(&mut self, new_type: BlockType) {
        if self.block_type() == new_type {
            return;
        }
        if let BlockKind::ToDo { checked } = self.kind {
            self.properties
                .insert(CHECKED.to_string(), serde_json::Value::Bool(checked));
        }
        self.kind = kind_from_properties(new_type, &mut self.properties);
    }
}

/// Build the kind for `block_type`, moving the fields it carries out of `properties`.
fn kind_from_properties(block_type: BlockType, properties: &mut Properties) -> BlockKind {
    match block_type {
        BlockType::ToDo => {
            let checked = properties.get(CHECKED).and_then(|v| v.as_bool());
            if checked.is_some() {
                properties.remove(CHECKED);
            }
            BlockKind::ToDo {
                checked: checked.unwrap_or(false),
            }
        }
        other => BlockKind::from(other),
    }
}

/// Wire shape of a block: `{ id, type, content, properties?, children? }`.
#[derive(Serialize, Deserialize)]
struct BlockRecord {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Block>,
}

impl From<BlockRecord> for Block {
    fn from(r: BlockRecord) -> Self {
        let block_type = BlockType::from_str(&r.block_type).unwrap_or_else(|_| {
            log::warn!(
                "block {} has unknown type {:?}; reading it as a paragraph",
                r.id,
                r.block_type
            );
            BlockType::Paragraph
        });

        let mut properties = r.properties.unwrap_or_default();
        let kind = kind_from_properties(block_type, &mut properties);

        Block {
            id: r.id,
            kind,
            content: r.content,
            properties,
            children: r.children,
        }
    }
}

impl From<Block> for BlockRecord {
    fn from(b: Block) -> Self {
        let mut properties = b.properties;
        if let Some(checked) = b.kind.checked() {
            properties.insert(CHECKED.to_string(), serde_json::Value::Bool(checked));
        }
        let properties = (!properties.is_empty()).then_some(properties);

        BlockRecord {
            block_type: b.kind.block_type().to_string(),
            id: b.id,
            content: b.content,
            properties,
            children: b.children,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Note {
    /// Refresh `updated_at`; the new value is always later than the old one.
    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }
}

/// A named grouping that references notes by id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteCollection {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
}

impl NoteCollection {
    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.notes.iter().any(|id| id == note_id)
    }
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    /// The theme the sidebar toggle switches to.
    pub fn next(self) -> Theme {
        match self {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        }
    }
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Document,
    Kanban,
    Mindmap,
}

/// Singleton settings record. Fields missing from stored JSON take their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub default_view: ViewKind,
    pub sidebar_collapsed: bool,
    pub font_scale: f64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            default_view: ViewKind::Document,
            sidebar_collapsed: false,
            font_scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}
