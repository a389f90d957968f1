//! Item Entity
//!
//! A node of the organizer tree. Folders own children; notes and tasks carry
//! an opaque rich-text payload, tasks additionally a completion flag.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of ids handed out locally before the server has confirmed an item.
pub const TRANSIENT_ID_PREFIX: &str = "tmp-";

/// Shared, immutable handle to an item. Unchanged subtrees are shared
/// between successive tree values.
pub type Node = Arc<Item>;

/// Opaque item identifier, unique across the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh client-side id, replaced once the server assigns the real one.
    pub fn transient() -> Self {
        Self(format!("{}{}", TRANSIENT_ID_PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn is_transient(&self) -> bool {
        self.0.starts_with(TRANSIENT_ID_PREFIX)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Item type, also the primary sibling sort key (folders first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Folder,
    Note,
    Task,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Folder => "folder",
            ItemType::Note => "note",
            ItemType::Task => "task",
        }
    }

    /// Parse a wire name; unknown names are rejected rather than defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "folder" => Some(ItemType::Folder),
            "note" => Some(ItemType::Note),
            "task" => Some(ItemType::Task),
            _ => None,
        }
    }
}

/// Variant-specific payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Folder {
        #[serde(default)]
        children: Vec<Node>,
    },
    Note {
        #[serde(default)]
        content: String,
    },
    Task {
        #[serde(default)]
        content: String,
        #[serde(default)]
        completed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn folder(id: impl Into<ItemId>, label: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_kind(id, label, ItemKind::Folder { children })
    }

    pub fn note(id: impl Into<ItemId>, label: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_kind(
            id,
            label,
            ItemKind::Note {
                content: content.into(),
            },
        )
    }

    pub fn task(id: impl Into<ItemId>, label: impl Into<String>, completed: bool) -> Self {
        Self::with_kind(
            id,
            label,
            ItemKind::Task {
                content: String::new(),
                completed,
            },
        )
    }

    fn with_kind(id: impl Into<ItemId>, label: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            created_at: None,
            updated_at: None,
            kind,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Folder { .. } => ItemType::Folder,
            ItemKind::Note { .. } => ItemType::Note,
            ItemKind::Task { .. } => ItemType::Task,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder { .. })
    }

    /// Children of a folder; empty for notes and tasks.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            ItemKind::Folder { children } => children,
            _ => &[],
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Note { content } | ItemKind::Task { content, .. } => Some(content),
            ItemKind::Folder { .. } => None,
        }
    }

    pub fn completed(&self) -> Option<bool> {
        match self.kind {
            ItemKind::Task { completed, .. } => Some(completed),
            _ => None,
        }
    }

    /// Copy of this item with its child list replaced. Non-folders are
    /// returned unchanged.
    pub fn with_children(&self, children: Vec<Node>) -> Item {
        match self.kind {
            ItemKind::Folder { .. } => Item {
                id: self.id.clone(),
                label: self.label.clone(),
                created_at: self.created_at,
                updated_at: self.updated_at,
                kind: ItemKind::Folder { children },
            },
            _ => self.clone(),
        }
    }

    pub fn with_label(&self, label: impl Into<String>) -> Item {
        Item {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Number of items in the subtree rooted here, this one included.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(|c| c.count()).sum::<usize>()
    }
}

/// Body of a create request: `{label, type, content?, completed?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub label: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ItemDraft {
    pub fn new(label: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            label: label.into(),
            item_type,
            content: None,
            completed: None,
        }
    }

    pub fn folder(label: impl Into<String>) -> Self {
        Self::new(label, ItemType::Folder)
    }

    pub fn note(label: impl Into<String>) -> Self {
        Self::new(label, ItemType::Note)
    }

    pub fn task(label: impl Into<String>) -> Self {
        Self::new(label, ItemType::Task)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Draft describing an existing item, without its children.
    pub fn from_item(item: &Item) -> Self {
        Self {
            label: item.label.clone(),
            item_type: item.item_type(),
            content: item.content().map(str::to_string),
            completed: item.completed(),
        }
    }

    /// Materialize the draft as a childless item.
    pub fn into_item(self, id: ItemId) -> Item {
        let kind = match self.item_type {
            ItemType::Folder => ItemKind::Folder {
                children: Vec::new(),
            },
            ItemType::Note => ItemKind::Note {
                content: self.content.unwrap_or_default(),
            },
            ItemType::Task => ItemKind::Task {
                content: self.content.unwrap_or_default(),
                completed: self.completed.unwrap_or(false),
            },
        };
        Item {
            id,
            label: self.label,
            created_at: None,
            updated_at: None,
            kind,
        }
    }
}

/// Partial update body for `PATCH /items/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ItemPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    /// Apply the patch to an item. Fields that do not exist on the item's
    /// variant are ignored.
    pub fn apply(&self, item: &Item) -> Item {
        let mut next = item.clone();
        if let Some(label) = &self.label {
            next.label = label.clone();
        }
        match &mut next.kind {
            ItemKind::Note { content } => {
                if let Some(c) = &self.content {
                    *content = c.clone();
                }
            }
            ItemKind::Task { content, completed } => {
                if let Some(c) = &self.content {
                    *content = c.clone();
                }
                if let Some(done) = self.completed {
                    *completed = done;
                }
            }
            ItemKind::Folder { .. } => {}
        }
        next
    }
}
