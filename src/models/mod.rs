//! Data models for taskmirror entities.
//!
//! This module defines the core data structures:
//! - `ProjectId` / `LabelId` / `ItemId` - canonical identifier newtypes
//! - `RawProject` / `RawLabel` / `RawItem` - records as the remote service
//!   delivers them, including visibility flags
//! - `Project` / `Item` / `Snapshot` - the derived, filtered, indexed view
//!
//! Visibility is a pure predicate on each raw record; everything else the
//! service sends is dropped at the snapshot boundary.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Remote project identifier.
///
/// In memory identifiers are always numeric; they become JSON object keys
/// (strings) only when a snapshot is serialized. `serde(transparent)` keeps
/// that conversion at the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

/// Remote label identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub u64);

/// Remote task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deserialize a visibility flag that the service may send as a boolean,
/// a 0/1 integer, or null.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Null(()) => false,
    })
}

/// A project record as delivered by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProject {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, deserialize_with = "flag")]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_archived: bool,
}

impl RawProject {
    /// A project is visible unless deleted or archived.
    pub fn visible(&self) -> bool {
        !self.is_deleted && !self.is_archived
    }
}

/// A label record as delivered by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    pub id: LabelId,
    pub name: String,
    #[serde(default, deserialize_with = "flag")]
    pub is_deleted: bool,
}

impl RawLabel {
    /// A label is visible unless deleted.
    pub fn visible(&self) -> bool {
        !self.is_deleted
    }
}

/// A task record as delivered by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub id: ItemId,
    pub project_id: ProjectId,
    pub content: String,
    /// Attached label ids, in the service's order.
    #[serde(default)]
    pub labels: Vec<LabelId>,
    #[serde(default, deserialize_with = "flag")]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_archived: bool,
    #[serde(default, deserialize_with = "flag")]
    pub in_history: bool,
}

impl RawItem {
    /// A task is visible unless deleted, archived, or completed into history.
    pub fn visible(&self) -> bool {
        !self.is_deleted && !self.is_archived && !self.in_history
    }
}

/// A visible project in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
}

/// A visible task in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub content: String,

    /// Attached label ids; a deleted label may linger here and is dropped
    /// at display time.
    #[serde(default)]
    pub labels: Vec<LabelId>,

    /// Engine-assigned display index, 1..N across the whole snapshot.
    /// Recomputed on every build; never persisted identity.
    pub index: u32,
}

/// The full derived, filtered, indexed view at one point in time.
///
/// All maps are insertion-ordered: display indices are a property of
/// iteration order, so the order records arrived from the service must be
/// reproducible here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Visible projects, keyed by project id.
    #[serde(default)]
    pub projects: IndexMap<ProjectId, Project>,

    /// Visible tasks grouped by project, keyed by item id within.
    #[serde(default)]
    pub items: IndexMap<ProjectId, IndexMap<ItemId, Item>>,

    /// Visible labels, keyed by name. Names are trusted unique among
    /// visible labels; the engine does not deduplicate.
    #[serde(default)]
    pub labels: IndexMap<String, LabelId>,
}

impl Snapshot {
    /// Number of visible tasks in the given project (0 when the project has
    /// no entry in the item map at all).
    pub fn item_count(&self, project: ProjectId) -> usize {
        self.items.get(&project).map_or(0, IndexMap::len)
    }

    /// Total number of visible tasks across all projects.
    pub fn total_items(&self) -> usize {
        self.items.values().map(IndexMap::len).sum()
    }
}
