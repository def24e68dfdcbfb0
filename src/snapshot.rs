//! Snapshot construction: filter raw remote records down to the visible
//! subset and assign display indices.
//!
//! A snapshot is always rebuilt from scratch - nothing is patched
//! incrementally and no index survives from a previous build.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::models::{Item, Project, RawItem, RawLabel, RawProject, Snapshot};
use crate::remote::RemoteState;
use crate::{Error, Result};

/// Build a snapshot from the full raw state returned by the remote service.
///
/// Records arrive as raw JSON values so a single malformed record can be
/// reported with its entity kind and id instead of failing the whole
/// response decode. Invisible records are skipped; visible ones are inserted
/// in arrival order, which is what display-index assignment iterates over.
pub fn build(state: &RemoteState) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();

    for value in &state.projects {
        let project: RawProject = decode(value, "project")?;
        if !project.visible() {
            continue;
        }
        snapshot
            .projects
            .insert(project.id, Project { name: project.name });
    }

    for value in &state.items {
        let item: RawItem = decode(value, "item")?;
        if !item.visible() {
            continue;
        }
        snapshot.items.entry(item.project_id).or_default().insert(
            item.id,
            Item {
                content: item.content,
                labels: item.labels,
                index: 0,
            },
        );
    }

    for value in &state.labels {
        let label: RawLabel = decode(value, "label")?;
        if !label.visible() {
            continue;
        }
        snapshot.labels.insert(label.name, label.id);
    }

    assign_indices(&mut snapshot);

    debug!(
        projects = snapshot.projects.len(),
        items = snapshot.total_items(),
        labels = snapshot.labels.len(),
        "built snapshot"
    );
    Ok(snapshot)
}

fn decode<T: DeserializeOwned>(value: &Value, kind: &'static str) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|_| Error::MalformedRecord {
        kind,
        id: record_id(value),
    })
}

fn record_id(value: &Value) -> String {
    match value.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(v) if !v.is_null() => v.to_string(),
        _ => "?".to_string(),
    }
}

/// Assign display indices 1..N in iteration order: projects in first-seen
/// order, then items in first-seen order within each project.
fn assign_indices(snapshot: &mut Snapshot) {
    let mut index = 1u32;
    for items in snapshot.items.values_mut() {
        for item in items.values_mut() {
            item.index = index;
            index += 1;
        }
    }
}
