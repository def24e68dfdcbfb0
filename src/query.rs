//! Query engine: listings and display-index resolution over a snapshot.
//!
//! All listings are naturally sorted - ordinary case-insensitive
//! lexicographic order except that maximal digit runs compare as integers,
//! so "item 2" sorts before "item 10".
//!
//! Name queries are case-insensitive. An exact full-name match wins
//! outright and excludes broader substring matches; when several names
//! match exactly, the first encountered in snapshot order wins.

use std::collections::HashMap;

use crate::models::{Item, ItemId, LabelId, ProjectId, Snapshot};
use crate::{Error, Result};

/// One segment of a natural-sort key: either a digit run or a lowercased
/// text run. `Num` sorts before `Text` so "10" lands ahead of "a".
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Num(u128),
    Text(String),
}

fn natural_key(s: &str) -> Vec<Segment> {
    let mut key = Vec::new();
    let mut rest = s;
    while let Some(first) = rest.chars().next() {
        let digits = first.is_ascii_digit();
        let split = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(split);
        if digits {
            match run.parse::<u128>() {
                Ok(n) => key.push(Segment::Num(n)),
                Err(_) => key.push(Segment::Text(run.to_string())),
            }
        } else {
            key.push(Segment::Text(run.to_lowercase()));
        }
        rest = tail;
    }
    key
}

/// Sort lines in natural order.
pub fn natural_sort(lines: &mut [String]) {
    lines.sort_by_cached_key(|line| natural_key(line));
}

/// Case-insensitive name resolution: an exact match returns only that
/// candidate, otherwise every substring match is returned in encounter
/// order.
fn name_matches<'a, T, I>(candidates: I, query: &str) -> Vec<T>
where
    T: Copy,
    I: Iterator<Item = (&'a str, T)>,
{
    let query = query.to_lowercase();
    let mut matches = Vec::new();
    for (name, value) in candidates {
        let name = name.to_lowercase();
        if name == query {
            return vec![value];
        }
        if name.contains(&query) {
            matches.push(value);
        }
    }
    matches
}

/// Reverse index from label id to name, for annotating item lines. The
/// snapshot only stores name -> id; this keeps annotation lookup O(1) per
/// label without changing observable behavior.
fn label_names(snapshot: &Snapshot) -> HashMap<LabelId, &str> {
    snapshot
        .labels
        .iter()
        .map(|(name, id)| (*id, name.as_str()))
        .collect()
}

/// Render one item line: `[index] project - content @label ...`.
///
/// An attached label id that is no longer in the visible label map is
/// silently dropped from the annotation.
fn item_line(names: &HashMap<LabelId, &str>, project_name: &str, item: &Item) -> String {
    let mut line = format!("[{}] {} - {}", item.index, project_name, item.content);
    for label_id in &item.labels {
        if let Some(name) = names.get(label_id) {
            line.push_str(" @");
            line.push_str(name);
        }
    }
    line
}

/// `{name} ({count})` for each visible project, naturally sorted. Projects
/// with no visible tasks count as 0.
pub fn project_lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines: Vec<String> = snapshot
        .projects
        .iter()
        .map(|(id, project)| format!("{} ({})", project.name, snapshot.item_count(*id)))
        .collect();
    natural_sort(&mut lines);
    lines
}

/// `{name} ({count})` for each visible label, counting tasks carrying the
/// label across all projects, naturally sorted.
pub fn label_lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines: Vec<String> = snapshot
        .labels
        .iter()
        .map(|(name, id)| {
            let count = snapshot
                .items
                .values()
                .flat_map(|items| items.values())
                .filter(|item| item.labels.contains(id))
                .count();
            format!("{name} ({count})")
        })
        .collect();
    natural_sort(&mut lines);
    lines
}

/// Tasks in projects whose name matches the query. Informational lines
/// (no match at all, or a matched project with no tasks) come first,
/// followed by the naturally sorted task lines.
pub fn items_in_project(snapshot: &Snapshot, query: &str) -> Vec<String> {
    let matched = name_matches(
        snapshot
            .projects
            .iter()
            .map(|(id, project)| (project.name.as_str(), *id)),
        query,
    );
    if matched.is_empty() {
        return vec![format!("No project named {query}")];
    }

    let names = label_names(snapshot);
    let mut output = Vec::new();
    let mut lines = Vec::new();
    for project_id in matched {
        let project_name = &snapshot.projects[&project_id].name;
        if snapshot.item_count(project_id) == 0 {
            output.push(format!("No items in {project_name}."));
            continue;
        }
        for item in snapshot.items[&project_id].values() {
            lines.push(item_line(&names, project_name, item));
        }
    }
    natural_sort(&mut lines);
    output.extend(lines);
    output
}

/// Tasks carrying a label whose name matches the query. A task carrying
/// two matching labels is emitted once per matching label.
pub fn items_with_label(snapshot: &Snapshot, query: &str) -> Vec<String> {
    let matched = name_matches(
        snapshot
            .labels
            .iter()
            .map(|(name, id)| (name.as_str(), *id)),
        query,
    );
    if matched.is_empty() {
        return vec![format!("No label named {query}")];
    }

    let names = label_names(snapshot);
    let mut lines = Vec::new();
    for label_id in matched {
        for (project_id, items) in &snapshot.items {
            // An item map entry without a matching project is skipped, not
            // treated as an error.
            let Some(project) = snapshot.projects.get(project_id) else {
                continue;
            };
            for item in items.values() {
                if item.labels.contains(&label_id) {
                    lines.push(item_line(&names, &project.name, item));
                }
            }
        }
    }
    natural_sort(&mut lines);
    lines
}

/// Every visible task in every project, naturally sorted.
pub fn all_item_lines(snapshot: &Snapshot) -> Vec<String> {
    let names = label_names(snapshot);
    let mut lines = Vec::new();
    for (project_id, items) in &snapshot.items {
        let Some(project) = snapshot.projects.get(project_id) else {
            continue;
        };
        for item in items.values() {
            lines.push(item_line(&names, &project.name, item));
        }
    }
    natural_sort(&mut lines);
    lines
}

/// Resolve a display index to the task carrying it.
///
/// Scans in snapshot order and returns the first match. Callers resolving
/// against a stale cache must not assume indices are dense.
pub fn find_index(snapshot: &Snapshot, index: u32) -> Result<(ProjectId, ItemId, &Item)> {
    for (project_id, items) in &snapshot.items {
        for (item_id, item) in items {
            if item.index == index {
                return Ok((*project_id, *item_id, item));
            }
        }
    }
    Err(Error::IndexNotFound(index))
}
