//! Command implementations for the taskmirror CLI.
//!
//! Each handler performs at most one resolution fetch and, after a
//! successful mutation, one refresh fetch - the snapshot from a single
//! fetch is passed to every consumer within the invocation so the user
//! never sees two views of the remote state in one command.
//!
//! Handlers return the lines to print; exit-status policy lives in `main`.

use tracing::{info, warn};

use crate::config::Config;
use crate::models::{LabelId, ProjectId, Snapshot};
use crate::remote::Client;
use crate::{Error, Result, cache, query, snapshot};

/// Fetch the full remote state once, rebuild the snapshot, and write it
/// through the cache. This is the only place live data enters the system;
/// a failed fetch or build leaves the previous cache untouched.
pub fn sync_state(config: &Config) -> Result<Snapshot> {
    let client = client(config)?;
    sync_with(config, &client)
}

fn client(config: &Config) -> Result<Client> {
    let token = config.read_token()?;
    Ok(match config.api_url() {
        Some(url) => Client::with_url(token, url.to_string()),
        None => Client::new(token),
    })
}

fn sync_with(config: &Config, client: &Client) -> Result<Snapshot> {
    let state = client.fetch_state()?;
    let snap = snapshot::build(&state)?;
    cache::persist(config, &snap)?;
    info!(
        projects = snap.projects.len(),
        items = snap.total_items(),
        "synced"
    );
    Ok(snap)
}

/// `tm sync` - rebuild the cache, print nothing on success.
pub fn sync(config: &Config) -> Result<Vec<String>> {
    sync_state(config)?;
    Ok(Vec::new())
}

/// `tm projects`
pub fn projects(config: &Config) -> Result<Vec<String>> {
    Ok(query::project_lines(&sync_state(config)?))
}

/// `tm labels`
pub fn labels(config: &Config) -> Result<Vec<String>> {
    Ok(query::label_lines(&sync_state(config)?))
}

/// `tm list`
pub fn list_all(config: &Config) -> Result<Vec<String>> {
    Ok(query::all_item_lines(&sync_state(config)?))
}

/// `tm list project <name>`
pub fn list_project(config: &Config, name: &str) -> Result<Vec<String>> {
    Ok(query::items_in_project(&sync_state(config)?, name))
}

/// `tm list label <name>`
pub fn list_label(config: &Config, name: &str) -> Result<Vec<String>> {
    Ok(query::items_with_label(&sync_state(config)?, name))
}

/// `tm cache projects` - offline listing of cached project names.
pub fn cache_projects(config: &Config) -> Result<Vec<String>> {
    let snap = cache::load(config)?;
    let mut lines: Vec<String> = snap.projects.values().map(|p| p.name.clone()).collect();
    query::natural_sort(&mut lines);
    Ok(lines)
}

/// `tm add <project> <words..>` - create the project and any labels that
/// do not exist yet, then add the task.
pub fn add(config: &Config, project: &str, words: &[String]) -> Result<Vec<String>> {
    let client = client(config)?;
    let snap = sync_with(config, &client)?;
    let mut output = Vec::new();

    let (content, label_names) = split_words(words);

    let project_id = match exact_project(&snap, project) {
        Some(id) => id,
        None => {
            let id = client.add_project(project)?;
            output.push(format!("Created Project: {project}"));
            id
        }
    };

    let mut label_ids = Vec::new();
    for name in &label_names {
        match exact_label(&snap, name) {
            Some(id) => label_ids.push(id),
            None => {
                let id = client.add_label(name)?;
                output.push(format!("Created Label: {name}"));
                label_ids.push(id);
            }
        }
    }

    client.add_item(&content, project_id, &label_ids)?;
    output.push("Task added".to_string());
    refresh_cache(config, &client, &mut output);
    Ok(output)
}

/// `tm done <index>` - resolve the index against the cached snapshot (a
/// stale cache is the defined lookup base), complete remotely, refresh.
pub fn done(config: &Config, index: u32) -> Result<Vec<String>> {
    let snap = cache::load(config)?;
    let (_, item_id, item) = query::find_index(&snap, index)?;
    let content = item.content.clone();

    let client = client(config)?;
    client.complete_item(item_id)?;
    let mut output = vec![format!("Marking [{index}] {content} as done")];
    refresh_cache(config, &client, &mut output);
    Ok(output)
}

/// `tm move <index> <project>` - the index names whatever the user's last
/// listing showed, so it resolves against the cached snapshot before any
/// sync rewrites it; the target project resolves against a fresh sync.
pub fn move_item(config: &Config, index: u32, target: &str) -> Result<Vec<String>> {
    let cached = cache::load(config)?;
    let (from, item_id, item) = query::find_index(&cached, index)?;
    let content = item.content.clone();

    let client = client(config)?;
    let snap = sync_with(config, &client)?;
    let target_id = exact_project(&snap, target)
        .ok_or_else(|| Error::NoMatch(format!("No project named {target}")))?;

    client.move_item(item_id, from, target_id)?;
    let mut output = vec![format!("Moved [{index}] {content} to {target}")];
    refresh_cache(config, &client, &mut output);
    Ok(output)
}

/// `tm archive <project>`
pub fn archive(config: &Config, name: &str) -> Result<Vec<String>> {
    let client = client(config)?;
    let snap = sync_with(config, &client)?;
    let id = exact_project(&snap, name)
        .ok_or_else(|| Error::NoMatch(format!("No project named {name}")))?;

    client.archive_project(id)?;
    let mut output = vec![format!("Archived Project: {name}")];
    refresh_cache(config, &client, &mut output);
    Ok(output)
}

/// `tm delete label <name>`
pub fn delete_label(config: &Config, name: &str) -> Result<Vec<String>> {
    let client = client(config)?;
    let snap = sync_with(config, &client)?;
    let id = exact_label(&snap, name)
        .ok_or_else(|| Error::NoMatch(format!("No label named {name}")))?;

    client.delete_label(id)?;
    let mut output = vec![format!("Deleted Label: {name}")];
    refresh_cache(config, &client, &mut output);
    Ok(output)
}

/// Refresh the cache after a successful mutation. The remote write has
/// already been applied at this point, so a failed refresh is reported
/// next to the confirmation instead of failing the whole command.
fn refresh_cache(config: &Config, client: &Client, output: &mut Vec<String>) {
    if let Err(e) = sync_with(config, client) {
        warn!("cache refresh failed: {e}");
        output.push(format!("Warning: cache refresh failed: {e}"));
    }
}

/// Split task words into content and `@label` attachment names.
fn split_words(words: &[String]) -> (String, Vec<String>) {
    let mut content = Vec::new();
    let mut labels = Vec::new();
    for word in words {
        match word.strip_prefix('@') {
            Some(name) => labels.push(name.to_string()),
            None => content.push(word.as_str()),
        }
    }
    (content.join(" "), labels)
}

/// Exact case-insensitive project name lookup; when several visible
/// projects share a name, the first encountered wins.
fn exact_project(snapshot: &Snapshot, name: &str) -> Option<ProjectId> {
    let name = name.to_lowercase();
    snapshot
        .projects
        .iter()
        .find(|(_, project)| project.name.to_lowercase() == name)
        .map(|(id, _)| *id)
}

/// Exact case-insensitive label name lookup, first encountered wins.
fn exact_label(snapshot: &Snapshot, name: &str) -> Option<LabelId> {
    let name = name.to_lowercase();
    snapshot
        .labels
        .iter()
        .find(|(label_name, _)| label_name.to_lowercase() == name)
        .map(|(_, id)| *id)
}
