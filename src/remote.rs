//! Remote task service client.
//!
//! Speaks the service's sync protocol over blocking HTTP: one read
//! operation returning the full current record set, and a small set of
//! write commands. Identifier resolution (names and display indices to
//! service ids) happens elsewhere; this module only moves bytes.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::models::{ItemId, LabelId, ProjectId};
use crate::{Error, Result};

/// Sync endpoint of the task service.
const API_URL: &str = "https://api.todoist.com/sync/v8/sync";

/// User-Agent header sent with every request.
const USER_AGENT: &str = "taskmirror-cli";

/// Full raw state as returned by the service.
///
/// Records stay raw JSON values until snapshot construction so a single
/// malformed record can be reported with its entity kind and id instead of
/// failing the whole response decode. Any kind may be absent or empty.
#[derive(Debug, Default, Deserialize)]
pub struct RemoteState {
    #[serde(default)]
    pub projects: Vec<Value>,

    #[serde(default)]
    pub items: Vec<Value>,

    #[serde(default)]
    pub labels: Vec<Value>,
}

/// Blocking client for the task service.
pub struct Client {
    token: String,
    url: String,
}

impl Client {
    pub fn new(token: String) -> Self {
        Self {
            token,
            url: API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (self-hosted instances,
    /// test servers).
    pub fn with_url(token: String, url: String) -> Self {
        Self { token, url }
    }

    /// Fetch the full current set of raw project/item/label records.
    pub fn fetch_state(&self) -> Result<RemoteState> {
        debug!(url = %self.url, "fetching remote state");
        let response = ureq::post(&self.url)
            .set("User-Agent", USER_AGENT)
            .send_json(json!({
                "token": self.token,
                "sync_token": "*",
                "resource_types": ["projects", "items", "labels"],
            }));

        match response {
            Ok(resp) => resp
                .into_json()
                .map_err(|e| Error::Fetch(format!("invalid sync response: {e}"))),
            Err(e) => Err(fetch_error(e)),
        }
    }

    /// Create a project, returning its new id.
    pub fn add_project(&self, name: &str) -> Result<ProjectId> {
        self.create("project_add", json!({ "name": name }))
            .map(ProjectId)
    }

    /// Create a label, returning its new id.
    pub fn add_label(&self, name: &str) -> Result<LabelId> {
        self.create("label_add", json!({ "name": name })).map(LabelId)
    }

    /// Add a task to a project, optionally with label attachments.
    pub fn add_item(&self, content: &str, project: ProjectId, labels: &[LabelId]) -> Result<()> {
        let mut args = json!({ "content": content, "project_id": project });
        if !labels.is_empty() {
            args["labels"] = json!(labels);
        }
        self.command("item_add", args).map(|_| ())
    }

    /// Archive a project.
    pub fn archive_project(&self, id: ProjectId) -> Result<()> {
        self.command("project_archive", json!({ "id": id })).map(|_| ())
    }

    /// Delete a label.
    pub fn delete_label(&self, id: LabelId) -> Result<()> {
        self.command("label_delete", json!({ "id": id })).map(|_| ())
    }

    /// Mark a task as done.
    pub fn complete_item(&self, id: ItemId) -> Result<()> {
        self.command("item_complete", json!({ "ids": [id] })).map(|_| ())
    }

    /// Move a task from one project to another.
    pub fn move_item(&self, id: ItemId, from: ProjectId, to: ProjectId) -> Result<()> {
        // The protocol keys the moved items by source project id, as a
        // string-keyed object.
        let mut project_items = serde_json::Map::new();
        project_items.insert(from.to_string(), json!([id]));
        self.command(
            "item_move",
            json!({ "project_items": project_items, "to_project": to }),
        )
        .map(|_| ())
    }

    /// Run a single write command and verify the service accepted it.
    fn command(&self, kind: &str, args: Value) -> Result<Value> {
        let batch = json!([{
            "type": kind,
            "uuid": Uuid::new_v4().to_string(),
            "args": args,
        }]);
        self.run_commands(batch)
    }

    /// Run a creation command and extract the new entity's id from the
    /// temp id mapping in the response.
    fn create(&self, kind: &str, args: Value) -> Result<u64> {
        let temp_id = Uuid::new_v4().to_string();
        let batch = json!([{
            "type": kind,
            "temp_id": temp_id,
            "uuid": Uuid::new_v4().to_string(),
            "args": args,
        }]);
        let response = self.run_commands(batch)?;
        response
            .get("temp_id_mapping")
            .and_then(|m| m.get(&temp_id))
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::Fetch(format!("service returned no id for new {kind}")))
    }

    fn run_commands(&self, commands: Value) -> Result<Value> {
        debug!(url = %self.url, %commands, "sending commands");
        let response = ureq::post(&self.url)
            .set("User-Agent", USER_AGENT)
            .send_json(json!({ "token": self.token, "commands": commands }));

        match response {
            Ok(resp) => {
                let body: Value = resp
                    .into_json()
                    .map_err(|e| Error::Fetch(format!("invalid command response: {e}")))?;
                check_sync_status(&body)?;
                Ok(body)
            }
            Err(e) => Err(fetch_error(e)),
        }
    }
}

/// The service reports per-command outcomes in `sync_status`: the literal
/// string "ok", or an object describing the rejection.
fn check_sync_status(response: &Value) -> Result<()> {
    let Some(status) = response.get("sync_status").and_then(Value::as_object) else {
        return Ok(());
    };
    for outcome in status.values() {
        if outcome.as_str() == Some("ok") {
            continue;
        }
        let message = outcome
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("command rejected");
        return Err(Error::Fetch(message.to_string()));
    }
    Ok(())
}

fn fetch_error(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(401, _) => {
            Error::Fetch("service returned 401 Unauthorized - check your API token".to_string())
        }
        ureq::Error::Status(403, _) => {
            Error::Fetch("service returned 403 Forbidden".to_string())
        }
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            Error::Fetch(format!("HTTP {code}: {body}"))
        }
        e => Error::Fetch(e.to_string()),
    }
}
