//! Integration tests for network-touching commands.
//!
//! A minimal local HTTP responder (see `common::stub_remote`) stands in for
//! the task service, reached via the `TM_API_URL` endpoint override, so the
//! sync and mutation flows run end-to-end without real network access.

mod common;

use common::{StubResponse, TestEnv, stub_remote};
use predicates::prelude::*;
use serde_json::json;

/// A seeded cache: two tasks in project 1, indices 1 and 2.
const CACHE: &str = r#"{
    "projects": {
        "1": {"name": "project 1"},
        "2": {"name": "project 2"}
    },
    "items": {
        "1": {
            "11": {"content": "item 1", "labels": [], "index": 1},
            "12": {"content": "item 2", "labels": [], "index": 2}
        }
    },
    "labels": {}
}"#;

/// Remote state that has drifted from the seeded cache: item 11 was
/// completed remotely, so a rebuilt snapshot holds a single task and index
/// 2 exists only in the cached view.
fn drifted_state() -> serde_json::Value {
    json!({
        "projects": [
            {"id": 1, "name": "project 1"},
            {"id": 2, "name": "project 2"}
        ],
        "items": [
            {"id": 11, "project_id": 1, "content": "item 1", "in_history": 1},
            {"id": 12, "project_id": 1, "content": "item 2"}
        ],
        "labels": []
    })
}

fn command_accepted() -> serde_json::Value {
    json!({ "sync_status": { "some-uuid": "ok" } })
}

#[test]
fn test_projects_lists_fresh_state() {
    let env = TestEnv::new();
    env.write_token("secret");
    let url = stub_remote(vec![StubResponse::ok(drifted_state())]);
    env.tm()
        .env("TM_API_URL", &url)
        .args(["projects"])
        .assert()
        .success()
        .stdout("project 1 (1)\nproject 2 (0)\n");
}

#[test]
fn test_sync_persists_snapshot_for_offline_queries() {
    let env = TestEnv::new();
    env.write_token("secret");
    let url = stub_remote(vec![StubResponse::ok(drifted_state())]);
    env.tm().env("TM_API_URL", &url).args(["sync"]).assert().success();
    // No endpoint override here: the cached listing must not need one.
    env.tm()
        .args(["cache", "projects"])
        .assert()
        .success()
        .stdout("project 1\nproject 2\n");
}

/// The display index names whatever the user's last listing showed, so
/// `move` must resolve it against the cached snapshot. Here index 2 only
/// exists in the cache; a rebuilt snapshot no longer has it.
#[test]
fn test_move_resolves_index_against_cached_snapshot() {
    let env = TestEnv::new();
    env.write_cache(CACHE);
    env.write_token("secret");
    // target-resolution sync, the move command, refresh sync
    let url = stub_remote(vec![
        StubResponse::ok(drifted_state()),
        StubResponse::ok(command_accepted()),
        StubResponse::ok(drifted_state()),
    ]);
    env.tm()
        .env("TM_API_URL", &url)
        .args(["move", "2", "project", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved [2] item 2 to project 2"));
}

#[test]
fn test_move_to_unknown_project_is_benign() {
    let env = TestEnv::new();
    env.write_cache(CACHE);
    env.write_token("secret");
    let url = stub_remote(vec![StubResponse::ok(drifted_state())]);
    env.tm()
        .env("TM_API_URL", &url)
        .args(["move", "2", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No project named nowhere"));
}

#[test]
fn test_done_completes_and_refreshes() {
    let env = TestEnv::new();
    env.write_cache(CACHE);
    env.write_token("secret");
    // the complete command, then the refresh sync
    let url = stub_remote(vec![
        StubResponse::ok(command_accepted()),
        StubResponse::ok(drifted_state()),
    ]);
    env.tm()
        .env("TM_API_URL", &url)
        .args(["done", "1"])
        .assert()
        .success()
        .stdout("Marking [1] item 1 as done\n");
}

/// A mutation that was applied remotely is confirmed even when the
/// follow-up cache refresh fails.
#[test]
fn test_done_confirms_when_refresh_fails() {
    let env = TestEnv::new();
    env.write_cache(CACHE);
    env.write_token("secret");
    let url = stub_remote(vec![
        StubResponse::ok(command_accepted()),
        StubResponse::error(500),
    ]);
    env.tm()
        .env("TM_API_URL", &url)
        .args(["done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marking [1] item 1 as done"))
        .stdout(predicate::str::contains("Warning: cache refresh failed"));
}

#[test]
fn test_rejected_command_surfaces_error() {
    let env = TestEnv::new();
    env.write_cache(CACHE);
    env.write_token("secret");
    let url = stub_remote(vec![StubResponse::ok(json!({
        "sync_status": { "some-uuid": { "error": "Item not found", "error_code": 20 } }
    }))]);
    env.tm()
        .env("TM_API_URL", &url)
        .args(["done", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item not found"));
}
