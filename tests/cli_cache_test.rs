//! Integration tests for cache-backed commands.
//!
//! Everything here runs against a seeded cache file in an isolated config
//! directory; no network access is required or attempted.

mod common;

use common::TestEnv;
use predicates::prelude::*;

/// A cache in the persisted snapshot form: numeric ids as JSON object keys.
const SAMPLE_CACHE: &str = r#"{
    "projects": {
        "1": {"name": "project 10"},
        "2": {"name": "project 2"},
        "3": {"name": "Apples"}
    },
    "items": {
        "1": {
            "11": {"content": "item 1", "labels": [5], "index": 1},
            "12": {"content": "item 2", "labels": [], "index": 2}
        }
    },
    "labels": {
        "label 5": 5
    }
}"#;

#[test]
fn test_cache_projects_lists_sorted_names() {
    let env = TestEnv::new();
    env.write_cache(SAMPLE_CACHE);
    env.tm()
        .args(["cache", "projects"])
        .assert()
        .success()
        .stdout("Apples\nproject 2\nproject 10\n");
}

#[test]
fn test_cache_projects_without_cache_fails_with_hint() {
    let env = TestEnv::new();
    env.tm()
        .args(["cache", "projects"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tm sync"));
}

#[test]
fn test_cache_projects_with_corrupt_cache_fails() {
    let env = TestEnv::new();
    env.write_cache("{definitely not json");
    env.tm()
        .args(["cache", "projects"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_done_unknown_index_is_benign() {
    // Resolution happens against the cache before any token is read or
    // network touched, so no api_key file is needed here.
    let env = TestEnv::new();
    env.write_cache(SAMPLE_CACHE);
    env.tm()
        .args(["done", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No task with index 42"));
}

#[test]
fn test_done_without_cache_fails() {
    let env = TestEnv::new();
    env.tm()
        .args(["done", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tm sync"));
}

#[test]
fn test_sync_without_token_reports_path() {
    let env = TestEnv::new();
    env.tm()
        .args(["sync"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API token"))
        .stderr(predicate::str::contains("api_key"));
}

#[test]
fn test_sync_failure_leaves_cache_untouched() {
    let env = TestEnv::new();
    env.write_cache(SAMPLE_CACHE);
    // No token, so sync fails before fetching anything.
    env.tm().args(["sync"]).assert().failure();
    env.tm()
        .args(["cache", "projects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project 10"));
}
