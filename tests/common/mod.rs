//! Common test utilities for taskmirror integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never touch the
//! user's real `~/.config/taskmirror/` directory.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated config directory.
///
/// The `tm()` method returns a `Command` that sets `TM_CONFIG_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated config directory.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the tm binary with the isolated config directory.
    pub fn tm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tm"));
        cmd.env("TM_CONFIG_DIR", self.config_dir.path());
        cmd
    }

    /// Seed the cache file with raw JSON.
    pub fn write_cache(&self, json: &str) {
        std::fs::write(self.config_dir.path().join("cache.json"), json).unwrap();
    }

    /// Seed the API token file.
    pub fn write_token(&self, token: &str) {
        std::fs::write(self.config_dir.path().join("api_key"), token).unwrap();
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// One canned HTTP response for the stub endpoint.
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
        }
    }
}

/// Spawn a minimal HTTP responder standing in for the remote task service.
///
/// Answers POSTs in order with the given responses, closing each connection
/// after responding, then exits. Returns the endpoint URL to pass via
/// `TM_API_URL`.
pub fn stub_remote(responses: Vec<StubResponse>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/sync", listener.local_addr().unwrap());
    thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            if read_request(&mut stream).is_none() {
                return;
            }
            let reason = if response.status == 200 { "OK" } else { "Error" };
            let reply = format!(
                "HTTP/1.1 {} {reason}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });
    url
}

/// Read one full HTTP request (headers plus Content-Length body) so the
/// client is never cut off mid-send.
fn read_request(stream: &mut TcpStream) -> Option<()> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }
    Some(())
}
