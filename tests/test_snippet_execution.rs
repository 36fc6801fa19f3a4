//! Runs generated Python and JavaScript snippets against stubbed HTTP clients
//!
//! `requests` is replaced by a local module and `fetch` by a global function;
//! both print what they were called with as one JSON line. Tests return early
//! when `python3` or `node` is not installed.

#![cfg(unix)]

use std::path::Path;
use std::process::Command;

use apisnip::codegen::{generate_javascript, generate_python};
use apisnip::spec::normalize_value;
use serde_json::{json, Value};
use tempfile::TempDir;

const REQUESTS_STUB: &str = r#"class _Response:
    status_code = 200
    text = "{}"

def request(method, url, headers=None, params=None, json=None, data=None):
    import json as _json
    print(_json.dumps({
        "method": method,
        "url": url,
        "headers": headers,
        "params": params,
        "json": json,
        "data": data,
    }))
    return _Response()
"#;

const FETCH_STUB: &str = r#"globalThis.fetch = async (url, options) => {
  if ((options.method === "GET" || options.method === "HEAD") && options.body !== undefined) {
    throw new TypeError("Request with GET/HEAD method cannot have body.");
  }
  const parsed = new URL(url);
  console.log(JSON.stringify({
    url,
    search: parsed.search,
    hash: parsed.hash,
    method: options.method,
    headers: options.headers ?? null,
    body: options.body ?? null,
  }));
  return { status: 200, text: async () => "{}" };
};
"#;

fn tool_available(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run a command in `dir` and return the first stdout line parsed as JSON
fn run_and_capture(cmd: &mut Command, dir: &Path) -> Value {
    let output = cmd.current_dir(dir).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(output.status.success(), "stdout: {}\nstderr: {}", stdout, stderr);
    assert!(stderr.is_empty(), "{}", stderr);

    let first = stdout.lines().next().expect("no output");
    serde_json::from_str(first).unwrap()
}

fn run_python(spec: &Value) -> Option<Value> {
    if !tool_available("python3") {
        eprintln!("python3 not found, skipping");
        return None;
    }
    let code = generate_python(&normalize_value(spec.clone()).unwrap()).unwrap();

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("requests.py"), REQUESTS_STUB).unwrap();
    std::fs::write(dir.path().join("snippet.py"), &code).unwrap();

    Some(run_and_capture(Command::new("python3").arg("snippet.py"), dir.path()))
}

fn run_javascript(spec: &Value) -> Option<Value> {
    if !tool_available("node") {
        eprintln!("node not found, skipping");
        return None;
    }
    let code = generate_javascript(&normalize_value(spec.clone()).unwrap()).unwrap();

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("snippet.js"), &code).unwrap();
    std::fs::write(dir.path().join("run.js"), format!("{}\n{}", FETCH_STUB, code)).unwrap();

    let check = Command::new("node").arg("--check").arg("snippet.js").current_dir(dir.path()).output().unwrap();
    assert!(check.status.success(), "{}", String::from_utf8_lossy(&check.stderr));

    Some(run_and_capture(Command::new("node").arg("run.js"), dir.path()))
}

fn specs() -> Vec<Value> {
    vec![
        json!({"url": "https://x.io/ping", "method": "GET"}),
        json!({
            "url": "https://api.example.com/items",
            "method": "POST",
            "headers": {"Content-Type": "application/json", "X-Quote": "it's \"q\""},
            "query_params": {"page": "1", "q": "a b&c"},
            "body": {"name": "x", "ok": true, "none": null, "off": false, "n": [1, 2.5]}
        }),
        json!({"url": "https://x.io/form", "method": "PUT", "body": "a=1&b='two'\nline"}),
        json!({"url": "https://x.io/search", "method": "GET", "body": {"q": "x"}}),
        json!({"url": "https://x.io/anything#frag", "method": "DELETE", "query_params": {"page": "1"}}),
        json!({"url": "https://x.io/anything?", "method": "PATCH", "query_params": {"page": "1"}}),
    ]
}

// ============================================================================
// Python
// ============================================================================

#[test]
fn test_python_snippets_run() {
    for spec in specs() {
        let Some(call) = run_python(&spec) else { return };
        assert_eq!(call["method"], spec["method"], "{}", spec);
        assert_eq!(call["url"], spec["url"], "{}", spec);
    }
}

#[test]
fn test_python_sends_every_part() {
    let spec = &specs()[1];
    let Some(call) = run_python(spec) else { return };

    assert_eq!(call["headers"], spec["headers"]);
    assert_eq!(call["params"], spec["query_params"]);
    assert_eq!(call["json"], spec["body"]);
    assert!(call["data"].is_null());

    let keys: Vec<_> = call["json"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["name", "ok", "none", "off", "n"]);
}

#[test]
fn test_python_raw_body_is_data() {
    let spec = &specs()[2];
    let Some(call) = run_python(spec) else { return };

    assert_eq!(call["data"], spec["body"]);
    assert!(call["json"].is_null());
}

// ============================================================================
// JavaScript
// ============================================================================

#[test]
fn test_javascript_snippets_run() {
    for spec in specs() {
        let Some(call) = run_javascript(&spec) else { return };
        assert_eq!(call["method"], spec["method"], "{}", spec);
    }
}

#[test]
fn test_javascript_sends_every_part() {
    let spec = &specs()[1];
    let Some(call) = run_javascript(spec) else { return };

    assert_eq!(call["headers"], spec["headers"]);
    assert_eq!(call["search"], "?page=1&q=a+b%26c");

    let body: Value = serde_json::from_str(call["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, spec["body"]);
    let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["name", "ok", "none", "off", "n"]);
}

#[test]
fn test_javascript_get_with_body_runs() {
    let Some(call) = run_javascript(&specs()[3]) else { return };
    assert_eq!(call["method"], "GET");
    assert!(call["body"].is_null());
}

#[test]
fn test_javascript_query_stays_out_of_fragment() {
    let Some(call) = run_javascript(&specs()[4]) else { return };
    assert_eq!(call["search"], "?page=1");
    assert_eq!(call["hash"], "#frag");

    let Some(call) = run_javascript(&specs()[5]) else { return };
    assert_eq!(call["url"], "https://x.io/anything?page=1");
}
