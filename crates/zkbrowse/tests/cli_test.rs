//! Integration tests for the `zkbrowse` CLI binary.
//!
//! Argument parsing, help output, and completions run without a gateway;
//! the node commands run against a wiremock gateway.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `zkbrowse` binary with env isolation.
///
/// Clears all `ZKBROWSE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn zkbrowse_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("zkbrowse");
    cmd.env("HOME", "/tmp/zkbrowse-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/zkbrowse-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("ZKBROWSE_PROFILE")
        .env_remove("ZKBROWSE_GATEWAY")
        .env_remove("ZKBROWSE_CLUSTER")
        .env_remove("ZKBROWSE_OUTPUT")
        .env_remove("ZKBROWSE_INSECURE")
        .env_remove("ZKBROWSE_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// The namespace every mock gateway serves.
fn namespace() -> serde_json::Value {
    json!({
        "path": "/",
        "name": "/",
        "data": "",
        "children": [
            {
                "path": "/app",
                "name": "app",
                "data": "root-config",
                "version": "3",
                "children": [
                    { "path": "/app/db", "name": "db", "data": "jdbc://db", "version": "1" }
                ]
            },
            {
                "path": "/zookeeper",
                "name": "zookeeper",
                "children": [{ "path": "/zookeeper/quota", "name": "quota" }]
            }
        ]
    })
}

fn find(node: &serde_json::Value, wanted: &str) -> Option<serde_json::Value> {
    if node["path"] == wanted {
        return Some(node.clone());
    }
    node["children"]
        .as_array()?
        .iter()
        .find_map(|child| find(child, wanted))
}

/// Answers node reads from [`namespace`], keyed on the `path` query.
struct Namespace;

impl Respond for Namespace {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let root = namespace();
        let wanted = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "path")
            .map(|(_, value)| value.into_owned());

        match wanted {
            None => ok(root),
            Some(p) => find(&root, &p).map_or_else(
                || {
                    ResponseTemplate::new(200).set_body_json(json!({
                        "success": false,
                        "message": format!("KeeperErrorCode = NoNode for {p}")
                    }))
                },
                ok,
            ),
        }
    }
}

/// A gateway serving one cluster with `/app/db` and `/zookeeper/quota`.
async fn gateway() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/zk/clusters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "local", "host": "127.0.0.1", "port": 2181 },
            "zk-backup:2181"
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/zk/connect"))
        .respond_with(ok(json!("connected")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/zk/nodes"))
        .respond_with(Namespace)
        .mount(&server)
        .await;

    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = zkbrowse_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    zkbrowse_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ZooKeeper")
            .and(predicate::str::contains("tree"))
            .and(predicate::str::contains("create"))
            .and(predicate::str::contains("export")),
    );
}

#[test]
fn test_version_flag() {
    zkbrowse_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zkbrowse"));
}

#[test]
fn test_completions_bash() {
    zkbrowse_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_config_path_needs_no_gateway() {
    zkbrowse_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_gateway_reports_no_config() {
    let output = zkbrowse_cmd().arg("tree").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No gateway configured"), "{text}");
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let output = zkbrowse_cmd()
        .args(["--profile", "prod", "tree"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("prod"));
}

#[test]
fn test_unreachable_gateway_is_connection_error() {
    let output = zkbrowse_cmd()
        .args(["-g", "http://127.0.0.1:1", "-c", "zk1:2181", "--timeout", "2", "tree"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

// ── Gateway-backed commands ─────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_clusters_plain() {
    let server = gateway().await;

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-o", "plain", "clusters"])
        .assert()
        .success()
        .stdout("127.0.0.1:2181\nzk-backup:2181\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clusters_add_prints_new_id() {
    let server = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/clusters"))
        .and(body_partial_json(json!({ "host": "10.0.0.9", "port": 2181, "name": "lab" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "lab", "host": "10.0.0.9", "port": 2181
        })))
        .expect(1)
        .mount(&server)
        .await;

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-o", "plain", "clusters", "add", "10.0.0.9"])
        .args(["--port", "2181", "--name", "lab"])
        .assert()
        .success()
        .stdout("7\n")
        .stderr(predicate::str::contains("Registered lab (10.0.0.9:2181)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clusters_rm_needs_confirmation() {
    let server = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/clusters/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "clusters", "rm", "7"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-y", "clusters", "rm", "7"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed cluster 7"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clusters_update_unknown_id() {
    let server = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/clusters/9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "clusters", "update", "9", "--name", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Cluster 9 is not registered"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_node_command_without_cluster() {
    let server = gateway().await;

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "tree"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("No cluster selected"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tree_plain_and_depth() {
    let server = gateway().await;

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "-o", "plain", "tree"])
        .assert()
        .success()
        .stdout("/\n/app\n/app/db\n/zookeeper\n/zookeeper/quota\n");

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "-o", "plain", "tree", "/app", "--depth", "0"])
        .assert()
        .success()
        .stdout("/app\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tree_outline() {
    let server = gateway().await;

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "tree", "/app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app  = root-config\n  db  = jdbc://db"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_prints_data() {
    let server = gateway().await;

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "-o", "plain", "get", "/app/db"])
        .assert()
        .success()
        .stdout("jdbc://db\n");

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "get", "/nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rm_requires_yes_without_terminal() {
    let server = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/zk/nodes/delete"))
        .respond_with(ok(json!("deleted")))
        .expect(0)
        .mount(&server)
        .await;

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "rm", "/app"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rm_protected_path_is_refused() {
    let server = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/zk/nodes/delete"))
        .respond_with(ok(json!("deleted")))
        .expect(0)
        .mount(&server)
        .await;

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "-y", "rm", "/zookeeper/quota"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rm_with_yes_deletes_children_first() {
    let server = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/zk/nodes/delete"))
        .respond_with(ok(json!("deleted")))
        .expect(2)
        .mount(&server)
        .await;

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "-y", "rm", "/app"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted /app (2 node(s) removed)"));

    let deletes: Vec<serde_json::Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(deletes[0]["path"], "/app/db");
    assert_eq!(deletes[1]["path"], "/app");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_to_file() {
    let server = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/zk/nodes/export"))
        .respond_with(ok(json!({ "/app": "root-config", "/app/db": "jdbc://db" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app.json");

    zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "export", "/app", "--file"])
        .arg(&file)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(written, json!({ "/app": "root-config", "/app/db": "jdbc://db" }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_into_protected_prefix_is_refused() {
    let server = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/zk/nodes/import"))
        .respond_with(ok(json!("imported")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("import.json");
    std::fs::write(&file, r#"{ "/cfg": "a", "/zookeeper/quota": "x" }"#).unwrap();

    let output = zkbrowse_cmd()
        .args(["-g", server.uri().as_str(), "-c", "zk1:2181", "import"])
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
}
