#![allow(clippy::unwrap_used)]
// End-to-end tests: `Explorer` over the real HTTP client against wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use zkbrowse_core::{
    CoreError, CreateNodeRequest, Explorer, ExplorerConfig, NodeOperation, NodeOperationResult,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// Serves node reads from a namespace that gains `/svc` once created.
struct Namespace {
    svc_exists: Arc<AtomicBool>,
}

impl Respond for Namespace {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let svc = json!({ "path": "/svc", "name": "svc", "data": "on", "version": "0" });
        let exists = self.svc_exists.load(Ordering::SeqCst);
        let wants_svc = request
            .url
            .query_pairs()
            .any(|(key, value)| key == "path" && value == "/svc");

        if wants_svc {
            return if exists {
                ok(svc)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "success": false,
                    "message": "KeeperErrorCode = NoNode for /svc"
                }))
            };
        }

        let children = if exists { json!([svc]) } else { json!([]) };
        ok(json!({ "path": "/", "name": "/", "data": "", "children": children }))
    }
}

/// Flips the namespace state and acknowledges the write.
struct Toggle {
    svc_exists: Arc<AtomicBool>,
    to: bool,
}

impl Respond for Toggle {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.svc_exists.store(self.to, Ordering::SeqCst);
        ok(json!("done"))
    }
}

async fn setup() -> (MockServer, Explorer, Arc<AtomicBool>) {
    let server = MockServer::start().await;
    let svc_exists = Arc::new(AtomicBool::new(false));

    Mock::given(method("GET"))
        .and(path("/api/zk/connect"))
        .and(query_param("address", "zk1:2181"))
        .respond_with(ok(json!("connected")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/zk/nodes"))
        .and(query_param("cluster", "zk1:2181"))
        .respond_with(Namespace {
            svc_exists: Arc::clone(&svc_exists),
        })
        .mount(&server)
        .await;

    let config = ExplorerConfig::new(Url::parse(&server.uri()).unwrap());
    let explorer = Explorer::new(config).unwrap();
    (server, explorer, svc_exists)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_then_create_round_trip() {
    let (server, explorer, svc_exists) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/zk/nodes"))
        .and(body_json(json!({
            "cluster": "zk1:2181",
            "path": "/svc",
            "data": "on",
            "mode": "PERSISTENT"
        })))
        .respond_with(Toggle {
            svc_exists: Arc::clone(&svc_exists),
            to: true,
        })
        .expect(1)
        .mount(&server)
        .await;

    explorer.connect("zk1:2181").await.unwrap();
    assert_eq!(explorer.tree().len(), 1);

    explorer
        .perform_node_operation(NodeOperation::Create(CreateNodeRequest::new("/svc", "on")))
        .await
        .unwrap();

    let svc = explorer.node("/svc").unwrap();
    assert_eq!(svc.data.as_deref(), Some("on"));
    assert!(explorer.node("/").unwrap().expanded);
    assert_eq!(explorer.selected_node().unwrap().path, "/svc");
}

#[tokio::test]
async fn test_delete_round_trip() {
    let (server, explorer, svc_exists) = setup().await;
    svc_exists.store(true, Ordering::SeqCst);

    Mock::given(method("DELETE"))
        .and(path("/api/zk/nodes/delete"))
        .and(body_json(json!({ "cluster": "zk1:2181", "path": "/svc", "version": -1 })))
        .respond_with(Toggle {
            svc_exists: Arc::clone(&svc_exists),
            to: false,
        })
        .expect(1)
        .mount(&server)
        .await;

    explorer.connect("zk1:2181").await.unwrap();
    assert!(explorer.tree().contains("/svc"));

    let result = explorer
        .perform_node_operation(NodeOperation::Delete {
            path: "/svc".into(),
            version: None,
        })
        .await
        .unwrap();

    assert_eq!(
        result,
        NodeOperationResult::Deleted {
            path: "/svc".into(),
            removed: vec!["/svc".into()],
        }
    );
    assert!(!explorer.tree().contains("/svc"));
}

#[tokio::test]
async fn test_gateway_outage_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/zk/connect"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let config = ExplorerConfig::new(Url::parse(&server.uri()).unwrap());
    let explorer = Explorer::new(config).unwrap();

    let result = explorer.connect("zk1:2181").await;

    assert!(
        matches!(result, Err(CoreError::Http { status: 503, .. })),
        "got: {result:?}"
    );
    assert!(!explorer.is_connected());
}
