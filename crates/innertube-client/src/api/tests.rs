use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use super::browse::BrowseRequest;
use super::*;
use crate::InnertubeError;
use crate::channel::tests::{about_fixture, featured_fixture};
use crate::context::WEB_CLIENT;
use crate::store::MemoryKeyStore;

const PAGE_WITH_KEY: &str = r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY":"ABC123","INNERTUBE_CONTEXT_CLIENT_NAME":1});</script></html>"#;

#[derive(Debug, Clone)]
struct BrowseHit {
    key: String,
    body: Value,
    /// Store contents at the moment the browse call arrived.
    stored_key: Option<String>,
}

struct Upstream {
    page_body: &'static str,
    page_delay: Duration,
    about_status: StatusCode,
    store: Arc<MemoryKeyStore>,
    page_hits: AtomicUsize,
    browse_hits: std::sync::Mutex<Vec<BrowseHit>>,
}

impl Upstream {
    fn hits(&self) -> Vec<BrowseHit> {
        self.browse_hits.lock().unwrap().clone()
    }
}

struct Fake {
    page_body: &'static str,
    page_delay: Duration,
    about_status: StatusCode,
    /// Point the key page at a port nothing listens on.
    page_unreachable: bool,
    /// Same for the browse endpoint.
    browse_unreachable: bool,
    /// Transport timeout on the client under test.
    timeout: Option<Duration>,
}

impl Default for Fake {
    fn default() -> Self {
        Self {
            page_body: PAGE_WITH_KEY,
            page_delay: Duration::ZERO,
            about_status: StatusCode::OK,
            page_unreachable: false,
            browse_unreachable: false,
            timeout: None,
        }
    }
}

struct Harness {
    client: Arc<InnertubeClient>,
    upstream: Arc<Upstream>,
    store: Arc<MemoryKeyStore>,
}

async fn key_page(State(up): State<Arc<Upstream>>) -> &'static str {
    up.page_hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(up.page_delay).await;
    up.page_body
}

async fn browse_endpoint(
    State(up): State<Arc<Upstream>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    up.browse_hits.lock().unwrap().push(BrowseHit {
        key: query.get("key").cloned().unwrap_or_default(),
        body: body.clone(),
        stored_key: up.store.load_key().unwrap(),
    });

    let params = body["params"].as_str().unwrap_or_default();
    if params == Section::Featured.param() {
        (StatusCode::OK, Json(featured_fixture()))
    } else if params == Section::About.param() && up.about_status.is_success() {
        (StatusCode::OK, Json(about_fixture()))
    } else if params == Section::About.param() {
        (
            up.about_status,
            Json(json!({ "error": { "code": up.about_status.as_u16() } })),
        )
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({})))
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn start(fake: Fake, store: MemoryKeyStore) -> Harness {
    let store = Arc::new(store);
    let upstream = Arc::new(Upstream {
        page_body: fake.page_body,
        page_delay: fake.page_delay,
        about_status: fake.about_status,
        store: store.clone(),
        page_hits: AtomicUsize::new(0),
        browse_hits: std::sync::Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/channel/key-page", get(key_page))
        .route("/youtubei/v1/browse", post(browse_endpoint))
        .with_state(upstream.clone());
    let addr = serve(app).await;

    let key_page_url = if fake.page_unreachable {
        format!("http://{}/channel/key-page", unreachable_addr().await)
    } else {
        format!("http://{addr}/channel/key-page")
    };
    let browse_url = if fake.browse_unreachable {
        format!("http://{}/youtubei/v1/browse", unreachable_addr().await)
    } else {
        format!("http://{addr}/youtubei/v1/browse")
    };
    let endpoints = Endpoints {
        key_page_url,
        browse_url,
    };
    let mut http = reqwest::Client::builder();
    if let Some(timeout) = fake.timeout {
        http = http.timeout(timeout);
    }
    let client = InnertubeClient::with_http(http.build().unwrap(), endpoints, store.clone());

    Harness {
        client: Arc::new(client),
        upstream,
        store,
    }
}

#[tokio::test]
async fn empty_store_refreshes_once_and_persists_before_browsing() {
    let h = start(Fake::default(), MemoryKeyStore::new()).await;

    let record = h.client.get_channel("UC123").await.unwrap();

    assert_eq!(record.channel_id, "UC123");
    assert_eq!(record.title, "Example Channel");
    assert_eq!(record.view_count.as_deref(), Some("123,456 views"));
    assert_eq!(h.store.load_key().unwrap().as_deref(), Some("ABC123"));
    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 1);

    let hits = h.upstream.hits();
    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert_eq!(hit.key, "ABC123");
        assert_eq!(hit.stored_key.as_deref(), Some("ABC123"));
    }
}

#[tokio::test]
async fn populated_store_never_requests_key_page() {
    let h = start(Fake::default(), MemoryKeyStore::with_key("XYZ")).await;

    h.client.get_channel("UC123").await.unwrap();

    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 0);
    assert!(h.upstream.hits().iter().all(|hit| hit.key == "XYZ"));
}

#[tokio::test]
async fn browse_calls_differ_only_in_section_param() {
    let h = start(Fake::default(), MemoryKeyStore::with_key("XYZ")).await;

    h.client.get_channel("UC123").await.unwrap();

    let mut bodies: Vec<Value> = h.upstream.hits().into_iter().map(|hit| hit.body).collect();
    assert_eq!(bodies.len(), 2);

    let mut params: Vec<String> = bodies
        .iter_mut()
        .map(|body| {
            let obj = body.as_object_mut().unwrap();
            obj.remove("params").unwrap().as_str().unwrap().to_string()
        })
        .collect();
    params.sort();
    let mut expected = vec![
        Section::Featured.param().to_string(),
        Section::About.param().to_string(),
    ];
    expected.sort();
    assert_eq!(params, expected);

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["browseId"], "UC123");
    assert_eq!(
        bodies[0]["context"]["client"],
        serde_json::to_value(&WEB_CLIENT).unwrap()
    );
}

#[tokio::test]
async fn failed_about_call_fails_lookup_and_keeps_key() {
    let fake = Fake {
        about_status: StatusCode::FORBIDDEN,
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::with_key("XYZ")).await;

    let err = h.client.get_channel("UC123").await.unwrap_err();

    assert!(
        matches!(
            err,
            InnertubeError::UpstreamFetchFailed {
                section: Section::About,
                ..
            }
        ),
        "unexpected error: {err}"
    );
    assert_eq!(err.upstream_status(), Some(403));
    assert_eq!(h.store.load_key().unwrap().as_deref(), Some("XYZ"));
    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_key_page_is_token_unavailable() {
    let fake = Fake {
        page_unreachable: true,
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::new()).await;

    let err = h.client.get_channel("UC123").await.unwrap_err();

    assert!(matches!(err, InnertubeError::TokenUnavailable(_)), "unexpected error: {err}");
    assert!(h.store.load_key().unwrap().is_none());
    assert!(h.upstream.hits().is_empty());
}

#[tokio::test]
async fn page_without_key_pattern_fails_cleanly() {
    let fake = Fake {
        page_body: "<html><body>consent wall</body></html>",
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::new()).await;

    let err = h.client.get_channel("UC123").await.unwrap_err();

    assert!(matches!(err, InnertubeError::TokenUnavailable(_)), "unexpected error: {err}");
    assert!(h.store.load_key().unwrap().is_none());
    assert!(h.upstream.hits().is_empty());
}

#[tokio::test]
async fn refreshing_twice_keeps_one_identical_key() {
    let h = start(Fake::default(), MemoryKeyStore::new()).await;

    let first = h.client.refresh_api_key().await.unwrap();
    let second = h.client.refresh_api_key().await.unwrap();

    assert_eq!(first.as_deref(), Some("ABC123"));
    assert_eq!(first, second);
    assert_eq!(h.store.load_key().unwrap().as_deref(), Some("ABC123"));
    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn forced_refresh_failure_leaves_existing_key() {
    let fake = Fake {
        page_unreachable: true,
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::with_key("XYZ")).await;

    assert_eq!(h.client.refresh_api_key().await.unwrap(), None);
    assert_eq!(h.store.load_key().unwrap().as_deref(), Some("XYZ"));
}

#[tokio::test]
async fn concurrent_empty_store_lookups_share_one_refresh() {
    let fake = Fake {
        page_delay: Duration::from_millis(100),
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::new()).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let client = h.client.clone();
        tasks.spawn(async move { client.get_channel("UC123").await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 1);
    assert_eq!(h.upstream.hits().len(), 16);
}

#[tokio::test]
async fn concurrent_lookups_share_one_failed_refresh() {
    let fake = Fake {
        page_body: "<html><body>consent wall</body></html>",
        page_delay: Duration::from_millis(100),
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::new()).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let client = h.client.clone();
        tasks.spawn(async move { client.get_channel("UC123").await });
    }
    while let Some(result) = tasks.join_next().await {
        let err = result.unwrap().unwrap_err();
        assert!(matches!(err, InnertubeError::TokenUnavailable(_)), "unexpected error: {err}");
    }

    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 1);
    assert!(h.upstream.hits().is_empty());
    assert!(h.store.load_key().unwrap().is_none());
}

#[tokio::test]
async fn failed_refresh_is_retried_by_the_next_lookup() {
    let fake = Fake {
        page_body: "<html><body>consent wall</body></html>",
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::new()).await;

    h.client.get_channel("UC123").await.unwrap_err();
    h.client.get_channel("UC123").await.unwrap_err();

    assert_eq!(h.upstream.page_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn key_page_timeout_is_token_unavailable() {
    let fake = Fake {
        page_delay: Duration::from_secs(5),
        timeout: Some(Duration::from_millis(200)),
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::new()).await;

    let err = h.client.get_channel("UC123").await.unwrap_err();

    assert!(matches!(err, InnertubeError::TokenUnavailable(_)), "unexpected error: {err}");
    assert!(h.store.load_key().unwrap().is_none());
    assert!(h.upstream.hits().is_empty());
}

#[tokio::test]
async fn transport_errors_do_not_expose_the_key() {
    let fake = Fake {
        browse_unreachable: true,
        ..Fake::default()
    };
    let h = start(fake, MemoryKeyStore::with_key("SECRETKEY123")).await;

    let err = h.client.get_channel("UC123").await.unwrap_err();

    assert!(
        matches!(err, InnertubeError::UpstreamFetchFailed { .. }),
        "unexpected error: {err}"
    );
    assert!(!err.to_string().contains("SECRETKEY123"), "key leaked: {err}");
}

#[test]
fn browse_url_carries_key_query_param() {
    let client = InnertubeClient::new(Arc::new(MemoryKeyStore::new()));
    let url = client.browse_url("AIza+key").unwrap();
    assert_eq!(
        url.as_str(),
        "https://www.youtube.com/youtubei/v1/browse?key=AIza%2Bkey"
    );
}

#[test]
fn browse_request_body_shape() {
    let body = serde_json::to_value(BrowseRequest::new("UC123", Section::Videos)).unwrap();
    assert_eq!(body["browseId"], "UC123");
    assert_eq!(body["params"], "EgZ2aWRlb3M%3D");
    assert_eq!(body["context"]["client"]["clientName"], "WEB");
}
