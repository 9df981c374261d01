//! Drives the real `Client` against an in-process mock Meilisearch server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use meili_client::{
    Client, ClientConfig, DocumentsQuery, Error, KeyBuilder, KeyUpdate, ListQuery, SearchQuery,
    Settings, TaskStatus, TasksQuery, WaitOptions,
};

const MASTER_KEY: &str = "masterKey-for-tests";

// =====================================================================
// Mock server
// =====================================================================

/// Task uids with scripted behaviour:
/// - `1`: enqueued → processing → succeeded
/// - `2`: processing forever
/// - `3`: processing → failed
/// - anything else: 404
#[derive(Clone, Default)]
struct MockState {
    polls: Arc<Mutex<HashMap<u64, usize>>>,
    last_client_header: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockState {
    fn polls(&self, uid: u64) -> usize {
        self.polls.lock().unwrap().get(&uid).copied().unwrap_or(0)
    }

    fn last_request(&self) -> Recorded {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

/// A request seen by [`record`]. `path` is the raw, still-encoded path.
#[derive(Clone, Debug)]
struct Recorded {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    body: Option<Value>,
}

fn api_error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "message": message,
            "code": code,
            "type": "invalid_request",
            "link": format!("https://docs.meilisearch.com/errors#{code}"),
        })),
    )
        .into_response()
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let ua = headers
        .get("x-meilisearch-client")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_client_header.lock().unwrap() = ua;

    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(MASTER_KEY)
}

fn task_json(uid: u64, status: &str) -> Value {
    json!({
        "uid": uid,
        "indexUid": "movies",
        "status": status,
        "type": "documentAdditionOrUpdate",
        "canceledBy": null,
        "details": {"receivedDocuments": 2, "indexedDocuments": null},
        "error": if status == "failed" {
            json!({"message": "boom", "code": "internal", "type": "internal", "link": null})
        } else {
            Value::Null
        },
        "duration": null,
        "enqueuedAt": "2024-01-01T00:00:00Z",
        "startedAt": null,
        "finishedAt": null,
    })
}

fn task_info(uid: u64, index_uid: &str, task_type: &str) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "taskUid": uid,
            "indexUid": index_uid,
            "status": "enqueued",
            "type": task_type,
            "enqueuedAt": "2024-01-01T00:00:00Z",
        })),
    )
        .into_response()
}

async fn get_task(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(uid): Path<u64>,
) -> Response {
    if !authorized(&state, &headers) {
        return api_error(StatusCode::UNAUTHORIZED, "invalid_api_key", "The provided API key is invalid.");
    }
    let n = {
        let mut polls = state.polls.lock().unwrap();
        let n = polls.entry(uid).or_insert(0);
        *n += 1;
        *n
    };
    let status = match (uid, n) {
        (1, 1) => "enqueued",
        (1, 2) => "processing",
        (1, _) => "succeeded",
        (2, _) => "processing",
        (3, 1) => "processing",
        (3, _) => "failed",
        _ => {
            return api_error(
                StatusCode::NOT_FOUND,
                "task_not_found",
                &format!("Task `{uid}` not found."),
            );
        }
    };
    Json(task_json(uid, status)).into_response()
}

async fn list_tasks(Query(q): Query<HashMap<String, String>>) -> Response {
    Json(json!({
        "results": [task_json(1, "succeeded")],
        "limit": q.get("limit").and_then(|l| l.parse::<u32>().ok()).unwrap_or(20),
        "from": 1,
        "next": null,
        "total": 1,
        "echo": q,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct CreateIndex {
    uid: String,
    #[serde(rename = "primaryKey")]
    primary_key: Option<String>,
}

async fn create_index(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<CreateIndex>,
) -> Response {
    if !authorized(&state, &headers) {
        return api_error(StatusCode::UNAUTHORIZED, "invalid_api_key", "The provided API key is invalid.");
    }
    if body.uid == "exists" {
        return api_error(StatusCode::CONFLICT, "index_already_exists", "Index `exists` already exists.");
    }
    let _ = body.primary_key;
    task_info(1, &body.uid, "indexCreation")
}

async fn add_documents(
    Path(index): Path<String>,
    Query(q): Query<HashMap<String, String>>,
    Json(docs): Json<Vec<Value>>,
) -> Response {
    // The task uid encodes what was received so the test can check it.
    let uid = docs.len() as u64 * 100 + u64::from(q.get("primaryKey").map(String::as_str) == Some("id"));
    task_info(uid, &index, "documentAdditionOrUpdate")
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Movie {
    id: u32,
    title: String,
}

async fn search(Path(_index): Path<String>, Json(q): Json<Value>) -> Response {
    let hits = if q["q"] == "shifu" {
        vec![json!({"id": 1, "title": "Kung Fu Panda"})]
    } else {
        vec![]
    };
    Json(json!({
        "hits": hits,
        "query": q["q"],
        "processingTimeMs": 1,
        "limit": q.get("limit").cloned().unwrap_or(json!(20)),
        "offset": 0,
        "estimatedTotalHits": hits.len(),
    }))
    .into_response()
}

fn index_json(uid: &str) -> Value {
    json!({
        "uid": uid,
        "primaryKey": "id",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z",
    })
}

fn index_stats_json() -> Value {
    json!({
        "numberOfDocuments": 2,
        "isIndexing": false,
        "fieldDistribution": {"id": 2, "title": 2},
    })
}

fn key_json(uid: &str, name: Option<&str>) -> Value {
    json!({
        "uid": uid,
        "key": "d0552b41536279a0ad88bd595327b96f01176a60c2243e906c52ac02375f9bc4",
        "name": name,
        "description": null,
        "actions": ["search"],
        "indexes": ["movies"],
        "expiresAt": null,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}

/// Records every request it sees and answers with a canned body picked by
/// method and path. Serves the endpoints that only need a shape check.
async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query,
        body: serde_json::from_slice(&body).ok(),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["version"]) => Json(json!({
            "commitSha": "b46889b5f0f2f8b91438a08a358ba8f05fc09fc1",
            "commitDate": "2024-01-01T00:00:00Z",
            "pkgVersion": "1.6.0",
        }))
        .into_response(),
        ("GET", ["stats"]) => Json(json!({
            "databaseSize": 4096,
            "lastUpdate": "2024-01-02T00:00:00Z",
            "indexes": {"movies": index_stats_json()},
        }))
        .into_response(),
        ("POST", ["dumps"]) => task_info(40, "", "dumpCreation"),
        ("POST", ["tasks", "cancel"]) => task_info(41, "", "taskCancelation"),
        ("DELETE", ["tasks"]) => task_info(42, "", "taskDeletion"),

        ("GET", ["indexes", uid]) => Json(index_json(uid)).into_response(),
        ("PATCH", ["indexes", uid]) => task_info(50, uid, "indexUpdate"),
        ("DELETE", ["indexes", uid]) => task_info(51, uid, "indexDeletion"),
        ("GET", ["indexes", _, "stats"]) => Json(index_stats_json()).into_response(),

        ("PUT", ["indexes", uid, "documents"]) => task_info(60, uid, "documentAdditionOrUpdate"),
        ("GET", ["indexes", _, "documents"]) => Json(json!({
            "results": [{"id": 1, "title": "Kung Fu Panda"}],
            "offset": 0,
            "limit": 2,
            "total": 1,
        }))
        .into_response(),
        ("DELETE", ["indexes", uid, "documents"]) => task_info(61, uid, "documentDeletion"),
        ("POST", ["indexes", uid, "documents", "delete-batch"]) => {
            task_info(62, uid, "documentDeletion")
        }
        ("GET", ["indexes", _, "documents", _]) => {
            Json(json!({"id": 1, "title": "Kung Fu Panda"})).into_response()
        }
        ("DELETE", ["indexes", uid, "documents", _]) => task_info(63, uid, "documentDeletion"),

        ("GET", ["indexes", _, "settings"]) => Json(json!({
            "rankingRules": ["words", "typo"],
            "distinctAttribute": null,
            "filterableAttributes": ["genre"],
        }))
        .into_response(),
        ("PATCH", ["indexes", uid, "settings"]) => task_info(70, uid, "settingsUpdate"),
        ("DELETE", ["indexes", uid, "settings"]) => task_info(71, uid, "settingsUpdate"),
        ("GET", ["indexes", _, "settings", "synonyms"]) => {
            Json(json!({"wolverine": ["logan"]})).into_response()
        }
        ("GET", ["indexes", _, "settings", _]) => Json(json!(["words", "typo"])).into_response(),
        ("PUT", ["indexes", uid, "settings", _]) => task_info(72, uid, "settingsUpdate"),
        ("DELETE", ["indexes", uid, "settings", _]) => task_info(73, uid, "settingsUpdate"),

        ("GET", ["keys"]) => Json(json!({
            "results": [key_json("k1", Some("search"))],
            "offset": 0,
            "limit": 20,
            "total": 1,
        }))
        .into_response(),
        ("POST", ["keys"]) => (StatusCode::CREATED, Json(key_json("k1", Some("search")))).into_response(),
        ("GET", ["keys", uid]) => Json(key_json(uid, None)).into_response(),
        ("PATCH", ["keys", uid]) => Json(key_json(uid, Some("renamed"))).into_response(),
        ("DELETE", ["keys", _]) => StatusCode::NO_CONTENT.into_response(),

        _ => api_error(StatusCode::NOT_FOUND, "not_found", "no such route"),
    }
}

async fn health() -> Response {
    Json(json!({"status": "available"})).into_response()
}

struct TestServer {
    base_url: String,
    state: MockState,
}

async fn start_test_server() -> TestServer {
    let state = MockState::default();
    let app = Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).delete(record))
        .route("/tasks/cancel", post(record))
        .route("/tasks/{uid}", get(get_task))
        .route("/indexes", post(create_index))
        .route(
            "/indexes/{index}/documents",
            post(add_documents).get(record).put(record).delete(record),
        )
        .route("/indexes/{index}/search", post(search))
        .fallback(record)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn client(server: &TestServer) -> Client {
    Client::new(&server.base_url, Some(MASTER_KEY)).unwrap()
}

// =====================================================================
// wait_for_task over HTTP
// =====================================================================

#[tokio::test]
async fn wait_converges_to_succeeded() {
    let server = start_test_server().await;
    let client = client(&server);

    let task = client
        .wait_for_task(1, Some(WaitOptions::from_millis(5000, 10)))
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Succeeded);
    assert_eq!(server.state.polls(1), 3);
}

#[tokio::test]
async fn wait_zero_timeout_polls_once() {
    let server = start_test_server().await;
    let client = client(&server);

    let err = client
        .wait_for_task(2, Some(WaitOptions::from_millis(0, 50)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { task_uid: 2, timeout_ms: 0 }), "{err:?}");
    assert_eq!(server.state.polls(2), 1);
}

#[tokio::test]
async fn wait_times_out_on_stuck_task() {
    let server = start_test_server().await;
    let client = client(&server);

    let begin = Instant::now();
    let err = client
        .wait_for_task(2, Some(WaitOptions::from_millis(200, 20)))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(begin.elapsed() >= Duration::from_millis(200));
    assert!(server.state.polls(2) >= 2);
}

#[tokio::test]
async fn wait_returns_failed_task() {
    let server = start_test_server().await;
    let client = client(&server);

    let task = client.wait_for_task(3, None).await.unwrap();
    assert!(task.is_failure());
    assert_eq!(task.error.unwrap().code, "internal");
}

#[tokio::test]
async fn wait_on_unknown_task_is_not_a_timeout() {
    let server = start_test_server().await;
    let client = client(&server);

    let err = client.wait_for_task(99, None).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
    match err {
        Error::Api { code, .. } => assert_eq!(code, "task_not_found"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(server.state.polls(99), 1);
}

#[tokio::test]
async fn wait_with_bad_key_propagates_auth_error() {
    let server = start_test_server().await;
    let client = Client::new(&server.base_url, Some("wrong")).unwrap();

    let err = client.wait_for_task(1, None).await.unwrap_err();
    match err {
        Error::Api { status, code, .. } => {
            assert_eq!(status, 401);
            assert_eq!(code, "invalid_api_key");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn wait_on_unreachable_server_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new(format!("http://{addr}"), Some(MASTER_KEY)).unwrap();
    let err = client.wait_for_task(1, None).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "{err:?}");
}

#[tokio::test]
async fn task_info_wait_for_completion() {
    let server = start_test_server().await;
    let client = client(&server);

    let info = client.create_index("movies", Some("id")).await.unwrap();
    assert_eq!(info.task_uid, 1);
    assert_eq!(info.status, TaskStatus::Enqueued);

    let task = info
        .wait_for_completion(&client, Some(WaitOptions::from_millis(5000, 0)))
        .await
        .unwrap();
    assert!(task.is_success());
}

// =====================================================================
// Pass-through endpoints
// =====================================================================

#[tokio::test]
async fn sends_client_header() {
    let server = start_test_server().await;
    let config = ClientConfig::new(&server.base_url)
        .with_api_key(MASTER_KEY)
        .with_client_agent("integration-test");
    let client = Client::from_config(config).unwrap();

    client.get_task(1).await.unwrap();
    let header = server.state.last_client_header.lock().unwrap().clone().unwrap();
    assert!(header.starts_with("Meilisearch Rust (v"));
    assert!(header.ends_with(";integration-test"));
}

#[tokio::test]
async fn create_index_conflict() {
    let server = start_test_server().await;
    let client = client(&server);

    let err = client.create_index("exists", None).await.unwrap_err();
    match err {
        Error::Api { status, code, .. } => {
            assert_eq!(status, 409);
            assert_eq!(code, "index_already_exists");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn add_documents_passes_primary_key() {
    let server = start_test_server().await;
    let index = client(&server).index("movies");
    let docs = vec![
        Movie { id: 1, title: "Kung Fu Panda".into() },
        Movie { id: 2, title: "Carol".into() },
    ];

    let with_pk = index.add_documents(&docs, Some("id")).await.unwrap();
    assert_eq!(with_pk.task_uid, 201);
    let without_pk = index.add_documents(&docs, None).await.unwrap();
    assert_eq!(without_pk.task_uid, 200);

    let batches = index.add_documents_in_batches(&docs, 1, None).await.unwrap();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|t| t.task_uid == 100));

    assert!(matches!(
        index.add_documents_in_batches(&docs, 0, None).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn search_decodes_typed_hits() {
    let server = start_test_server().await;
    let index = client(&server).index("movies");

    let res = index
        .search::<Movie>(&SearchQuery::new("shifu").with_limit(3))
        .await
        .unwrap();
    assert_eq!(res.hits, vec![Movie { id: 1, title: "Kung Fu Panda".into() }]);
    assert_eq!(res.limit, Some(3));
    assert_eq!(res.estimated_total_hits, Some(1));
}

#[tokio::test]
async fn get_tasks_sends_filters() {
    let server = start_test_server().await;
    let client = client(&server);

    let q = TasksQuery::new()
        .with_limit(5)
        .with_statuses([TaskStatus::Succeeded, TaskStatus::Failed])
        .with_types(["indexCreation"]);
    let res = client.get_tasks(&q).await.unwrap();
    assert_eq!(res.limit, 5);
    assert_eq!(res.results.len(), 1);
}

#[tokio::test]
async fn health_check() {
    let server = start_test_server().await;
    let client = client(&server);
    assert_eq!(client.health().await.unwrap().status, "available");
    assert!(client.is_healthy().await);
}

#[tokio::test]
async fn instance_endpoints() {
    let server = start_test_server().await;
    let client = client(&server);

    let version = client.version().await.unwrap();
    assert_eq!(version.pkg_version, "1.6.0");
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::GET, "/version"));

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.database_size, 4096);
    assert_eq!(stats.indexes["movies"].number_of_documents, 2);

    let dump = client.create_dump().await.unwrap();
    assert_eq!(dump.task_type, "dumpCreation");
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::POST, "/dumps"));
    assert!(req.body.is_none());
}

#[tokio::test]
async fn cancel_and_delete_tasks_send_filters() {
    let server = start_test_server().await;
    let client = client(&server);

    let q = TasksQuery::new()
        .with_statuses([TaskStatus::Enqueued, TaskStatus::Processing])
        .with_index_uids(["movies"]);

    let info = client.cancel_tasks(&q).await.unwrap();
    assert_eq!(info.task_uid, 41);
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::POST, "/tasks/cancel"));
    assert_eq!(req.query["statuses"], "enqueued,processing");
    assert_eq!(req.query["indexUids"], "movies");

    let info = client.delete_tasks(&TasksQuery::new().with_uids([1, 2])).await.unwrap();
    assert_eq!(info.task_uid, 42);
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::DELETE, "/tasks"));
    assert_eq!(req.query["uids"], "1,2");
}

#[tokio::test]
async fn index_lifecycle_requests() {
    let server = start_test_server().await;
    let client = client(&server);
    let index = client.index("movies");

    let info = index.fetch_info().await.unwrap();
    assert_eq!(info.primary_key.as_deref(), Some("id"));
    assert_eq!(client.get_index("movies").await.unwrap().uid, "movies");

    index.update("movie_id").await.unwrap();
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::PATCH, "/indexes/movies"));
    assert_eq!(req.body, Some(json!({"primaryKey": "movie_id"})));

    let stats = index.stats().await.unwrap();
    assert!(!stats.is_indexing);
    assert_eq!(server.state.last_request().path, "/indexes/movies/stats");

    let deleted = client.delete_index("movies").await.unwrap();
    assert_eq!(deleted.task_type, "indexDeletion");
    assert_eq!(server.state.last_request().method, Method::DELETE);
}

#[tokio::test]
async fn document_requests() {
    let server = start_test_server().await;
    let index = client(&server).index("movies");
    let docs = vec![Movie { id: 1, title: "Kung Fu Panda".into() }];

    index.update_documents(&docs, Some("id")).await.unwrap();
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::PUT, "/indexes/movies/documents"));
    assert_eq!(req.query["primaryKey"], "id");
    assert_eq!(req.body, Some(json!([{"id": 1, "title": "Kung Fu Panda"}])));

    let movie: Movie = index.get_document("1").await.unwrap();
    assert_eq!(movie.title, "Kung Fu Panda");
    assert_eq!(server.state.last_request().path, "/indexes/movies/documents/1");

    let page = index
        .get_documents::<Movie>(&DocumentsQuery::new().with_limit(2).with_fields(["id", "title"]))
        .await
        .unwrap();
    assert_eq!(page.results.len(), 1);
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::GET, "/indexes/movies/documents"));
    assert_eq!(req.query["limit"], "2");
    assert_eq!(req.query["fields"], "id,title");

    index.delete_document("1").await.unwrap();
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::DELETE, "/indexes/movies/documents/1"));

    let info = index.delete_documents(&["1", "2"]).await.unwrap();
    assert_eq!(info.task_uid, 62);
    let req = server.state.last_request();
    assert_eq!(
        (req.method, req.path.as_str()),
        (Method::POST, "/indexes/movies/documents/delete-batch")
    );
    assert_eq!(req.body, Some(json!(["1", "2"])));

    let info = index.delete_all_documents().await.unwrap();
    assert_eq!(info.task_uid, 61);
}

#[tokio::test]
async fn ids_are_encoded_in_paths() {
    let server = start_test_server().await;
    let client = client(&server);

    let _: Movie = client.index("my index").get_document("a/b?c#d").await.unwrap();
    assert_eq!(
        server.state.last_request().path,
        "/indexes/my%20index/documents/a%2Fb%3Fc%23d"
    );

    client.get_key("k/1").await.unwrap();
    assert_eq!(server.state.last_request().path, "/keys/k%2F1");
}

#[tokio::test]
async fn settings_requests() {
    let server = start_test_server().await;
    let index = client(&server).index("movies");

    let settings = index.get_settings().await.unwrap();
    assert_eq!(settings.distinct_attribute, Some(None));
    assert_eq!(settings.filterable_attributes, Some(vec!["genre".to_string()]));

    index
        .set_settings(&Settings::new().with_stop_words(["the"]).clear_distinct_attribute())
        .await
        .unwrap();
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::PATCH, "/indexes/movies/settings"));
    assert_eq!(req.body, Some(json!({"distinctAttribute": null, "stopWords": ["the"]})));

    index.reset_settings().await.unwrap();
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::DELETE, "/indexes/movies/settings"));

    index.set_ranking_rules(&["words", "sort"]).await.unwrap();
    let req = server.state.last_request();
    assert_eq!(
        (req.method, req.path.as_str()),
        (Method::PUT, "/indexes/movies/settings/ranking-rules")
    );
    assert_eq!(req.body, Some(json!(["words", "sort"])));

    index.set_filterable_attributes(&["genre"]).await.unwrap();
    assert_eq!(
        server.state.last_request().path,
        "/indexes/movies/settings/filterable-attributes"
    );
    index.set_searchable_attributes(&["title"]).await.unwrap();
    assert_eq!(
        server.state.last_request().path,
        "/indexes/movies/settings/searchable-attributes"
    );
    index.set_stop_words(&["a"]).await.unwrap();
    assert_eq!(server.state.last_request().path, "/indexes/movies/settings/stop-words");

    let synonyms = BTreeMap::from([("logan".to_string(), vec!["wolverine".to_string()])]);
    index.set_synonyms(&synonyms).await.unwrap();
    let req = server.state.last_request();
    assert_eq!(req.path, "/indexes/movies/settings/synonyms");
    assert_eq!(req.body, Some(json!({"logan": ["wolverine"]})));

    assert_eq!(index.get_ranking_rules().await.unwrap(), vec!["words", "typo"]);
    assert_eq!(index.get_synonyms().await.unwrap()["wolverine"], vec!["logan"]);

    index.reset_stop_words().await.unwrap();
    let req = server.state.last_request();
    assert_eq!(
        (req.method, req.path.as_str()),
        (Method::DELETE, "/indexes/movies/settings/stop-words")
    );
}

#[tokio::test]
async fn key_requests() {
    let server = start_test_server().await;
    let client = client(&server);

    let keys = client.get_keys(&ListQuery::new().with_limit(5)).await.unwrap();
    assert_eq!(keys.results.len(), 1);
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::GET, "/keys"));
    assert_eq!(req.query["limit"], "5");

    let created = client
        .create_key(
            &KeyBuilder::new()
                .with_name("search")
                .with_actions(["search"])
                .with_indexes(["movies"]),
        )
        .await
        .unwrap();
    assert_eq!(created.uid, "k1");
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::POST, "/keys"));
    assert_eq!(
        req.body,
        Some(json!({"name": "search", "actions": ["search"], "indexes": ["movies"], "expiresAt": null}))
    );

    assert_eq!(client.get_key("k1").await.unwrap().uid, "k1");

    let update = KeyUpdate {
        name: Some("renamed".into()),
        description: None,
    };
    let updated = client.update_key("k1", &update).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("renamed"));
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::PATCH, "/keys/k1"));
    assert_eq!(req.body, Some(json!({"name": "renamed"})));

    client.delete_key("k1").await.unwrap();
    let req = server.state.last_request();
    assert_eq!((req.method, req.path.as_str()), (Method::DELETE, "/keys/k1"));
}
