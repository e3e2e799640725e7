//! End-to-end tests for the stockroom item edit workflow.
//!
//! Tests run the real [`stockroom_client::InventoryClient`] against an
//! in-process axum server that speaks the inventory backend's REST dialect.
//! No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockroom-integration-tests
//! ```
//!
//! # Mock Backend
//!
//! Routes are served under `/api` so base-path handling is exercised too.
//!
//! | method | path | behavior |
//! |---|---|---|
//! | GET | `/api/product` | `{"products": [...]}` |
//! | GET | `/api/colors/allcolors` | bare color array |
//! | GET | `/api/items/check` | `{"exists": <configured>}` |
//! | GET | `/api/items/{id}` | the seeded item, or 404 |
//! | PUT | `/api/items/{id}` | records the body, or the configured failure |
//!
//! Every request is recorded and must carry `Authorization: Bearer <token>`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use stockroom_client::{ClientConfig, Session, SessionError};
use stockroom_core::search::DEFAULT_THRESHOLD;
use url::Url;

/// Token the mock backend accepts.
pub const TEST_TOKEN: &str = "test-token";

/// One request as seen by the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below `/api`.
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

/// A canned failure response.
#[derive(Debug, Clone)]
struct Failure {
    status: StatusCode,
    body: Value,
}

/// Mock inventory backend, configured before it is started.
#[derive(Debug, Clone)]
pub struct MockBackend {
    products: Value,
    colors: Value,
    items: HashMap<String, Value>,
    exists: bool,
    products_failure: Option<Failure>,
    update_failure: Option<Failure>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// A backend seeded with a small furniture catalog and item `42`.
    ///
    /// Item `42` is an "Oak Table" in the "Wood" category, retail 1000,
    /// discounted 10%.
    #[must_use]
    pub fn new() -> Self {
        let oak_wood = json!({
            "_id": "p1", "name": "Oak Table", "category": "Wood", "retailPrice": 1000
        });
        let products = json!([
            oak_wood,
            { "_id": "p2", "name": "Oak Table", "category": "Glass", "retailPrice": 1500 },
            { "_id": "p3", "name": "Pine Chair", "category": "Wood", "retailPrice": "199.99" },
        ]);
        let colors = json!([
            { "_id": "c1", "colorName": "Crimson Red", "colorCode": "#DC143C" },
            { "_id": "c2", "colorName": "Blue", "colorCode": "#0000FF" },
            { "_id": "c3", "colorName": "Forest Green", "colorCode": "#228B22" },
        ]);
        let item = json!({
            "_id": "42",
            "productId": oak_wood,
            "quantity": 3,
            "barcode": null,
            "shelf": "A1",
            "color": "Blue",
            "colorCode": "#0000FF",
            "category": "Wood",
            "discountPercentage": 10
        });

        Self {
            products,
            colors,
            items: HashMap::from([("42".to_string(), item)]),
            exists: false,
            products_failure: None,
            update_failure: None,
        }
    }

    /// Seed or replace an item record.
    #[must_use]
    pub fn with_item(mut self, id: &str, item: Value) -> Self {
        self.items.insert(id.to_string(), item);
        self
    }

    /// Make the duplicate precheck report an existing item.
    #[must_use]
    pub fn with_existing_duplicate(mut self) -> Self {
        self.exists = true;
        self
    }

    /// Fail `GET /product` with `status` and `body`.
    #[must_use]
    pub fn failing_products(mut self, status: StatusCode, body: Value) -> Self {
        self.products_failure = Some(Failure { status, body });
        self
    }

    /// Fail every `PUT /items/{id}` with `status` and `body`.
    #[must_use]
    pub fn failing_updates(mut self, status: StatusCode, body: Value) -> Self {
        self.update_failure = Some(Failure { status, body });
        self
    }

    /// Bind to an ephemeral local port and serve in the background.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn spawn(self) -> std::io::Result<RunningBackend> {
        let state = Arc::new(MockState {
            backend: self,
            requests: Mutex::new(Vec::new()),
        });

        let api = Router::new()
            .route("/product", get(products))
            .route("/colors/allcolors", get(colors))
            .route("/items/check", get(check))
            .route("/items/{id}", get(item).put(update))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock backend stopped: {e}");
            }
        });

        Ok(RunningBackend { addr, state })
    }
}

/// A started mock backend.
#[derive(Debug)]
pub struct RunningBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl RunningBackend {
    /// Base URL of the mock API.
    ///
    /// # Errors
    ///
    /// Returns error if the bound address does not form a URL.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}/api", self.addr))
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Errors
    ///
    /// Returns error if the bound address does not form a URL.
    pub fn config(&self) -> Result<ClientConfig, url::ParseError> {
        Ok(ClientConfig {
            api_url: self.url()?,
            token: None,
            session_file: std::env::temp_dir().join("stockroom-integration-session"),
            timeout: Duration::from_secs(5),
            color_threshold: DEFAULT_THRESHOLD,
        })
    }

    /// A session carrying [`TEST_TOKEN`].
    ///
    /// # Errors
    ///
    /// Never fails for the built-in token.
    pub fn session() -> Result<Session, SessionError> {
        Session::new(TEST_TOKEN)
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests().clone()
    }

    /// Bodies of every `PUT` request received.
    #[must_use]
    pub fn updates(&self) -> Vec<Value> {
        self.state
            .requests()
            .iter()
            .filter(|r| r.method == Method::PUT)
            .filter_map(|r| r.body.clone())
            .collect()
    }

    /// Paths requested with `method`, in order.
    #[must_use]
    pub fn paths(&self, method: &Method) -> Vec<String> {
        self.state
            .requests()
            .iter()
            .filter(|r| r.method == *method)
            .map(|r| r.path.clone())
            .collect()
    }
}

#[derive(Debug)]
struct MockState {
    backend: MockBackend,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn requests(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, method: Method, path: String, query: Option<String>, body: Option<Value>) {
        self.requests().push(RecordedRequest {
            method,
            path,
            query,
            body,
        });
    }
}

// =============================================================================
// Handlers
// =============================================================================

type Shared = State<Arc<MockState>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid or expired token" })),
    )
        .into_response()
}

fn fail(failure: &Failure) -> Response {
    (failure.status, Json(failure.body.clone())).into_response()
}

async fn products(State(state): Shared, headers: HeaderMap) -> Response {
    state.record(Method::GET, "/product".to_string(), None, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(failure) = &state.backend.products_failure {
        return fail(failure);
    }
    Json(json!({ "products": state.backend.products })).into_response()
}

async fn colors(State(state): Shared, headers: HeaderMap) -> Response {
    state.record(Method::GET, "/colors/allcolors".to_string(), None, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(state.backend.colors.clone()).into_response()
}

async fn check(State(state): Shared, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    state.record(Method::GET, "/items/check".to_string(), query, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "exists": state.backend.exists })).into_response()
}

async fn item(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    state.record(Method::GET, format!("/items/{id}"), None, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    match state.backend.items.get(&id) {
        Some(item) => Json(item.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Item not found" })),
        )
            .into_response(),
    }
}

async fn update(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record(Method::PUT, format!("/items/{id}"), None, Some(body));
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(failure) = &state.backend.update_failure {
        return fail(failure);
    }
    Json(json!({ "message": "Item updated" })).into_response()
}
