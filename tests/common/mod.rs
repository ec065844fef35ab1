//! In-process mock of the back-office API for integration tests.
//!
//! Serves the auth endpoints plus one protected business collection with
//! per-test behavior flags and call counters, so tests can assert exact
//! HTTP and refresh call counts.

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use backoffice_link::{BackofficeClient, BackofficeTimeouts, MemorySessionStorage, SessionStorage};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const TEST_EMAIL: &str = "admin@example.com";
pub const TEST_PASSWORD: &str = "secret";

#[derive(Debug, Default)]
pub struct MockState {
    // Behavior flags
    pub fail_login: bool,
    pub fail_refresh: bool,
    pub fail_logout: bool,
    pub protected_always_401: bool,
    pub protected_500: bool,
    /// Artificial latency for the refresh endpoint, to hold a refresh
    /// in flight while other 401 handlers pile up behind it.
    pub refresh_delay_ms: u64,
    /// Artificial latency for the protected collection, to push a request
    /// past the client-side timeout.
    pub partner_delay_ms: u64,

    // Tokens the server currently accepts
    pub access_token: String,
    pub refresh_token: String,
    token_seq: u32,

    // Call counters
    pub login_calls: u32,
    pub refresh_calls: u32,
    pub logout_calls: u32,
    pub partner_calls: u32,
    pub profile_calls: u32,
    pub upload_calls: u32,
}

impl MockState {
    fn issue_tokens(&mut self) -> (String, String) {
        self.token_seq += 1;
        self.access_token = format!("access-{}", self.token_seq);
        self.refresh_token = format!("refresh-{}", self.token_seq);
        (self.access_token.clone(), self.refresh_token.clone())
    }
}

type Shared = Arc<Mutex<MockState>>;

/// Snapshot of the call counters.
#[derive(Debug, Clone, Copy)]
pub struct Counters {
    pub login_calls: u32,
    pub refresh_calls: u32,
    pub logout_calls: u32,
    pub partner_calls: u32,
    pub profile_calls: u32,
    pub upload_calls: u32,
}

pub struct MockApi {
    pub base_url: String,
    state: Shared,
}

impl MockApi {
    /// Start the mock server on an ephemeral port.
    pub async fn spawn() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/logout", post(logout))
            .route("/auth/profile", patch(update_profile))
            .route("/auth/change-password", patch(change_password))
            .route("/partners", get(list_partners))
            .route("/uploader", post(upload))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api serve");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn set_fail_login(&self, value: bool) {
        self.lock().fail_login = value;
    }

    pub fn set_fail_refresh(&self, value: bool) {
        self.lock().fail_refresh = value;
    }

    pub fn set_fail_logout(&self, value: bool) {
        self.lock().fail_logout = value;
    }

    pub fn set_protected_always_401(&self, value: bool) {
        self.lock().protected_always_401 = value;
    }

    pub fn set_protected_500(&self, value: bool) {
        self.lock().protected_500 = value;
    }

    pub fn set_refresh_delay_ms(&self, value: u64) {
        self.lock().refresh_delay_ms = value;
    }

    pub fn set_partner_delay_ms(&self, value: u64) {
        self.lock().partner_delay_ms = value;
    }

    /// Rotate the accepted access token server-side without telling the
    /// client, simulating access-token expiry.
    pub fn expire_access_token(&self) {
        let mut state = self.lock();
        state.token_seq += 1;
        state.access_token = format!("access-{}", state.token_seq);
    }

    /// Invalidate both tokens server-side, so even a refresh is rejected.
    pub fn revoke_session(&self) {
        let mut state = self.lock();
        state.access_token = String::new();
        state.refresh_token = String::new();
    }

    pub fn counters(&self) -> Counters {
        let state = self.lock();
        Counters {
            login_calls: state.login_calls,
            refresh_calls: state.refresh_calls,
            logout_calls: state.logout_calls,
            partner_calls: state.partner_calls,
            profile_calls: state.profile_calls,
            upload_calls: state.upload_calls,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }
}

/// Client against the mock API with in-memory session storage.
pub fn client_for(api: &MockApi) -> BackofficeClient {
    client_with_storage(api, MemorySessionStorage::new())
}

/// Client against the mock API with a caller-provided storage backend.
pub fn client_with_storage(
    api: &MockApi,
    storage: impl SessionStorage + 'static,
) -> BackofficeClient {
    BackofficeClient::builder()
        .base_url(&api.base_url)
        .timeouts(BackofficeTimeouts::fast())
        .session_storage(storage)
        .build()
        .expect("build client")
}

pub fn sample_user() -> Value {
    json!({
        "id": "u-1",
        "name": "Alice",
        "email": TEST_EMAIL,
        "role": "ADMIN",
        "isActive": true,
        "isFirstLogin": false,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-06-01T00:00:00Z"
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})))
}

fn authorize(state: &MockState, headers: &HeaderMap) -> bool {
    !state.protected_always_401
        && !state.access_token.is_empty()
        && bearer(headers).as_deref() == Some(state.access_token.as_str())
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("mock state lock");
    state.login_calls += 1;

    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    if state.fail_login || email != TEST_EMAIL || password != TEST_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        );
    }

    let (access, refresh) = state.issue_tokens();
    (
        StatusCode::OK,
        Json(json!({
            "user": sample_user(),
            "accessToken": access,
            "refreshToken": refresh,
        })),
    )
}

async fn refresh(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let delay_ms = state.lock().expect("mock state lock").refresh_delay_ms;
    if delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
    }

    let mut state = state.lock().expect("mock state lock");
    state.refresh_calls += 1;

    if state.fail_refresh
        || state.refresh_token.is_empty()
        || bearer(&headers).as_deref() != Some(state.refresh_token.as_str())
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Refresh token expired"})),
        );
    }

    let (access, refresh) = state.issue_tokens();
    (
        StatusCode::OK,
        Json(json!({"accessToken": access, "refreshToken": refresh})),
    )
}

async fn logout(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("mock state lock");
    state.logout_calls += 1;

    if state.fail_logout {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "logout unavailable"})),
        );
    }
    (StatusCode::OK, Json(json!({})))
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("mock state lock");
    state.profile_calls += 1;

    if !authorize(&state, &headers) {
        return unauthorized();
    }

    let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": ["name should not be empty"]})),
        );
    }

    let mut user = sample_user();
    user["name"] = json!(name);
    if let Some(email) = body.get("email").and_then(Value::as_str) {
        user["email"] = json!(email);
    }
    (StatusCode::OK, Json(json!({"user": user})))
}

async fn change_password(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let state = state.lock().expect("mock state lock");

    if !authorize(&state, &headers) {
        return unauthorized();
    }

    let current = body
        .get("currentPassword")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if current != TEST_PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Current password is incorrect"})),
        );
    }
    (StatusCode::OK, Json(json!({})))
}

async fn list_partners(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let delay_ms = state.lock().expect("mock state lock").partner_delay_ms;
    if delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
    }

    let mut state = state.lock().expect("mock state lock");
    state.partner_calls += 1;

    if state.protected_500 {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "partner backend unavailable"})),
        );
    }
    if !authorize(&state, &headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!([
            {"id": "p-1", "name": "Acme Networks"},
            {"id": "p-2", "name": "Globex Storage"}
        ])),
    )
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    {
        let mut state = state.lock().expect("mock state lock");
        state.upload_calls += 1;
        if !authorize(&state, &headers) {
            return unauthorized();
        }
    }

    let mut filename = String::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        if let Some(name) = field.file_name() {
            filename = name.to_string();
        }
        let _ = field.bytes().await;
    }

    (
        StatusCode::OK,
        Json(json!({
            "url": format!("https://cdn.example.com/{}", filename),
            "filename": filename,
        })),
    )
}
