#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use recipe_client::auth::AuthController;
use recipe_client::config::ClientConfig;
use recipe_client::http::ApiClient;
use recipe_client::session::SessionStore;

/// One request as the mock backend saw it
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct BackendState {
    pub recipes: Vec<Value>,
    pub ingredients: Vec<Value>,
    /// username -> (email, password, is_admin)
    pub users: HashMap<String, (String, String, bool)>,
    /// token -> is_admin
    pub tokens: HashMap<String, bool>,
    pub requests: Vec<SeenRequest>,
    /// Artificial latency for collection queries with this filter value
    pub delays: HashMap<String, Duration>,
    /// Status forced onto every mutating request, if set
    pub fail_mutations: Option<StatusCode>,
    /// Status forced onto unfiltered collection queries, if set. Filtered
    /// queries (name lookups) still succeed.
    pub fail_full_lists: Option<StatusCode>,
    next_id: u64,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<BackendState>>,
}

type Shared = Arc<Mutex<BackendState>>;

impl MockBackend {
    /// Start a backend with an admin (`admin`/`secret`) and a regular user
    /// (`cook`/`secret`) on a free port
    pub async fn start() -> Result<Self> {
        let mut state = BackendState::default();
        state
            .users
            .insert("admin".into(), ("admin@example.com".into(), "secret".into(), true));
        state
            .users
            .insert("cook".into(), ("cook@example.com".into(), "secret".into(), false));
        let state = Arc::new(Mutex::new(state));

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;

        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    pub fn client(&self) -> (ApiClient, Arc<SessionStore>) {
        let session = Arc::new(SessionStore::in_memory());
        let config = ClientConfig::for_base_url(&self.base_url);
        let client = ApiClient::new(&config.api, session.clone()).expect("client");
        (client, session)
    }

    pub fn auth(&self, client: &ApiClient) -> AuthController {
        AuthController::new(client.clone(), Duration::from_millis(10))
    }

    /// A client whose session already holds a valid token
    pub async fn logged_in(&self, username: &str) -> (ApiClient, Arc<SessionStore>) {
        let (client, session) = self.client();
        self.auth(&client)
            .login(username, "secret")
            .await
            .expect("login");
        (client, session)
    }

    pub fn seed_recipe(&self, name: &str, instructions: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        state
            .recipes
            .push(json!({ "id": id, "name": name, "instructions": instructions }));
        id
    }

    pub fn seed_ingredient(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        state.ingredients.push(json!({ "id": id, "name": name }));
        id
    }

    pub fn recipes(&self) -> Vec<Value> {
        self.state.lock().unwrap().recipes.clone()
    }

    pub fn ingredients(&self) -> Vec<Value> {
        self.state.lock().unwrap().ingredients.clone()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<SeenRequest> {
        self.requests().into_iter().filter(|r| r.method == method).collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn delay_filter(&self, value: &str, delay: Duration) {
        self.state.lock().unwrap().delays.insert(value.to_string(), delay);
    }

    pub fn fail_mutations(&self, status: StatusCode) {
        self.state.lock().unwrap().fail_mutations = Some(status);
    }

    pub fn fail_full_lists(&self, status: StatusCode) {
        self.state.lock().unwrap().fail_full_lists = Some(status);
    }
}

impl BackendState {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        // Opaque, non-sequential looking identifiers
        format!("{}-{}", self.next_id, uuid::Uuid::new_v4().simple())
    }

    fn bearer(&self, headers: &HeaderMap) -> Option<bool> {
        let value = headers.get("authorization")?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.tokens.get(token).copied()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/:id", put(update_recipe).delete(delete_recipe))
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/ingredients/:id", axum::routing::delete(delete_ingredient))
        .layer(axum::middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(
    State(state): State<Shared>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let uri: &Uri = request.uri();
    let seen = SeenRequest {
        method: request.method().clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().unwrap().requests.push(seen);
    next.run(request).await
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    let mut state = state.lock().unwrap();
    match state.users.get(&username).cloned() {
        Some((_, expected, is_admin)) if expected == password => {
            let token = format!("tok-{}-{}", username, uuid::Uuid::new_v4().simple());
            state.tokens.insert(token.clone(), is_admin);
            (StatusCode::OK, format!("{} {}", token, is_admin)).into_response()
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut state = state.lock().unwrap();
    let taken = state
        .users
        .iter()
        .any(|(name, (mail, _, _))| *name == username || *mail == email);
    if taken {
        return StatusCode::CONFLICT;
    }
    state.users.insert(username, (email, password, false));
    StatusCode::CREATED
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> StatusCode {
    let mut state = state.lock().unwrap();
    if state.bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED;
    }
    let token = headers["authorization"]
        .to_str()
        .unwrap_or_default()
        .trim_start_matches("Bearer ")
        .to_string();
    state.tokens.remove(&token);
    StatusCode::OK
}

fn filtered(items: &[Value], needle: Option<&String>) -> Vec<Value> {
    items
        .iter()
        .filter(|item| match needle {
            Some(needle) => item["name"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        })
        .cloned()
        .collect()
}

#[derive(Clone, Copy)]
enum Collection {
    Recipes,
    Ingredients,
}

async fn list_collection(
    state: &Shared,
    headers: &HeaderMap,
    param: &str,
    params: &HashMap<String, String>,
    collection: Collection,
) -> Response {
    let delay = {
        let state = state.lock().unwrap();
        if state.bearer(headers).is_none() {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        if let (None, Some(status)) = (params.get(param), state.fail_full_lists) {
            return status.into_response();
        }
        params.get(param).and_then(|v| state.delays.get(v).copied())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let state = state.lock().unwrap();
    let items = match collection {
        Collection::Recipes => &state.recipes,
        Collection::Ingredients => &state.ingredients,
    };
    Json(filtered(items, params.get(param))).into_response()
}

async fn list_recipes(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    list_collection(&state, &headers, "name", &params, Collection::Recipes).await
}

async fn list_ingredients(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    list_collection(&state, &headers, "term", &params, Collection::Ingredients).await
}

fn guard_mutation(state: &BackendState, headers: &HeaderMap, admin_only: bool) -> Option<StatusCode> {
    match state.bearer(headers) {
        None => Some(StatusCode::UNAUTHORIZED),
        Some(false) if admin_only => Some(StatusCode::FORBIDDEN),
        Some(_) => state.fail_mutations,
    }
}

async fn create_recipe(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
    let mut state = state.lock().unwrap();
    if let Some(status) = guard_mutation(&state, &headers, false) {
        return status;
    }
    let id = state.allocate_id();
    state.recipes.push(json!({
        "id": id,
        "name": body["name"],
        "instructions": body["instructions"],
    }));
    StatusCode::CREATED
}

async fn update_recipe(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut state = state.lock().unwrap();
    if let Some(status) = guard_mutation(&state, &headers, false) {
        return status;
    }
    match state.recipes.iter_mut().find(|r| r["id"] == id.as_str()) {
        Some(recipe) => {
            recipe["instructions"] = body["instructions"].clone();
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_recipe(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> StatusCode {
    let mut state = state.lock().unwrap();
    if let Some(status) = guard_mutation(&state, &headers, true) {
        return status;
    }
    let before = state.recipes.len();
    state.recipes.retain(|r| r["id"] != id.as_str());
    if state.recipes.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create_ingredient(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
    let mut state = state.lock().unwrap();
    if let Some(status) = guard_mutation(&state, &headers, false) {
        return status;
    }
    let id = state.allocate_id();
    state.ingredients.push(json!({ "id": id, "name": body["name"] }));
    StatusCode::CREATED
}

async fn delete_ingredient(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> StatusCode {
    let mut state = state.lock().unwrap();
    if let Some(status) = guard_mutation(&state, &headers, true) {
        return status;
    }
    let before = state.ingredients.len();
    state.ingredients.retain(|i| i["id"] != id.as_str());
    if state.ingredients.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
