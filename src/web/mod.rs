// Web interface - HTML CRUD pages plus a small JSON API
//
// One `Inventory` is shared by every request through `AppState`.
// Bad input never produces an error page: the request is logged and
// dropped, and the user lands back on a safe view.

pub mod pages;

use crate::inventory::{EditRequest, InputError, Inventory, InventorySummary};
use crate::registry::{RegistryEntry, StorageId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inventory: Arc<Mutex<Inventory>>,
}

impl AppState {
    pub fn new(inventory: Inventory) -> Self {
        AppState {
            inventory: Arc::new(Mutex::new(inventory)),
        }
    }

    /// Lock the inventory. A panicked handler cannot leave it half-updated,
    /// so a poisoned lock is still safe to use.
    pub fn inventory(&self) -> MutexGuard<'_, Inventory> {
        self.inventory.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Forms
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tilavuus: Option<String>,
    #[serde(default)]
    pub alku_saldo: Option<String>,
}

// ============================================================================
// API types
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageResponse {
    pub id: StorageId,
    pub name: String,
    pub capacity: f64,
    pub balance: f64,
    pub available_space: f64,
}

impl From<&RegistryEntry> for StorageResponse {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            capacity: entry.storage.capacity(),
            balance: entry.storage.balance(),
            available_space: entry.storage.available_space(),
        }
    }
}

// ============================================================================
// HTML Handlers
// ============================================================================

/// GET / - List all storages
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(pages::index_page(&state.inventory()))
}

/// GET /create - Creation form
async fn create_form() -> Html<String> {
    Html(pages::create_page())
}

/// POST /create - Create a storage, or show the form again
async fn create_storage(State(state): State<AppState>, Form(form): Form<CreateForm>) -> Response {
    let result = state.inventory().create(
        form.name.as_deref(),
        form.tilavuus.as_deref(),
        form.alku_saldo.as_deref(),
    );

    match result {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            debug!(error = %e, "create request ignored");
            Html(pages::create_page()).into_response()
        }
    }
}

/// GET /edit/:id - Edit page, or back to the list if unknown
async fn edit_form(State(state): State<AppState>, Path(id): Path<StorageId>) -> Response {
    let inventory = state.inventory();

    match inventory.get(id) {
        Some(entry) => Html(pages::edit_page(id, entry)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// POST /edit/:id - Rename, add or remove
async fn edit_storage(
    State(state): State<AppState>,
    Path(id): Path<StorageId>,
    Form(request): Form<EditRequest>,
) -> Redirect {
    let result = state.inventory().apply(id, &request);

    match result {
        Ok(outcome) => {
            debug!(id, ?outcome, "edit applied");
            Redirect::to(&format!("/edit/{}", id))
        }
        Err(InputError::NotFound(_)) => Redirect::to("/"),
        Err(e) => {
            debug!(id, error = %e, "edit request ignored");
            Redirect::to(&format!("/edit/{}", id))
        }
    }
}

/// POST /delete/:id
async fn delete_storage(State(state): State<AppState>, Path(id): Path<StorageId>) -> Redirect {
    state.inventory().delete(id);
    Redirect::to("/")
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/storages - All storages, ordered by id
async fn list_storages(State(state): State<AppState>) -> Json<ApiResponse<Vec<StorageResponse>>> {
    let inventory = state.inventory();
    let storages = inventory
        .registry()
        .list_all()
        .values()
        .map(StorageResponse::from)
        .collect();

    Json(ApiResponse::ok(storages))
}

/// GET /api/storages/:id
async fn get_storage(State(state): State<AppState>, Path(id): Path<StorageId>) -> Response {
    let inventory = state.inventory();

    match inventory.get(id) {
        Some(entry) => Json(ApiResponse::ok(StorageResponse::from(entry))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<StorageResponse>::err(format!("storage {} not found", id))),
        )
            .into_response(),
    }
}

/// GET /api/summary - Totals across storages
async fn get_summary(State(state): State<AppState>) -> Json<ApiResponse<InventorySummary>> {
    Json(ApiResponse::ok(state.inventory().summary()))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/storages", get(list_storages))
        .route("/storages/:id", get(get_storage))
        .route("/summary", get(get_summary))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index))
        .route("/create", get(create_form).post(create_storage))
        .route("/edit/:id", get(edit_form).post(edit_storage))
        .route("/delete/:id", post(delete_storage))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn test_app() -> (Router, AppState) {
        let state = AppState::new(Inventory::default());
        (router(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(app: &Router, name: &str, capacity: &str, balance: &str) {
        let body = format!("name={}&tilavuus={}&alku_saldo={}", name, capacity, balance);
        let (status, location, _) = send(app, post_form("/create", &body)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_index_empty() {
        let (app, _) = test_app();
        let (status, _, body) = send(&app, get_req("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Warehouse Management"));
        assert!(body.contains("Create Storage"));
    }

    #[tokio::test]
    async fn test_create_storage_page() {
        let (app, _) = test_app();
        let (status, _, body) = send(&app, get_req("/create")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Create New Storage"));
    }

    #[tokio::test]
    async fn test_create_storage_post() {
        let (app, state) = test_app();
        create(&app, "Test+Storage", "100", "50").await;

        let (_, _, body) = send(&app, get_req("/")).await;
        assert!(body.contains("Test Storage"));
        assert_eq!(state.inventory().registry().len(), 1);
    }

    #[tokio::test]
    async fn test_create_storage_invalid_capacity() {
        let (app, state) = test_app();
        let (status, _, body) = send(
            &app,
            post_form("/create", "name=Test+Storage&tilavuus=0&alku_saldo=0"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Create New Storage"));
        assert!(state.inventory().registry().is_empty());
    }

    #[tokio::test]
    async fn test_create_storage_non_numeric() {
        let (app, state) = test_app();
        let (status, _, _) = send(
            &app,
            post_form("/create", "name=Test&tilavuus=lots&alku_saldo=0"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(state.inventory().registry().is_empty());
    }

    #[tokio::test]
    async fn test_create_storage_empty_initial_balance() {
        let (app, state) = test_app();
        let (status, location, body) = send(
            &app,
            post_form("/create", "name=Juice&tilavuus=100&alku_saldo="),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(location, None);
        assert!(body.contains("Create New Storage"));
        assert!(state.inventory().registry().is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let (app, _) = test_app();

        let (status, _, _) = send(&app, get_req("/edit/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(&app, post_form("/delete/abc", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_storage_page() {
        let (app, _) = test_app();
        create(&app, "Test+Storage", "100", "50").await;

        let (status, _, body) = send(&app, get_req("/edit/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Edit Storage"));
    }

    #[tokio::test]
    async fn test_edit_storage_not_found() {
        let (app, _) = test_app();

        let (status, location, _) = send(&app, get_req("/edit/999")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (status, location, _) =
            send(&app, post_form("/edit/999", "action=add&amount=5")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_edit_storage_update_name() {
        let (app, state) = test_app();
        create(&app, "Original+Name", "100", "0").await;

        let (status, location, _) =
            send(&app, post_form("/edit/1", "action=update&name=New+Name")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/edit/1"));
        assert_eq!(state.inventory().get(1).unwrap().name, "New Name");
    }

    #[tokio::test]
    async fn test_edit_storage_add_content() {
        let (app, state) = test_app();
        create(&app, "Test+Storage", "100", "0").await;

        send(&app, post_form("/edit/1", "action=add&amount=25")).await;
        assert_eq!(state.inventory().get(1).unwrap().storage.balance(), 25.0);

        // Clamped to the remaining space
        send(&app, post_form("/edit/1", "action=add&amount=500")).await;
        assert_eq!(state.inventory().get(1).unwrap().storage.balance(), 100.0);
    }

    #[tokio::test]
    async fn test_edit_storage_remove_content() {
        let (app, state) = test_app();
        create(&app, "Test+Storage", "100", "50").await;

        send(&app, post_form("/edit/1", "action=remove&amount=20")).await;
        assert_eq!(state.inventory().get(1).unwrap().storage.balance(), 30.0);

        // Bad amounts are ignored, not errors
        let (status, location, _) =
            send(&app, post_form("/edit/1", "action=remove&amount=abc")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/edit/1"));
        assert_eq!(state.inventory().get(1).unwrap().storage.balance(), 30.0);
    }

    #[tokio::test]
    async fn test_delete_storage() {
        let (app, state) = test_app();
        create(&app, "Test+Storage", "100", "0").await;
        assert_eq!(state.inventory().registry().len(), 1);

        let (status, location, _) = send(&app, post_form("/delete/1", "")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
        assert!(state.inventory().registry().is_empty());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_storage() {
        let (app, _) = test_app();
        let (status, location, _) = send(&app, post_form("/delete/999", "")).await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_ids_not_reused_over_http() {
        let (app, state) = test_app();
        create(&app, "Juice", "100", "0").await;
        create(&app, "Beer", "100", "0").await;
        send(&app, post_form("/delete/1", "")).await;
        create(&app, "Milk", "100", "0").await;

        let ids: Vec<StorageId> = state.inventory().registry().list_all().keys().copied().collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_api_storages() {
        let (app, _) = test_app();
        create(&app, "Juice", "100", "40").await;

        let (status, _, body) = send(&app, get_req("/api/storages")).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0]["name"], "Juice");
        assert_eq!(json["data"][0]["available_space"], 60.0);
    }

    #[tokio::test]
    async fn test_api_storage_not_found() {
        let (app, _) = test_app();
        let (status, _, body) = send(&app, get_req("/api/storages/5")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_api_health_and_summary() {
        let (app, _) = test_app();
        create(&app, "Juice", "100", "40").await;
        create(&app, "Beer", "50", "10").await;

        let (status, _, body) = send(&app, get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("OK"));

        let (_, _, body) = send(&app, get_req("/api/summary")).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["storages"], 2);
        assert_eq!(json["data"]["total_balance"], 50.0);
    }
}
