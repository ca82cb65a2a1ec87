use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::bridge::{BridgeEvent, ViewNotification};
use crate::menu::{ContextMenu, FollowTarget, MenuAction};
use crate::symbol_view::{SymbolView, TableInput, ViewSnapshot};

// Data structures for API
#[derive(Debug, Serialize, Deserialize)]
pub struct RowRequest {
    pub row: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowRequest {
    pub target: FollowTarget,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerRequest {
    pub action: MenuAction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivateRequest {
    /// `true` for a double click, `false` for Enter.
    #[serde(default)]
    pub double_click: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn input(request: &ActivateRequest) -> TableInput {
    if request.double_click {
        TableInput::DoubleClicked
    } else {
        TableInput::EnterPressed
    }
}

/// One view shared by all handlers. Handlers hold the view lock across engine
/// round trips, so the engine must not await a push to `/bridge/event` while one
/// of its own calls from the view is in flight, or both sides deadlock.
#[derive(Clone)]
pub struct AppState {
    view: Arc<Mutex<SymbolView>>,
    notifications: Arc<Mutex<mpsc::UnboundedReceiver<ViewNotification>>>,
}

impl AppState {
    pub fn new(view: SymbolView, notifications: mpsc::UnboundedReceiver<ViewNotification>) -> Self {
        Self {
            view: Arc::new(Mutex::new(view)),
            notifications: Arc::new(Mutex::new(notifications)),
        }
    }
}

// API handlers
async fn bridge_event(
    State(state): State<AppState>,
    Json(event): Json<BridgeEvent>,
) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.handle_event(event).await;
    Json(view.snapshot())
}

async fn get_state(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.view.lock().await.snapshot())
}

async fn select_module(
    State(state): State<AppState>,
    Json(request): Json<RowRequest>,
) -> ApiResult<ViewSnapshot> {
    let mut view = state.view.lock().await;
    let rows = view.module_list().row_count();
    if request.row >= rows {
        return Err(bad_request(format!(
            "Module row {} out of range ({} rows)",
            request.row, rows
        )));
    }
    info!(row = request.row, "Module selected");
    view.select_module(request.row).await;
    Ok(Json(view.snapshot()))
}

async fn follow_module(State(state): State<AppState>) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.module_follow().await;
    Json(view.snapshot())
}

async fn activate_module(
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.module_input(input(&request)).await;
    Json(view.snapshot())
}

async fn download_symbols(State(state): State<AppState>) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.module_download_symbols().await;
    Json(view.snapshot())
}

async fn module_context_menu(State(state): State<AppState>) -> Json<Option<ContextMenu>> {
    Json(state.view.lock().await.module_context_menu().await)
}

async fn search_symbols(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<ViewSnapshot> {
    debug!(text = %request.text, "Symbol search");
    let mut view = state.view.lock().await;
    view.search(&request.text);
    Json(view.snapshot())
}

async fn select_symbol(
    State(state): State<AppState>,
    Json(request): Json<RowRequest>,
) -> ApiResult<ViewSnapshot> {
    let mut view = state.view.lock().await;
    let rows = view.symbols().cur_list().row_count();
    if request.row >= rows {
        return Err(bad_request(format!(
            "Symbol row {} out of range ({} rows)",
            request.row, rows
        )));
    }
    view.select_symbol(request.row);
    Ok(Json(view.snapshot()))
}

async fn follow_symbol(
    State(state): State<AppState>,
    Json(request): Json<FollowRequest>,
) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.follow_symbol(request.target).await;
    Json(view.snapshot())
}

async fn activate_symbol(
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.symbol_input(input(&request)).await;
    Json(view.snapshot())
}

async fn symbol_context_menu(State(state): State<AppState>) -> Json<ContextMenu> {
    Json(state.view.lock().await.symbol_context_menu())
}

async fn trigger_action(
    State(state): State<AppState>,
    Json(request): Json<TriggerRequest>,
) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    view.trigger(request.action).await;
    Json(view.snapshot())
}

async fn drain_notifications(State(state): State<AppState>) -> Json<Vec<ViewNotification>> {
    let mut rx = state.notifications.lock().await;
    let mut pending = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        pending.push(notification);
    }
    Json(pending)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/bridge/event", post(bridge_event))
        .route("/state", get(get_state))
        .route("/modules/select", post(select_module))
        .route("/modules/follow", post(follow_module))
        .route("/modules/activate", post(activate_module))
        .route("/modules/download_symbols", post(download_symbols))
        .route("/modules/context_menu", get(module_context_menu))
        .route("/symbols/search", post(search_symbols))
        .route("/symbols/select", post(select_symbol))
        .route("/symbols/follow", post(follow_symbol))
        .route("/symbols/activate", post(activate_symbol))
        .route("/symbols/context_menu", get(symbol_context_menu))
        .route("/menu/trigger", post(trigger_action))
        .route("/notifications", get(drain_notifications))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Symbol view server running on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
