#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use symview::engine::{Address, SymbolEntry};
use symview::engine_client::{
    DebuggingResponse, EnumerateSymbolsRequest, EnumerateSymbolsResponse, ExecRequest,
    ExecResponse, PingResponse,
};
use tracing::info;

pub const NTDLL: Address = 0x7FFE0000;
pub const KERNEL32: Address = 0x76000000;

/// What the stub engine serves and what it was asked to do.
#[derive(Clone, Default)]
pub struct StubEngine {
    pub debugging: bool,
    pub symbols: Arc<HashMap<Address, Vec<SymbolEntry>>>,
    pub executed: Arc<Mutex<Vec<ExecRequest>>>,
}

impl StubEngine {
    pub fn with_process() -> Self {
        let mut symbols = HashMap::new();
        symbols.insert(NTDLL, vec![SymbolEntry::new(0x7FFE1000, Some("NtOpenFile"), None)]);
        symbols.insert(
            KERNEL32,
            vec![
                SymbolEntry::new(0x76001000, Some("CreateFileW"), None),
                SymbolEntry::new(0x76002000, Some("CloseHandle"), Some("CloseHandle")),
            ],
        );
        Self {
            debugging: true,
            symbols: Arc::new(symbols),
            executed: Arc::default(),
        }
    }

    pub fn commands(&self) -> Vec<(String, bool)> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.command.clone(), r.wait))
            .collect()
    }
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
    })
}

async fn debugging(State(stub): State<StubEngine>) -> Json<DebuggingResponse> {
    Json(DebuggingResponse {
        debugging: stub.debugging,
    })
}

async fn enumerate(
    State(stub): State<StubEngine>,
    Json(request): Json<EnumerateSymbolsRequest>,
) -> Json<EnumerateSymbolsResponse> {
    Json(EnumerateSymbolsResponse {
        symbols: stub.symbols.get(&request.base).cloned().unwrap_or_default(),
    })
}

async fn exec(State(stub): State<StubEngine>, Json(request): Json<ExecRequest>) -> Json<ExecResponse> {
    stub.executed.lock().unwrap().push(request);
    Json(ExecResponse { success: true })
}

/// Serves `stub` on an ephemeral port and returns its base URL.
pub async fn start_stub_engine(stub: StubEngine) -> String {
    let app = Router::new()
        .route("/ping", get(ping))
        .route("/debugging", get(debugging))
        .route("/symbols/enumerate", post(enumerate))
        .route("/exec", post(exec))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    info!(%addr, "Stub engine listening");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
