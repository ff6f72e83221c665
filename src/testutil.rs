//! Synthetic etherscan-shaped API for exercising the fetch pipeline
//! against canned page bodies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Canned per-address page bodies plus a record of every hit.
#[derive(Clone)]
pub struct FakeExplorer {
    pages: Arc<HashMap<String, Vec<Value>>>,
    hits: Arc<Mutex<Vec<(String, usize)>>>,
}

impl FakeExplorer {
    /// Page numbers requested so far, in arrival order.
    pub fn pages_hit(&self) -> Vec<usize> {
        self.hits.lock().unwrap().iter().map(|(_, p)| *p).collect()
    }
}

/// Binds the fake explorer to an ephemeral port and returns its query URL.
/// Keys of `pages` must be lowercase addresses; each entry is the ordered
/// list of page bodies served for that address (1-indexed by `page`).
pub async fn serve(pages: HashMap<String, Vec<Value>>) -> (String, FakeExplorer) {
    let state = FakeExplorer {
        pages: Arc::new(pages),
        hits: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api", get(txlist))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), state)
}

async fn txlist(
    State(state): State<FakeExplorer>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let address = params
        .get("address")
        .cloned()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    state.hits.lock().unwrap().push((address.clone(), page));

    let body = state
        .pages
        .get(&address)
        .and_then(|pages| pages.get(page - 1))
        .cloned()
        .unwrap_or_else(no_transactions);
    Json(body)
}

/// What explorers answer for addresses they have nothing on.
pub fn no_transactions() -> Value {
    json!({ "status": "0", "message": "No transactions found", "result": [] })
}

pub fn page_of(txs: Vec<Value>) -> Value {
    json!({ "status": "1", "message": "OK", "result": txs })
}

pub fn tx(from: &str, to: &str, ts: i64) -> Value {
    json!({
        "from": from,
        "to": to,
        "timeStamp": ts.to_string(),
        "hash": format!("0x{:064x}", ts.unsigned_abs()),
        "blockNumber": "1"
    })
}
