//! In-process mock of the NeXO data service.
//!
//! Serves two small networks ("NeXO" and "GO CC") and canned answers for the
//! path, details, interactions, parents and search endpoints.

#![allow(clippy::unwrap_used, clippy::panic, dead_code)]

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::time::Duration;

/// Delay of the "slow" search, well past any test timeout.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

pub fn app_config() -> Value {
    json!({
        "networks": [
            {"name": "NeXO", "networkData": "nexo.json",
             "sigma": {"drawingProperties": {"defaultLabelColor": "#000"}}},
            {"name": "GO CC", "networkData": "go_cc.json"}
        ]
    })
}

async fn network_data(Path(file): Path<String>) -> Result<Json<Value>, StatusCode> {
    match file.as_str() {
        "nexo.json" => Ok(Json(json!({
            "nodes": [
                {"id": "A", "label": "root", "color": "#a00"},
                {"id": "B", "label": "middle", "color": "#0b0"},
                {"id": "C", "label": "leaf", "color": "#00c"},
                {"id": "D", "label": "bystander", "color": "#ddd"}
            ],
            "edges": [{"source": "A", "target": "B", "relationship": "is_a"}]
        }))),
        "go_cc.json" => Ok(Json(json!({
            "nodes": [{"id": "GO:0005737", "label": "cytoplasm"}],
            "edges": []
        }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn path(Path(id): Path<String>) -> Json<Value> {
    if id != "A" {
        return Json(json!({}));
    }
    Json(json!({
        "elements": {
            "nodes": [
                {"data": {"id": "A", "type": "start"}},
                {"data": {"id": "B"}},
                {"data": {"id": "C"}}
            ],
            "edges": [
                {"data": {"source": "A", "target": "B"}},
                {"data": {"source": "B", "target": "C"}}
            ]
        }
    }))
}

async fn details(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "A" | "B" | "C" | "D" => Ok(Json(json!({
            "name": id.clone(),
            "CC Annotation": "middle",
            "BP Definition": "protein kinase activity",
            "Robustness": 0.91,
            "Assigned Genes": ["ACT1", "ABP1"]
        }))),
        "GO:0005737" => Ok(Json(json!({
            "name": "GO:0005737",
            "term name": "cytoplasm",
            "def": "All of the contents of a cell",
            "Assigned Gene Ids": ["S000001855"]
        }))),
        "BROKEN" => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn interactions(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({
        "graph": {"elements": {
            "nodes": [{"data": {"id": "ACT1"}}, {"data": {"id": "ABP1"}}],
            "edges": [{"data": {"source": "ACT1", "target": "ABP1"}}]
        }}
    }))
}

async fn parents(Path(_id): Path<String>) -> Json<Value> {
    Json(json!([{"name": "D"}]))
}

async fn search(Path(query): Path<String>) -> (StatusCode, String) {
    match query.as_str() {
        "slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            (StatusCode::OK, "[]".to_string())
        }
        "nothing" => (StatusCode::OK, String::new()),
        _ => (
            StatusCode::OK,
            json!([
                {"queryArray": query.split_whitespace().collect::<Vec<_>>()},
                {"name": "B", "label": "middle", "BP Definition": "protein kinase activity"},
                {"name": "D", "label": "kinase bystander"}
            ])
            .to_string(),
        ),
    }
}

async fn search_genes(Path(query): Path<String>) -> Json<Value> {
    Json(json!([{"name": "S000001855", "Assigned Genes": query}]))
}

async fn names(Path(names): Path<String>) -> Json<Value> {
    let records: Vec<Value> = names
        .split_whitespace()
        .map(|name| json!({"name": name, "Assigned Genes": "ACT1", "Assigned Orfs": "YFL039C"}))
        .collect();
    Json(Value::Array(records))
}

pub fn router() -> Router {
    Router::new()
        .route("/app-config.json", get(|| async { Json(app_config()) }))
        .route("/front/data/{file}", get(network_data))
        .route("/nexo/{id}/parents", get(parents))
        .route("/search/names/{names}", get(names))
        .route("/search/genes/{query}", get(search_genes))
        .route("/search/{query}", get(search))
        .route("/{id}/path", get(path))
        .route("/{id}/interactions", get(interactions))
        .route("/{id}", get(details))
}

/// Start the mock on an ephemeral port and return its base URL.
pub async fn spawn_mock() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    format!("http://{addr}")
}
