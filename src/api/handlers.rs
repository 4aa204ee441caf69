use super::AppState;
use crate::market::PriceSnapshot;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct IndexResponse {
    message: &'static str,
    endpoints: [&'static str; 2],
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateResponse {
    message: &'static str,
    data: PriceSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum PingResponse {
    Success { data: serde_json::Value },
    Error { message: String },
}

pub(crate) async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Cryptocurrency price API",
        endpoints: ["/prices", "/update"],
    })
}

pub(crate) async fn prices(State(state): State<AppState>) -> Json<PriceSnapshot> {
    let snapshot = state.job.store().snapshot().await;
    Json(snapshot.as_ref().clone())
}

pub(crate) async fn update(State(state): State<AppState>) -> Json<UpdateResponse> {
    tracing::info!("Manual refresh requested");

    // Detached so a client disconnect cannot cancel the refresh midway
    let job = state.job.clone();
    if let Err(e) = tokio::spawn(async move { job.run().await }).await {
        tracing::error!(error = %e, "Manual refresh task failed");
    }

    let snapshot = state.job.store().snapshot().await;
    Json(UpdateResponse {
        message: "Update complete",
        data: snapshot.as_ref().clone(),
    })
}

pub(crate) async fn test_upstream(State(state): State<AppState>) -> (StatusCode, Json<PingResponse>) {
    match state.job.source().ping().await {
        Ok(data) => (StatusCode::OK, Json(PingResponse::Success { data })),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PingResponse::Error {
                message: e.to_string(),
            }),
        ),
    }
}
