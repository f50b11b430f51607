use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::state::AppState;

// Aggregate cache-hit rate and latency figures from the persisted samples
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.store.request_stats() {
        Ok(stats) => Json(json!({
            "total_requests": stats.total,
            "cache_hit_rate": format!("{:.2}%", stats.hit_rate_percent()),
            "cached_avg_response": format!("{:.3}s", stats.cached_avg_response),
            "non_cached_avg_response": format!("{:.3}s", stats.non_cached_avg_response),
        }))
        .into_response(),
        Err(err) => {
            error!(error = %err, "stats query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "stats unavailable"})),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ModelCache;
    use crate::llm::LlmClient;
    use crate::mesh::repair::RepairOptions;
    use crate::store::Store;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    #[tokio::test]
    async fn stats_aggregate_the_persisted_samples() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        store.log_request(false, 2.0, Some(1.9), 6).unwrap();
        store.log_request(true, 0.5, None, 6).unwrap();

        let state = Arc::new(AppState {
            llm: LlmClient::new(
                "http://127.0.0.1:9".to_string(),
                "llama3.2:3b".to_string(),
                Duration::from_secs(1),
            ),
            cache: ModelCache::new(store.clone(), Duration::from_secs(300)),
            store,
            output_dir: std::env::temp_dir(),
            repair: RepairOptions::default(),
        });
        let app = Router::new().route("/stats", get(stats_handler)).with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["total_requests"], 2);
        assert_eq!(body["cache_hit_rate"], "50.00%");
        assert_eq!(body["cached_avg_response"], "0.500s");
        assert_eq!(body["non_cached_avg_response"], "2.000s");
    }
}
