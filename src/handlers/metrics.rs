use axum::response::IntoResponse;
use prometheus::{Encoder, TextEncoder};

// prometheus text exposition
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn exposition_includes_registered_counters() {
        // touching the counter forces registration before gather()
        crate::metrics::REQUEST_TOTAL.inc();
        let response = metrics_handler().await.into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("vision3d_requests_total"));
    }
}
