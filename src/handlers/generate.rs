use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error, info};

use crate::cache::prompt_hash;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, GENERATION_LATENCY, REQUEST_LATENCY, REQUEST_TOTAL,
};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::pipeline::generate_asset;
use crate::state::AppState;

const BODY_LIMIT: usize = 16 * 1024 * 1024;

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "error": message})),
    )
        .into_response()
}

// Accept either a JSON body or multipart form fields
async fn parse_request(request: Request) -> Result<GenerateRequest, Response> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/"));

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| bad_request("Invalid multipart body"))?;
        let mut payload = GenerateRequest::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| bad_request("Invalid multipart body"))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("prompt") => {
                    payload.prompt = field
                        .text()
                        .await
                        .map_err(|_| bad_request("Invalid multipart body"))?;
                }
                Some("image") => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| bad_request("Invalid multipart body"))?;
                    debug!(bytes = bytes.len(), "ignoring attached image, image-to-text is not supported");
                }
                _ => {}
            }
        }
        Ok(payload)
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), BODY_LIMIT)
            .await
            .map_err(|_| bad_request("Invalid request body"))?;
        serde_json::from_slice(&bytes).map_err(|_| bad_request("Invalid request body"))
    }
}

pub async fn generate_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    REQUEST_TOTAL.inc();
    let request_start = Instant::now();

    let payload = match parse_request(request).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let prompt = payload.prompt.trim().to_string();
    if prompt.is_empty() {
        return bad_request("Prompt is required");
    }
    if let Some(image) = &payload.image {
        debug!(bytes = image.len(), "ignoring attached image, image-to-text is not supported");
    }

    let hash = prompt_hash(&prompt);

    // cache first; a storage failure degrades to the no-cache path
    let cached_entry = state.cache.lookup(&hash).unwrap_or_else(|err| {
        error!(error = %err, "cache lookup failed");
        None
    });
    if let Some(entry) = cached_entry {
        CACHE_HITS.inc();
        info!(hash = &hash[..12], "cache HIT");
        let response_time = request_start.elapsed().as_secs_f64();
        finish_request(&state, true, response_time, None, prompt.len());
        return Json(GenerateResponse {
            success: true,
            model_url: format!("/generated/{}", entry.asset_path),
            cached: true,
            generation_time: entry.generation_time,
            response_time,
        })
        .into_response();
    }

    CACHE_MISSES.inc();
    info!(hash = &hash[..12], "cache MISS - generating");

    // Two concurrent misses for the same prompt both reach this point and
    // both export; the second store wins. Output is idempotent per prompt
    // hash, so the surviving record is equivalent.
    let (filename, generation_time) = match generate_asset(
        &state.llm,
        &state.output_dir,
        &prompt,
        &hash,
        &state.repair,
    )
    .await
    {
        Ok(result) => result,
        Err(err) => {
            error!(error = %err, "asset export failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": "asset export failed"})),
            )
                .into_response();
        }
    };
    GENERATION_LATENCY.observe(generation_time);

    if let Err(err) = state.cache.store(&hash, &prompt, &filename, generation_time) {
        error!(error = %err, "cache store failed");
    }

    let response_time = request_start.elapsed().as_secs_f64();
    finish_request(&state, false, response_time, Some(generation_time), prompt.len());
    Json(GenerateResponse {
        success: true,
        model_url: format!("/generated/{filename}"),
        cached: false,
        generation_time,
        response_time,
    })
    .into_response()
}

fn finish_request(
    state: &AppState,
    cache_hit: bool,
    response_time: f64,
    generation_time: Option<f64>,
    prompt_length: usize,
) {
    REQUEST_LATENCY.observe(response_time);
    if let Err(err) = state
        .store
        .log_request(cache_hit, response_time, generation_time, prompt_length)
    {
        error!(error = %err, "performance sample write failed");
    }
}
