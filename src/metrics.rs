use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("vision3d_requests_total", "Total number of generate requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("vision3d_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("vision3d_cache_misses_total", "Total cache misses").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "vision3d_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref GENERATION_LATENCY: Histogram = register_histogram!(
        "vision3d_generation_latency_seconds",
        "Mesh generation and export latency in seconds"
    )
    .unwrap();
    pub static ref FALLBACK_TOTAL: Counter = register_counter!(
        "vision3d_fallbacks_total",
        "Generations that degraded to a fallback or keyword-matched shape"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("vision3d_cache_size", "Current number of items in the in-memory cache")
            .unwrap();
}
