mod generate;
mod health;
mod metrics;
mod stats;

pub use generate::generate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use stats::stats_handler;
