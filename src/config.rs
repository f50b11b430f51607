use std::path::PathBuf;

use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "vision3d-backend")]
#[command(about = "3D model generation server with prompt caching")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    // Ollama server url
    #[arg(short, long, default_value = "http://localhost:11434")]
    pub ollama_url: String,

    // Model used for mesh completions
    #[arg(short, long, default_value = "llama3.2:3b")]
    pub model: String,

    // In-memory cache TTL in seconds
    #[arg(short, long, default_value_t = 300)]
    pub cache_ttl: u64,

    // Model call timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub llm_timeout: u64,

    // Directory exported assets are written to
    #[arg(long, default_value = "generated")]
    pub output_dir: PathBuf,

    // SQLite database path
    #[arg(long, default_value = "vision3d.db")]
    pub db_path: PathBuf,

    // Minimum surviving faces for an accepted completion
    #[arg(long, default_value_t = 6)]
    pub min_valid_faces: usize,

    // Also drop vertices no surviving face references
    #[arg(long, default_value_t = false)]
    pub prune_unreferenced: bool,
}
