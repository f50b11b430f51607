use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::ModelCache;
use crate::llm::LlmClient;
use crate::mesh::repair::RepairOptions;
use crate::store::Store;

// app's shared state
pub struct AppState {
    pub llm: LlmClient,
    pub cache: ModelCache,
    pub store: Arc<Store>,
    pub output_dir: PathBuf,
    pub repair: RepairOptions,
}
