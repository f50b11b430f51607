use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use crate::cache::normalize_prompt;
use crate::error::StorageError;
use crate::llm::LlmClient;
use crate::mesh::classify::{classify, extract_color};
use crate::mesh::glb::export_glb;
use crate::mesh::primitives::{fallback_shape, shape_mesh};
use crate::mesh::repair::{RepairOptions, repair};
use crate::mesh::Mesh;
use crate::metrics::FALLBACK_TOTAL;

// Where the mesh for a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshSource {
    Model,
    Keyword,
    Fallback,
}

// Produce a mesh for the prompt. The model path is tried first; a rejected
// completion substitutes the hardcoded fallback shape, an unreachable model
// degrades to the keyword-matched primitive. This function never fails -
// the caller always gets a usable mesh.
pub async fn build_mesh(llm: &LlmClient, prompt: &str, opts: &RepairOptions) -> (Mesh, MeshSource) {
    let prompt_lower = normalize_prompt(prompt);
    let color = extract_color(&prompt_lower);

    let (mut mesh, source) = match llm.generate_mesh_json(prompt).await {
        Ok(raw) => match repair(&raw, opts) {
            Ok(mesh) => {
                debug!(vertices = mesh.vertices.len(), faces = mesh.faces.len(), "completion repaired");
                (mesh, MeshSource::Model)
            }
            Err(err) => {
                warn!(error = %err, "completion rejected, substituting fallback shape");
                FALLBACK_TOTAL.inc();
                (fallback_shape(), MeshSource::Fallback)
            }
        },
        Err(err) => {
            warn!(error = %err, "model unavailable, using keyword-matched primitive");
            FALLBACK_TOTAL.inc();
            (shape_mesh(classify(&prompt_lower)), MeshSource::Keyword)
        }
    };

    mesh.color = color;
    (mesh, source)
}

// Generate and export the asset for a cache miss. Returns the filename and
// the measured generation time in seconds.
pub async fn generate_asset(
    llm: &LlmClient,
    output_dir: &Path,
    prompt: &str,
    prompt_hash: &str,
    opts: &RepairOptions,
) -> Result<(String, f64), StorageError> {
    let start = Instant::now();
    let (mesh, source) = build_mesh(llm, prompt, opts).await;

    let filename = format!("model_{}.glb", &prompt_hash[..12]);
    fs::create_dir_all(output_dir)?;
    export_glb(&mesh, &output_dir.join(&filename), &filename)?;

    let generation_time = start.elapsed().as_secs_f64();
    debug!(%filename, ?source, generation_time, "asset exported");
    Ok((filename, generation_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::prompt_hash;
    use crate::mesh::primitives::cuboid;
    use crate::mesh::DEFAULT_COLOR;
    use std::time::Duration;

    fn unreachable_llm() -> LlmClient {
        LlmClient::new(
            "http://127.0.0.1:9".to_string(),
            "llama3.2:3b".to_string(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn cube_prompt_without_a_model_builds_the_primitive_box() {
        let (mesh, source) =
            build_mesh(&unreachable_llm(), "a cube", &RepairOptions::default()).await;
        assert_eq!(source, MeshSource::Keyword);

        let mut expected = cuboid([2.0, 2.0, 2.0]);
        expected.color = DEFAULT_COLOR;
        assert_eq!(mesh, expected);
    }

    #[tokio::test]
    async fn color_keyword_is_applied_to_the_degraded_mesh() {
        let (mesh, _) =
            build_mesh(&unreachable_llm(), "a RED robot", &RepairOptions::default()).await;
        assert_eq!(mesh.color, [255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn generated_asset_lands_under_the_hash_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = "a cube";
        let hash = prompt_hash(prompt);

        let (filename, generation_time) = generate_asset(
            &unreachable_llm(),
            dir.path(),
            prompt,
            &hash,
            &RepairOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(filename, format!("model_{}.glb", &hash[..12]));
        assert!(dir.path().join(&filename).exists());
        assert!(generation_time >= 0.0);
    }
}
