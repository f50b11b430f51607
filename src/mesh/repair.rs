use serde_json::Value;

use super::Mesh;
use crate::error::RepairError;

// Largest bounding-box extent after normalization
pub const TARGET_SIZE: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct RepairOptions {
    pub min_valid_faces: usize,
    pub prune_unreferenced: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            min_valid_faces: 6,
            prune_unreferenced: false,
        }
    }
}

// Turn a raw model completion into a usable mesh: extract the first JSON
// object, parse vertices and faces, drop faces with out-of-range indices,
// and normalize the survivor. Every rejection reason is an explicit error
// so the caller can decide what to substitute.
pub fn repair(raw: &str, opts: &RepairOptions) -> Result<Mesh, RepairError> {
    let json = extract_json_object(raw).ok_or(RepairError::NoJsonFound)?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| RepairError::MalformedJson(e.to_string()))?;

    let vertices = parse_vertices(&value)?;
    let faces = parse_faces(&value, vertices.len());

    if faces.len() < opts.min_valid_faces {
        return Err(RepairError::InsufficientValidFaces {
            kept: faces.len(),
            needed: opts.min_valid_faces,
        });
    }

    let mut mesh = Mesh::new(vertices, faces);
    mesh.remove_degenerate_faces();
    if opts.prune_unreferenced {
        mesh.prune_unreferenced();
    }
    if mesh.faces.is_empty() {
        return Err(RepairError::DegenerateMesh);
    }
    mesh.normalize(TARGET_SIZE);
    Ok(mesh)
}

// Find the first top-level JSON object with a string-aware balanced-brace
// scan. Completions wrapped in prose or markdown fences still extract; if
// the object never closes we degrade to the greedy first-{ .. last-} span
// rather than give up.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    // unbalanced: best-effort greedy span
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_vertices(value: &Value) -> Result<Vec<[f32; 3]>, RepairError> {
    let raw = value.get("vertices").ok_or(RepairError::MissingVertices)?;
    let list = raw.as_array().ok_or(RepairError::BadVertexShape)?;
    let mut vertices = Vec::with_capacity(list.len());
    for entry in list {
        let triple = entry.as_array().ok_or(RepairError::BadVertexShape)?;
        if triple.len() != 3 {
            return Err(RepairError::BadVertexShape);
        }
        let mut v = [0.0f32; 3];
        for (axis, coord) in triple.iter().enumerate() {
            v[axis] = coord.as_f64().ok_or(RepairError::BadVertexShape)? as f32;
        }
        vertices.push(v);
    }
    Ok(vertices)
}

// Faces are optional and forgiving: keep the first three indices of every
// entry with length >= 3 when all three are in range, silently drop the rest
fn parse_faces(value: &Value, vertex_count: usize) -> Vec<[u32; 3]> {
    let Some(list) = value.get("faces").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut faces = Vec::with_capacity(list.len());
    for entry in list {
        let Some(indices) = entry.as_array() else {
            continue;
        };
        if indices.len() < 3 {
            continue;
        }
        let mut face = [0u32; 3];
        let mut ok = true;
        for (slot, idx) in indices.iter().take(3).enumerate() {
            match idx.as_u64() {
                Some(i) if (i as usize) < vertex_count => face[slot] = i as u32,
                _ => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            faces.push(face);
        }
    }
    faces
}
