use std::fs;
use std::io;
use std::path::Path;

use serde_json::json;

use super::Mesh;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const COMPONENT_F32: u32 = 5126;
const COMPONENT_U32: u32 = 5125;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

// Serialize the mesh as a binary glTF asset: a 12-byte header, a JSON chunk
// describing one node/mesh/material, and a BIN chunk holding positions
// followed by triangle indices. Both attribute types are 4 bytes wide so the
// buffer views need no extra alignment padding.
pub fn to_glb(mesh: &Mesh, name: &str) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(mesh.vertices.len() * 12 + mesh.faces.len() * 12);
    for v in &mesh.vertices {
        for &c in v {
            buffer.extend_from_slice(&c.to_le_bytes());
        }
    }
    let positions_byte_length = buffer.len();
    for f in &mesh.faces {
        for &i in f {
            buffer.extend_from_slice(&i.to_le_bytes());
        }
    }
    let indices_byte_length = buffer.len() - positions_byte_length;

    let (min, max) = if mesh.vertices.is_empty() {
        ([0.0f32; 3], [0.0f32; 3])
    } else {
        mesh.bounds()
    };
    let color = [
        mesh.color[0] as f32 / 255.0,
        mesh.color[1] as f32 / 255.0,
        mesh.color[2] as f32 / 255.0,
        mesh.color[3] as f32 / 255.0,
    ];

    let gltf = json!({
        "asset": {"version": "2.0", "generator": "vision3d-backend"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"name": name, "mesh": 0}],
        "meshes": [{
            "primitives": [{
                "attributes": {"POSITION": 0},
                "indices": 1,
                "material": 0
            }]
        }],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": color,
                "metallicFactor": 0.0,
                "roughnessFactor": 0.8
            }
        }],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": COMPONENT_F32,
                "count": mesh.vertices.len(),
                "type": "VEC3",
                "min": min,
                "max": max
            },
            {
                "bufferView": 1,
                "componentType": COMPONENT_U32,
                "count": mesh.faces.len() * 3,
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            {
                "buffer": 0,
                "byteOffset": 0,
                "byteLength": positions_byte_length,
                "target": TARGET_ARRAY_BUFFER
            },
            {
                "buffer": 0,
                "byteOffset": positions_byte_length,
                "byteLength": indices_byte_length,
                "target": TARGET_ELEMENT_ARRAY_BUFFER
            }
        ],
        "buffers": [{"byteLength": buffer.len()}]
    });

    let mut json_bytes = serde_json::to_vec(&gltf).expect("gltf json serializes");
    // JSON chunk pads with spaces, BIN chunk with zeros
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let bin_padding = (4 - buffer.len() % 4) % 4;
    let bin_chunk_length = buffer.len() + bin_padding;

    let total_length = 12 + 8 + json_bytes.len() + 8 + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json_bytes);

    glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&buffer);
    glb.extend_from_slice(&vec![0u8; bin_padding]);

    glb
}

// Write through a temp file and rename so a concurrent reader never sees a
// partially written asset
pub fn export_glb(mesh: &Mesh, path: &Path, name: &str) -> io::Result<()> {
    let bytes = to_glb(mesh, name);
    let tmp = path.with_extension("glb.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
