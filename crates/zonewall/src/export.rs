//! Binary glTF (GLB) export of a wall mesh.

use crate::build::WallMesh;

const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
const GLB_VERSION: u32 = 2;
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

/// glTF component types
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// glTF buffer view targets
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// One contiguous region of the BIN chunk
struct Region {
    offset: usize,
    length: usize,
}

fn push_region(bin: &mut Vec<u8>, bytes: &[u8]) -> Region {
    let region = Region {
        offset: bin.len(),
        length: bytes.len(),
    };
    bin.extend_from_slice(bytes);
    region
}

/// Encode `mesh` as a single-node GLB with POSITION, TEXCOORD_0 and indices.
///
/// Positions are narrowed to f32. The node is named `name`.
pub fn build_wall_glb(mesh: &WallMesh, name: &str) -> Vec<u8> {
    let positions: Vec<f32> = mesh
        .vertices
        .iter()
        .flat_map(|v| v.as_vec3().to_array())
        .collect();
    let uvs: Vec<f32> = mesh
        .uvs
        .iter()
        .flat_map(|uv| uv.as_vec2().to_array())
        .collect();

    let (min, max) = mesh.vertices.iter().fold(
        ([f32::MAX; 3], [f32::MIN; 3]),
        |(mut min, mut max), v| {
            for (axis, value) in v.as_vec3().to_array().into_iter().enumerate() {
                min[axis] = min[axis].min(value);
                max[axis] = max[axis].max(value);
            }
            (min, max)
        },
    );

    // ── Binary buffer ────────────────────────────────────────
    let mut bin_data: Vec<u8> = Vec::new();
    let pos = push_region(&mut bin_data, &floats_to_bytes(&positions));
    let tex = push_region(&mut bin_data, &floats_to_bytes(&uvs));
    let idx = push_region(&mut bin_data, &u32s_to_bytes(&mesh.triangles));
    while bin_data.len() % 4 != 0 {
        bin_data.push(0);
    }

    // ── glTF JSON ────────────────────────────────────────────
    let view = |region: &Region, target: u32| {
        serde_json::json!({
            "buffer": 0,
            "byteOffset": region.offset,
            "byteLength": region.length,
            "target": target
        })
    };

    let gltf_json = serde_json::json!({
        "asset": {
            "version": "2.0",
            "generator": concat!("zonewall v", env!("CARGO_PKG_VERSION"))
        },
        "scene": 0,
        "scenes": [{ "name": "Zone", "nodes": [0] }],
        "nodes": [{ "name": name, "mesh": 0 }],
        "meshes": [{
            "name": name,
            "primitives": [{
                "attributes": { "POSITION": 0, "TEXCOORD_0": 1 },
                "indices": 2,
                "material": 0
            }]
        }],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": FLOAT,
                "count": mesh.vertices.len(),
                "type": "VEC3",
                "min": min,
                "max": max
            },
            {
                "bufferView": 1,
                "componentType": FLOAT,
                "count": mesh.uvs.len(),
                "type": "VEC2"
            },
            {
                "bufferView": 2,
                "componentType": UNSIGNED_INT,
                "count": mesh.triangles.len(),
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            view(&pos, ARRAY_BUFFER),
            view(&tex, ARRAY_BUFFER),
            view(&idx, ELEMENT_ARRAY_BUFFER)
        ],
        "buffers": [{ "byteLength": bin_data.len() }],
        "materials": [{
            "name": "Wall",
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.2, 0.6, 0.9, 0.6],
                "metallicFactor": 0.0,
                "roughnessFactor": 0.8
            },
            "alphaMode": "BLEND"
        }]
    });

    let mut json_bytes = serde_json::to_vec(&gltf_json).unwrap_or_default();
    // JSON chunk pads with spaces
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }

    // ── Assemble ─────────────────────────────────────────────
    let json_chunk_length = json_bytes.len() as u32;
    let bin_chunk_length = bin_data.len() as u32;
    let total_length: u32 = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length as usize);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());

    glb.extend_from_slice(&json_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);

    glb.extend_from_slice(&bin_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    glb.extend_from_slice(&bin_data);

    tracing::debug!(bytes = glb.len(), "Wall GLB built");
    glb
}

fn floats_to_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn u32s_to_bytes(data: &[u32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}
