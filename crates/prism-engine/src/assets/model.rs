use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;

use crate::scene::{primitives, MeshData, Vertex};

/// Loads an OBJ file into a single `MeshData`, merging all models.
///
/// Triangulated, single-index layout (GPU-friendly). Missing normals are
/// reconstructed as flat face normals; missing texture coordinates become
/// zeros.
pub fn load_obj(path: &Path) -> Result<MeshData> {
    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let data = merge_models(&models);
    anyhow::ensure!(!data.is_empty(), "{} contains no geometry", path.display());
    Ok(data)
}

/// `load_obj`, but failures are logged and substituted with the unit cube so
/// the demo still draws something in the model's place.
pub fn load_obj_or_cube(path: &Path) -> MeshData {
    match load_obj(path) {
        Ok(data) => data,
        Err(err) => {
            log::error!("{err:#}; using cube in place of model");
            primitives::cube()
        }
    }
}

fn merge_models(models: &[tobj::Model]) -> MeshData {
    let mut out = MeshData::default();

    for model in models {
        let mesh = &model.mesh;
        let base = out.vertices.len() as u32;
        let count = mesh.positions.len() / 3;

        for i in 0..count {
            let position = [
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ];
            let normal = if mesh.normals.len() >= 3 * (i + 1) {
                [
                    mesh.normals[3 * i],
                    mesh.normals[3 * i + 1],
                    mesh.normals[3 * i + 2],
                ]
            } else {
                [0.0; 3]
            };
            let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                [mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]]
            } else {
                [0.0; 2]
            };

            out.vertices.push(Vertex {
                position,
                normal,
                uv,
            });
        }

        out.indices
            .extend(mesh.indices.iter().map(|&idx| base + idx));
    }

    if models.iter().any(|m| m.mesh.normals.is_empty()) {
        fill_flat_normals(&mut out);
    }

    out
}

/// Assigns each zero-normal vertex the accumulated geometric normal of the
/// triangles referencing it.
fn fill_flat_normals(data: &mut MeshData) {
    let mut accum = vec![Vec3::ZERO; data.vertices.len()];

    for tri in data.indices.chunks_exact(3) {
        let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let a = Vec3::from(data.vertices[ia].position);
        let b = Vec3::from(data.vertices[ib].position);
        let c = Vec3::from(data.vertices[ic].position);
        let n = (b - a).cross(c - a);
        accum[ia] += n;
        accum[ib] += n;
        accum[ic] += n;
    }

    for (vertex, n) in data.vertices.iter_mut().zip(accum) {
        if Vec3::from(vertex.normal) == Vec3::ZERO {
            vertex.normal = n.normalize_or_zero().to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &[u8] = b"\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    fn load_from_bytes(bytes: &[u8]) -> MeshData {
        let mut reader = std::io::BufReader::new(bytes);
        let (models, _) = tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
            Ok((Vec::new(), Default::default()))
        })
        .expect("obj parse");
        merge_models(&models)
    }

    #[test]
    fn triangle_obj_produces_three_vertices() {
        let data = load_from_bytes(TRIANGLE_OBJ);
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_normals_are_reconstructed() {
        let data = load_from_bytes(TRIANGLE_OBJ);
        for v in &data.vertices {
            // CCW triangle in the XY plane faces +Z.
            assert!((Vec3::from(v.normal) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn missing_file_falls_back_to_cube() {
        let data = load_obj_or_cube(Path::new("/nonexistent/model.obj"));
        assert_eq!(data.vertices.len(), primitives::cube().vertices.len());
    }
}
