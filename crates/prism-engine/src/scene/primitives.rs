//! Shared primitive-mesh builders.
//!
//! Every demo draws from the same cube/plane data instead of re-declaring
//! vertex arrays per program. Builders return CPU `MeshData`; callers upload
//! once via `Mesh::new` during setup and reuse the handle.

use super::mesh::{MeshData, Vertex};

fn v(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        uv,
    }
}

/// Unit cube centered at the origin (extent `[-0.5, 0.5]` per axis).
///
/// 24 vertices (4 per face, so normals and uvs are per-face) and 36 indices.
/// Triangles are wound counter-clockwise seen from outside the cube.
pub fn cube() -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (normal, tangent-u, tangent-v) per face; vertices are produced in the
    // same corner order for every face so one index pattern applies to all.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),   // +Z
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), // -Z
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),  // +X
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),  // -X
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),  // +Y
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),  // -Y
    ];

    for (normal, u, w) in faces {
        let n = glam::Vec3::from(normal);
        let u = glam::Vec3::from(u);
        let w = glam::Vec3::from(w);
        let base = vertices.len() as u32;

        // Corners: (-u,-w), (+u,-w), (+u,+w), (-u,+w) on the face plane.
        for (su, sw, uv) in [
            (-0.5f32, -0.5f32, [0.0f32, 0.0f32]),
            (0.5, -0.5, [1.0, 0.0]),
            (0.5, 0.5, [1.0, 1.0]),
            (-0.5, 0.5, [0.0, 1.0]),
        ] {
            let p = n * 0.5 + u * su + w * sw;
            vertices.push(v(p.to_array(), normal, uv));
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// Square ground plane in the XZ plane at `y = 0`, normal `+Y`.
///
/// `extent` is the half-size; `uv_scale` repeats the texture across the
/// surface (wrap mode Repeat).
pub fn plane(extent: f32, uv_scale: f32) -> MeshData {
    let e = extent;
    let s = uv_scale;

    let vertices = vec![
        v([-e, 0.0, -e], [0.0, 1.0, 0.0], [0.0, 0.0]),
        v([-e, 0.0, e], [0.0, 1.0, 0.0], [0.0, s]),
        v([e, 0.0, e], [0.0, 1.0, 0.0], [s, s]),
        v([e, 0.0, -e], [0.0, 1.0, 0.0], [s, 0.0]),
    ];

    // CCW seen from above (+Y).
    let indices = vec![0, 1, 2, 0, 2, 3];

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_has_four_vertices_and_two_triangles_per_face() {
        let data = cube();
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
    }

    #[test]
    fn cube_vertices_lie_on_the_unit_cube() {
        for vert in cube().vertices {
            let p = Vec3::from(vert.position);
            assert!((p.abs().max_element() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_normals_are_axis_aligned_unit_vectors() {
        for vert in cube().vertices {
            let n = Vec3::from(vert.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert_eq!(n.abs().max_element(), 1.0);
        }
    }

    #[test]
    fn cube_triangles_face_outward() {
        let data = cube();
        for tri in data.indices.chunks(3) {
            let a = Vec3::from(data.vertices[tri[0] as usize].position);
            let b = Vec3::from(data.vertices[tri[1] as usize].position);
            let c = Vec3::from(data.vertices[tri[2] as usize].position);
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // CCW winding with outward normals: geometric normal points away
            // from the cube center.
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn plane_uvs_repeat_by_scale() {
        let data = plane(10.0, 4.0);
        let max_uv = data
            .vertices
            .iter()
            .map(|v| v.uv[0].max(v.uv[1]))
            .fold(0.0f32, f32::max);
        assert_eq!(max_uv, 4.0);
    }
}
