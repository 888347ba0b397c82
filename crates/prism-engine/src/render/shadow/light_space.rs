//! Light-space transforms and the CPU reference of the shadow comparison.
//!
//! Everything here is pure math over `glam` types so the projection and
//! comparison behavior is unit-testable without a GPU. The WGSL in
//! `forward.wgsl` mirrors `shadow_compare` exactly.

use glam::{Mat4, Vec3};

/// A light's view + projection pair.
///
/// Depth passes consume the combined matrix in place of the camera's; the
/// main pass uses the same matrix to project fragments for the comparison.
#[derive(Debug, Copy, Clone)]
pub struct LightSpace {
    pub view: Mat4,
    pub proj: Mat4,
}

impl LightSpace {
    /// Combined projection × view matrix.
    pub fn matrix(&self) -> Mat4 {
        self.proj * self.view
    }
}

/// Light space for a directional light.
///
/// The (infinitely distant) light is given a virtual eye `distance` units
/// from `target` against the light direction, with an orthographic box of
/// half-size `extent` — parallel rays, so depth is independent of the eye
/// offset as long as the scene fits between `near` and `far`.
pub fn directional_light_space(
    direction: Vec3,
    target: Vec3,
    distance: f32,
    extent: f32,
    near: f32,
    far: f32,
) -> LightSpace {
    let dir = fallback_normalize(direction);
    let eye = target - dir * distance;
    let view = Mat4::look_at_rh(eye, target, up_for(dir));
    let proj = Mat4::orthographic_rh(-extent, extent, -extent, extent, near, far);
    LightSpace { view, proj }
}

/// Light space for a spot light: perspective projection along the cone axis.
///
/// `fov_y` should cover the outer cone angle (typically `2 * outer`).
pub fn spot_light_space(position: Vec3, direction: Vec3, fov_y: f32, near: f32, far: f32) -> LightSpace {
    let dir = fallback_normalize(direction);
    let view = Mat4::look_at_rh(position, position + dir, up_for(dir));
    let proj = Mat4::perspective_rh(fov_y, 1.0, near, far);
    LightSpace { view, proj }
}

/// Identifies one face of a depth cubemap, in wgpu array-layer order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// The face's outward axis.
    pub fn forward(self) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::X,
            CubeFace::NegX => Vec3::NEG_X,
            CubeFace::PosY => Vec3::Y,
            CubeFace::NegY => Vec3::NEG_Y,
            CubeFace::PosZ => Vec3::Z,
            CubeFace::NegZ => Vec3::NEG_Z,
        }
    }

    /// Up vector used when building the face's view matrix (standard cubemap
    /// convention: `-Y` for the side faces, `±Z` for the vertical faces).
    fn up(self) -> Vec3 {
        match self {
            CubeFace::PosY => Vec3::Z,
            CubeFace::NegY => Vec3::NEG_Z,
            _ => Vec3::NEG_Y,
        }
    }
}

/// Selects the cube face a direction vector samples from: the axis with the
/// largest magnitude wins, sign picks the face. Ties resolve X over Y over Z,
/// matching the order faces are written.
pub fn cube_face_for_direction(dir: Vec3) -> CubeFace {
    let ax = dir.x.abs();
    let ay = dir.y.abs();
    let az = dir.z.abs();

    if ax >= ay && ax >= az {
        if dir.x >= 0.0 { CubeFace::PosX } else { CubeFace::NegX }
    } else if ay >= az {
        if dir.y >= 0.0 { CubeFace::PosY } else { CubeFace::NegY }
    } else if dir.z >= 0.0 {
        CubeFace::PosZ
    } else {
        CubeFace::NegZ
    }
}

/// Light space for a point light: one view matrix per cube face plus a shared
/// 90° perspective projection, so the six frusta exactly tile the sphere.
#[derive(Debug, Copy, Clone)]
pub struct PointLightSpace {
    pub position: Vec3,
    pub proj: Mat4,
    pub views: [Mat4; 6],
    pub far: f32,
}

impl PointLightSpace {
    /// Combined matrix for one face.
    pub fn face_matrix(&self, face: CubeFace) -> Mat4 {
        self.proj * self.views[face as usize]
    }
}

/// Builds the six face transforms for a point light at `position`.
pub fn point_light_faces(position: Vec3, near: f32, far: f32) -> PointLightSpace {
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, near, far);
    let views =
        CubeFace::ALL.map(|face| Mat4::look_at_rh(position, position + face.forward(), face.up()));

    PointLightSpace {
        position,
        proj,
        views,
        far,
    }
}

/// CPU reference of the fragment-stage shadow test.
///
/// `current` is the fragment's depth in the light's space, `stored` the depth
/// target sample along the same ray, `bias` the constant offset suppressing
/// self-shadowing from depth-precision error. Returns `true` when the
/// fragment is in shadow. Monotonic in `current`.
pub fn shadow_compare(current: f32, stored: f32, bias: f32) -> bool {
    current - bias > stored
}

fn fallback_normalize(v: Vec3) -> Vec3 {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO { Vec3::NEG_Y } else { n }
}

/// Any up vector not parallel to the view direction.
fn up_for(dir: Vec3) -> Vec3 {
    if dir.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    /// Projects a world point and returns NDC (x, y in [-1,1], z in [0,1]).
    fn project(matrix: Mat4, point: Vec3) -> Vec3 {
        let clip = matrix * Vec4::from((point, 1.0));
        assert!(clip.w != 0.0);
        (clip / clip.w).truncate()
    }

    // ── focal point lands at the center ──────────────────────────────────

    #[test]
    fn directional_target_projects_to_center() {
        let ls = directional_light_space(
            Vec3::new(-0.3, -1.0, -0.2),
            Vec3::new(1.0, 0.0, -2.0),
            10.0,
            8.0,
            0.1,
            30.0,
        );
        let ndc = project(ls.matrix(), Vec3::new(1.0, 0.0, -2.0));
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn spot_axis_point_projects_to_center() {
        let pos = Vec3::new(2.0, 5.0, 1.0);
        let dir = Vec3::new(0.3, -1.0, 0.1).normalize();
        let ls = spot_light_space(pos, dir, 1.2, 0.5, 40.0);
        let ndc = project(ls.matrix(), pos + dir * 10.0);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }

    #[test]
    fn point_face_axis_projects_to_face_center() {
        let pos = Vec3::new(0.5, 1.5, -0.5);
        let pls = point_light_faces(pos, 0.1, 25.0);
        for face in CubeFace::ALL {
            let ndc = project(pls.face_matrix(face), pos + face.forward() * 5.0);
            assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{face:?}");
            assert!(ndc.z > 0.0 && ndc.z < 1.0, "{face:?}");
        }
    }

    // ── depth range ───────────────────────────────────────────────────────

    #[test]
    fn in_frustum_depths_are_in_unit_interval() {
        let ls = directional_light_space(Vec3::NEG_Y, Vec3::ZERO, 10.0, 5.0, 0.1, 20.0);
        let m = ls.matrix();
        for p in [
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, -3.0),
            Vec3::new(-4.9, 2.0, 4.9),
            Vec3::new(0.0, 8.0, 0.0),
        ] {
            let z = project(m, p).z;
            assert!(z.is_finite());
            assert!((0.0..=1.0).contains(&z), "depth {z} for {p}");
        }
    }

    // ── bias comparison ───────────────────────────────────────────────────

    #[test]
    fn shadow_compare_is_monotonic_around_bias() {
        let stored = 0.5;
        let bias = 0.005;
        assert!(!shadow_compare(stored, stored, bias));
        assert!(!shadow_compare(stored + bias, stored, bias));
        assert!(shadow_compare(stored + bias + 1e-4, stored, bias));
        assert!(shadow_compare(stored + 0.3, stored, bias));
        assert!(!shadow_compare(stored - 0.3, stored, bias));
    }

    // ── cube face selection ───────────────────────────────────────────────

    #[test]
    fn face_selection_matches_face_axes() {
        for face in CubeFace::ALL {
            assert_eq!(cube_face_for_direction(face.forward()), face);
        }
    }

    #[test]
    fn face_selection_uses_largest_magnitude_component() {
        assert_eq!(
            cube_face_for_direction(Vec3::new(0.2, -0.9, 0.3)),
            CubeFace::NegY
        );
        assert_eq!(
            cube_face_for_direction(Vec3::new(-5.0, 4.0, 4.9)),
            CubeFace::NegX
        );
        assert_eq!(
            cube_face_for_direction(Vec3::new(0.1, 0.2, -0.9)),
            CubeFace::NegZ
        );
    }

    #[test]
    fn selected_face_sees_the_direction() {
        // The view matrix of the selected face must place a point along the
        // direction in front of the light (negative view-space z, on-axis
        // within the 90° frustum).
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let pls = point_light_faces(pos, 0.1, 50.0);
        for dir in [
            Vec3::new(0.9, 0.2, -0.1),
            Vec3::new(-0.2, 0.8, 0.3),
            Vec3::new(0.3, -0.4, -0.85),
        ] {
            let face = cube_face_for_direction(dir);
            let view_space = pls.views[face as usize].transform_point3(pos + dir * 10.0);
            assert!(view_space.z < 0.0, "{dir} not in front of {face:?}");
            assert!(view_space.x.abs() <= -view_space.z + 1e-4);
            assert!(view_space.y.abs() <= -view_space.z + 1e-4);
        }
    }

    // ── occluder scenario ─────────────────────────────────────────────────

    #[test]
    fn ground_under_cube_is_shadowed_outside_is_lit() {
        // Directional light straight down over a ground plane at y = 0 with a
        // unit cube sitting on it (top face at y = 1).
        let ls = directional_light_space(Vec3::NEG_Y, Vec3::ZERO, 10.0, 5.0, 0.1, 20.0);
        let m = ls.matrix();
        let bias = 0.005;

        // Under the footprint: the depth target along that ray stores the
        // cube's top face.
        let stored_under = project(m, Vec3::new(0.0, 1.0, 0.0)).z;
        let ground_under = project(m, Vec3::new(0.0, 0.0, 0.0)).z;
        assert!(shadow_compare(ground_under, stored_under, bias));

        // Outside the footprint the ray reaches the ground itself, so the
        // stored and current depths agree and the fragment stays lit.
        let ground_outside = project(m, Vec3::new(3.0, 0.0, 0.0)).z;
        assert!(!shadow_compare(ground_outside, ground_outside, bias));
    }
}
