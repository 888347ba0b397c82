use glam::{Mat4, Vec3};

use crate::input::{InputFrame, InputState, Key};
use crate::time::FrameTime;

const PITCH_LIMIT: f32 = 89.0_f32 * (std::f32::consts::PI / 180.0);
const FOV_MIN: f32 = 1.0_f32 * (std::f32::consts::PI / 180.0);
const FOV_MAX: f32 = 45.0_f32 * (std::f32::consts::PI / 180.0);

/// Free-flying perspective camera (yaw/pitch mouselook + WASD translation).
///
/// Angles are in radians. The default orientation looks down `-Z` with `+Y` up.
/// Scroll-wheel input narrows/widens the vertical field of view ("zoom").
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,

    /// Vertical field of view, radians. Clamped to `[1°, 45°]` like the
    /// scroll-zoom it is driven by.
    pub fov_y: f32,

    pub z_near: f32,
    pub z_far: f32,

    /// Translation speed in world units per second.
    pub speed: f32,

    /// Mouselook sensitivity in radians per device unit.
    pub sensitivity: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: -std::f32::consts::FRAC_PI_2, // face -Z
            pitch: 0.0,
            fov_y: FOV_MAX,
            z_near: 0.1,
            z_far: 100.0,
            speed: 2.5,
            sensitivity: 0.0025,
        }
    }

    /// Unit view direction derived from yaw/pitch.
    pub fn front(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    /// Perspective projection with 0..1 depth as produced by
    /// `glam::Mat4::perspective_rh` (wgpu clip-space convention).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(0.01), self.z_near, self.z_far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Applies one frame of input: mouselook from the pointer delta, zoom from
    /// the wheel, translation from held keys scaled by `dt`.
    pub fn update(&mut self, state: &InputState, frame: &InputFrame, time: FrameTime) {
        let (dx, dy) = frame.pointer_delta;
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.fov_y = (self.fov_y - frame.wheel * 0.05).clamp(FOV_MIN, FOV_MAX);

        let mut movement = Vec3::ZERO;
        let front = self.front();
        let right = self.right();

        if state.key_down(Key::W) {
            movement += front;
        }
        if state.key_down(Key::S) {
            movement -= front;
        }
        if state.key_down(Key::A) {
            movement -= right;
        }
        if state.key_down(Key::D) {
            movement += right;
        }
        if state.key_down(Key::Space) || state.key_down(Key::E) {
            movement += Vec3::Y;
        }
        if state.key_down(Key::Shift) || state.key_down(Key::Q) {
            movement -= Vec3::Y;
        }

        if movement != Vec3::ZERO {
            self.position += movement.normalize() * self.speed * time.dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(dt: f32) -> FrameTime {
        FrameTime {
            dt,
            elapsed: 0.0,
            frame_index: 0,
        }
    }

    #[test]
    fn default_orientation_faces_negative_z() {
        let cam = FlyCamera::new(Vec3::ZERO);
        let front = cam.front();
        assert!((front - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        let state = InputState::default();
        let mut frame = InputFrame::default();
        frame.pointer_delta = (0.0, -1.0e6);

        cam.update(&state, &frame, time(0.016));
        assert!(cam.pitch <= PITCH_LIMIT + 1e-6);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        let state = InputState::default();
        let mut frame = InputFrame::default();
        frame.wheel = 1.0e6;

        cam.update(&state, &frame, time(0.016));
        assert!(cam.fov_y >= FOV_MIN - 1e-6);

        frame.wheel = -1.0e6;
        cam.update(&state, &frame, time(0.016));
        assert!(cam.fov_y <= FOV_MAX + 1e-6);
    }

    #[test]
    fn forward_key_moves_along_front() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        let mut state = InputState::default();
        state.keys_down.insert(Key::W);
        let frame = InputFrame::default();

        cam.update(&state, &frame, time(1.0));
        let expected = Vec3::NEG_Z * cam.speed;
        assert!((cam.position - expected).length() < 1e-4);
    }

    #[test]
    fn view_matrix_transforms_look_target_onto_negative_z_axis() {
        let cam = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        let target = cam.position + cam.front();
        let v = cam.view_matrix().transform_point3(target);
        assert!(v.x.abs() < 1e-5 && v.y.abs() < 1e-5);
        assert!((v.z + 1.0).abs() < 1e-5);
    }
}
