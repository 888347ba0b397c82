//! Two-pass shadow mapping.
//!
//! The scene is rendered once from the light's point of view into a
//! screen-independent depth target, then the main pass samples that target to
//! attenuate lighting. Two variants:
//!
//! - [`ShadowMapPass`]: a single 2D depth map for directional/spot lights,
//!   sampled by projecting fragments through the light-space matrix.
//! - [`PointShadowPass`]: a depth cubemap for point lights, written in six
//!   per-face passes and sampled by direction, comparing light-to-fragment
//!   distance against the stored value scaled by the far plane.
//!
//! The depth targets are created once at setup and fully rewritten by every
//! pass invocation before the main pass samples them; there is no double
//! buffering and no partial-write hazard within a frame.

pub mod light_space;
mod map;
mod point;

pub use light_space::{
    cube_face_for_direction, directional_light_space, point_light_faces, shadow_compare,
    spot_light_space, CubeFace, LightSpace, PointLightSpace,
};
pub use map::ShadowMapPass;
pub use point::PointShadowPass;
