//! Light descriptions.
//!
//! CPU-side structs consumed by the forward renderer (which packs them into
//! its frame uniform) and by the shadow passes (which derive light-space
//! transforms from them).

use glam::Vec3;

/// Directional light ("sun"): direction only, no position or attenuation.
#[derive(Debug, Copy, Clone)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.75),
            specular: Vec3::splat(0.7),
        }
    }
}

/// Point light with quadratic distance attenuation.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Attenuation factor at `distance` world units.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.6),
            specular: Vec3::ONE,
            constant: 1.0,
            linear: 0.045,
            quadratic: 0.0075,
        }
    }
}

/// Spot light; cutoffs are stored as cosines so the fragment stage compares
/// them against a dot product directly.
#[derive(Debug, Copy, Clone)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub cos_inner: f32,
    pub cos_outer: f32,
}

impl SpotLight {
    pub fn new(position: Vec3, direction: Vec3, inner_deg: f32, outer_deg: f32) -> Self {
        Self {
            position,
            direction,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            cos_inner: inner_deg.to_radians().cos(),
            cos_outer: outer_deg.to_radians().cos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_attenuation_decreases_with_distance() {
        let light = PointLight::default();
        assert!(light.attenuation(1.0) > light.attenuation(10.0));
        assert!(light.attenuation(10.0) > light.attenuation(50.0));
    }

    #[test]
    fn spot_cutoff_cosines_are_ordered() {
        let spot = SpotLight::new(Vec3::ZERO, Vec3::NEG_Z, 12.5, 15.0);
        // Narrower angle means larger cosine.
        assert!(spot.cos_inner > spot.cos_outer);
    }
}
