//! Scene types.
//!
//! Responsibilities:
//! - GPU mesh + CPU mesh data (`Vertex`, `MeshData`, `Mesh`)
//! - shared primitive builders (cube, plane) constructed once and reused
//! - the flat per-demo object list consumed by every pass (no hierarchy)
//! - light descriptions

pub mod lights;
mod mesh;
mod object;
pub mod primitives;

pub use lights::{DirectionalLight, PointLight, SpotLight};
pub use mesh::{Mesh, MeshData, Vertex};
pub use object::{Scene, SceneObject};
