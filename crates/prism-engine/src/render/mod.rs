//! GPU rendering subsystem.
//!
//! Renderers consume the demo's `Scene` and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines,
//! buffers, bind-group caches) and is created explicitly during setup;
//! nothing initializes lazily on first use.
//!
//! Convention:
//! - world space is right-handed, `+Y` up
//! - clip space is the wgpu convention (depth `0..1`)
//! - per-object model matrices travel in an instance vertex buffer

mod common;
mod ctx;
mod environment;
mod forward;
pub mod shadow;
mod skybox;
mod unlit;

pub use ctx::{RenderCtx, RenderTarget};
pub use environment::{EnvKind, EnvironmentRenderer};
pub use forward::{ForwardParams, ForwardRenderer, ShadowParams, PointShadowParams, MAX_POINT_LIGHTS};
pub use skybox::SkyboxRenderer;
pub use unlit::UnlitRenderer;
