//! Prism engine crate.
//!
//! This crate owns the platform + GPU runtime pieces shared by the demo
//! binaries: window loop, device/surface management, input, frame timing,
//! camera, asset loading, scene types and the renderers (including the
//! two-pass shadow-mapping pipeline).

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod assets;
pub mod scene;
pub mod render;

// Demos pass `wgpu::Color` and friends without pinning their own wgpu.
pub use wgpu;
