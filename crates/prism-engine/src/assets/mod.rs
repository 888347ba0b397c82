//! Asset loading.
//!
//! Image decoding uses the `image` crate; OBJ models use `tobj`. Load
//! failures are not fatal: the `*_or_fallback` helpers log the error and
//! substitute a built-in resource so the demo keeps rendering.

mod model;
mod texture;

pub use model::{load_obj, load_obj_or_cube};
pub use texture::{
    load_cubemap, load_texture, load_texture_or_fallback, CubeTexture, Texture2d,
};
