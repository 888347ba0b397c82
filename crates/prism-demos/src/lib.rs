//! Shared helpers for the demo binaries.

use std::path::{Path, PathBuf};

use prism_engine::assets::Texture2d;
use prism_engine::render::RenderCtx;

/// Root of the demo asset directory.
///
/// Assets are optional: every loader in the engine substitutes a built-in
/// resource when a file is missing, so the demos run from a clean checkout.
pub fn asset_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Loads a demo texture, substituting a checkerboard when the file is absent.
pub fn texture_or_checkerboard(ctx: &RenderCtx<'_>, name: &str) -> Texture2d {
    match prism_engine::assets::load_texture(ctx.device, ctx.queue, &asset_root().join(name)) {
        Ok(t) => t,
        Err(err) => {
            log::error!("{err:#}; using checkerboard");
            Texture2d::checkerboard(ctx.device, ctx.queue, 256, 8)
        }
    }
}
