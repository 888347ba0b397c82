//! Skybox with environment-mapped objects: one mirror, one glass, drawn
//! against a cubemap background.

use anyhow::Result;
use glam::{Mat4, Vec3};

use prism_demos::asset_root;
use prism_engine::assets::{load_cubemap, load_obj_or_cube, CubeTexture};
use prism_engine::camera::FlyCamera;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::input::Key;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{EnvKind, EnvironmentRenderer, RenderCtx, SkyboxRenderer};
use prism_engine::scene::{primitives, Mesh};
use prism_engine::time::FpsCounter;
use prism_engine::wgpu;
use prism_engine::window::{Runtime, RuntimeConfig};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Air-to-glass refraction index ratio.
const GLASS_RATIO: f32 = 1.0 / 1.52;

struct Skybox {
    camera: FlyCamera,
    sky: CubeTexture,
    mirror_mesh: Mesh,
    glass_mesh: Mesh,
    environment: EnvironmentRenderer,
    skybox: SkyboxRenderer,
    fps: FpsCounter,
}

impl Skybox {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let dir = asset_root().join("skybox");
        let faces = ["right", "left", "top", "bottom", "front", "back"]
            .map(|face| dir.join(format!("{face}.jpg")));
        let face_refs = faces.each_ref().map(|p| p.as_path());
        let sky = load_cubemap(ctx.device, ctx.queue, &face_refs);

        let mirror_data = load_obj_or_cube(&asset_root().join("models/suzanne.obj"));
        let mirror_mesh = Mesh::new(ctx.device, &mirror_data, "mirror");
        let glass_mesh = Mesh::new(ctx.device, &primitives::cube(), "glass");

        Ok(Self {
            camera: FlyCamera::new(Vec3::new(0.0, 0.0, 5.0)),
            sky,
            mirror_mesh,
            glass_mesh,
            environment: EnvironmentRenderer::new(ctx),
            skybox: SkyboxRenderer::new(ctx),
            fps: FpsCounter::new(),
        })
    }
}

impl App for Skybox {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time);
        if let Some(fps) = self.fps.tick(ctx.time.dt) {
            log::info!("FPS: {fps}");
        }

        let camera = &self.camera;
        let sky = &self.sky;
        let mirror_mesh = &self.mirror_mesh;
        let glass_mesh = &self.glass_mesh;
        let environment = &mut self.environment;
        let skybox = &mut self.skybox;

        ctx.render(CLEAR, |rctx, target| {
            let proj = camera.projection_matrix(rctx.aspect());
            let view = camera.view_matrix();
            let view_proj = proj * view;

            environment.draw(
                rctx,
                target,
                EnvKind::Reflect,
                mirror_mesh,
                Mat4::from_translation(Vec3::new(-1.5, 0.0, 0.0)),
                view_proj,
                camera.position,
                sky,
                GLASS_RATIO,
            );
            environment.draw(
                rctx,
                target,
                EnvKind::Refract,
                glass_mesh,
                Mat4::from_translation(Vec3::new(1.5, 0.0, 0.0)),
                view_proj,
                camera.position,
                sky,
                GLASS_RATIO,
            );

            // Last: fills only the pixels the objects left untouched.
            skybox.draw(rctx, target, proj, view, sky);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "prism: skybox".to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), Skybox::new)
}
