//! Two-pass 2D shadow mapping: a directional light over a ground plane with
//! floating cubes. The depth pass renders the scene from the light, then the
//! lit pass samples the map with a constant bias.

use anyhow::Result;
use glam::{Mat4, Quat, Vec3};

use prism_demos::texture_or_checkerboard;
use prism_engine::assets::Texture2d;
use prism_engine::camera::FlyCamera;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::input::Key;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::shadow::{directional_light_space, ShadowMapPass};
use prism_engine::render::{ForwardParams, ForwardRenderer, RenderCtx, ShadowParams};
use prism_engine::scene::{primitives, DirectionalLight, Mesh, Scene};
use prism_engine::time::FpsCounter;
use prism_engine::wgpu;
use prism_engine::window::{Runtime, RuntimeConfig};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.06,
    b: 0.08,
    a: 1.0,
};

const SHADOW_BIAS: f32 = 0.005;

struct ShadowMap {
    camera: FlyCamera,
    scene: Scene,
    dir_light: DirectionalLight,
    shadow: ShadowMapPass,
    forward: ForwardRenderer,
    fps: FpsCounter,
}

impl ShadowMap {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let cube = Mesh::new(ctx.device, &primitives::cube(), "cube");
        let ground = Mesh::new(ctx.device, &primitives::plane(12.5, 6.0), "ground");

        let crate_tex = texture_or_checkerboard(ctx, "container.jpg");
        let ground_tex = Texture2d::checkerboard(ctx.device, ctx.queue, 256, 10);

        let mut scene = Scene::new();
        scene.push(ground, ground_tex, Mat4::IDENTITY);
        scene.push(
            cube.clone(),
            crate_tex.clone(),
            Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0)),
        );
        scene.push(
            cube.clone(),
            crate_tex.clone(),
            Mat4::from_translation(Vec3::new(2.0, 0.5, 1.0)),
        );
        scene.push(
            cube,
            crate_tex,
            Mat4::from_translation(Vec3::new(-1.0, 0.5, 2.0)),
        );

        let dir_light = DirectionalLight {
            // Light sits up and to the side, like a low sun.
            direction: Vec3::new(2.0, -4.0, 1.0).normalize(),
            ..DirectionalLight::default()
        };

        let shadow = ShadowMapPass::new(ctx, ShadowMapPass::DEFAULT_SIZE);
        let mut forward = ForwardRenderer::new(ctx);
        forward.set_shadow_inputs(ctx, Some(shadow.sampled_view()), None);

        Ok(Self {
            camera: FlyCamera::new(Vec3::new(0.0, 2.0, 7.0)),
            scene,
            dir_light,
            shadow,
            forward,
            fps: FpsCounter::new(),
        })
    }
}

impl App for ShadowMap {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time);
        if let Some(fps) = self.fps.tick(ctx.time.dt) {
            log::info!("FPS: {fps}");
        }

        // The topmost cube spins so the shadowed region visibly changes.
        let angle = ctx.time.elapsed * 0.6;
        self.scene.objects[1].model = Mat4::from_rotation_translation(
            Quat::from_rotation_y(angle),
            Vec3::new(0.0, 1.5, 0.0),
        );

        let light_space = directional_light_space(
            self.dir_light.direction,
            Vec3::ZERO,
            6.0,
            10.0,
            0.1,
            20.0,
        );

        let camera = &self.camera;
        let scene = &self.scene;
        let dir_light = &self.dir_light;
        let shadow = &mut self.shadow;
        let forward = &mut self.forward;

        ctx.render(CLEAR, |rctx, target| {
            shadow.run(rctx, target.encoder, &light_space, scene);

            forward.draw(
                rctx,
                target,
                &ForwardParams {
                    view_proj: camera.view_projection(rctx.aspect()),
                    camera_pos: camera.position,
                    dir_light: Some(dir_light),
                    shadow: Some(ShadowParams {
                        light_space: light_space.matrix(),
                        bias: SHADOW_BIAS,
                    }),
                    ..Default::default()
                },
                scene,
            );
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "prism: shadow map".to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), ShadowMap::new)
}
