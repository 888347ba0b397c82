//! Blinn-Phong lit scene: ground plane and cubes under a directional light,
//! four colored point lights (visualized as small tinted cubes) and a spot
//! light attached to the camera.

use anyhow::Result;
use glam::{Mat4, Vec3, Vec4};

use prism_demos::texture_or_checkerboard;
use prism_engine::assets::Texture2d;
use prism_engine::camera::FlyCamera;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::input::Key;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{ForwardParams, ForwardRenderer, RenderCtx, UnlitRenderer};
use prism_engine::scene::{primitives, DirectionalLight, Mesh, PointLight, Scene, SpotLight};
use prism_engine::time::FpsCounter;
use prism_engine::wgpu;
use prism_engine::window::{Runtime, RuntimeConfig};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.03,
    b: 0.05,
    a: 1.0,
};

fn point_lights() -> [PointLight; 4] {
    let colored = |position: Vec3, diffuse: Vec3| PointLight {
        position,
        diffuse,
        ..PointLight::default()
    };

    [
        colored(Vec3::new(2.0, 1.5, 2.0), Vec3::new(0.8, 0.2, 0.2)),
        colored(Vec3::new(-2.0, 2.5, -2.0), Vec3::new(0.2, 0.8, 0.2)),
        colored(Vec3::new(3.0, 1.0, -3.0), Vec3::new(0.2, 0.3, 0.9)),
        colored(Vec3::new(-3.0, 1.2, 3.0), Vec3::new(0.8, 0.8, 0.8)),
    ]
}

struct LitScene {
    camera: FlyCamera,
    scene: Scene,
    dir_light: DirectionalLight,
    point_lights: [PointLight; 4],
    marker_mesh: Mesh,
    white: Texture2d,
    forward: ForwardRenderer,
    unlit: UnlitRenderer,
    fps: FpsCounter,
}

impl LitScene {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let cube = Mesh::new(ctx.device, &primitives::cube(), "cube");
        let ground = Mesh::new(ctx.device, &primitives::plane(10.0, 5.0), "ground");

        let crate_tex = texture_or_checkerboard(ctx, "container.jpg");
        let ground_tex = Texture2d::checkerboard(ctx.device, ctx.queue, 256, 8);
        let white = Texture2d::white(ctx.device, ctx.queue);

        let mut scene = Scene::new();
        scene.push(ground, ground_tex, Mat4::IDENTITY);
        for position in [
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(2.0, 0.5, -3.0),
            Vec3::new(-2.5, 0.5, -1.5),
            Vec3::new(1.5, 0.5, 2.0),
            Vec3::new(-1.0, 0.5, 3.5),
        ] {
            scene.push(cube.clone(), crate_tex.clone(), Mat4::from_translation(position));
        }

        Ok(Self {
            camera: FlyCamera::new(Vec3::new(0.0, 1.5, 6.0)),
            scene,
            dir_light: DirectionalLight::default(),
            point_lights: point_lights(),
            marker_mesh: cube,
            white,
            forward: ForwardRenderer::new(ctx),
            unlit: UnlitRenderer::new(ctx),
            fps: FpsCounter::new(),
        })
    }
}

impl App for LitScene {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time);
        if let Some(fps) = self.fps.tick(ctx.time.dt) {
            log::info!("FPS: {fps}");
        }

        let spot = SpotLight::new(self.camera.position, self.camera.front(), 12.5, 15.0);

        let markers: Vec<(Mat4, Vec4)> = self
            .point_lights
            .iter()
            .map(|light| {
                (
                    Mat4::from_scale_rotation_translation(
                        Vec3::splat(0.2),
                        glam::Quat::IDENTITY,
                        light.position,
                    ),
                    Vec4::from((light.diffuse, 1.0)),
                )
            })
            .collect();

        let camera = &self.camera;
        let scene = &self.scene;
        let dir_light = &self.dir_light;
        let point_lights = &self.point_lights;
        let marker_mesh = &self.marker_mesh;
        let white = &self.white;
        let forward = &mut self.forward;
        let unlit = &mut self.unlit;

        ctx.render(CLEAR, |rctx, target| {
            let view_proj = camera.view_projection(rctx.aspect());

            forward.draw(
                rctx,
                target,
                &ForwardParams {
                    view_proj,
                    camera_pos: camera.position,
                    dir_light: Some(dir_light),
                    point_lights,
                    spot_light: Some(&spot),
                    ..Default::default()
                },
                scene,
            );

            unlit.draw_markers(rctx, target, view_proj, marker_mesh, white, &markers);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "prism: lit scene".to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), LitScene::new)
}
