//! Ten textured cubes slowly rotating around a shared axis, fly camera.

use anyhow::Result;
use glam::{Mat4, Quat, Vec3};

use prism_demos::texture_or_checkerboard;
use prism_engine::camera::FlyCamera;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::input::Key;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{RenderCtx, UnlitRenderer};
use prism_engine::scene::{primitives, Mesh, Scene};
use prism_engine::time::FpsCounter;
use prism_engine::wgpu;
use prism_engine::window::{Runtime, RuntimeConfig};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.06,
    g: 0.07,
    b: 0.09,
    a: 1.0,
};

const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

fn cube_model(index: usize, elapsed: f32) -> Mat4 {
    let angle = (20.0 * index as f32).to_radians() + elapsed * 0.5;
    let axis = Vec3::new(1.0, 0.3, 0.5).normalize();
    Mat4::from_rotation_translation(
        Quat::from_axis_angle(axis, angle),
        CUBE_POSITIONS[index],
    )
}

struct TexturedCubes {
    camera: FlyCamera,
    scene: Scene,
    unlit: UnlitRenderer,
    fps: FpsCounter,
}

impl TexturedCubes {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let cube = Mesh::new(ctx.device, &primitives::cube(), "cube");
        let crate_tex = texture_or_checkerboard(ctx, "container.jpg");

        let mut scene = Scene::new();
        for i in 0..CUBE_POSITIONS.len() {
            scene.push(cube.clone(), crate_tex.clone(), cube_model(i, 0.0));
        }

        Ok(Self {
            camera: FlyCamera::new(Vec3::new(0.0, 0.0, 3.0)),
            scene,
            unlit: UnlitRenderer::new(ctx),
            fps: FpsCounter::new(),
        })
    }
}

impl App for TexturedCubes {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time);
        if let Some(fps) = self.fps.tick(ctx.time.dt) {
            log::info!("FPS: {fps}");
        }

        let elapsed = ctx.time.elapsed;
        for (i, obj) in self.scene.objects.iter_mut().enumerate() {
            obj.model = cube_model(i, elapsed);
        }

        let camera = &self.camera;
        let scene = &self.scene;
        let unlit = &mut self.unlit;

        ctx.render(CLEAR, |rctx, target| {
            let view_proj = camera.view_projection(rctx.aspect());
            unlit.draw(rctx, target, view_proj, scene);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "prism: textured cubes".to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), TexturedCubes::new)
}
