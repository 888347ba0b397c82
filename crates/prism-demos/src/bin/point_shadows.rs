//! Omnidirectional shadow mapping: a closed room lit by a moving point light
//! in its middle. Six depth passes fill a cubemap, then the lit pass compares
//! light-to-fragment distances against it.

use anyhow::Result;
use glam::{Mat4, Quat, Vec3, Vec4};

use prism_demos::texture_or_checkerboard;
use prism_engine::assets::Texture2d;
use prism_engine::camera::FlyCamera;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::input::Key;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::shadow::{point_light_faces, PointShadowPass};
use prism_engine::render::{
    ForwardParams, ForwardRenderer, PointShadowParams, RenderCtx, UnlitRenderer,
};
use prism_engine::scene::{primitives, Mesh, PointLight, Scene};
use prism_engine::time::FpsCounter;
use prism_engine::wgpu;
use prism_engine::window::{Runtime, RuntimeConfig};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Far plane of the light's shadow frustum; the room fits well inside.
const SHADOW_FAR: f32 = 25.0;
const SHADOW_BIAS: f32 = 0.005;
const ROOM_HALF: f32 = 5.0;

fn light_position(elapsed: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, (elapsed * 0.5).sin() * 3.0)
}

/// Builds the room from six inward-facing planes so back-face culling works
/// from the inside.
fn push_room(scene: &mut Scene, wall: &Mesh, texture: &Texture2d) {
    use std::f32::consts::FRAC_PI_2 as Q;
    use std::f32::consts::PI;

    let walls = [
        (Quat::IDENTITY, Vec3::new(0.0, -ROOM_HALF, 0.0)), // floor
        (Quat::from_rotation_x(PI), Vec3::new(0.0, ROOM_HALF, 0.0)), // ceiling
        (Quat::from_rotation_z(-Q), Vec3::new(-ROOM_HALF, 0.0, 0.0)),
        (Quat::from_rotation_z(Q), Vec3::new(ROOM_HALF, 0.0, 0.0)),
        (Quat::from_rotation_x(Q), Vec3::new(0.0, 0.0, -ROOM_HALF)),
        (Quat::from_rotation_x(-Q), Vec3::new(0.0, 0.0, ROOM_HALF)),
    ];

    for (rotation, translation) in walls {
        scene.push(
            wall.clone(),
            texture.clone(),
            Mat4::from_rotation_translation(rotation, translation),
        );
    }
}

struct PointShadows {
    camera: FlyCamera,
    scene: Scene,
    light: PointLight,
    marker_mesh: Mesh,
    white: Texture2d,
    point_shadow: PointShadowPass,
    forward: ForwardRenderer,
    unlit: UnlitRenderer,
    fps: FpsCounter,
}

impl PointShadows {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let cube = Mesh::new(ctx.device, &primitives::cube(), "cube");
        let wall = Mesh::new(
            ctx.device,
            &primitives::plane(ROOM_HALF, 2.0),
            "room wall",
        );

        let crate_tex = texture_or_checkerboard(ctx, "container.jpg");
        let wall_tex = Texture2d::checkerboard(ctx.device, ctx.queue, 256, 4);
        let white = Texture2d::white(ctx.device, ctx.queue);

        let mut scene = Scene::new();
        push_room(&mut scene, &wall, &wall_tex);

        let boxes = [
            (Vec3::new(4.0, -3.5, 0.0), 0.5, 0.0),
            (Vec3::new(2.0, 3.0, 1.0), 0.75, 0.0),
            (Vec3::new(-3.0, -1.0, 0.0), 0.5, 0.0),
            (Vec3::new(-1.5, 1.0, 1.5), 0.5, 0.0),
            (Vec3::new(-1.5, -3.5, -3.0), 0.75, 1.1),
        ];
        for (position, scale, angle) in boxes {
            scene.push(
                cube.clone(),
                crate_tex.clone(),
                Mat4::from_scale_rotation_translation(
                    Vec3::splat(scale),
                    Quat::from_axis_angle(Vec3::ONE.normalize(), angle),
                    position,
                ),
            );
        }

        let light = PointLight {
            position: light_position(0.0),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.7),
            specular: Vec3::ONE,
            ..PointLight::default()
        };

        let point_shadow = PointShadowPass::new(ctx, PointShadowPass::DEFAULT_SIZE);
        let mut forward = ForwardRenderer::new(ctx);
        forward.set_shadow_inputs(ctx, None, Some(point_shadow.sampled_view()));

        Ok(Self {
            camera: FlyCamera::new(Vec3::new(0.0, 0.0, 3.0)),
            scene,
            light,
            marker_mesh: cube,
            white,
            point_shadow,
            forward,
            unlit: UnlitRenderer::new(ctx),
            fps: FpsCounter::new(),
        })
    }
}

impl App for PointShadows {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time);
        if let Some(fps) = self.fps.tick(ctx.time.dt) {
            log::info!("FPS: {fps}");
        }

        self.light.position = light_position(ctx.time.elapsed);
        let faces = point_light_faces(self.light.position, 0.1, SHADOW_FAR);

        let marker = [(
            Mat4::from_scale_rotation_translation(
                Vec3::splat(0.1),
                Quat::IDENTITY,
                self.light.position,
            ),
            Vec4::ONE,
        )];

        let camera = &self.camera;
        let scene = &self.scene;
        let light = &self.light;
        let marker_mesh = &self.marker_mesh;
        let white = &self.white;
        let point_shadow = &mut self.point_shadow;
        let forward = &mut self.forward;
        let unlit = &mut self.unlit;

        ctx.render(CLEAR, |rctx, target| {
            point_shadow.run(rctx, target.encoder, &faces, scene);

            let view_proj = camera.view_projection(rctx.aspect());
            forward.draw(
                rctx,
                target,
                &ForwardParams {
                    view_proj,
                    camera_pos: camera.position,
                    point_lights: std::slice::from_ref(light),
                    point_shadow: Some(PointShadowParams {
                        light_pos: light.position,
                        far: SHADOW_FAR,
                        bias: SHADOW_BIAS,
                    }),
                    ..Default::default()
                },
                scene,
            );

            unlit.draw_markers(rctx, target, view_proj, marker_mesh, white, &marker);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "prism: point shadows".to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), PointShadows::new)
}
