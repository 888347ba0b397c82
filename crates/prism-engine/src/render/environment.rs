use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::assets::CubeTexture;
use crate::scene::{Mesh, Vertex};

use super::common::{depth_state, load_pass, uniform_binding};
use super::{RenderCtx, RenderTarget};

/// How an environment-mapped surface looks up the cubemap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EnvKind {
    /// Mirror: reflect the view ray about the normal.
    Reflect,
    /// Glass: refract the view ray through the surface.
    Refract,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct EnvUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    params: [f32; 4],
}

/// Draws meshes whose surface samples the skybox cubemap (mirror/glass).
///
/// Each kind owns a fixed uniform buffer: buffered queue writes all land
/// before any pass executes, so reusing one buffer for both kinds within a
/// frame would make the earlier draw read the later data. One draw per kind
/// per frame.
pub struct EnvironmentRenderer {
    pipeline: wgpu::RenderPipeline,
    reflect_ubo: wgpu::Buffer,
    reflect_bind_group: wgpu::BindGroup,
    refract_ubo: wgpu::Buffer,
    refract_bind_group: wgpu::BindGroup,
    cube_layout: wgpu::BindGroupLayout,
    cube_bind_groups: HashMap<u64, wgpu::BindGroup>,
}

impl EnvironmentRenderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let size = std::mem::size_of::<EnvUniform>() as u64;
        let (reflect_ubo, env_layout, reflect_bind_group) = uniform_binding(
            ctx.device,
            size,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            "prism env reflect ubo",
        );
        let refract_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism env refract ubo"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let refract_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism env refract ubo"),
            layout: &env_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: refract_ubo.as_entire_binding(),
            }],
        });

        let cube_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("prism env cubemap layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::Cube,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("prism env shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/environment.wgsl").into()),
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism env pipeline layout"),
                bind_group_layouts: &[&env_layout, &cube_layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism env pipeline"),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        Self {
            pipeline,
            reflect_ubo,
            reflect_bind_group,
            refract_ubo,
            refract_bind_group,
            cube_layout,
            cube_bind_groups: HashMap::new(),
        }
    }

    /// Draws one mesh with its surface sampling `sky`. `ratio` is the
    /// refraction index ratio (for example `1.0 / 1.52` for air into glass);
    /// it is ignored for [`EnvKind::Reflect`].
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        kind: EnvKind,
        mesh: &Mesh,
        model: Mat4,
        view_proj: Mat4,
        camera_pos: Vec3,
        sky: &CubeTexture,
        ratio: f32,
    ) {
        let (ubo, env_bind_group) = match kind {
            EnvKind::Reflect => (&self.reflect_ubo, &self.reflect_bind_group),
            EnvKind::Refract => (&self.refract_ubo, &self.refract_bind_group),
        };

        let uniform = EnvUniform {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            camera_pos: [camera_pos.x, camera_pos.y, camera_pos.z, 1.0],
            params: [
                ratio,
                if kind == EnvKind::Refract { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));

        let cube_bind_group = self
            .cube_bind_groups
            .entry(sky.id)
            .or_insert_with(|| {
                ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("prism env cubemap bind group"),
                    layout: &self.cube_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&sky.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sky.sampler),
                        },
                    ],
                })
            })
            .clone();

        let mut rpass = load_pass(target, "prism env pass");
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, env_bind_group, &[]);
        rpass.set_bind_group(1, &cube_bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
        rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
