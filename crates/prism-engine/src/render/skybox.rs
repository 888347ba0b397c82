use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};

use crate::assets::CubeTexture;
use crate::scene::{primitives, Mesh, Vertex};

use super::common::{depth_state, load_pass, uniform_binding};
use super::{RenderCtx, RenderTarget};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SkyUniform {
    proj: [[f32; 4]; 4],
    view_rot: [[f32; 4]; 4],
}

/// Cubemap background pass.
///
/// Draws a unit cube at maximum depth with `LessEqual` compare and no depth
/// write, so it fills exactly the pixels the scene left untouched. Draw it
/// after the opaque passes; early depth testing then skips covered pixels.
pub struct SkyboxRenderer {
    cube: Mesh,
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    sky_bind_group: wgpu::BindGroup,
    cube_layout: wgpu::BindGroupLayout,
    cube_bind_groups: HashMap<u64, wgpu::BindGroup>,
}

impl SkyboxRenderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let cube = Mesh::new(ctx.device, &primitives::cube(), "prism skybox cube");

        let (ubo, sky_layout, sky_bind_group) = uniform_binding(
            ctx.device,
            std::mem::size_of::<SkyUniform>() as u64,
            wgpu::ShaderStages::VERTEX,
            "prism skybox ubo",
        );

        let cube_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("prism skybox cubemap layout"),
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
                label: Some("prism skybox shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism skybox pipeline layout"),
                bind_group_layouts: &[&sky_layout, &cube_layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism skybox pipeline"),
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
                    // The camera sits inside the cube.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(depth_state(false, wgpu::CompareFunction::LessEqual)),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        Self {
            cube,
            pipeline,
            ubo,
            sky_bind_group,
            cube_layout,
            cube_bind_groups: HashMap::new(),
        }
    }

    /// Draws the skybox. `view` is the camera's full view matrix; only its
    /// rotation is used.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        proj: Mat4,
        view: Mat4,
        sky: &CubeTexture,
    ) {
        let uniform = SkyUniform {
            proj: proj.to_cols_array_2d(),
            view_rot: Mat4::from_mat3(Mat3::from_mat4(view)).to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&self.ubo, 0, bytemuck::bytes_of(&uniform));

        let cube_bind_group = self
            .cube_bind_groups
            .entry(sky.id)
            .or_insert_with(|| {
                ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("prism skybox cubemap bind group"),
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

        let mut rpass = load_pass(target, "prism skybox pass");
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.sky_bind_group, &[]);
        rpass.set_bind_group(1, &cube_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.cube.vertex_buf.slice(..));
        rpass.set_index_buffer(self.cube.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.cube.index_count, 0, 0..1);
    }
}
