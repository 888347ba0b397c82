use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::device::DEPTH_FORMAT;
use crate::scene::{Scene, Vertex};

use super::super::common::{depth_state, InstanceBuffer, ModelInstance};
use super::super::RenderCtx;
use super::{CubeFace, PointLightSpace};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FaceUniform {
    view_proj: [[f32; 4]; 4],
    // xyz = light position, w = far plane
    light_pos_far: [f32; 4],
}

/// Omnidirectional depth (shadow) pass for point lights.
///
/// Renders the scene six times, once per cubemap face, into the layers of a
/// depth cubemap. The fragment stage overrides the hardware depth with the
/// linear light-to-fragment distance normalized by the far plane, so the main
/// pass can compare plain distances instead of reconstructing projected depth
/// per face.
pub struct PointShadowPass {
    size: u32,
    far: f32,
    cube_view: wgpu::TextureView,
    face_views: [wgpu::TextureView; 6],
    pipeline: wgpu::RenderPipeline,
    face_ubos: [wgpu::Buffer; 6],
    face_bind_groups: [wgpu::BindGroup; 6],
    instances: InstanceBuffer,
}

impl PointShadowPass {
    pub const DEFAULT_SIZE: u32 = 1024;

    pub fn new(ctx: &RenderCtx<'_>, size: u32) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("prism point shadow cubemap"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("prism point shadow cube view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let face_views = CubeFace::ALL.map(|face| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("prism point shadow face view"),
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: face as u32,
                array_layer_count: Some(1),
                ..Default::default()
            })
        });

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("prism point shadow face layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<FaceUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        // One uniform buffer per face: all six passes are encoded before the
        // queue flushes buffered writes, so they cannot share one buffer.
        let face_ubos = CubeFace::ALL.map(|_| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("prism point shadow face ubo"),
                size: std::mem::size_of::<FaceUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let face_bind_groups = [0, 1, 2, 3, 4, 5].map(|i| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("prism point shadow face bind group"),
                layout: &bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: face_ubos[i].as_entire_binding(),
                }],
            })
        });

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("prism point shadow shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../shaders/point_shadow_depth.wgsl").into(),
                ),
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism point shadow pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism point shadow pipeline"),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout(), ModelInstance::layout()],
                },

                // The fragment stage only exists to write frag_depth; there
                // are no color targets.
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Front),
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
            size,
            far: 0.0,
            cube_view,
            face_views,
            pipeline,
            face_ubos,
            face_bind_groups,
            instances: InstanceBuffer::new("prism point shadow instances"),
        }
    }

    /// Cubemap face resolution (square).
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Far plane used by the last `run`, for the main pass's distance compare.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Cube view of the depth target for sampling in the main pass.
    pub fn sampled_view(&self) -> &wgpu::TextureView {
        &self.cube_view
    }

    /// Renders the scene's distance-to-light into all six cubemap faces.
    pub fn run(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        light: &PointLightSpace,
        scene: &Scene,
    ) {
        self.far = light.far;

        let instance_data: Vec<ModelInstance> = scene
            .iter()
            .map(|obj| ModelInstance::new(obj.model, Vec4::ONE))
            .collect();

        let instance_buf = self.instances.upload(ctx, &instance_data).cloned();

        for face in CubeFace::ALL {
            let i = face as usize;

            let uniform = FaceUniform {
                view_proj: light.face_matrix(face).to_cols_array_2d(),
                light_pos_far: [
                    light.position.x,
                    light.position.y,
                    light.position.z,
                    light.far,
                ],
            };
            ctx.queue
                .write_buffer(&self.face_ubos[i], 0, bytemuck::bytes_of(&uniform));

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism point shadow face pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.face_views[i],
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let Some(instance_buf) = instance_buf.as_ref() else {
                continue;
            };

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.face_bind_groups[i], &[]);
            rpass.set_vertex_buffer(1, instance_buf.slice(..));

            for (obj_index, obj) in scene.iter().enumerate() {
                rpass.set_vertex_buffer(0, obj.mesh.vertex_buf.slice(..));
                rpass.set_index_buffer(obj.mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(
                    0..obj.mesh.index_count,
                    0,
                    obj_index as u32..obj_index as u32 + 1,
                );
            }
        }
    }
}
