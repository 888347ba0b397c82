use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::device::DEPTH_FORMAT;
use crate::scene::{Scene, Vertex};

use super::super::common::{depth_state, uniform_binding, InstanceBuffer, ModelInstance};
use super::super::RenderCtx;
use super::LightSpace;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MapUniform {
    light_view_proj: [[f32; 4]; 4],
}

/// Depth (shadow) pass for directional and spot lights.
///
/// Owns a square, screen-independent depth texture that lives for the whole
/// run. `run` renders every scene object's depth from the light's point of
/// view, fully overwriting the map; the forward pass then samples it through
/// [`sampled_view`](Self::sampled_view).
pub struct ShadowMapPass {
    size: u32,
    view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instances: InstanceBuffer,
}

impl ShadowMapPass {
    pub const DEFAULT_SIZE: u32 = 1024;

    pub fn new(ctx: &RenderCtx<'_>, size: u32) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("prism shadow map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (ubo, bgl, bind_group) = uniform_binding(
            ctx.device,
            std::mem::size_of::<MapUniform>() as u64,
            wgpu::ShaderStages::VERTEX,
            "prism shadow map ubo",
        );

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("prism shadow depth shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../shaders/shadow_depth.wgsl").into(),
                ),
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism shadow map pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism shadow map pipeline"),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout(), ModelInstance::layout()],
                },

                // Depth-only: no fragment stage, no color targets.
                fragment: None,

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Render back faces into the map: with a constant bias this
                    // trades self-shadowing acne for less peter-panning.
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
            view,
            pipeline,
            ubo,
            bind_group,
            instances: InstanceBuffer::new("prism shadow map instances"),
        }
    }

    /// Depth map resolution (square).
    pub fn size(&self) -> u32 {
        self.size
    }

    /// View of the depth target for sampling in the main pass.
    pub fn sampled_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Renders the scene's depth from the light's point of view.
    ///
    /// Overwrites the whole map (cleared to the far plane first); call once
    /// per frame before the main pass samples it.
    pub fn run(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        light: &LightSpace,
        scene: &Scene,
    ) {
        let uniform = MapUniform {
            light_view_proj: light.matrix().to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&self.ubo, 0, bytemuck::bytes_of(&uniform));

        let instance_data: Vec<ModelInstance> = scene
            .iter()
            .map(|obj| ModelInstance::new(obj.model, Vec4::ONE))
            .collect();

        let instance_buf = self.instances.upload(ctx, &instance_data);

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism shadow map pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.view,
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

        let Some(instance_buf) = instance_buf else {
            return;
        };

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_buf.slice(..));

        for (i, obj) in scene.iter().enumerate() {
            rpass.set_vertex_buffer(0, obj.mesh.vertex_buf.slice(..));
            rpass.set_index_buffer(obj.mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..obj.mesh.index_count, 0, i as u32..i as u32 + 1);
        }
    }
}
