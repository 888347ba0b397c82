use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::assets::Texture2d;
use crate::scene::{Mesh, Scene, Vertex};

use super::common::{
    depth_state, load_pass, uniform_binding, InstanceBuffer, ModelInstance, TextureBindGroups,
};
use super::{RenderCtx, RenderTarget};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
}

/// Textured forward pass without lighting.
///
/// Drives the texture-focused demos and doubles as the marker pass for light
/// positions (white texture + per-instance tint). Uniform data is written
/// once per frame, so call each entry point at most once per frame.
pub struct UnlitRenderer {
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    textures: TextureBindGroups,
    scene_instances: InstanceBuffer,
    marker_instances: InstanceBuffer,
}

impl UnlitRenderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let (ubo, globals_layout, globals_bind_group) = uniform_binding(
            ctx.device,
            std::mem::size_of::<Globals>() as u64,
            wgpu::ShaderStages::VERTEX,
            "prism unlit globals",
        );

        let textures = TextureBindGroups::new(ctx.device, "prism unlit textures");

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("prism unlit shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/unlit.wgsl").into()),
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism unlit pipeline layout"),
                bind_group_layouts: &[&globals_layout, &textures.layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism unlit pipeline"),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout(), ModelInstance::layout()],
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
            ubo,
            globals_bind_group,
            textures,
            scene_instances: InstanceBuffer::new("prism unlit instances"),
            marker_instances: InstanceBuffer::new("prism unlit marker instances"),
        }
    }

    /// Draws every object in the scene with its own texture, untinted.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        scene: &Scene,
    ) {
        self.write_globals(ctx, view_proj);

        let instance_data: Vec<ModelInstance> = scene
            .iter()
            .map(|obj| ModelInstance::new(obj.model, Vec4::ONE))
            .collect();
        let Some(instance_buf) = self.scene_instances.upload(ctx, &instance_data).cloned() else {
            return;
        };

        let bind_groups: Vec<wgpu::BindGroup> = scene
            .iter()
            .map(|obj| self.textures.get_or_create(ctx.device, &obj.texture))
            .collect();

        let mut rpass = load_pass(target, "prism unlit pass");
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.globals_bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_buf.slice(..));

        for (i, obj) in scene.iter().enumerate() {
            rpass.set_bind_group(1, &bind_groups[i], &[]);
            rpass.set_vertex_buffer(0, obj.mesh.vertex_buf.slice(..));
            rpass.set_index_buffer(obj.mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..obj.mesh.index_count, 0, i as u32..i as u32 + 1);
        }
    }

    /// Draws one mesh at several transforms with per-instance tints; used for
    /// light-position markers. Relies on the camera globals written by the
    /// same frame's [`draw`](Self::draw), or writes them itself when used
    /// alone.
    pub fn draw_markers(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        mesh: &Mesh,
        texture: &Texture2d,
        markers: &[(Mat4, Vec4)],
    ) {
        self.write_globals(ctx, view_proj);

        let instance_data: Vec<ModelInstance> = markers
            .iter()
            .map(|(model, tint)| ModelInstance::new(*model, *tint))
            .collect();
        let Some(instance_buf) = self.marker_instances.upload(ctx, &instance_data).cloned() else {
            return;
        };

        let bind_group = self.textures.get_or_create(ctx.device, texture);

        let mut rpass = load_pass(target, "prism unlit marker pass");
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.globals_bind_group, &[]);
        rpass.set_bind_group(1, &bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
        rpass.set_vertex_buffer(1, instance_buf.slice(..));
        rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..mesh.index_count, 0, 0..markers.len() as u32);
    }

    fn write_globals(&self, ctx: &RenderCtx<'_>, view_proj: Mat4) {
        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&self.ubo, 0, bytemuck::bytes_of(&globals));
    }
}
