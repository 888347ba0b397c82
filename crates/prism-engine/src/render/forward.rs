use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::device::DEPTH_FORMAT;
use crate::scene::{DirectionalLight, PointLight, Scene, SpotLight, Vertex};

use super::common::{
    depth_state, load_pass, uniform_binding, InstanceBuffer, ModelInstance, TextureBindGroups,
};
use super::{RenderCtx, RenderTarget};

/// Size of the point-light array in the frame uniform.
pub const MAX_POINT_LIGHTS: usize = 4;

// GPU-side light layouts. Everything is vec4-aligned to match WGSL uniform
// rules; the `w` of the leading vector doubles as the enabled flag.

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuDirLight {
    direction: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuPointLight {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    atten: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuSpotLight {
    position: [f32; 4],
    direction: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    cone: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    light_space: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    dir_light: GpuDirLight,
    point_lights: [GpuPointLight; MAX_POINT_LIGHTS],
    spot_light: GpuSpotLight,
    params: [f32; 4],
    flags: [f32; 4],
    point_shadow_pos_far: [f32; 4],
}

fn vec4_of(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// 2D shadow map inputs for one frame.
#[derive(Debug, Copy, Clone)]
pub struct ShadowParams {
    /// The light's combined view-projection, as used by the depth pass.
    pub light_space: Mat4,
    /// Constant depth bias suppressing self-shadowing.
    pub bias: f32,
}

/// Point-light (cubemap) shadow inputs for one frame.
#[derive(Debug, Copy, Clone)]
pub struct PointShadowParams {
    pub light_pos: Vec3,
    /// Far plane the depth pass normalized distances by.
    pub far: f32,
    pub bias: f32,
}

/// Everything the lit pass needs for one frame besides the scene itself.
pub struct ForwardParams<'a> {
    pub view_proj: Mat4,
    pub camera_pos: Vec3,
    pub dir_light: Option<&'a DirectionalLight>,
    pub point_lights: &'a [PointLight],
    pub spot_light: Option<&'a SpotLight>,
    pub shadow: Option<ShadowParams>,
    pub point_shadow: Option<PointShadowParams>,
    pub shininess: f32,
}

impl Default for ForwardParams<'_> {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY,
            camera_pos: Vec3::ZERO,
            dir_light: None,
            point_lights: &[],
            spot_light: None,
            shadow: None,
            point_shadow: None,
            shininess: 32.0,
        }
    }
}

/// Blinn-Phong lit pass with optional shadow maps.
///
/// Shadow inputs are bound through [`set_shadow_inputs`](Self::set_shadow_inputs);
/// when a demo casts no shadows the 1x1 fallback maps keep the bind group
/// complete and the shader branches disabled via the frame flags.
pub struct ForwardRenderer {
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    textures: TextureBindGroups,
    shadow_layout: wgpu::BindGroupLayout,
    shadow_sampler: wgpu::Sampler,
    fallback_2d: wgpu::TextureView,
    fallback_cube: wgpu::TextureView,
    shadow_bind_group: wgpu::BindGroup,
    instances: InstanceBuffer,
}

impl ForwardRenderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let (ubo, frame_layout, frame_bind_group) = uniform_binding(
            ctx.device,
            std::mem::size_of::<FrameUniform>() as u64,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            "prism forward frame ubo",
        );

        let textures = TextureBindGroups::new(ctx.device, "prism forward textures");

        let shadow_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("prism forward shadow layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Depth,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(
                                wgpu::SamplerBindingType::NonFiltering,
                            ),
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Depth,
                                view_dimension: wgpu::TextureViewDimension::Cube,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 3,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(
                                wgpu::SamplerBindingType::NonFiltering,
                            ),
                            count: None,
                        },
                    ],
                });

        let shadow_sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("prism shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let fallback_2d = fallback_depth_view(ctx.device, 1, "prism fallback shadow map");
        let fallback_cube =
            fallback_depth_cube_view(ctx.device, "prism fallback shadow cubemap");

        let shadow_bind_group = make_shadow_bind_group(
            ctx.device,
            &shadow_layout,
            &shadow_sampler,
            &fallback_2d,
            &fallback_cube,
        );

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("prism forward shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/forward.wgsl").into()),
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism forward pipeline layout"),
                bind_group_layouts: &[&frame_layout, &textures.layout, &shadow_layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism forward pipeline"),
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
            frame_bind_group,
            textures,
            shadow_layout,
            shadow_sampler,
            fallback_2d,
            fallback_cube,
            shadow_bind_group,
            instances: InstanceBuffer::new("prism forward instances"),
        }
    }

    /// Binds the shadow maps sampled by subsequent draws. Pass `None` to fall
    /// back to the built-in 1x1 maps (the corresponding shader branch is also
    /// gated by the per-frame flags, so the contents never matter then).
    pub fn set_shadow_inputs(
        &mut self,
        ctx: &RenderCtx<'_>,
        shadow_map: Option<&wgpu::TextureView>,
        point_shadow_map: Option<&wgpu::TextureView>,
    ) {
        self.shadow_bind_group = make_shadow_bind_group(
            ctx.device,
            &self.shadow_layout,
            &self.shadow_sampler,
            shadow_map.unwrap_or(&self.fallback_2d),
            point_shadow_map.unwrap_or(&self.fallback_cube),
        );
    }

    /// Draws the scene lit. Writes the frame uniform once, so call at most
    /// once per frame.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        params: &ForwardParams<'_>,
        scene: &Scene,
    ) {
        let uniform = Self::pack_frame(params);
        ctx.queue
            .write_buffer(&self.ubo, 0, bytemuck::bytes_of(&uniform));

        let instance_data: Vec<ModelInstance> = scene
            .iter()
            .map(|obj| ModelInstance::new(obj.model, Vec4::ONE))
            .collect();
        let Some(instance_buf) = self.instances.upload(ctx, &instance_data).cloned() else {
            return;
        };

        let bind_groups: Vec<wgpu::BindGroup> = scene
            .iter()
            .map(|obj| self.textures.get_or_create(ctx.device, &obj.texture))
            .collect();

        let mut rpass = load_pass(target, "prism forward pass");
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.frame_bind_group, &[]);
        rpass.set_bind_group(2, &self.shadow_bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_buf.slice(..));

        for (i, obj) in scene.iter().enumerate() {
            rpass.set_bind_group(1, &bind_groups[i], &[]);
            rpass.set_vertex_buffer(0, obj.mesh.vertex_buf.slice(..));
            rpass.set_index_buffer(obj.mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..obj.mesh.index_count, 0, i as u32..i as u32 + 1);
        }
    }

    fn pack_frame(params: &ForwardParams<'_>) -> FrameUniform {
        let dir_light = match params.dir_light {
            Some(light) => GpuDirLight {
                direction: vec4_of(light.direction, 1.0),
                ambient: vec4_of(light.ambient, 0.0),
                diffuse: vec4_of(light.diffuse, 0.0),
                specular: vec4_of(light.specular, 0.0),
            },
            None => GpuDirLight::zeroed(),
        };

        let mut point_lights = [GpuPointLight::zeroed(); MAX_POINT_LIGHTS];
        for (slot, light) in point_lights
            .iter_mut()
            .zip(params.point_lights.iter().take(MAX_POINT_LIGHTS))
        {
            *slot = GpuPointLight {
                position: vec4_of(light.position, 1.0),
                ambient: vec4_of(light.ambient, 0.0),
                diffuse: vec4_of(light.diffuse, 0.0),
                specular: vec4_of(light.specular, 0.0),
                atten: [light.constant, light.linear, light.quadratic, 0.0],
            };
        }

        let spot_light = match params.spot_light {
            Some(light) => GpuSpotLight {
                position: vec4_of(light.position, 1.0),
                direction: vec4_of(light.direction, 0.0),
                diffuse: vec4_of(light.diffuse, 0.0),
                specular: vec4_of(light.specular, 0.0),
                cone: [light.cos_inner, light.cos_outer, 0.0, 0.0],
            },
            None => GpuSpotLight::zeroed(),
        };

        let (light_space, shadow_bias) = match params.shadow {
            Some(shadow) => (shadow.light_space, shadow.bias),
            None => (Mat4::IDENTITY, 0.0),
        };

        let (point_shadow_pos_far, point_bias) = match params.point_shadow {
            Some(shadow) => (vec4_of(shadow.light_pos, shadow.far), shadow.bias),
            None => ([0.0; 4], 0.0),
        };

        FrameUniform {
            view_proj: params.view_proj.to_cols_array_2d(),
            light_space: light_space.to_cols_array_2d(),
            camera_pos: vec4_of(params.camera_pos, 1.0),
            dir_light,
            point_lights,
            spot_light,
            params: [params.shininess, shadow_bias, point_bias, 0.0],
            flags: [
                if params.shadow.is_some() { 1.0 } else { 0.0 },
                if params.point_shadow.is_some() { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
            point_shadow_pos_far,
        }
    }
}

fn fallback_depth_view(device: &wgpu::Device, layers: u32, label: &str) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: layers,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn fallback_depth_cube_view(device: &wgpu::Device, label: &str) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor {
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    })
}

fn make_shadow_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    shadow_map: &wgpu::TextureView,
    point_shadow_map: &wgpu::TextureView,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("prism forward shadow bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(shadow_map),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(point_shadow_map),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_uniform_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
    }

    #[test]
    fn disabled_lights_pack_with_zero_enable_flag() {
        let uniform = ForwardRenderer::pack_frame(&ForwardParams::default());
        assert_eq!(uniform.dir_light.direction[3], 0.0);
        assert!(uniform.point_lights.iter().all(|l| l.position[3] == 0.0));
        assert_eq!(uniform.spot_light.position[3], 0.0);
        assert_eq!(uniform.flags, [0.0; 4]);
    }

    #[test]
    fn enabled_lights_pack_with_set_enable_flag() {
        let dir = DirectionalLight::default();
        let points = [PointLight::at(Vec3::new(1.0, 2.0, 3.0))];
        let uniform = ForwardRenderer::pack_frame(&ForwardParams {
            dir_light: Some(&dir),
            point_lights: &points,
            shadow: Some(ShadowParams {
                light_space: Mat4::IDENTITY,
                bias: 0.005,
            }),
            ..Default::default()
        });

        assert_eq!(uniform.dir_light.direction[3], 1.0);
        assert_eq!(uniform.point_lights[0].position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.point_lights[1].position[3], 0.0);
        assert_eq!(uniform.flags[0], 1.0);
        assert_eq!(uniform.flags[1], 0.0);
        assert_eq!(uniform.params[1], 0.005);
    }

    #[test]
    fn extra_point_lights_are_dropped() {
        let points = vec![PointLight::default(); MAX_POINT_LIGHTS + 2];
        let uniform = ForwardRenderer::pack_frame(&ForwardParams {
            point_lights: &points,
            ..Default::default()
        });
        assert!(uniform.point_lights.iter().all(|l| l.position[3] == 1.0));
    }
}
