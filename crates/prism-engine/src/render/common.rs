//! Shared GPU types and utilities used by the renderers and shadow passes.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::assets::Texture2d;
use crate::device::DEPTH_FORMAT;

use super::{RenderCtx, RenderTarget};

// ── per-object instance ───────────────────────────────────────────────────

/// Per-object instance data: model matrix columns + a color tint.
///
/// Every pipeline shares this layout; the depth-only shadow pipelines simply
/// do not declare the color attribute.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ModelInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ModelInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4, // model col 0
        4 => Float32x4, // model col 1
        5 => Float32x4, // model col 2
        6 => Float32x4, // model col 3
        7 => Float32x4  // color tint
    ];

    pub(super) fn new(model: Mat4, color: Vec4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
        }
    }

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

// ── growable instance buffer ──────────────────────────────────────────────

/// Instance vertex buffer that grows in power-of-two steps.
pub(super) struct InstanceBuffer {
    buf: Option<wgpu::Buffer>,
    capacity: usize,
    label: &'static str,
}

impl InstanceBuffer {
    pub(super) fn new(label: &'static str) -> Self {
        Self {
            buf: None,
            capacity: 0,
            label,
        }
    }

    /// Uploads `instances`, reallocating if the capacity is insufficient.
    /// Returns `None` when there is nothing to draw.
    pub(super) fn upload(
        &mut self,
        ctx: &RenderCtx<'_>,
        instances: &[ModelInstance],
    ) -> Option<&wgpu::Buffer> {
        if instances.is_empty() {
            return None;
        }

        if instances.len() > self.capacity || self.buf.is_none() {
            let new_cap = instances.len().next_power_of_two().max(16);
            self.buf = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (new_cap * std::mem::size_of::<ModelInstance>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = new_cap;
        }

        let buf = self.buf.as_ref()?;
        ctx.queue.write_buffer(buf, 0, bytemuck::cast_slice(instances));
        Some(buf)
    }
}

// ── texture bind groups ───────────────────────────────────────────────────

/// Bind-group cache for 2D color textures, keyed by texture id.
///
/// Bind groups keep their resources alive, so entries persist for the life of
/// the renderer; the demos load a handful of textures once at setup.
pub(super) struct TextureBindGroups {
    pub layout: wgpu::BindGroupLayout,
    cache: HashMap<u64, wgpu::BindGroup>,
}

impl TextureBindGroups {
    pub(super) fn new(device: &wgpu::Device, label: &str) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
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

        Self {
            layout,
            cache: HashMap::new(),
        }
    }

    pub(super) fn get_or_create(
        &mut self,
        device: &wgpu::Device,
        texture: &Texture2d,
    ) -> wgpu::BindGroup {
        self.cache
            .entry(texture.id)
            .or_insert_with(|| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("prism texture bind group"),
                    layout: &self.layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&texture.sampler),
                        },
                    ],
                })
            })
            .clone()
    }
}

// ── depth state ───────────────────────────────────────────────────────────

pub(super) fn depth_state(
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── render pass helpers ───────────────────────────────────────────────────

/// Begins a pass onto the frame's color + depth views that preserves whatever
/// earlier passes drew. The frame-level clear happens before any renderer
/// runs, so all renderer passes load.
pub(super) fn load_pass<'a>(
    target: &'a mut RenderTarget<'_>,
    label: &'static str,
) -> wgpu::RenderPass<'a> {
    target
        .encoder
        .begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
}

// ── uniform helpers ───────────────────────────────────────────────────────

/// Creates a uniform buffer of `size` bytes plus a single-entry bind group
/// layout/bind group visible to the given stages.
pub(super) fn uniform_binding(
    device: &wgpu::Device,
    size: u64,
    visibility: wgpu::ShaderStages,
    label: &str,
) -> (wgpu::Buffer, wgpu::BindGroupLayout, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(size),
            },
            count: None,
        }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });

    (buffer, layout, bind_group)
}
