use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};

/// Texture ids are process-unique and used by renderers to cache bind groups.
static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

fn next_texture_id() -> u64 {
    NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)
}

/// 2D color texture with its view and sampler.
///
/// wgpu resources are reference counted; cloning shares the GPU objects and
/// the id, so clones hit the same renderer bind-group cache entry.
#[derive(Debug, Clone)]
pub struct Texture2d {
    pub id: u64,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture2d {
    /// Creates a texture from raw RGBA8 pixels (sRGB).
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
        address_mode: wgpu::AddressMode,
        label: &str,
    ) -> Self {
        debug_assert_eq!(pixels.len() as u32, width * height * 4);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        Self {
            id: next_texture_id(),
            texture,
            view,
            sampler,
        }
    }

    /// 1x1 opaque white; the substitute for failed loads and the base color
    /// for tint-only draws (light-source markers).
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba8(
            device,
            queue,
            &[255, 255, 255, 255],
            1,
            1,
            wgpu::AddressMode::Repeat,
            "prism white texture",
        )
    }

    /// Procedural two-tone checkerboard, `cells` squares per side.
    ///
    /// Used by demos as a ground texture so they render something meaningful
    /// without image files on disk.
    pub fn checkerboard(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        cells: u32,
    ) -> Self {
        let cells = cells.max(1);
        let cell = (size / cells).max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                let shade: u8 = if even { 200 } else { 90 };
                pixels.extend_from_slice(&[shade, shade, shade, 255]);
            }
        }

        Self::from_rgba8(
            device,
            queue,
            &pixels,
            size,
            size,
            wgpu::AddressMode::Repeat,
            "prism checkerboard",
        )
    }
}

/// Loads an image file into an RGBA8 sRGB texture.
///
/// Images with an alpha channel clamp at the edges (transparent sprites bleed
/// texels from the opposite border under Repeat); opaque images repeat.
pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<Texture2d> {
    let img = image::open(path).with_context(|| format!("failed to load {}", path.display()))?;

    let address_mode = if img.color().has_alpha() {
        wgpu::AddressMode::ClampToEdge
    } else {
        wgpu::AddressMode::Repeat
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Texture2d::from_rgba8(
        device,
        queue,
        rgba.as_raw(),
        width,
        height,
        address_mode,
        &path.display().to_string(),
    ))
}

/// `load_texture`, but load failures are logged and substituted with the
/// built-in white texture so rendering continues.
pub fn load_texture_or_fallback(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Texture2d {
    match load_texture(device, queue, path) {
        Ok(t) => t,
        Err(err) => {
            log::error!("{err:#}; using fallback texture");
            Texture2d::white(device, queue)
        }
    }
}

/// Cube texture (6 faces) with its view and sampler.
#[derive(Debug, Clone)]
pub struct CubeTexture {
    pub id: u64,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl CubeTexture {
    fn from_face_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[Vec<u8>; 6],
        size: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, pixels) in faces.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(size * 4),
                    rows_per_image: Some(size),
                },
                wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        Self {
            id: next_texture_id(),
            texture,
            view,
            sampler,
        }
    }

    /// Uniformly colored cubemap used when no skybox images are available.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> Self {
        let face = rgba.to_vec();
        let faces = [
            face.clone(),
            face.clone(),
            face.clone(),
            face.clone(),
            face.clone(),
            face,
        ];
        Self::from_face_pixels(device, queue, &faces, 1, "prism solid cubemap")
    }
}

/// Loads six images into a cube texture.
///
/// `paths` are in wgpu cube-layer order: `+X, -X, +Y, -Y, +Z, -Z`. The first
/// face that decodes fixes the cube size; faces that fail to decode or do not
/// match that size are logged and filled with a neutral gray.
pub fn load_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    paths: &[&Path; 6],
) -> CubeTexture {
    let mut decoded: [Option<image::RgbaImage>; 6] = [None, None, None, None, None, None];

    for (i, path) in paths.iter().enumerate() {
        match image::open(path) {
            Ok(img) => decoded[i] = Some(img.to_rgba8()),
            Err(err) => {
                log::error!("failed to load cubemap face {}: {err}", path.display());
            }
        }
    }

    let size = decoded
        .iter()
        .flatten()
        .next()
        .map(|img| img.width())
        .unwrap_or(1);

    let fill = || {
        let mut face = Vec::with_capacity((size * size * 4) as usize);
        for _ in 0..size * size {
            face.extend_from_slice(&[128, 128, 128, 255]);
        }
        face
    };

    let faces: [Vec<u8>; 6] = std::array::from_fn(|i| match decoded[i].take() {
        Some(img) if img.width() == size && img.height() == size => img.into_raw(),
        Some(img) => {
            log::error!(
                "cubemap face {} is {}x{}, expected {size}x{size}; using fill",
                paths[i].display(),
                img.width(),
                img.height(),
            );
            fill()
        }
        None => fill(),
    });

    CubeTexture::from_face_pixels(device, queue, &faces, size, "prism cubemap")
}
