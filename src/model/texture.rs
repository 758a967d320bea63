use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Decodes an image file into RGBA8, flipped so the first row is the bottom of the picture.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode texture {}", path.display()))?;
    Ok(img.flipv().to_rgba8())
}

/// Light/dark grey checkerboard with `squares` squares per side.
pub fn checkerboard_image(size: u32, squares: u32) -> RgbaImage {
    let square_size = (size / squares.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        let is_light = ((x / square_size) + (y / square_size)) % 2 == 0;
        if is_light {
            image::Rgba([200, 200, 200, 255])
        } else {
            image::Rgba([120, 120, 120, 255])
        }
    })
}

/// Albedo for lit surfaces. Without a path this is a single white texel, so
/// lighting shows the plain material colour. A path that fails to load falls
/// back to a checkerboard.
pub fn diffuse_image(path: Option<&Path>) -> RgbaImage {
    match path {
        None => RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255])),
        Some(path) => load_rgba(path).unwrap_or_else(|err| {
            log::warn!("{:#}; falling back to checkerboard", err);
            checkerboard_image(512, 20)
        }),
    }
}

impl Texture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = rgba.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            texture.as_image_copy(),
            rgba.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Repeat horizontally, clamp vertically.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Diffuse Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Depth attachment that can also be bound as a `texture_depth_2d` and read with `textureLoad`.
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}
