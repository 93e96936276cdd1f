//! Sampled textures: 2D color maps and environment cubemaps.

use anyhow::{ensure, Result};
use cookbook_bitmap::{Bitmap, BitmapKind};

use super::RenderCtx;

fn linear_clamp_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// A single-mip 2D texture with a linear sampler.
pub struct Texture2d {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture2d {
    /// Uploads tightly packed RGBA8 pixels as an sRGB texture.
    pub fn from_rgba8(
        ctx: &RenderCtx<'_>,
        width: u32,
        height: u32,
        pixels: &[u8],
        label: &str,
    ) -> Result<Self> {
        ensure!(width > 0 && height > 0, "{label}: empty texture");
        let expected = width as usize * height as usize * 4;
        ensure!(
            pixels.len() == expected,
            "{label}: expected {expected} bytes of RGBA8, got {}",
            pixels.len()
        );

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
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
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!("{label}: uploaded {width}x{height} RGBA8");

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// Converts RGBA f32 texels to the half-float bit patterns wgpu expects for
/// `Rgba16Float`.
pub(crate) fn rgba_f16_bits(rgba: &[f32]) -> Vec<u16> {
    rgba.iter().map(|&v| half::f16::from_f32(v).to_bits()).collect()
}

/// Six-layer `Rgba16Float` cube texture with a cube view.
pub struct Cubemap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub face_size: u32,
}

impl Cubemap {
    /// Uploads a cube bitmap; layers go in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn from_faces(ctx: &RenderCtx<'_>, faces: &Bitmap, label: &str) -> Result<Self> {
        ensure!(faces.kind() == BitmapKind::Cube, "{label}: bitmap is not a cubemap");
        ensure!(
            faces.width() == faces.height() && faces.width() > 0,
            "{label}: cube faces must be square, got {}x{}",
            faces.width(),
            faces.height()
        );

        let face_size = faces.width();
        let size = wgpu::Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba16Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // Layers are contiguous in the bitmap, so one copy covers all six.
        let texels = rgba_f16_bits(&faces.to_rgba_f32());
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(face_size * 8),
                rows_per_image: Some(face_size),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        });
        let sampler = linear_clamp_sampler(ctx.device, label);

        log::info!("{label}: uploaded cubemap, {face_size}x{face_size} per face");

        Ok(Self {
            texture,
            view,
            sampler,
            face_size,
        })
    }
}
