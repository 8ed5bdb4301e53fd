//! GPU texture cache
//!
//! Loads image files, flips them vertically so the image origin matches the
//! renderer's UV convention, and keeps them keyed by path. A 1x1 white
//! fallback stands in for untextured draws and missing files.

use crate::context::RenderError;
use std::collections::HashMap;
use std::path::Path;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Cache of GPU textures keyed by path
pub struct TextureCache {
    textures: HashMap<String, GpuTexture>,
    /// 1x1 white texture bound when a draw has no texture
    pub default_white: GpuTexture,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let default_white = create_rgba_texture(device, queue, 1, 1, &[255; 4], "Default White");
        Self {
            textures: HashMap::new(),
            default_white,
        }
    }

    /// Load a texture from an image file on disk, flipping vertically.
    /// Returns the cached entry if the path was loaded before.
    pub fn load_file(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<&GpuTexture, RenderError> {
        let key = path.to_string_lossy().into_owned();
        if !self.textures.contains_key(&key) {
            let img = image::open(path).map_err(|e| {
                RenderError::TextureLoad(format!("'{}': {}", path.display(), e))
            })?;
            let rgba = img.flipv().to_rgba8();
            let (width, height) = rgba.dimensions();

            let texture = create_rgba_texture(device, queue, width, height, &rgba, &key);
            self.textures.insert(key.clone(), texture);
        }

        Ok(&self.textures[&key])
    }

    pub fn get(&self, path: &str) -> Option<&GpuTexture> {
        self.textures.get(path)
    }
}

fn create_rgba_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    data: &[u8],
    label: &str,
) -> GpuTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
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
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        data,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&format!("{} Sampler", label)),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        ..Default::default()
    });

    GpuTexture {
        texture,
        view,
        sampler,
    }
}
