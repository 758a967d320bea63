//! Shader modules and typed uniform buffers.

mod uniforms;

pub use uniforms::{
    CameraUniform, GpuDirectionalLight, GpuPointLight, GpuSpotLight, LightPassUniform,
    LightingUniform, MaterialUniform, ModelUniform,
};

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

pub struct Shader {
    pub module: wgpu::ShaderModule,
}

impl Shader {
    /// Compiles `source` as WGSL. Validation failures are logged and the
    /// (invalid) module is still returned; pipelines built from it render nothing.
    pub fn new(device: &wgpu::Device, label: &str, source: &str) -> Self {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            log::error!("Shader `{}` failed to compile: {}", label, err);
        } else {
            log::debug!("Compiled shader `{}`", label);
        }

        Self { module }
    }
}

pub fn uniform_layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[uniform_layout_entry(0, visibility)],
    })
}

/// A uniform buffer holding one `T`, bound alone at binding 0 of its own bind group.
pub struct Uniform<T> {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> Uniform<T> {
    pub fn new(device: &wgpu::Device, label: &str, layout: &wgpu::BindGroupLayout, value: &T) -> Self {
        let buffer = Self::create_buffer(device, label, value);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            _marker: PhantomData,
        }
    }

    pub fn create_buffer(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}
