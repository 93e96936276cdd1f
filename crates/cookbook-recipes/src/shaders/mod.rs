//! WGSL sources embedded at compile time.

pub const TRIANGLE: &str = include_str!("triangle.wgsl");
pub const CUBE: &str = include_str!("cube.wgsl");
pub const MESH: &str = include_str!("mesh.wgsl");
pub const SKYBOX: &str = include_str!("skybox.wgsl");
pub const ENVIRONMENT: &str = include_str!("environment.wgsl");

/// Compiles one of the embedded sources.
pub fn module(device: &wgpu::Device, label: &str, source: &'static str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
