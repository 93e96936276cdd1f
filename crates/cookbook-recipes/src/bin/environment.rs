//! Environment cubemap built on the CPU from an equirectangular HDR, drawn as
//! a skybox behind the duck, whose texture is modulated by the reflected
//! environment.
//!
//! Mouse: drag with the left button to orbit, wheel to zoom.
//! Keys: `R` toggles the reflection.

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use cookbook_bitmap::{equirect_to_vertical_cross, load_hdr, vertical_cross_to_faces, Bitmap};
use glam::{Mat4, Vec3};

use cookbook_engine::core::{App, AppControl, FrameCtx};
use cookbook_engine::device::GpuInit;
use cookbook_engine::input::Key;
use cookbook_engine::logging::{init_logging, LoggingConfig};
use cookbook_engine::render::{
    perspective, Cubemap, MeshBuffers, RenderCtx, RenderTarget, Texture2d, UniformSlots,
};
use cookbook_engine::time::FpsCounter;
use cookbook_engine::window::{Runtime, RuntimeConfig};
use cookbook_recipes::assets::{asset_path, load_duck, ENVIRONMENT_HDR};
use cookbook_recipes::camera::OrbitCamera;
use cookbook_recipes::geometry::{cube, PositionVertex};
use cookbook_recipes::mesh::{MeshAsset, MeshVertex};
use cookbook_recipes::{shaders, update_fps_title};

const TITLE: &str = "environment";

/// Uniform block shared by the skybox and environment shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct EnvFrameData {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    sky_view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    /// x: reflection weight.
    params: [f32; 4],
}

struct EnvGpu {
    format: wgpu::TextureFormat,
    mesh_pipeline: wgpu::RenderPipeline,
    sky_pipeline: wgpu::RenderPipeline,
    uniforms: UniformSlots<EnvFrameData>,
    bind_group: wgpu::BindGroup,
    duck: MeshBuffers,
    sky: MeshBuffers,
    _texture: Texture2d,
    _cubemap: Cubemap,
}

impl EnvGpu {
    fn new(ctx: &RenderCtx<'_>, assets: &EnvAssets) -> Result<Self> {
        let pixels = assets
            .texture
            .data()
            .as_u8()
            .context("duck texture is not 8-bit")?;
        let texture = Texture2d::from_rgba8(
            ctx,
            assets.texture.width(),
            assets.texture.height(),
            pixels,
            "duck base color",
        )?;
        let cubemap = Cubemap::from_faces(ctx, &assets.faces, "environment cubemap")?;

        let texture_entry = |binding, view_dimension| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("environment bgl"),
            entries: &[
                UniformSlots::<EnvFrameData>::layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
                texture_entry(1, wgpu::TextureViewDimension::D2),
                sampler_entry(2),
                texture_entry(3, wgpu::TextureViewDimension::Cube),
                sampler_entry(4),
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("environment pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = |label: &str,
                        shader: &wgpu::ShaderModule,
                        vertex_layout: wgpu::VertexBufferLayout<'static>,
                        depth_write_enabled: bool| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout],
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: ctx.depth_format,
                    depth_write_enabled,
                    // The skybox sits exactly on the cleared far plane.
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let mesh_shader = shaders::module(ctx.device, "environment shader", shaders::ENVIRONMENT);
        let sky_shader = shaders::module(ctx.device, "skybox shader", shaders::SKYBOX);
        let mesh_pipeline = pipeline("environment mesh pipeline", &mesh_shader, MeshVertex::layout(), true);
        let sky_pipeline = pipeline("skybox pipeline", &sky_shader, PositionVertex::layout(), false);

        let uniforms = UniformSlots::<EnvFrameData>::new(ctx.device, 1, "environment ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("environment bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        });

        let duck = MeshBuffers::new(ctx, &assets.mesh.vertices, &assets.mesh.indices, "duck");
        let (sky_vertices, sky_indices) = cube();
        let sky = MeshBuffers::new(ctx, &sky_vertices, &sky_indices, "skybox");

        Ok(Self {
            format: ctx.surface_format,
            mesh_pipeline,
            sky_pipeline,
            uniforms,
            bind_group,
            duck,
            sky,
            _texture: texture,
            _cubemap: cubemap,
        })
    }
}

/// CPU-side inputs, loaded before the window opens.
struct EnvAssets {
    mesh: MeshAsset,
    texture: Bitmap,
    faces: Bitmap,
}

impl EnvAssets {
    fn load() -> Result<Self> {
        let (mesh, texture) = load_duck()?;

        let hdr_path = asset_path(ENVIRONMENT_HDR)?;
        let equirect = load_hdr(&hdr_path)?;
        log::info!(
            "loaded {} ({}x{})",
            hdr_path.display(),
            equirect.width(),
            equirect.height()
        );

        let cross = equirect_to_vertical_cross(&equirect)?;
        let faces = vertical_cross_to_faces(&cross)?;
        log::info!("built cubemap faces ({0}x{0})", faces.width());

        Ok(Self { mesh, texture, faces })
    }
}

struct EnvironmentRecipe {
    assets: EnvAssets,
    gpu: Option<EnvGpu>,
    camera: OrbitCamera,
    fps: FpsCounter,
    reflection: bool,
    failed: bool,
}

impl EnvironmentRecipe {
    fn new(assets: EnvAssets) -> Self {
        Self {
            assets,
            gpu: None,
            camera: OrbitCamera::new(Vec3::ZERO, 2.0),
            fps: FpsCounter::default(),
            reflection: true,
            failed: false,
        }
    }

    fn ensure_gpu(&mut self, ctx: &RenderCtx<'_>) {
        if self.gpu.as_ref().is_some_and(|g| g.format == ctx.surface_format) {
            return;
        }
        match EnvGpu::new(ctx, &self.assets) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("failed to create GPU resources: {e:#}");
                self.failed = true;
            }
        }
    }

    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.ensure_gpu(ctx);
        let Some(gpu) = self.gpu.as_ref() else { return };

        let proj = perspective(ctx.aspect_ratio());
        let model = Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0));
        let eye = self.camera.position();

        let data = EnvFrameData {
            mvp: (proj * self.camera.view() * model).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            sky_view_proj: (proj * self.camera.rotation_only_view()).to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
            params: [if self.reflection { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        };
        gpu.uniforms.write(ctx.queue, 0, &data);

        let mut rpass = target.begin_pass("environment pass");
        rpass.set_bind_group(0, &gpu.bind_group, &[gpu.uniforms.offset(0)]);

        rpass.set_pipeline(&gpu.mesh_pipeline);
        gpu.duck.draw(&mut rpass);

        rpass.set_pipeline(&gpu.sky_pipeline);
        gpu.sky.draw(&mut rpass);
    }
}

impl App for EnvironmentRecipe {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let input = ctx.input_frame;
        if input.pressed(Key::Escape) || self.failed {
            return AppControl::Exit;
        }
        if input.pressed(Key::R) {
            self.reflection = !self.reflection;
            log::info!("reflection {}", if self.reflection { "on" } else { "off" });
        }
        self.camera.update(ctx.input, input);

        update_fps_title(&mut self.fps, ctx.time.dt, TITLE, ctx.runtime);

        ctx.render(wgpu::Color::BLACK, |rctx, target| self.draw(rctx, target))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let assets = EnvAssets::load()?;

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), EnvironmentRecipe::new(assets))
}
