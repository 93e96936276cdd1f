//! Rubber duck loaded from glTF, textured, spinning about +Y.
//!
//! Keys: `W` toggles the wireframe overlay, `Space` pauses rotation.

use anyhow::{Context, Result};
use cookbook_bitmap::Bitmap;
use glam::{Mat4, Vec3};

use cookbook_engine::core::{App, AppControl, FrameCtx};
use cookbook_engine::device::GpuInit;
use cookbook_engine::input::Key;
use cookbook_engine::logging::{init_logging, LoggingConfig};
use cookbook_engine::render::{
    perspective, MeshBuffers, PerFrameData, RenderCtx, RenderTarget, Texture2d, UniformSlots,
};
use cookbook_engine::time::FpsCounter;
use cookbook_engine::window::{Runtime, RuntimeConfig};
use cookbook_recipes::assets::load_duck;
use cookbook_recipes::mesh::{MeshAsset, MeshVertex};
use cookbook_recipes::spin::Spin;
use cookbook_recipes::{shaders, update_fps_title};

const TITLE: &str = "textured mesh";

const FILL_SLOT: u32 = 0;
const WIRE_SLOT: u32 = 1;

struct MeshGpu {
    format: wgpu::TextureFormat,
    fill_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    uniforms: UniformSlots<PerFrameData>,
    bind_group: wgpu::BindGroup,
    mesh: MeshBuffers,
    _texture: Texture2d,
}

impl MeshGpu {
    fn new(ctx: &RenderCtx<'_>, asset: &MeshAsset, texture: &Bitmap) -> Result<Self> {
        let pixels = texture
            .data()
            .as_u8()
            .context("duck texture is not 8-bit")?;
        let texture = Texture2d::from_rgba8(ctx, texture.width(), texture.height(), pixels, "duck base color")?;

        let shader = shaders::module(ctx.device, "mesh shader", shaders::MESH);

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh bgl"),
            entries: &[
                UniformSlots::<PerFrameData>::layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = |label: &str, topology: wgpu::PrimitiveTopology, bias: wgpu::DepthBiasState| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[MeshVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: ctx.depth_format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias,
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let fill_pipeline = pipeline(
            "mesh fill pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        );
        let wire_pipeline = pipeline(
            "mesh wireframe pipeline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::DepthBiasState::default(),
        );

        let uniforms = UniformSlots::<PerFrameData>::new(ctx.device, 2, "mesh per-frame ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh bind group"),
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
            ],
        });

        let mesh = MeshBuffers::new(ctx, &asset.vertices, &asset.indices, "duck");

        Ok(Self {
            format: ctx.surface_format,
            fill_pipeline,
            wire_pipeline,
            uniforms,
            bind_group,
            mesh,
            _texture: texture,
        })
    }
}

struct TexturedMeshRecipe {
    asset: MeshAsset,
    texture: Bitmap,
    gpu: Option<MeshGpu>,
    fps: FpsCounter,
    angle: f32,
    spin: Spin,
    wireframe: bool,
    failed: bool,
}

impl TexturedMeshRecipe {
    fn new(asset: MeshAsset, texture: Bitmap) -> Self {
        Self {
            asset,
            texture,
            gpu: None,
            fps: FpsCounter::default(),
            angle: 0.0,
            spin: Spin::default(),
            wireframe: true,
            failed: false,
        }
    }

    fn ensure_gpu(&mut self, ctx: &RenderCtx<'_>) {
        if self.gpu.as_ref().is_some_and(|g| g.format == ctx.surface_format) {
            return;
        }
        match MeshGpu::new(ctx, &self.asset, &self.texture) {
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

        let model = Mat4::from_translation(Vec3::new(0.0, -0.5, -1.5))
            * Mat4::from_axis_angle(Vec3::Y, self.angle);
        let mvp = perspective(ctx.aspect_ratio()) * model;

        gpu.uniforms.write(ctx.queue, FILL_SLOT, &PerFrameData::new(mvp, false));
        gpu.uniforms.write(ctx.queue, WIRE_SLOT, &PerFrameData::new(mvp, true));

        let mut rpass = target.begin_pass("mesh pass");

        rpass.set_pipeline(&gpu.fill_pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[gpu.uniforms.offset(FILL_SLOT)]);
        gpu.mesh.draw(&mut rpass);

        if self.wireframe {
            rpass.set_pipeline(&gpu.wire_pipeline);
            rpass.set_bind_group(0, &gpu.bind_group, &[gpu.uniforms.offset(WIRE_SLOT)]);
            gpu.mesh.draw_edges(&mut rpass);
        }
    }
}

impl App for TexturedMeshRecipe {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let input = ctx.input_frame;
        if input.pressed(Key::Escape) || self.failed {
            return AppControl::Exit;
        }
        if input.pressed(Key::W) {
            self.wireframe = !self.wireframe;
            log::info!("wireframe overlay {}", if self.wireframe { "on" } else { "off" });
        }
        if input.pressed(Key::Space) {
            self.spin.toggle(ctx.time.elapsed);
            log::info!("rotation {}", if self.spin.is_paused() { "paused" } else { "resumed" });
        }
        self.angle = self.spin.angle(ctx.time.elapsed);

        update_fps_title(&mut self.fps, ctx.time.dt, TITLE, ctx.runtime);

        ctx.render(wgpu::Color::WHITE, |rctx, target| self.draw(rctx, target))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let (asset, texture) = load_duck()?;

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), TexturedMeshRecipe::new(asset, texture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_bitmap::BitmapFormat;

    #[test]
    fn starts_with_wireframe_overlay_and_rotation_running() {
        let recipe = TexturedMeshRecipe::new(MeshAsset::default(), Bitmap::new(1, 1, 4, BitmapFormat::U8));
        assert!(recipe.wireframe);
        assert!(!recipe.spin.is_paused());
    }
}
