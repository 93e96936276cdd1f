//! Rotating cube drawn twice per frame: filled, then as a black wireframe.
//!
//! Keys: `W` toggles the wireframe pass, `Space` pauses rotation.

use anyhow::Result;
use glam::{Mat4, Vec3};

use cookbook_engine::core::{App, AppControl, FrameCtx};
use cookbook_engine::device::GpuInit;
use cookbook_engine::input::Key;
use cookbook_engine::logging::{init_logging, LoggingConfig};
use cookbook_engine::render::{perspective, MeshBuffers, PerFrameData, RenderCtx, RenderTarget, UniformSlots};
use cookbook_engine::time::FpsCounter;
use cookbook_engine::window::{Runtime, RuntimeConfig};
use cookbook_recipes::geometry::{cube, PositionVertex};
use cookbook_recipes::spin::Spin;
use cookbook_recipes::{shaders, update_fps_title};

const TITLE: &str = "cube";

const FILL_SLOT: u32 = 0;
const WIRE_SLOT: u32 = 1;

/// GPU objects, created on the first frame.
struct CubeGpu {
    format: wgpu::TextureFormat,
    fill_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    uniforms: UniformSlots<PerFrameData>,
    bind_group: wgpu::BindGroup,
    mesh: MeshBuffers,
}

impl CubeGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let shader = shaders::module(ctx.device, "cube shader", shaders::CUBE);

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cube bgl"),
            entries: &[UniformSlots::<PerFrameData>::layout_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube pipeline layout"),
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
                    buffers: &[PositionVertex::layout()],
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

        // Fill is pushed back so the edges drawn on top do not z-fight.
        let fill_pipeline = pipeline(
            "cube fill pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        );
        let wire_pipeline = pipeline(
            "cube wireframe pipeline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::DepthBiasState::default(),
        );

        let uniforms = UniformSlots::<PerFrameData>::new(ctx.device, 2, "cube per-frame ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cube bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding(),
            }],
        });

        let (vertices, indices) = cube();
        let mesh = MeshBuffers::new(ctx, &vertices, &indices, "cube");

        Self {
            format: ctx.surface_format,
            fill_pipeline,
            wire_pipeline,
            uniforms,
            bind_group,
            mesh,
        }
    }
}

struct CubeRecipe {
    gpu: Option<CubeGpu>,
    fps: FpsCounter,
    /// Rotation angle in radians; advances with wall-clock time unless paused.
    angle: f32,
    spin: Spin,
    wireframe: bool,
}

impl CubeRecipe {
    fn new() -> Self {
        Self {
            gpu: None,
            fps: FpsCounter::default(),
            angle: 0.0,
            spin: Spin::default(),
            wireframe: true,
        }
    }

    fn ensure_gpu(&mut self, ctx: &RenderCtx<'_>) {
        if self.gpu.as_ref().is_some_and(|g| g.format == ctx.surface_format) {
            return;
        }
        self.gpu = Some(CubeGpu::new(ctx));
    }

    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.ensure_gpu(ctx);
        let Some(gpu) = self.gpu.as_ref() else { return };

        let model = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.5))
            * Mat4::from_axis_angle(Vec3::ONE.normalize(), self.angle);
        let mvp = perspective(ctx.aspect_ratio()) * model;

        gpu.uniforms.write(ctx.queue, FILL_SLOT, &PerFrameData::new(mvp, false));
        gpu.uniforms.write(ctx.queue, WIRE_SLOT, &PerFrameData::new(mvp, true));

        let mut rpass = target.begin_pass("cube pass");

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

impl App for CubeRecipe {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let input = ctx.input_frame;
        if input.pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if input.pressed(Key::W) {
            self.wireframe = !self.wireframe;
            log::info!("wireframe pass {}", if self.wireframe { "on" } else { "off" });
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

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), CubeRecipe::new())
}
