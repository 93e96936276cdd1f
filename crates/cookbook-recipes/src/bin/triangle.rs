//! Hardcoded triangle: no buffers, positions and colors live in the shader.

use anyhow::Result;

use cookbook_engine::core::{App, AppControl, FrameCtx};
use cookbook_engine::device::GpuInit;
use cookbook_engine::input::Key;
use cookbook_engine::logging::{init_logging, LoggingConfig};
use cookbook_engine::render::{RenderCtx, RenderTarget};
use cookbook_engine::time::FpsCounter;
use cookbook_engine::window::{Runtime, RuntimeConfig};
use cookbook_recipes::{shaders, update_fps_title};

const TITLE: &str = "triangle";

#[derive(Default)]
struct TriangleRecipe {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    fps: FpsCounter,
}

impl TriangleRecipe {
    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = shaders::module(ctx.device, "triangle shader", shaders::TRIANGLE);

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("triangle pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("triangle pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
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
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.ensure_pipeline(ctx);
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.begin_pass("triangle pass");
        rpass.set_pipeline(pipeline);
        rpass.draw(0..3, 0..1);
    }
}

impl App for TriangleRecipe {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }
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
    Runtime::run(config, GpuInit::default(), TriangleRecipe::default())
}
