//! Helpers shared by the recipe binaries under `src/bin/`.
//!
//! Each recipe is a standalone program; what lives here is only what more
//! than one of them needs.

pub mod assets;
pub mod camera;
pub mod geometry;
pub mod mesh;
pub mod shaders;
pub mod spin;

use cookbook_engine::time::FpsCounter;
use cookbook_engine::window::RuntimeCtx;

/// Refreshes the window title with the averaged frame rate.
pub fn update_fps_title(fps: &mut FpsCounter, dt: f32, base: &str, runtime: &mut RuntimeCtx) {
    if let Some(avg) = fps.tick(dt) {
        runtime.set_title(format!("{base} | {avg:.1} fps"));
    }
}
