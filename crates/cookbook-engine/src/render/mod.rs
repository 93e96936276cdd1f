//! GPU rendering helpers shared by the recipes.
//!
//! Recipes own their pipelines; this module provides the pieces they all
//! need: the per-frame render context, uniform slots, textures, mesh buffers
//! and projection math.
//!
//! Convention:
//! - right-handed view space, camera looking down -Z
//! - clip-space depth in `[0, 1]`, cleared to 1.0 each frame

mod ctx;
mod mesh;
mod texture;
mod transform;
mod uniform;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{wireframe_edges, MeshBuffers};
pub use texture::{Cubemap, Texture2d};
pub use transform::{perspective, PerFrameData, FOV_Y_DEGREES, Z_FAR, Z_NEAR};
pub use uniform::UniformSlots;
