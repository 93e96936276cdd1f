//! Cookbook engine crate.
//!
//! Owns the platform + GPU runtime pieces shared by the recipe programs:
//! window and event loop, device/surface/depth management, per-frame
//! context, input, timing and a few small render helpers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
