//! CPU-side bitmaps and the equirectangular -> cubemap conversion.
//!
//! An equirectangular panorama is first remapped into a vertical cross
//! (3x4 grid of face-sized cells), then the cross is sliced into six faces
//! ordered the way GPU cube textures expect them: +X, -X, +Y, -Y, +Z, -Z.

mod bitmap;
mod cube;
mod error;
mod io;

pub use bitmap::{Bitmap, BitmapData, BitmapFormat, BitmapKind};
pub use cube::{equirect_to_vertical_cross, face_direction, vertical_cross_to_faces, CubeFace};
pub use error::BitmapError;
pub use io::{load_hdr, load_rgba8, save};
