use std::path::PathBuf;

/// Errors produced by bitmap conversion and IO.
#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    #[error("expected a flat 2D bitmap, got a cube bitmap")]
    NotFlat,

    #[error("expected a cube bitmap, got a flat 2D bitmap")]
    NotCube,

    #[error("bitmap {width}x{height} is too small to hold cubemap faces")]
    TooSmall { width: u32, height: u32 },

    #[error("vertical cross must be 3 faces wide and 4 faces tall, got {width}x{height}")]
    BadCrossLayout { width: u32, height: u32 },

    #[error("bitmap channel count must be 1..=4, got {0}")]
    BadChannelCount(u32),

    #[error("pixel buffer holds {actual} values, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
