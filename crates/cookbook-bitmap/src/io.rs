use std::path::Path;

use crate::bitmap::{Bitmap, BitmapFormat, BitmapKind};
use crate::error::BitmapError;

/// Loads an HDR (or any decodable) image as a 3-channel float bitmap.
pub fn load_hdr(path: impl AsRef<Path>) -> Result<Bitmap, BitmapError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| BitmapError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb32f();
    let (w, h) = rgb.dimensions();
    log::debug!("loaded {} ({w}x{h}, rgb f32)", path.display());

    Bitmap::from_f32(w, h, 3, rgb.into_raw())
}

/// Loads an LDR image as a 4-channel 8-bit bitmap.
pub fn load_rgba8(path: impl AsRef<Path>) -> Result<Bitmap, BitmapError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| BitmapError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    log::debug!("loaded {} ({w}x{h}, rgba8)", path.display());

    Bitmap::from_u8(w, h, 4, rgba.into_raw())
}

/// Writes a flat bitmap to disk.
///
/// Float bitmaps are written as RGB float images (use an `.hdr` extension).
/// 8-bit bitmaps are written as RGB when they have at most three channels and
/// RGBA otherwise, in whatever format the extension names.
pub fn save(bitmap: &Bitmap, path: impl AsRef<Path>) -> Result<(), BitmapError> {
    let path = path.as_ref();
    if bitmap.kind() != BitmapKind::Flat {
        return Err(BitmapError::NotFlat);
    }

    let (w, h) = (bitmap.width(), bitmap.height());
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

    let result = match bitmap.format() {
        BitmapFormat::F32 => image::Rgb32FImage::from_fn(w, h, |x, y| {
            let [r, g, b, _] = bitmap.get_pixel(x, y);
            image::Rgb([r, g, b])
        })
        .save(path),
        BitmapFormat::U8 if bitmap.comp() <= 3 => image::RgbImage::from_fn(w, h, |x, y| {
            let [r, g, b, _] = bitmap.get_pixel(x, y);
            image::Rgb([to_u8(r), to_u8(g), to_u8(b)])
        })
        .save(path),
        BitmapFormat::U8 => image::RgbaImage::from_fn(w, h, |x, y| {
            image::Rgba(bitmap.get_pixel(x, y).map(to_u8))
        })
        .save(path),
    };
    result.map_err(|source| BitmapError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("wrote {} ({w}x{h})", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cookbook-bitmap-{}-{name}", std::process::id()))
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let path = scratch("rt.png");
        let src = Bitmap::from_u8(2, 1, 4, vec![255, 0, 0, 255, 0, 128, 255, 255]).unwrap();
        save(&src, &path).unwrap();

        let back = load_rgba8(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back, src);
    }

    #[test]
    fn hdr_round_trip_keeps_values_above_one() {
        let path = scratch("rt.hdr");
        let src = Bitmap::from_f32(1, 1, 3, vec![0.5, 1.0, 2.0]).unwrap();
        save(&src, &path).unwrap();

        let back = load_hdr(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let px = back.get_pixel(0, 0);
        for (got, want) in px[..3].iter().zip([0.5, 1.0, 2.0]) {
            assert!((got - want).abs() < 0.05, "got {got}, want {want}");
        }
    }

    #[test]
    fn rgb_bitmap_saves_as_jpeg() {
        let path = scratch("rgb.jpg");
        let src = Bitmap::from_u8(8, 8, 3, vec![200; 8 * 8 * 3]).unwrap();
        save(&src, &path).unwrap();

        let back = load_rgba8(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((back.width(), back.height()), (8, 8));
        let px = back.get_pixel(3, 3);
        assert!((px[0] - 200.0 / 255.0).abs() < 0.05, "got {}", px[0]);
        assert_eq!(px[3], 1.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_hdr("/definitely/not/here.hdr").unwrap_err();
        assert!(err.to_string().contains("not/here.hdr"));
    }

    #[test]
    fn cube_bitmaps_cannot_be_saved_directly() {
        let cube = Bitmap::new_cube(1, 1, 3, BitmapFormat::F32);
        assert!(matches!(save(&cube, scratch("cube.hdr")), Err(BitmapError::NotFlat)));
    }
}
