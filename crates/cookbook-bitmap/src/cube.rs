use std::f32::consts::{FRAC_PI_2, PI};

use crate::bitmap::{Bitmap, BitmapKind};
use crate::error::BitmapError;

/// Cubemap face, in GPU array-layer order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Array layer of this face in a cube texture.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Short file-name friendly tag (`px`, `nx`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "px",
            CubeFace::NegativeX => "nx",
            CubeFace::PositiveY => "py",
            CubeFace::NegativeY => "ny",
            CubeFace::PositiveZ => "pz",
            CubeFace::NegativeZ => "nz",
        }
    }

    /// Source pixel in a vertical cross for pixel `(i, j)` of this face.
    ///
    /// ```text
    ///        +----+
    ///        | +Y |
    ///   +----+----+----+
    ///   | +X | -Z | -X |
    ///   +----+----+----+
    ///        | -Y |
    ///        +----+
    ///        | +Z |
    ///        +----+
    /// ```
    ///
    /// The top and the two bottom cells are stored rotated by 180 degrees.
    fn cross_source(self, i: u32, j: u32, fw: u32, fh: u32, cross_h: u32) -> (u32, u32) {
        match self {
            CubeFace::PositiveX => (i, fh + j),
            CubeFace::NegativeX => (2 * fw + i, fh + j),
            CubeFace::PositiveY => (2 * fw - (i + 1), fh - (j + 1)),
            CubeFace::NegativeY => (2 * fw - (i + 1), 3 * fh - (j + 1)),
            CubeFace::PositiveZ => (2 * fw - (i + 1), cross_h - (j + 1)),
            CubeFace::NegativeZ => (fw + i, fh + j),
        }
    }
}

/// Direction (not normalized) through pixel `(i, j)` of face `face` of a cube
/// with `face_size` pixels per edge, in the panorama's coordinate frame.
///
/// Face indices follow the vertical-cross cells filled by
/// [`equirect_to_vertical_cross`], not [`CubeFace`] order.
pub fn face_direction(i: u32, j: u32, face: u32, face_size: u32) -> [f32; 3] {
    let a = 2.0 * i as f32 / face_size as f32;
    let b = 2.0 * j as f32 / face_size as f32;

    match face {
        0 => [-1.0, a - 1.0, b - 1.0],
        1 => [a - 1.0, -1.0, 1.0 - b],
        2 => [1.0, a - 1.0, 1.0 - b],
        3 => [1.0 - a, 1.0, 1.0 - b],
        4 => [b - 1.0, a - 1.0, 1.0],
        5 => [1.0 - b, a - 1.0, -1.0],
        _ => [0.0, 0.0, 0.0],
    }
}

/// Remaps an equirectangular panorama into a vertical cross.
///
/// Face size is `width / 4`; the result is `3 * fs` wide and `4 * fs` tall
/// with the source's channel count and format. Cells outside the cross are
/// left zeroed. Samples are bilinear with coordinates clamped to the image.
pub fn equirect_to_vertical_cross(src: &Bitmap) -> Result<Bitmap, BitmapError> {
    if src.kind() != BitmapKind::Flat {
        return Err(BitmapError::NotFlat);
    }

    let fs = src.width() / 4;
    if fs == 0 || src.height() == 0 {
        return Err(BitmapError::TooSmall {
            width: src.width(),
            height: src.height(),
        });
    }

    let mut out = Bitmap::new(fs * 3, fs * 4, src.comp(), src.format());

    // Top-left corner of each face cell inside the cross.
    let offsets = [
        (fs, fs * 3),
        (0, fs),
        (fs, fs),
        (fs * 2, fs),
        (fs, 0),
        (fs, fs * 2),
    ];

    let max_u = src.width() as i64 - 1;
    let max_v = src.height() as i64 - 1;
    let scale = 2.0 * fs as f32;

    for (face, &(ox, oy)) in offsets.iter().enumerate() {
        for i in 0..fs {
            for j in 0..fs {
                let p = face_direction(i, j, face as u32, fs);
                let r = p[0].hypot(p[1]);
                let theta = p[1].atan2(p[0]);
                let phi = p[2].atan2(r);

                let uf = scale * (theta + PI) / PI;
                let vf = scale * (FRAC_PI_2 - phi) / PI;

                let u1 = (uf.floor() as i64).clamp(0, max_u);
                let v1 = (vf.floor() as i64).clamp(0, max_v);
                let u2 = (u1 + 1).clamp(0, max_u);
                let v2 = (v1 + 1).clamp(0, max_v);

                let s = (uf - u1 as f32).clamp(0.0, 1.0);
                let t = (vf - v1 as f32).clamp(0.0, 1.0);

                let a = src.get_pixel(u1 as u32, v1 as u32);
                let b = src.get_pixel(u2 as u32, v1 as u32);
                let c = src.get_pixel(u1 as u32, v2 as u32);
                let d = src.get_pixel(u2 as u32, v2 as u32);

                let mut color = [0.0f32; 4];
                for (k, out_c) in color.iter_mut().enumerate() {
                    *out_c = a[k] * (1.0 - s) * (1.0 - t)
                        + b[k] * s * (1.0 - t)
                        + c[k] * (1.0 - s) * t
                        + d[k] * s * t;
                }

                out.set_pixel(i + ox, j + oy, color);
            }
        }
    }

    log::debug!(
        "equirect {}x{} -> vertical cross {}x{} (face {fs})",
        src.width(),
        src.height(),
        out.width(),
        out.height()
    );

    Ok(out)
}

/// Slices a vertical cross into a cube bitmap with faces in [`CubeFace`] order.
pub fn vertical_cross_to_faces(src: &Bitmap) -> Result<Bitmap, BitmapError> {
    if src.kind() != BitmapKind::Flat {
        return Err(BitmapError::NotFlat);
    }

    let (w, h) = (src.width(), src.height());
    if w % 3 != 0 || h % 4 != 0 {
        return Err(BitmapError::BadCrossLayout { width: w, height: h });
    }

    let fw = w / 3;
    let fh = h / 4;
    if fw == 0 || fh == 0 {
        return Err(BitmapError::TooSmall { width: w, height: h });
    }

    let mut cube = Bitmap::new_cube(fw, fh, src.comp(), src.format());

    for face in CubeFace::ALL {
        for j in 0..fh {
            for i in 0..fw {
                let (x, y) = face.cross_source(i, j, fw, fh, h);
                cube.copy_pixel_from((face.index(), i, j), src, (0, x, y));
            }
        }
    }

    Ok(cube)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::BitmapFormat;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// 16x8 single-channel panorama where each pixel stores `f(x, y)`.
    fn panorama(f: impl Fn(u32, u32) -> f32) -> Bitmap {
        let mut b = Bitmap::new(16, 8, 1, BitmapFormat::F32);
        for y in 0..8 {
            for x in 0..16 {
                b.set_pixel(x, y, [f(x, y), 0.0, 0.0, 0.0]);
            }
        }
        b
    }

    // ── face_direction ───────────────────────────────────────────────────

    #[test]
    fn face_centers_point_along_axes() {
        let expected = [
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for (face, dir) in expected.iter().enumerate() {
            assert_eq!(face_direction(4, 4, face as u32, 8), *dir, "face {face}");
        }
    }

    #[test]
    fn face_corner_spans_minus_one() {
        assert_eq!(face_direction(0, 0, 0, 8), [-1.0, -1.0, -1.0]);
        assert_eq!(face_direction(0, 0, 4, 8), [-1.0, -1.0, 1.0]);
    }

    // ── equirect_to_vertical_cross ───────────────────────────────────────

    #[test]
    fn cross_has_three_by_four_faces() {
        let cross = equirect_to_vertical_cross(&panorama(|_, _| 0.0)).unwrap();
        assert_eq!((cross.width(), cross.height()), (12, 16));
        assert_eq!(cross.comp(), 1);
        assert_eq!(cross.format(), BitmapFormat::F32);
    }

    #[test]
    fn constant_panorama_fills_only_cross_cells() {
        let cross = equirect_to_vertical_cross(&panorama(|_, _| 2.5)).unwrap();
        // Inside the central column and the middle row.
        assert!(approx(cross.get_pixel(5, 1)[0], 2.5));
        assert!(approx(cross.get_pixel(1, 5)[0], 2.5));
        assert!(approx(cross.get_pixel(10, 6)[0], 2.5));
        assert!(approx(cross.get_pixel(6, 14)[0], 2.5));
        // Corners of the grid are not part of the cross.
        assert_eq!(cross.get_pixel(0, 0)[0], 0.0);
        assert_eq!(cross.get_pixel(11, 15)[0], 0.0);
        assert_eq!(cross.get_pixel(9, 2)[0], 0.0);
    }

    #[test]
    fn up_face_samples_top_row_and_side_face_samples_equator() {
        let cross = equirect_to_vertical_cross(&panorama(|_, y| y as f32)).unwrap();
        // Face 4 (+Z direction) occupies the top cell; its center looks at the pole.
        assert!(approx(cross.get_pixel(6, 2)[0], 0.0));
        // Face 1 (-Y direction) occupies the left cell; its center is on the equator.
        assert!(approx(cross.get_pixel(2, 6)[0], 4.0));
    }

    #[test]
    fn longitude_is_clamped_at_the_seam() {
        let cross = equirect_to_vertical_cross(&panorama(|x, _| x as f32)).unwrap();
        // Face 2 looks along +X: theta = 0, middle of the panorama.
        assert!(approx(cross.get_pixel(6, 6)[0], 8.0));
        // Face 0 looks along -X: theta = pi, clamped to the last column.
        assert!(approx(cross.get_pixel(6, 14)[0], 15.0));
    }

    #[test]
    fn bilinear_sampling_reproduces_a_linear_ramp() {
        // Bilinear interpolation is exact on `x + 100 y`, so every sample of the
        // +X face equals the ramp evaluated at its fractional source position.
        let fs = 5;
        let mut src = Bitmap::new(4 * fs, 2 * fs, 1, BitmapFormat::F32);
        for y in 0..src.height() {
            for x in 0..src.width() {
                src.set_pixel(x, y, [x as f32 + 100.0 * y as f32, 0.0, 0.0, 0.0]);
            }
        }
        let cross = equirect_to_vertical_cross(&src).unwrap();

        let mut fractional = 0;
        for i in 0..fs {
            for j in 0..fs {
                let p = face_direction(i, j, 2, fs);
                let theta = p[1].atan2(p[0]);
                let phi = p[2].atan2(p[0].hypot(p[1]));
                let uf = 2.0 * fs as f32 * (theta + PI) / PI;
                let vf = 2.0 * fs as f32 * (FRAC_PI_2 - phi) / PI;
                if uf.fract() != 0.0 && vf.fract() != 0.0 {
                    fractional += 1;
                }

                let want = uf + 100.0 * vf;
                let got = cross.get_pixel(i + fs, j + fs)[0];
                assert!((got - want).abs() < 1e-2, "({i},{j}) uf={uf} vf={vf} want={want} got={got}");
            }
        }
        assert!(fractional > 0);
    }

    #[test]
    fn u8_panorama_stays_u8() {
        let src = Bitmap::new(8, 4, 3, BitmapFormat::U8);
        let cross = equirect_to_vertical_cross(&src).unwrap();
        assert_eq!(cross.format(), BitmapFormat::U8);
        assert_eq!(cross.comp(), 3);
    }

    #[test]
    fn too_narrow_panorama_is_rejected() {
        let src = Bitmap::new(3, 2, 3, BitmapFormat::F32);
        assert!(matches!(
            equirect_to_vertical_cross(&src),
            Err(BitmapError::TooSmall { width: 3, height: 2 })
        ));
    }

    #[test]
    fn cube_input_is_rejected() {
        let src = Bitmap::new_cube(4, 4, 3, BitmapFormat::F32);
        assert!(matches!(equirect_to_vertical_cross(&src), Err(BitmapError::NotFlat)));
        assert!(matches!(vertical_cross_to_faces(&src), Err(BitmapError::NotFlat)));
    }

    // ── vertical_cross_to_faces ──────────────────────────────────────────

    /// 6x8 cross (2x2 faces) where each pixel stores its own linear index.
    fn indexed_cross() -> Bitmap {
        let mut b = Bitmap::new(6, 8, 1, BitmapFormat::F32);
        for y in 0..8 {
            for x in 0..6 {
                b.set_pixel(x, y, [(y * 6 + x) as f32, 0.0, 0.0, 0.0]);
            }
        }
        b
    }

    fn face_px(cube: &Bitmap, face: CubeFace, i: u32, j: u32) -> f32 {
        cube.face(face).unwrap().get_pixel(i, j)[0]
    }

    fn id(x: u32, y: u32) -> f32 {
        (y * 6 + x) as f32
    }

    #[test]
    fn faces_are_read_from_their_cross_cells() {
        let cube = vertical_cross_to_faces(&indexed_cross()).unwrap();
        assert_eq!(cube.kind(), BitmapKind::Cube);
        assert_eq!((cube.width(), cube.height(), cube.depth()), (2, 2, 6));

        assert_eq!(face_px(&cube, CubeFace::PositiveX, 0, 0), id(0, 2));
        assert_eq!(face_px(&cube, CubeFace::PositiveX, 1, 1), id(1, 3));
        assert_eq!(face_px(&cube, CubeFace::NegativeX, 0, 0), id(4, 2));
        assert_eq!(face_px(&cube, CubeFace::NegativeZ, 1, 0), id(3, 2));
    }

    #[test]
    fn top_and_bottom_cells_are_rotated() {
        let cube = vertical_cross_to_faces(&indexed_cross()).unwrap();
        assert_eq!(face_px(&cube, CubeFace::PositiveY, 0, 0), id(3, 1));
        assert_eq!(face_px(&cube, CubeFace::PositiveY, 1, 1), id(2, 0));
        assert_eq!(face_px(&cube, CubeFace::NegativeY, 0, 0), id(3, 5));
        assert_eq!(face_px(&cube, CubeFace::PositiveZ, 0, 0), id(3, 7));
        assert_eq!(face_px(&cube, CubeFace::PositiveZ, 1, 1), id(2, 6));
    }

    #[test]
    fn cross_with_bad_proportions_is_rejected() {
        let src = Bitmap::new(7, 8, 1, BitmapFormat::U8);
        assert!(matches!(
            vertical_cross_to_faces(&src),
            Err(BitmapError::BadCrossLayout { width: 7, height: 8 })
        ));
        let empty = Bitmap::new(0, 0, 1, BitmapFormat::U8);
        assert!(matches!(vertical_cross_to_faces(&empty), Err(BitmapError::TooSmall { .. })));
    }

    #[test]
    fn panorama_converts_to_six_square_faces() {
        let cross = equirect_to_vertical_cross(&panorama(|x, y| (x + y) as f32)).unwrap();
        let cube = vertical_cross_to_faces(&cross).unwrap();
        assert_eq!((cube.width(), cube.height(), cube.depth()), (4, 4, 6));
        // -Z face is the central cell of the cross, copied as is.
        assert_eq!(cube.face(CubeFace::NegativeZ).unwrap().get_pixel(1, 2), cross.get_pixel(5, 6));
    }
}
