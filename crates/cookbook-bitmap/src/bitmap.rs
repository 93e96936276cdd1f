use crate::cube::CubeFace;
use crate::error::BitmapError;

/// Per-channel storage format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BitmapFormat {
    /// 8-bit unsigned normalized channels (LDR textures).
    U8,
    /// 32-bit float channels (HDR environment maps).
    F32,
}

/// Layout of the layers held by a bitmap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BitmapKind {
    /// A single 2D image (`depth == 1`).
    Flat,
    /// Six square-ish faces stacked in [`CubeFace`] order (`depth == 6`).
    Cube,
}

/// Channel storage. Pixels are tightly packed, row-major, layer after layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BitmapData {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl BitmapData {
    fn zeroed(format: BitmapFormat, len: usize) -> Self {
        match format {
            BitmapFormat::U8 => BitmapData::U8(vec![0; len]),
            BitmapFormat::F32 => BitmapData::F32(vec![0.0; len]),
        }
    }

    fn len(&self) -> usize {
        match self {
            BitmapData::U8(v) => v.len(),
            BitmapData::F32(v) => v.len(),
        }
    }

    /// Raw bytes of 8-bit data, `None` for float data.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            BitmapData::U8(v) => Some(v),
            BitmapData::F32(_) => None,
        }
    }
}

/// CPU image with 1..=4 channels of either `u8` or `f32` data.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    depth: u32,
    comp: u32,
    kind: BitmapKind,
    data: BitmapData,
}

impl Bitmap {
    /// Creates a zero-filled flat bitmap.
    ///
    /// Panics if `comp` is not in `1..=4`.
    pub fn new(width: u32, height: u32, comp: u32, format: BitmapFormat) -> Self {
        Self::zeroed(width, height, 1, comp, BitmapKind::Flat, format)
    }

    /// Creates a zero-filled cube bitmap with six `width x height` faces.
    ///
    /// Panics if `comp` is not in `1..=4`.
    pub fn new_cube(width: u32, height: u32, comp: u32, format: BitmapFormat) -> Self {
        Self::zeroed(width, height, 6, comp, BitmapKind::Cube, format)
    }

    fn zeroed(
        width: u32,
        height: u32,
        depth: u32,
        comp: u32,
        kind: BitmapKind,
        format: BitmapFormat,
    ) -> Self {
        assert!((1..=4).contains(&comp), "bitmap channel count must be 1..=4, got {comp}");
        let len = width as usize * height as usize * depth as usize * comp as usize;
        Self {
            width,
            height,
            depth,
            comp,
            kind,
            data: BitmapData::zeroed(format, len),
        }
    }

    /// Wraps existing 8-bit pixel data as a flat bitmap.
    pub fn from_u8(width: u32, height: u32, comp: u32, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        Self::from_data(width, height, comp, BitmapData::U8(pixels))
    }

    /// Wraps existing float pixel data as a flat bitmap.
    pub fn from_f32(width: u32, height: u32, comp: u32, pixels: Vec<f32>) -> Result<Self, BitmapError> {
        Self::from_data(width, height, comp, BitmapData::F32(pixels))
    }

    fn from_data(width: u32, height: u32, comp: u32, data: BitmapData) -> Result<Self, BitmapError> {
        if !(1..=4).contains(&comp) {
            return Err(BitmapError::BadChannelCount(comp));
        }
        let expected = width as usize * height as usize * comp as usize;
        if data.len() != expected {
            return Err(BitmapError::SizeMismatch { expected, actual: data.len() });
        }
        Ok(Self {
            width,
            height,
            depth: 1,
            comp,
            kind: BitmapKind::Flat,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers: 1 for flat bitmaps, 6 for cubes.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Channels per pixel.
    #[inline]
    pub fn comp(&self) -> u32 {
        self.comp
    }

    #[inline]
    pub fn kind(&self) -> BitmapKind {
        self.kind
    }

    #[inline]
    pub fn format(&self) -> BitmapFormat {
        match self.data {
            BitmapData::U8(_) => BitmapFormat::U8,
            BitmapData::F32(_) => BitmapFormat::F32,
        }
    }

    #[inline]
    pub fn data(&self) -> &BitmapData {
        &self.data
    }

    /// Reads pixel `(x, y)` of the first layer as RGBA.
    ///
    /// 8-bit channels are normalized to `[0, 1]`. Channels the bitmap does not
    /// store read as zero, except alpha which reads as one.
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.get_layer_pixel(0, x, y)
    }

    /// Writes pixel `(x, y)` of the first layer. Extra channels are dropped.
    ///
    /// 8-bit channels are clamped to `[0, 1]` and rounded.
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        self.set_layer_pixel(0, x, y, rgba);
    }

    pub(crate) fn get_layer_pixel(&self, layer: u32, x: u32, y: u32) -> [f32; 4] {
        let base = self.offset(layer, x, y);
        let n = self.comp as usize;
        let mut out = [0.0, 0.0, 0.0, 1.0];
        match &self.data {
            BitmapData::U8(v) => {
                for (c, dst) in out.iter_mut().take(n).enumerate() {
                    *dst = v[base + c] as f32 / 255.0;
                }
            }
            BitmapData::F32(v) => {
                out[..n].copy_from_slice(&v[base..base + n]);
            }
        }
        out
    }

    pub(crate) fn set_layer_pixel(&mut self, layer: u32, x: u32, y: u32, rgba: [f32; 4]) {
        let base = self.offset(layer, x, y);
        let n = self.comp as usize;
        match &mut self.data {
            BitmapData::U8(v) => {
                for (c, src) in rgba.iter().take(n).enumerate() {
                    v[base + c] = (src.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
            }
            BitmapData::F32(v) => {
                v[base..base + n].copy_from_slice(&rgba[..n]);
            }
        }
    }

    /// Copies one raw pixel (all channels) between bitmaps of identical format
    /// and channel count.
    pub(crate) fn copy_pixel_from(
        &mut self,
        dst: (u32, u32, u32),
        src_bitmap: &Bitmap,
        src: (u32, u32, u32),
    ) {
        debug_assert_eq!(self.comp, src_bitmap.comp);
        let n = self.comp as usize;
        let d = self.offset(dst.0, dst.1, dst.2);
        let s = src_bitmap.offset(src.0, src.1, src.2);
        match (&mut self.data, &src_bitmap.data) {
            (BitmapData::U8(dv), BitmapData::U8(sv)) => dv[d..d + n].copy_from_slice(&sv[s..s + n]),
            (BitmapData::F32(dv), BitmapData::F32(sv)) => dv[d..d + n].copy_from_slice(&sv[s..s + n]),
            _ => {
                let px = src_bitmap.get_layer_pixel(src.0, src.1, src.2);
                self.set_layer_pixel(dst.0, dst.1, dst.2, px);
            }
        }
    }

    #[inline]
    fn offset(&self, layer: u32, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height && layer < self.depth,
            "pixel ({x}, {y}, layer {layer}) out of bounds for {}x{}x{}",
            self.width,
            self.height,
            self.depth
        );
        let w = self.width as usize;
        let h = self.height as usize;
        ((layer as usize * h + y as usize) * w + x as usize) * self.comp as usize
    }

    /// Extracts one face of a cube bitmap as a flat bitmap.
    pub fn face(&self, face: CubeFace) -> Result<Bitmap, BitmapError> {
        if self.kind != BitmapKind::Cube {
            return Err(BitmapError::NotCube);
        }
        let layer_len = self.width as usize * self.height as usize * self.comp as usize;
        let start = face.index() as usize * layer_len;
        let range = start..start + layer_len;
        let data = match &self.data {
            BitmapData::U8(v) => BitmapData::U8(v[range].to_vec()),
            BitmapData::F32(v) => BitmapData::F32(v[range].to_vec()),
        };
        Self::from_data(self.width, self.height, self.comp, data)
    }

    /// Expands every layer to RGBA `f32`, the layout GPU uploads consume.
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * self.depth as usize * 4);
        for layer in 0..self.depth {
            for y in 0..self.height {
                for x in 0..self.width {
                    out.extend_from_slice(&self.get_layer_pixel(layer, x, y));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero_filled() {
        let b = Bitmap::new(4, 2, 3, BitmapFormat::F32);
        assert_eq!(b.depth(), 1);
        assert_eq!(b.kind(), BitmapKind::Flat);
        assert_eq!(b.get_pixel(3, 1), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn u8_write_clamps_and_rounds() {
        let mut b = Bitmap::new(1, 1, 4, BitmapFormat::U8);
        b.set_pixel(0, 0, [2.0, -1.0, 0.5, 1.0]);
        assert_eq!(b.data().as_u8(), Some(&[255u8, 0, 128, 255][..]));
        assert!(Bitmap::new(1, 1, 4, BitmapFormat::F32).data().as_u8().is_none());
    }

    #[test]
    fn u8_read_normalizes() {
        let b = Bitmap::from_u8(1, 1, 2, vec![255, 51]).unwrap();
        let px = b.get_pixel(0, 0);
        assert_eq!(px[0], 1.0);
        assert!((px[1] - 0.2).abs() < 1e-6);
        assert_eq!(px[2], 0.0);
        assert_eq!(px[3], 1.0);
    }

    #[test]
    fn f32_keeps_values_outside_unit_range() {
        let mut b = Bitmap::new(2, 2, 3, BitmapFormat::F32);
        b.set_pixel(1, 0, [12.5, 0.25, 3.0, 0.0]);
        assert_eq!(b.get_pixel(1, 0), [12.5, 0.25, 3.0, 1.0]);
        assert_eq!(b.get_pixel(0, 0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn from_data_rejects_wrong_length() {
        let err = Bitmap::from_f32(2, 2, 3, vec![0.0; 11]).unwrap_err();
        assert!(matches!(err, BitmapError::SizeMismatch { expected: 12, actual: 11 }));
    }

    #[test]
    fn from_data_rejects_bad_channel_count() {
        assert!(matches!(Bitmap::from_u8(1, 1, 0, vec![]), Err(BitmapError::BadChannelCount(0))));
        assert!(matches!(
            Bitmap::from_f32(1, 1, 5, vec![0.0; 5]),
            Err(BitmapError::BadChannelCount(5))
        ));
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_read_panics() {
        Bitmap::new(2, 2, 1, BitmapFormat::U8).get_pixel(2, 0);
    }

    #[test]
    fn face_of_flat_bitmap_is_an_error() {
        let b = Bitmap::new(2, 2, 1, BitmapFormat::U8);
        assert!(matches!(b.face(CubeFace::PositiveX), Err(BitmapError::NotCube)));
    }

    #[test]
    fn face_extracts_its_layer() {
        let mut cube = Bitmap::new_cube(2, 2, 1, BitmapFormat::F32);
        cube.set_layer_pixel(CubeFace::NegativeY.index(), 1, 1, [7.0, 0.0, 0.0, 0.0]);
        let face = cube.face(CubeFace::NegativeY).unwrap();
        assert_eq!(face.get_pixel(1, 1)[0], 7.0);
        assert_eq!(cube.face(CubeFace::PositiveY).unwrap().get_pixel(1, 1)[0], 0.0);
    }

    #[test]
    fn rgba_expansion_covers_all_layers() {
        let mut cube = Bitmap::new_cube(1, 1, 3, BitmapFormat::F32);
        cube.set_layer_pixel(5, 0, 0, [1.0, 2.0, 3.0, 0.0]);
        let rgba = cube.to_rgba_f32();
        assert_eq!(rgba.len(), 6 * 4);
        assert_eq!(&rgba[20..24], &[1.0, 2.0, 3.0, 1.0]);
    }
}
