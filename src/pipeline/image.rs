//! Raw frame representation and tensor preprocessing.
//!
//! The camera hands the pipeline a packed 8-bit pixel buffer in whatever
//! channel order the driver produces.  Preprocessing is a fixed two-step
//! contract:
//!
//! 1. bilinear resize to the model's input geometry (fractional source
//!    coordinate per destination pixel, blend of the four neighbours),
//! 2. per-element conversion into the tensor element type — `f32` maps
//!    `[0,255]` onto `[-1,1]`, `u8` passes through for quantized models.

// ---------------------------------------------------------------------------
// RawFrame
// ---------------------------------------------------------------------------

/// Channel order of a packed pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    Rgb,
    /// Most capture drivers deliver BGR; converted before preprocessing.
    Bgr,
}

/// A packed 8-bit pixel buffer with known geometry.
///
/// `data.len()` is always `width * height * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub order: PixelOrder,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Wrap a packed buffer.  Panics in debug builds if the geometry and
    /// buffer length disagree.
    pub fn new(width: u32, height: u32, order: PixelOrder, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            order,
            data,
        }
    }

    /// Return the frame with channels in RGB order, converting if needed.
    pub fn into_rgb(mut self) -> Self {
        if self.order == PixelOrder::Bgr {
            for px in self.data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            self.order = PixelOrder::Rgb;
        }
        self
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * self.width + x) * 3) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

// ---------------------------------------------------------------------------
// Bilinear resize
// ---------------------------------------------------------------------------

/// Resize an RGB frame to `dst_w` × `dst_h` with bilinear interpolation.
///
/// For each destination pixel the fractional source coordinate is
/// `dst * src_dim / dst_dim`; the four nearest source pixels are blended
/// by the standard weights.  Callers must pass an RGB-ordered frame.
pub fn resize_bilinear(src: &RawFrame, dst_w: u32, dst_h: u32) -> RawFrame {
    debug_assert_eq!(src.order, PixelOrder::Rgb);

    if src.width == dst_w && src.height == dst_h {
        return src.clone();
    }

    let x_scale = src.width as f32 / dst_w as f32;
    let y_scale = src.height as f32 / dst_h as f32;
    let mut out = Vec::with_capacity((dst_w * dst_h * 3) as usize);

    for dy in 0..dst_h {
        let sy = dy as f32 * y_scale;
        let y0 = sy as u32;
        let y1 = (y0 + 1).min(src.height - 1);
        let fy = sy - y0 as f32;

        for dx in 0..dst_w {
            let sx = dx as f32 * x_scale;
            let x0 = sx as u32;
            let x1 = (x0 + 1).min(src.width - 1);
            let fx = sx - x0 as f32;

            let p00 = src.pixel(x0, y0);
            let p10 = src.pixel(x1, y0);
            let p01 = src.pixel(x0, y1);
            let p11 = src.pixel(x1, y1);

            for c in 0..3 {
                let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
                let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
                let v = top * (1.0 - fy) + bottom * fy;
                out.push(v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    RawFrame {
        width: dst_w,
        height: dst_h,
        order: PixelOrder::Rgb,
        data: out,
    }
}

// ---------------------------------------------------------------------------
// Tensor element conversion
// ---------------------------------------------------------------------------

/// Element types an input tensor can be built from.
pub trait TensorElem: Copy {
    /// Convert one 8-bit channel value into this element type.
    fn from_channel(v: u8) -> Self;
}

impl TensorElem for f32 {
    /// Floating-point models take inputs normalized to `[-1, 1]`.
    fn from_channel(v: u8) -> Self {
        (v as f32 - 127.5) / 127.5
    }
}

impl TensorElem for u8 {
    /// Quantized models take the raw unsigned channel value.
    fn from_channel(v: u8) -> Self {
        v
    }
}

/// Flatten an RGB frame into a row-major HWC tensor of `T`.
pub fn to_tensor<T: TensorElem>(frame: &RawFrame) -> Vec<T> {
    debug_assert_eq!(frame.order, PixelOrder::Rgb);
    frame.data.iter().map(|&v| T::from_channel(v)).collect()
}
