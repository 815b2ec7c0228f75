use super::texel::Texel;

/// Read-only view over a caller-owned interleaved pixel buffer.
///
/// Layout is dense row-major: component `c` of pixel `(x, y)` sits at
/// `(y * width + x) * channel_stride + c`, no per-row padding.
#[derive(Clone, Debug)]
pub struct ImageView<'a, T: Texel> {
    pub width: usize,
    pub height: usize,
    pub channel_stride: usize,
    pub data: &'a [T],
}

impl<'a, T: Texel> ImageView<'a, T> {
    pub fn new(width: usize, height: usize, channel_stride: usize, data: &'a [T]) -> Self {
        assert_eq!(
            data.len(),
            width * height * channel_stride,
            "image buffer length does not match {width}x{height}x{channel_stride}"
        );
        Self {
            width,
            height,
            channel_stride,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> T {
        self.data[(y * self.width + x) * self.channel_stride + c]
    }
}

/// Mutable view over a caller-owned interleaved pixel buffer.
#[derive(Debug)]
pub struct ImageViewMut<'a, T: Texel> {
    pub width: usize,
    pub height: usize,
    pub channel_stride: usize,
    pub data: &'a mut [T],
}

impl<'a, T: Texel> ImageViewMut<'a, T> {
    pub fn new(width: usize, height: usize, channel_stride: usize, data: &'a mut [T]) -> Self {
        assert_eq!(
            data.len(),
            width * height * channel_stride,
            "image buffer length does not match {width}x{height}x{channel_stride}"
        );
        Self {
            width,
            height,
            channel_stride,
            data,
        }
    }

    /// Borrow as a read-only view.
    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            channel_stride: self.channel_stride,
            data: &*self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> T {
        self.data[(y * self.width + x) * self.channel_stride + c]
    }
}

/// Read-only view over a caller-owned single-channel coverage mask.
#[derive(Clone, Debug)]
pub struct MaskView<'a, T: Texel> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [T],
}

impl<'a, T: Texel> MaskView<'a, T> {
    pub fn new(width: usize, height: usize, data: &'a [T]) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "mask buffer length does not match {width}x{height}"
        );
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }
}
