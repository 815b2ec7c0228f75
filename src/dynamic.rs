//! Runtime-tagged dispatch over the supported scalar kinds.
//!
//! Adapter layers (FFI wrappers, asset tooling) know buffer types only as
//! tags at runtime. This module carries type-erased buffer enums, `from_tag`
//! constructors that validate a raw tag byte against an untyped byte buffer,
//! and a small matcher that forwards each `(image kind, mask kind)`
//! combination to the monomorphised generic entry points in
//! [`crate::flood`]. An unknown tag is reported as
//! [`FloodError::UnsupportedDataType`](crate::error::FloodError) before any
//! buffer is constructed or touched.

use crate::error::FloodResult;
use crate::image::{ImageView, ImageViewMut, MaskView, Texel, TexelKind};
use crate::params::FloodParams;
use crate::pyramid::MipPyramid;

/// Type-erased mutable image buffer.
#[derive(Debug)]
pub enum ImageData<'a> {
    U8(&'a mut [u8]),
    U16(&'a mut [u16]),
    F32(&'a mut [f32]),
}

impl<'a> ImageData<'a> {
    /// Interprets a raw byte buffer as the scalar kind named by `tag`.
    ///
    /// An unknown tag is rejected before the buffer is looked at. The buffer
    /// must be sized and aligned for the tagged kind.
    pub fn from_tag(tag: u8, bytes: &'a mut [u8]) -> FloodResult<Self> {
        Ok(match TexelKind::from_tag(tag)? {
            TexelKind::U8 => ImageData::U8(bytes),
            TexelKind::U16 => ImageData::U16(
                bytemuck::try_cast_slice_mut(bytes).expect("image buffer not laid out for u16"),
            ),
            TexelKind::F32 => ImageData::F32(
                bytemuck::try_cast_slice_mut(bytes).expect("image buffer not laid out for f32"),
            ),
        })
    }

    pub fn kind(&self) -> TexelKind {
        match self {
            ImageData::U8(_) => TexelKind::U8,
            ImageData::U16(_) => TexelKind::U16,
            ImageData::F32(_) => TexelKind::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImageData::U8(data) => data.len(),
            ImageData::U16(data) => data.len(),
            ImageData::F32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type-erased read-only coverage mask buffer.
#[derive(Clone, Copy, Debug)]
pub enum MaskData<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    F32(&'a [f32]),
}

impl<'a> MaskData<'a> {
    /// Interprets a raw byte buffer as the scalar kind named by `tag`.
    ///
    /// An unknown tag is rejected before the buffer is looked at. The buffer
    /// must be sized and aligned for the tagged kind.
    pub fn from_tag(tag: u8, bytes: &'a [u8]) -> FloodResult<Self> {
        Ok(match TexelKind::from_tag(tag)? {
            TexelKind::U8 => MaskData::U8(bytes),
            TexelKind::U16 => MaskData::U16(
                bytemuck::try_cast_slice(bytes).expect("mask buffer not laid out for u16"),
            ),
            TexelKind::F32 => MaskData::F32(
                bytemuck::try_cast_slice(bytes).expect("mask buffer not laid out for f32"),
            ),
        })
    }

    pub fn kind(&self) -> TexelKind {
        match self {
            MaskData::U8(_) => TexelKind::U8,
            MaskData::U16(_) => TexelKind::U16,
            MaskData::F32(_) => TexelKind::F32,
        }
    }
}

/// Tag-dispatched [`crate::flood::generate_mips`].
pub fn generate_mips(
    image: &ImageData<'_>,
    width: usize,
    height: usize,
    channel_stride: usize,
    mask: Option<MaskData<'_>>,
    params: &FloodParams,
) -> FloodResult<MipPyramid> {
    match image {
        ImageData::U8(data) => {
            generate_with_image(&data[..], width, height, channel_stride, mask, params)
        }
        ImageData::U16(data) => {
            generate_with_image(&data[..], width, height, channel_stride, mask, params)
        }
        ImageData::F32(data) => {
            generate_with_image(&data[..], width, height, channel_stride, mask, params)
        }
    }
}

fn generate_with_image<I: Texel>(
    data: &[I],
    width: usize,
    height: usize,
    channel_stride: usize,
    mask: Option<MaskData<'_>>,
    params: &FloodParams,
) -> FloodResult<MipPyramid> {
    let image = ImageView::new(width, height, channel_stride, data);
    match mask {
        None => crate::flood::generate_mips::<I, u8>(&image, None, params),
        Some(MaskData::U8(m)) => {
            crate::flood::generate_mips(&image, Some(&MaskView::new(width, height, m)), params)
        }
        Some(MaskData::U16(m)) => {
            crate::flood::generate_mips(&image, Some(&MaskView::new(width, height, m)), params)
        }
        Some(MaskData::F32(m)) => {
            crate::flood::generate_mips(&image, Some(&MaskView::new(width, height, m)), params)
        }
    }
}

/// Tag-dispatched [`crate::flood::flood_image`].
pub fn flood_image(
    image: ImageData<'_>,
    width: usize,
    height: usize,
    channel_stride: usize,
    mask: Option<MaskData<'_>>,
    params: &FloodParams,
) -> FloodResult<()> {
    match image {
        ImageData::U8(data) => flood_with_image(data, width, height, channel_stride, mask, params),
        ImageData::U16(data) => flood_with_image(data, width, height, channel_stride, mask, params),
        ImageData::F32(data) => flood_with_image(data, width, height, channel_stride, mask, params),
    }
}

fn flood_with_image<I: Texel>(
    data: &mut [I],
    width: usize,
    height: usize,
    channel_stride: usize,
    mask: Option<MaskData<'_>>,
    params: &FloodParams,
) -> FloodResult<()> {
    let mut image = ImageViewMut::new(width, height, channel_stride, data);
    match mask {
        None => crate::flood::flood_image::<I, u8>(&mut image, None, params),
        Some(MaskData::U8(m)) => {
            crate::flood::flood_image(&mut image, Some(&MaskView::new(width, height, m)), params)
        }
        Some(MaskData::U16(m)) => {
            crate::flood::flood_image(&mut image, Some(&MaskView::new(width, height, m)), params)
        }
        Some(MaskData::F32(m)) => {
            crate::flood::flood_image(&mut image, Some(&MaskView::new(width, height, m)), params)
        }
    }
}

/// Raw-tag variant of [`generate_mips`] for callers holding untyped byte
/// buffers. Both tags are validated before anything is dispatched.
pub fn generate_mips_tagged(
    image: &mut [u8],
    image_tag: u8,
    width: usize,
    height: usize,
    channel_stride: usize,
    mask: Option<(&[u8], u8)>,
    params: &FloodParams,
) -> FloodResult<MipPyramid> {
    let image = ImageData::from_tag(image_tag, image)?;
    let mask = match mask {
        None => None,
        Some((bytes, tag)) => Some(MaskData::from_tag(tag, bytes)?),
    };
    generate_mips(&image, width, height, channel_stride, mask, params)
}

/// Raw-tag variant of [`flood_image`] for callers holding untyped byte
/// buffers, e.g. an FFI boundary. Both tags are validated before anything
/// is dispatched or mutated.
pub fn flood_image_tagged(
    image: &mut [u8],
    image_tag: u8,
    width: usize,
    height: usize,
    channel_stride: usize,
    mask: Option<(&[u8], u8)>,
    params: &FloodParams,
) -> FloodResult<()> {
    let image = ImageData::from_tag(image_tag, image)?;
    let mask = match mask {
        None => None,
        Some((bytes, tag)) => Some(MaskData::from_tag(tag, bytes)?),
    };
    flood_image(image, width, height, channel_stride, mask, params)
}

/// Tag-dispatched [`crate::flood::convert_image`].
pub fn convert_image(
    input: &crate::image::FloatImage,
    output: &mut ImageData<'_>,
    params: &FloodParams,
) -> FloodResult<()> {
    let (width, height, stride) = (input.width, input.height, input.channel_stride);
    match output {
        ImageData::U8(data) => crate::flood::convert_image(
            input,
            &mut ImageViewMut::new(width, height, stride, &mut data[..]),
            params,
        ),
        ImageData::U16(data) => crate::flood::convert_image(
            input,
            &mut ImageViewMut::new(width, height, stride, &mut data[..]),
            params,
        ),
        ImageData::F32(data) => crate::flood::convert_image(
            input,
            &mut ImageViewMut::new(width, height, stride, &mut data[..]),
            params,
        ),
    }
}
