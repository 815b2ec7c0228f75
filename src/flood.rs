//! Pipeline orchestrators: mip generation, upward compositing, and the
//! full flood.
//!
//! Inputs are validated before any allocation or kernel invocation; kernels
//! themselves have no failure modes.
use log::debug;

use crate::dispatch::{BandPlan, RowBand};
use crate::error::{FloodError, FloodResult};
use crate::image::{FloatImage, ImageView, ImageViewMut, MaskView, Texel};
use crate::kernels;
use crate::params::FloodParams;
use crate::pyramid::{mip_count, MipLevel, MipPyramid};

fn validate_dimensions(width: usize, height: usize) -> FloodResult<()> {
    if width < 2 || height < 2 || !width.is_power_of_two() || !height.is_power_of_two() {
        return Err(FloodError::UnsupportedDimensions { width, height });
    }
    Ok(())
}

fn validate_stride(channel_stride: usize) -> FloodResult<()> {
    if channel_stride == 0 || channel_stride > 8 {
        return Err(FloodError::UnsupportedChannelStride(channel_stride));
    }
    Ok(())
}

/// Builds the full mip pyramid for `image`.
///
/// Level 0 is half the image size; each further level halves again down to
/// `⌊log₂ min(W, H)⌋` levels total. Coverage comes from `mask`, or from the
/// image's last channel when `mask` is `None`.
pub fn generate_mips<I: Texel, M: Texel>(
    image: &ImageView<'_, I>,
    mask: Option<&MaskView<'_, M>>,
    params: &FloodParams,
) -> FloodResult<MipPyramid> {
    validate_dimensions(image.width, image.height)?;
    validate_stride(image.channel_stride)?;
    if let Some(mask) = mask {
        debug_assert_eq!(
            (mask.width, mask.height),
            (image.width, image.height),
            "mask must match image dimensions"
        );
    }

    let level_count = mip_count(image.width, image.height);
    let stride = image.channel_stride;
    debug!(
        "generate_mips start {}x{}x{} levels={}",
        image.width, image.height, stride, level_count
    );

    let mut pyramid = MipPyramid::with_capacity(level_count);

    let (mut width, mut height) = (image.width / 2, image.height / 2);
    let mut level = MipLevel::new(width, height, stride);
    let plan = BandPlan::new(width, height, stride, params.max_threads as usize);
    plan.run_pair(
        &mut level.image.data[..],
        width * stride,
        &mut level.mask.data[..],
        width,
        |band, img, msk| {
            kernels::convert_and_scale_down_weighted(
                width,
                stride,
                image.data,
                mask.map(|m| m.data),
                img,
                msk,
                band,
                params,
            );
        },
    );
    pyramid.levels.push(level);

    for _ in 1..level_count {
        width /= 2;
        height /= 2;
        let mut next = MipLevel::new(width, height, stride);
        {
            let prev = pyramid.levels.last().expect("previous level available");
            let plan = BandPlan::new(width, height, stride, params.max_threads as usize);
            plan.run_pair(
                &mut next.image.data[..],
                width * stride,
                &mut next.mask.data[..],
                width,
                |band, img, msk| {
                    kernels::scale_down_weighted(
                        width,
                        stride,
                        &prev.image.data,
                        &prev.mask.data,
                        img,
                        msk,
                        band,
                        params,
                    );
                },
            );
        }
        debug!("generate_mips level {}x{}", width, height);
        pyramid.levels.push(next);
    }

    Ok(pyramid)
}

/// Fills the holes of every level from the level below it, coarsest first.
///
/// Afterwards every pixel of every level carries defined color data in the
/// active channels: its own downscale where covered, the nearest coarser
/// color where not.
pub fn composite_mips(pyramid: &mut MipPyramid, params: &FloodParams) -> FloodResult<()> {
    if let Some(level) = pyramid.levels.first() {
        validate_stride(level.image.channel_stride)?;
    }

    for i in (0..pyramid.levels.len().saturating_sub(1)).rev() {
        let (finer_levels, coarser_levels) = pyramid.levels.split_at_mut(i + 1);
        let finer = &mut finer_levels[i];
        let coarse = &coarser_levels[0];
        let (coarse_width, coarse_height) = (coarse.width(), coarse.height());
        let stride = coarse.image.channel_stride;

        let plan = BandPlan::new(
            coarse_width,
            coarse_height,
            stride,
            params.max_threads as usize,
        );
        let fine_width = finer.image.width;
        let fine_mask = &finer.mask.data;
        let coarse_data = &coarse.image.data;
        plan.run_single(
            &mut finer.image.data[..],
            fine_width * stride * 2,
            |band, fine_img| {
                kernels::composite_up(
                    coarse_width,
                    stride,
                    coarse_data,
                    fine_img,
                    fine_mask,
                    band,
                    params,
                );
            },
        );
        debug!(
            "composite_mips level {} filled from {}x{}",
            i, coarse_width, coarse_height
        );
    }
    Ok(())
}

/// Runs the full flood: builds the pyramid, composites it, then writes the
/// diffused colors back into the uncovered region of `image`.
///
/// Texels whose binarised coverage is 1 are left untouched; everything else
/// receives the nearest-neighbour upscale of mip level 0, quantised to the
/// image's scalar type (sRGB-encoded first when `params.convert_srgb`).
/// Pyramid memory is released before returning.
pub fn flood_image<I: Texel, M: Texel>(
    image: &mut ImageViewMut<'_, I>,
    mask: Option<&MaskView<'_, M>>,
    params: &FloodParams,
) -> FloodResult<()> {
    validate_dimensions(image.width, image.height)?;
    validate_stride(image.channel_stride)?;

    let mut pyramid = generate_mips(&image.as_view(), mask, params)?;
    composite_mips(&mut pyramid, params)?;

    let level0 = pyramid.finest().expect("validated image yields a level");
    let (mip_width, mip_height) = (level0.width(), level0.height());
    let stride = image.channel_stride;
    let out_row_elems = image.width * stride * 2;

    let plan = BandPlan::new(mip_width, mip_height, stride, params.max_threads as usize);
    let mip_data = &level0.image.data;
    plan.run_single(&mut image.data[..], out_row_elems, |band, out| {
        kernels::final_composite_and_convert(
            mip_width,
            stride,
            mip_data,
            out,
            mask.map(|m| m.data),
            band,
            params,
        );
    });
    debug!("flood_image done {}x{}", image.width, image.height);
    Ok(())
}

/// Quantises a float working image to the caller's scalar type.
pub fn convert_image<O: Texel>(
    input: &FloatImage,
    output: &mut ImageViewMut<'_, O>,
    params: &FloodParams,
) -> FloodResult<()> {
    validate_stride(input.channel_stride)?;
    assert_eq!(
        (input.width, input.height, input.channel_stride),
        (output.width, output.height, output.channel_stride),
        "conversion buffers must agree in shape"
    );

    let (width, height, stride) = (input.width, input.height, input.channel_stride);
    let plan = BandPlan::new(width, height, stride, params.max_threads as usize);
    plan.run_single(&mut output.data[..], width * stride, |band, out| {
        kernels::convert_to_type(width, stride, &input.data, out, band, params);
    });
    Ok(())
}

/// Row-range variant of [`convert_image`] for callers driving their own
/// partitioning; runs on the calling thread.
pub fn convert_image_rows<O: Texel>(
    input: &FloatImage,
    output: &mut ImageViewMut<'_, O>,
    start_row: usize,
    end_row: usize,
    params: &FloodParams,
) -> FloodResult<()> {
    validate_stride(input.channel_stride)?;
    assert_eq!(
        (input.width, input.height, input.channel_stride),
        (output.width, output.height, output.channel_stride),
        "conversion buffers must agree in shape"
    );
    if start_row >= end_row || end_row > input.height {
        return Err(FloodError::StartRowOutOfBounds {
            start: start_row,
            end: end_row,
            rows: input.height,
        });
    }

    let (width, stride) = (input.width, input.channel_stride);
    let band = RowBand {
        start: start_row,
        end: end_row,
    };
    let out = &mut output.data[start_row * width * stride..end_row * width * stride];
    kernels::convert_to_type(width, stride, &input.data, out, band, params);
    Ok(())
}

/// In-place linear→sRGB re-encode of a float working image.
pub fn encode_srgb(image: &mut FloatImage, params: &FloodParams) -> FloodResult<()> {
    validate_stride(image.channel_stride)?;

    let (width, height, stride) = (image.width, image.height, image.channel_stride);
    let plan = BandPlan::new(width, height, stride, params.max_threads as usize);
    plan.run_single(&mut image.data[..], width * stride, |band, img| {
        kernels::convert_linear_to_srgb(width, stride, img, band, params);
    });
    Ok(())
}
