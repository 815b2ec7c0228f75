//! Standalone conversion kernels for float working buffers.
use crate::channels::ChannelSet;
use crate::dispatch::RowBand;
use crate::image::Texel;
use crate::params::FloodParams;
use crate::srgb::to_srgb;

/// Quantises a float image in `[0, 1]` to the caller's scalar type,
/// optionally sRGB-encoding first. Inactive channels of the output are not
/// modified.
///
/// `out_image` covers exactly the rows of `band`; `input_image` is the full
/// float buffer.
pub fn convert_to_type<O: Texel>(
    width: usize,
    channel_stride: usize,
    input_image: &[f32],
    out_image: &mut [O],
    band: RowBand,
    params: &FloodParams,
) {
    let channels = ChannelSet::from_mask(params.channel_mask, channel_stride);

    for y in band.start..band.end {
        let row = y - band.start;
        for x in 0..width {
            let src = (y * width + x) * channel_stride;
            let dst = (row * width + x) * channel_stride;
            for c in channels.iter() {
                let v = input_image[src + c];
                out_image[dst + c] = O::from_unit(if params.convert_srgb {
                    to_srgb(v)
                } else {
                    v
                });
            }
        }
    }
}

/// In-place linear→sRGB re-encode of a float image's active channels.
pub fn convert_linear_to_srgb(
    width: usize,
    channel_stride: usize,
    image: &mut [f32],
    band: RowBand,
    params: &FloodParams,
) {
    let channels = ChannelSet::from_mask(params.channel_mask, channel_stride);

    for row in 0..band.len() {
        for x in 0..width {
            let px = (row * width + x) * channel_stride;
            for c in channels.iter() {
                image[px + c] = to_srgb(image[px + c]);
            }
        }
    }
}
