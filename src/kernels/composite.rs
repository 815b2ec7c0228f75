//! Upward compositing kernels: nearest-neighbour hole filling from coarser
//! levels.
use crate::channels::ChannelSet;
use crate::dispatch::RowBand;
use crate::image::Texel;
use crate::params::FloodParams;
use crate::srgb::to_srgb;

/// Fills the holes of a finer mip from the coarser mip below it.
///
/// Each coarse pixel maps onto a 2×2 block of the finer level; active
/// channels of finer texels whose mask is zero are overwritten with the
/// coarse color, covered texels keep their own data. The finer mask is
/// read-only.
///
/// `band` ranges over coarse rows; `fine_image` covers the corresponding
/// doubled row range `2*band.start..2*band.end`, while `fine_mask` is the
/// full finer-level mask.
pub fn composite_up(
    coarse_width: usize,
    channel_stride: usize,
    coarse_image: &[f32],
    fine_image: &mut [f32],
    fine_mask: &[u8],
    band: RowBand,
    params: &FloodParams,
) {
    let channels = ChannelSet::from_mask(params.channel_mask, channel_stride);
    let fine_width = coarse_width * 2;

    for y in band.start..band.end {
        let row = y - band.start;
        for x in 0..coarse_width {
            let local = [
                2 * row * fine_width + 2 * x,
                2 * row * fine_width + 2 * x + 1,
                (2 * row + 1) * fine_width + 2 * x,
                (2 * row + 1) * fine_width + 2 * x + 1,
            ];
            let hole = [
                fine_mask[2 * y * fine_width + 2 * x] == 0,
                fine_mask[2 * y * fine_width + 2 * x + 1] == 0,
                fine_mask[(2 * y + 1) * fine_width + 2 * x] == 0,
                fine_mask[(2 * y + 1) * fine_width + 2 * x + 1] == 0,
            ];

            let src = (y * coarse_width + x) * channel_stride;
            for c in channels.iter() {
                let color = coarse_image[src + c];
                for k in 0..4 {
                    if hole[k] {
                        fine_image[local[k] * channel_stride + c] = color;
                    }
                }
            }
        }
    }
}

/// Composites mip level 1 back into the uncovered region of the original
/// image, quantising to the caller's scalar type.
///
/// Coverage is re-binarised per original texel from the caller's mask (or
/// the image's own last channel when absent). Covered texels are untouched
/// byte-for-byte; holes receive the mip color, sRGB-encoded first when
/// requested.
///
/// `band` ranges over mip rows; `out_image` covers original rows
/// `2*band.start..2*band.end`, and `mask`, when present, is the full-size
/// original mask.
#[allow(clippy::too_many_arguments)]
pub fn final_composite_and_convert<O: Texel, M: Texel>(
    mip_width: usize,
    channel_stride: usize,
    mip_image: &[f32],
    out_image: &mut [O],
    mask: Option<&[M]>,
    band: RowBand,
    params: &FloodParams,
) {
    let channels = ChannelSet::from_mask(params.channel_mask, channel_stride);
    let out_width = mip_width * 2;

    for y in band.start..band.end {
        let row = y - band.start;
        for x in 0..mip_width {
            let local = [
                2 * row * out_width + 2 * x,
                2 * row * out_width + 2 * x + 1,
                (2 * row + 1) * out_width + 2 * x,
                (2 * row + 1) * out_width + 2 * x + 1,
            ];

            let mut coverage = [0.0f32; 4];
            match mask {
                Some(mask) => {
                    let abs = [
                        2 * y * out_width + 2 * x,
                        2 * y * out_width + 2 * x + 1,
                        (2 * y + 1) * out_width + 2 * x,
                        (2 * y + 1) * out_width + 2 * x + 1,
                    ];
                    for (m, &i) in coverage.iter_mut().zip(abs.iter()) {
                        *m = mask[i].to_unit();
                    }
                }
                None => {
                    for (m, &i) in coverage.iter_mut().zip(local.iter()) {
                        *m = out_image[i * channel_stride + channel_stride - 1].to_unit();
                    }
                }
            }
            let hole = coverage.map(|m| m <= params.coverage_threshold);

            let src = (y * mip_width + x) * channel_stride;
            for c in channels.iter() {
                let v = mip_image[src + c];
                let color = O::from_unit(if params.convert_srgb { to_srgb(v) } else { v });
                for k in 0..4 {
                    if hole[k] {
                        out_image[local[k] * channel_stride + c] = color;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_band(height: usize) -> RowBand {
        RowBand {
            start: 0,
            end: height,
        }
    }

    #[test]
    fn composite_fills_only_holes() {
        // 1x1 coarse -> 2x2 fine, one covered fine texel keeps its color
        let coarse = vec![0.9f32];
        let mut fine = vec![0.1f32, 0.0, 0.0, 0.0];
        let fine_mask = vec![1u8, 0, 0, 0];
        composite_up(
            1,
            1,
            &coarse,
            &mut fine,
            &fine_mask,
            full_band(1),
            &FloodParams::default(),
        );
        assert_eq!(fine, vec![0.1, 0.9, 0.9, 0.9]);
    }

    #[test]
    fn composite_skips_inactive_channels() {
        let coarse = vec![0.9f32, 0.8];
        let mut fine = vec![0.0f32; 4 * 2];
        let fine_mask = vec![0u8; 4];
        let params = FloodParams::default().with_channel_mask(0b01);
        composite_up(1, 2, &coarse, &mut fine, &fine_mask, full_band(1), &params);
        for px in fine.chunks_exact(2) {
            assert_eq!(px, &[0.9, 0.0]);
        }
    }

    #[test]
    fn final_composite_preserves_covered_texels() {
        // 2x2 mip -> 4x4 u8 image, explicit u8 mask covering one texel
        let mip = vec![0.5f32; 4];
        let mut image = vec![7u8; 16];
        let mut mask = vec![0u8; 16];
        mask[5] = 255;
        final_composite_and_convert::<u8, u8>(
            2,
            1,
            &mip,
            &mut image,
            Some(&mask),
            full_band(2),
            &FloodParams::default(),
        );
        for (i, &v) in image.iter().enumerate() {
            if i == 5 {
                assert_eq!(v, 7, "covered texel must stay byte-identical");
            } else {
                assert_eq!(v, 128, "hole must hold the quantised mip color");
            }
        }
    }

    #[test]
    fn final_composite_encodes_srgb_on_writeback() {
        let mip = vec![0.5f32];
        let mut image = vec![0u8; 4];
        let mask = vec![0u8; 4];
        let params = FloodParams::default().with_convert_srgb(true);
        final_composite_and_convert::<u8, u8>(
            1,
            1,
            &mip,
            &mut image,
            Some(&mask),
            full_band(1),
            &params,
        );
        let expect = (to_srgb(0.5) * 255.0 + 0.5) as u8;
        assert_eq!(image, vec![expect; 4]);
        assert_ne!(expect, 128);
    }

    #[test]
    fn final_composite_infers_coverage_from_alpha() {
        // RG + alpha, no separate mask; opaque texel (0,0) survives
        let mip = vec![0.25f32, 0.5, 1.0];
        let mut image = vec![0.0f32; 4 * 3];
        image[0..3].copy_from_slice(&[0.9, 0.8, 1.0]);
        final_composite_and_convert::<f32, u8>(
            1,
            3,
            &mip,
            &mut image,
            None,
            full_band(1),
            &FloodParams::default(),
        );
        assert_eq!(&image[0..3], &[0.9, 0.8, 1.0]);
        assert_eq!(&image[3..6], &[0.25, 0.5, 1.0]);
        assert_eq!(&image[9..12], &[0.25, 0.5, 1.0]);
    }
}
