//! Coverage-weighted 2×2 downscale kernels.
use crate::channels::ChannelSet;
use crate::dispatch::RowBand;
use crate::image::Texel;
use crate::params::FloodParams;
use crate::srgb::to_linear;

/// Initial downscale: reads the caller's typed image, produces the first
/// half-size float mip and its binary coverage mask.
///
/// Each output pixel averages the covered texels of its 2×2 source block,
/// normalised into `[0, 1]` (and linearised first when `convert_srgb` is
/// set). Coverage comes from `input_mask`, or from the last channel of the
/// image when no mask is supplied. Uncovered output pixels are zeroed in
/// every channel, active or not, so mip buffers can be exported as-is.
///
/// With `scale_alpha_unweighted` the last channel instead stores the plain
/// mean of the four normalised mask values, but only while that channel is
/// active; an inactive last channel stays zeroed like any other.
///
/// `out_image` and `out_mask` cover exactly the rows of `band`.
#[allow(clippy::too_many_arguments)]
pub fn convert_and_scale_down_weighted<I: Texel, M: Texel>(
    out_width: usize,
    channel_stride: usize,
    input_image: &[I],
    input_mask: Option<&[M]>,
    out_image: &mut [f32],
    out_mask: &mut [u8],
    band: RowBand,
    params: &FloodParams,
) {
    let channels = ChannelSet::from_mask(params.channel_mask, channel_stride);
    let input_width = out_width * 2;

    for y in band.start..band.end {
        let row = y - band.start;
        for x in 0..out_width {
            let mut src = [
                2 * y * input_width + 2 * x,
                2 * y * input_width + 2 * x + 1,
                (2 * y + 1) * input_width + 2 * x,
                (2 * y + 1) * input_width + 2 * x + 1,
            ];

            let mut coverage = [0.0f32; 4];
            if let Some(mask) = input_mask {
                for (m, &i) in coverage.iter_mut().zip(src.iter()) {
                    *m = mask[i].to_unit();
                }
            }
            // all image accesses below are strided
            for i in src.iter_mut() {
                *i *= channel_stride;
            }
            // mask absent: the last channel, usually alpha, is the coverage
            // source (the miniscule sRGB difference is ignored here)
            if input_mask.is_none() {
                for (m, &i) in coverage.iter_mut().zip(src.iter()) {
                    *m = input_image[i + channel_stride - 1].to_unit();
                }
            }
            let covered = coverage.map(|m| m > params.coverage_threshold);
            let covered_count = covered.iter().filter(|&&c| c).count();

            let out_px = (row * out_width + x) * channel_stride;
            for c in 0..channel_stride {
                if covered_count == 0 || !channels.has(c) {
                    out_image[out_px + c] = 0.0;
                    continue;
                }
                if c == channel_stride - 1 && params.scale_alpha_unweighted {
                    out_image[out_px + c] = coverage.iter().sum::<f32>() / 4.0;
                    continue;
                }
                let mut sum = 0.0;
                for k in 0..4 {
                    if covered[k] {
                        let v = input_image[src[k] + c].to_unit();
                        sum += if params.convert_srgb { to_linear(v) } else { v };
                    }
                }
                out_image[out_px + c] = sum / covered_count as f32;
            }
            out_mask[row * out_width + x] = (covered_count > 0) as u8;

            if params.is_normal_map && covered_count > 0 {
                renormalize(
                    &mut out_image[out_px..out_px + channel_stride],
                    channels,
                );
            }
        }
    }
}

/// Subsequent downscale: float mip plus binary mask in, half-size float mip
/// plus binary mask out.
///
/// Uncovered source texels already hold zero from the previous level, so
/// the weighted mean is a plain sum divided by the covered-child count. No
/// color-space or type conversion happens past the first level.
#[allow(clippy::too_many_arguments)]
pub fn scale_down_weighted(
    out_width: usize,
    channel_stride: usize,
    input_image: &[f32],
    input_mask: &[u8],
    out_image: &mut [f32],
    out_mask: &mut [u8],
    band: RowBand,
    params: &FloodParams,
) {
    let channels = ChannelSet::from_mask(params.channel_mask, channel_stride);
    let input_width = out_width * 2;

    for y in band.start..band.end {
        let row = y - band.start;
        for x in 0..out_width {
            let mut src = [
                2 * y * input_width + 2 * x,
                2 * y * input_width + 2 * x + 1,
                (2 * y + 1) * input_width + 2 * x,
                (2 * y + 1) * input_width + 2 * x + 1,
            ];

            let covered_count: u32 = src.iter().map(|&i| input_mask[i] as u32).sum();

            for i in src.iter_mut() {
                *i *= channel_stride;
            }

            let out_px = (row * out_width + x) * channel_stride;
            for c in 0..channel_stride {
                if covered_count == 0 || !channels.has(c) {
                    out_image[out_px + c] = 0.0;
                    continue;
                }
                let sum: f32 = src.iter().map(|&i| input_image[i + c]).sum();
                if c == channel_stride - 1 && params.scale_alpha_unweighted {
                    out_image[out_px + c] = sum / 4.0;
                } else {
                    out_image[out_px + c] = sum / covered_count as f32;
                }
            }
            out_mask[row * out_width + x] = (covered_count > 0) as u8;

            if params.is_normal_map && covered_count > 0 {
                renormalize(
                    &mut out_image[out_px..out_px + channel_stride],
                    channels,
                );
            }
        }
    }
}

/// Rescales the active channels of one pixel to a unit vector, decoding
/// components as `n = 2c - 1`. Near-zero vectors are left untouched.
fn renormalize(pixel: &mut [f32], channels: ChannelSet) {
    let mut mag_sq = 0.0;
    for c in channels.iter() {
        let n = pixel[c] * 2.0 - 1.0;
        mag_sq += n * n;
    }
    if mag_sq < 1e-4 {
        return;
    }
    let mag = mag_sq.sqrt();
    for c in channels.iter() {
        let n = pixel[c] * 2.0 - 1.0;
        pixel[c] = (n / mag + 1.0) / 2.0;
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
    fn averages_only_covered_texels() {
        // 4x4 single channel, alpha doubles as mask, checkerboard of 1.0/0.0
        let input: Vec<f32> = (0..16)
            .map(|i| if (i / 4 + i % 4) % 2 == 0 { 1.0 } else { 0.0 })
            .collect();
        let params = FloodParams::default().with_coverage_threshold(0.5);
        let mut out = vec![-1.0f32; 4];
        let mut mask = vec![9u8; 4];
        convert_and_scale_down_weighted::<f32, u8>(
            2,
            1,
            &input,
            None,
            &mut out,
            &mut mask,
            full_band(2),
            &params,
        );
        assert_eq!(out, vec![1.0; 4]);
        assert_eq!(mask, vec![1; 4]);
    }

    #[test]
    fn uncovered_blocks_zero_all_channels() {
        let input = vec![0.7f32; 2 * 2 * 3];
        let mask = vec![0u8; 4];
        let params = FloodParams::default().with_channel_mask(0b001);
        let mut out = vec![-1.0f32; 3];
        let mut out_mask = vec![9u8; 1];
        convert_and_scale_down_weighted::<f32, u8>(
            1,
            3,
            &input,
            Some(&mask),
            &mut out,
            &mut out_mask,
            full_band(1),
            &params,
        );
        // inactive channels zeroed too, not left at their old value
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
        assert_eq!(out_mask, vec![0]);
    }

    #[test]
    fn srgb_inputs_are_linearised_before_averaging() {
        // two black and two white sRGB texels, all covered
        let input: Vec<u8> = vec![0, 0, 255, 255];
        let mask = vec![255u8; 4];
        let params = FloodParams::default()
            .with_convert_srgb(true)
            .with_coverage_threshold(0.5);
        let mut out = vec![0.0f32; 1];
        let mut out_mask = vec![0u8; 1];
        convert_and_scale_down_weighted::<u8, u8>(
            1,
            1,
            &input,
            Some(&mask),
            &mut out,
            &mut out_mask,
            full_band(1),
            &params,
        );
        let expect = (to_linear(0.0) + to_linear(1.0)) / 2.0;
        assert!((out[0] - expect).abs() < 1e-6);
        // sRGB-space averaging would have landed at to_linear(0.5) instead
        assert!((out[0] - to_linear(0.5)).abs() > 0.1);
    }

    #[test]
    fn subsequent_level_sums_zeroed_holes() {
        // previous level zeroes uncovered texels, so sum/count is the mean
        let input = vec![0.6f32, 0.0, 0.0, 0.2];
        let mask = vec![1u8, 0, 0, 1];
        let params = FloodParams::default();
        let mut out = vec![0.0f32; 1];
        let mut out_mask = vec![0u8; 1];
        scale_down_weighted(
            1,
            1,
            &input,
            &mask,
            &mut out,
            &mut out_mask,
            full_band(1),
            &params,
        );
        assert!((out[0] - 0.4).abs() < 1e-6);
        assert_eq!(out_mask, vec![1]);
    }

    #[test]
    fn unweighted_alpha_stores_mean_coverage() {
        // RGBA where alpha is the coverage source; one opaque texel
        let mut input = vec![0.0f32; 2 * 2 * 4];
        input[0..4].copy_from_slice(&[0.5, 0.5, 0.5, 1.0]);
        let params = FloodParams::default().with_scale_alpha_unweighted(true);
        let mut out = vec![0.0f32; 4];
        let mut out_mask = vec![0u8; 1];
        convert_and_scale_down_weighted::<f32, u8>(
            1,
            4,
            &input,
            None,
            &mut out,
            &mut out_mask,
            full_band(1),
            &params,
        );
        assert_eq!(out[3], 0.25);
        assert_eq!(out[0], 0.5);
    }

    #[test]
    fn inactive_alpha_is_zeroed_even_when_unweighted() {
        let mut input = vec![0.0f32; 2 * 2 * 4];
        input[0..4].copy_from_slice(&[0.5, 0.5, 0.5, 1.0]);
        let params = FloodParams::default()
            .with_scale_alpha_unweighted(true)
            .with_channel_mask(0b0111);
        let mut out = vec![0.0f32; 4];
        let mut out_mask = vec![0u8; 1];
        convert_and_scale_down_weighted::<f32, u8>(
            1,
            4,
            &input,
            None,
            &mut out,
            &mut out_mask,
            full_band(1),
            &params,
        );
        assert_eq!(out[3], 0.0);
        assert_eq!(out[0], 0.5);
    }

    #[test]
    fn normal_maps_renormalise_to_unit_length() {
        // average of +X and +Y unit normals has length sqrt(2)/2; the two
        // uncovered texels hold zero like a real previous level would
        let input = vec![
            1.0f32, 0.5, 0.5, // (1, 0, 0)
            0.5, 1.0, 0.5, // (0, 1, 0)
            0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0,
        ];
        let mask = vec![1u8, 1, 0, 0];
        let params = FloodParams::default().with_normal_map(true);
        let mut out = vec![0.0f32; 3];
        let mut out_mask = vec![0u8; 1];
        scale_down_weighted(
            1,
            3,
            &input,
            &mask,
            &mut out,
            &mut out_mask,
            full_band(1),
            &params,
        );
        let n: Vec<f32> = out.iter().map(|c| c * 2.0 - 1.0).collect();
        let mag = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((mag - 1.0).abs() < 1e-5);
        assert!((n[0] - n[1]).abs() < 1e-6, "x and y stay symmetric");
    }

    #[test]
    fn near_zero_normals_skip_renormalisation() {
        let mut pixel = [0.5f32, 0.5, 0.5];
        renormalize(&mut pixel, ChannelSet::first_n(3));
        assert_eq!(pixel, [0.5, 0.5, 0.5]);
    }
}
