use serde::{Deserialize, Serialize};

/// Options controlling the flood pipeline.
///
/// The defaults match typical game-texture usage: only fully opaque texels
/// count as covered, no color-space conversion, all channels processed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodParams {
    /// Binarisation threshold on the normalised mask value; a texel is
    /// covered iff `value / type_max > coverage_threshold`.
    pub coverage_threshold: f32,
    /// Input colors are sRGB: decode to linear before averaging and
    /// re-encode on writeback.
    pub convert_srgb: bool,
    /// Renormalise the averaged channel vector (decoded as `2c - 1`) to
    /// unit length after each downsample.
    pub is_normal_map: bool,
    /// Bit-set of active channels; `0` means all channels up to the stride.
    pub channel_mask: u8,
    /// Downsample the last channel as a plain arithmetic mean instead of a
    /// coverage-weighted one.
    pub scale_alpha_unweighted: bool,
    /// Row-band parallelism cap; `0` picks half of the detected hardware
    /// threads.
    pub max_threads: u8,
}

impl Default for FloodParams {
    fn default() -> Self {
        Self {
            coverage_threshold: 0.999,
            convert_srgb: false,
            is_normal_map: false,
            channel_mask: 0,
            scale_alpha_unweighted: false,
            max_threads: 0,
        }
    }
}

impl FloodParams {
    pub fn with_coverage_threshold(mut self, threshold: f32) -> Self {
        self.coverage_threshold = threshold;
        self
    }

    pub fn with_convert_srgb(mut self, convert: bool) -> Self {
        self.convert_srgb = convert;
        self
    }

    pub fn with_normal_map(mut self, is_normal_map: bool) -> Self {
        self.is_normal_map = is_normal_map;
        self
    }

    pub fn with_channel_mask(mut self, mask: u8) -> Self {
        self.channel_mask = mask;
        self
    }

    pub fn with_scale_alpha_unweighted(mut self, unweighted: bool) -> Self {
        self.scale_alpha_unweighted = unweighted;
        self
    }

    pub fn with_max_threads(mut self, max_threads: u8) -> Self {
        self.max_threads = max_threads;
        self
    }
}
