#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod error;
pub mod flood;
pub mod image;
pub mod params;
pub mod pyramid;

// Building blocks – still public, but considered unstable internals.
pub mod channels;
pub mod dispatch;
pub mod dynamic;
pub mod kernels;
pub mod srgb;

// --- High-level re-exports -------------------------------------------------

// Main entry points: the flood pipeline + results.
pub use crate::flood::{
    composite_mips, convert_image, convert_image_rows, encode_srgb, flood_image, generate_mips,
};
pub use crate::pyramid::{mip_count, MipLevel, MipPyramid};

// Buffer views and scalar abstraction.
pub use crate::image::{
    CoverageMask, FloatImage, ImageView, ImageViewMut, MaskView, Texel, TexelKind,
};

// Options and error surface.
pub use crate::channels::{channel_mask_from_array, ChannelSet};
pub use crate::error::{FloodError, FloodResult, Status};
pub use crate::params::FloodParams;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use mipflood::prelude::*;
///
/// let mut rgba = vec![0u8; 4 * 4 * 4];
/// rgba[0..4].copy_from_slice(&[10, 20, 30, 255]);
///
/// let mut image = ImageViewMut::new(4, 4, 4, &mut rgba);
/// flood_image::<u8, u8>(&mut image, None, &FloodParams::default()).unwrap();
/// assert_eq!(&rgba[4..7], &[10, 20, 30]);
/// ```
pub mod prelude {
    pub use crate::flood::{composite_mips, flood_image, generate_mips};
    pub use crate::image::{ImageView, ImageViewMut, MaskView};
    pub use crate::params::FloodParams;
}
