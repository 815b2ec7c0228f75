//! Image module: scalar texel abstraction, borrowed views over caller
//! buffers, and owned buffers for pyramid levels.
//!
//! Components
//! - `texel`: `Texel` trait over the supported scalar kinds (u8/u16/f32)
//!   plus the `TexelKind` runtime tag.
//! - `view`: read-only and mutable views borrowing caller-owned interleaved
//!   buffers, and the single-channel `MaskView`.
//! - `float`: owned interleaved f32 buffer used for mip levels.
//! - `mask`: owned 8-bit binary coverage mask.
//!
//! Design goals
//! - Ownership is explicit: views borrow external data, `FloatImage` and
//!   `CoverageMask` own and mutate.
//! - Kernels stay monomorphic over `Texel`; the scalar conversion (type
//!   maximum, quantisation rounding) lives in one place.
pub mod float;
pub mod mask;
pub mod texel;
pub mod view;

pub use self::float::FloatImage;
pub use self::mask::CoverageMask;
pub use self::texel::{Texel, TexelKind};
pub use self::view::{ImageView, ImageViewMut, MaskView};
