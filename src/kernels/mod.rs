//! Pure, deterministic per-row kernels.
//!
//! Every kernel processes a half-open row band of its output and is safe to
//! run concurrently with other bands of the same invocation: inputs are
//! shared read-only slices indexed by absolute row, outputs are the band's
//! own disjoint slices indexed relative to `band.start`. Passing a band of
//! `0..height` together with full output buffers gives the single-threaded
//! behavior.
//!
//! Kernels have no failure modes; callers validate dimensions and strides
//! before invoking them.

mod composite;
mod convert;
mod downscale;

pub use composite::{composite_up, final_composite_and_convert};
pub use convert::{convert_linear_to_srgb, convert_to_type};
pub use downscale::{convert_and_scale_down_weighted, scale_down_weighted};
