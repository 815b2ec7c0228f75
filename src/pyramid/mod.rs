//! Mip pyramid: parallel sequences of float images and binary coverage
//! masks, halving in size per level.
//!
//! Level 0 is half the original image size (the original itself is not
//! stored). The pyramid owns its buffers; dropping it releases every level.
use crate::image::{CoverageMask, FloatImage};

/// Number of pyramid levels generated for a `width × height` image:
/// `⌊log₂ min(width, height)⌋`.
pub fn mip_count(width: usize, height: usize) -> usize {
    let min_dim = width.min(height);
    if min_dim == 0 {
        0
    } else {
        min_dim.ilog2() as usize
    }
}

/// One pyramid level: a float image and its binary coverage mask.
#[derive(Clone, Debug)]
pub struct MipLevel {
    pub image: FloatImage,
    pub mask: CoverageMask,
}

impl MipLevel {
    pub fn new(width: usize, height: usize, channel_stride: usize) -> Self {
        Self {
            image: FloatImage::new(width, height, channel_stride),
            mask: CoverageMask::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.image.width
    }

    pub fn height(&self) -> usize {
        self.image.height
    }
}

/// Owning container for all generated levels, finest first.
#[derive(Clone, Debug, Default)]
pub struct MipPyramid {
    pub levels: Vec<MipLevel>,
}

impl MipPyramid {
    pub fn with_capacity(levels: usize) -> Self {
        Self {
            levels: Vec::with_capacity(levels),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The half-size level the flood composites back from.
    pub fn finest(&self) -> Option<&MipLevel> {
        self.levels.first()
    }

    pub fn coarsest(&self) -> Option<&MipLevel> {
        self.levels.last()
    }
}
