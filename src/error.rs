pub type FloodResult<T> = Result<T, FloodError>;

/// Stable numeric status codes for adapter layers (FFI wrappers, tooling).
///
/// The discriminants are part of the wire contract and must not change.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Unknown = 0,
    Success = 1,
    UnsupportedDimensions = 2,
    UnsupportedDataType = 3,
    UnsupportedChannelStride = 4,
    StartRowOutOfBounds = 5,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Maps a legacy boolean return to a status.
    pub fn from_legacy(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Unknown
        }
    }
}

impl<T> From<&FloodResult<T>> for Status {
    fn from(result: &FloodResult<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FloodError {
    #[error("image dimensions {width}x{height} must be powers of two, at least 2x2")]
    UnsupportedDimensions { width: usize, height: usize },

    #[error("unknown data type tag {0}")]
    UnsupportedDataType(u8),

    #[error("channel stride {0} outside supported range 1..=8")]
    UnsupportedChannelStride(usize),

    #[error("row range {start}..{end} out of bounds for {rows} rows")]
    StartRowOutOfBounds {
        start: usize,
        end: usize,
        rows: usize,
    },
}

impl FloodError {
    pub fn status(&self) -> Status {
        match self {
            FloodError::UnsupportedDimensions { .. } => Status::UnsupportedDimensions,
            FloodError::UnsupportedDataType(_) => Status::UnsupportedDataType,
            FloodError::UnsupportedChannelStride(_) => Status::UnsupportedChannelStride,
            FloodError::StartRowOutOfBounds { .. } => Status::StartRowOutOfBounds,
        }
    }
}
