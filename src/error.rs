use thiserror::Error;

/// Fatal input validation errors reported before any packing work happens.
///
/// These indicate a bug in the calling code rather than a condition the
/// packer can recover from. Items that are merely too large for the
/// configured page size are not errors; they come back in the output's
/// not-packed list instead.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Input item {index} has size {width}x{height}, but items must be at least 1x1.")]
    InvalidItemSize {
        index: usize,
        width: u32,
        height: u32,
    },

    #[error("The maximum page size {width}x{height} must be nonzero on both axes.")]
    InvalidMaxSize { width: u32, height: u32 },
}
