//! Input-validation errors.
//!
//! Only the caller-facing setters can fail. Table addressing inside the chip
//! wraps at 16K and sprite overflow/collision are status flags, so neither
//! ever surfaces here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VdpError {
    /// Register snapshot did not contain exactly eight bytes.
    #[error("invalid register count: {actual} bytes (expected {expected})")]
    InvalidLength { expected: usize, actual: usize },
    /// VRAM write would run past the end of the 16K address space.
    #[error("VRAM write out of range: {len} bytes at offset {offset:#06X} exceeds {limit} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        limit: usize,
    },
}
