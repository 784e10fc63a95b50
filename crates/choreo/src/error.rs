//! Error types for animation construction.

use thiserror::Error;

use crate::value::EncodeError;

/// Errors that can occur while building an animation tree.
///
/// Duration arithmetic never fails; only malformed composition and values
/// the encoder rejects are errors. A bare leaf with an automatic span is a
/// contract violation and panics instead (see
/// [`Animation::property`](crate::Animation::property)).
///
/// # Recovery Strategies
///
/// | Error Variant | Recovery Strategy |
/// |--------------|-------------------|
/// | [`UnreachableChild`](Error::UnreachableChild) | Move the endless child last, or group it instead |
/// | [`Encode`](Error::Encode) | Fix the offending endpoint or keyframe value |
/// | [`InvalidKeyTimes`](Error::InvalidKeyTimes) | Supply sorted key times in `[0, 1]` |
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A sequence child that never ends is followed by more children.
    ///
    /// The children after `index` could never start.
    #[error("sequence child {index} of {len} never ends, so the children after it are unreachable")]
    UnreachableChild {
        /// Position of the endless child.
        index: usize,
        /// Number of children in the sequence.
        len: usize,
    },

    /// A value could not be encoded for the engine.
    #[error("value encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// Keyframe timing was inconsistent.
    #[error("invalid key times: {0}")]
    InvalidKeyTimes(String),
}

/// A specialized [`Result`] type for animation construction.
pub type Result<T> = std::result::Result<T, Error>;
