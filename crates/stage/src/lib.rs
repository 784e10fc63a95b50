#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! # Stage
//!
//! Runs [`choreo`] animations on visual targets.
//!
//! A [`Layer`] is the stand-in for a platform's animatable surface. It
//! keeps a local clock that can be paused and resumed, holds a lowered
//! snapshot of every attached animation, and calls completion callbacks
//! when attachments finish.
//!
//! Without a platform engine to report completion, call
//! [`Layer::advance`] from your frame loop; a platform binding can call
//! [`Layer::finish`] directly instead.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use choreo::animate;
//! use stage::{Layer, ManualClock};
//!
//! let clock = Arc::new(ManualClock::new(0.0));
//! let layer = Layer::new(clock.clone());
//! let done = Arc::new(AtomicBool::new(false));
//!
//! let flag = Arc::clone(&done);
//! layer.attach_with_completion(&animate::fade_out(0.5)?, Some("fade"), move |finished| {
//!     flag.store(finished, Ordering::SeqCst);
//! });
//!
//! layer.pause();
//! clock.advance(10.0);
//! assert!(layer.advance().is_empty());
//!
//! layer.resume();
//! clock.advance(0.5);
//! assert_eq!(layer.advance(), vec!["fade".to_string()]);
//! assert!(done.load(Ordering::SeqCst));
//! # Ok::<(), choreo::Error>(())
//! ```

mod clock;
mod layer;

use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use layer::{Completion, Layer};

/// Errors that can occur while managing attachments.
///
/// # Recovery Strategies
///
/// | Error Variant | Recovery Strategy |
/// |--------------|-------------------|
/// | [`UnknownAnimation`](Error::UnknownAnimation) | The key was never attached or already finished and removed; ignore or re-attach |
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No attachment exists under the key.
    #[error("no animation attached under key {0:?}")]
    UnknownAnimation(String),
}

/// A specialized [`Result`] type for layer operations.
pub type Result<T> = std::result::Result<T, Error>;
