#![forbid(unsafe_code)]
// Allow these clippy lints for timing/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! # Choreo
//!
//! Declarative layer animation composition.
//!
//! Choreo builds immutable animation trees out of a few primitives and
//! computes their timing up front:
//! - **Leaves** animate one property between endpoints or through keyframes
//! - **Groups** play children in parallel
//! - **Sequences** play children back to back
//! - **Repeat** and **autoreverse** wrap a single child
//!
//! Every node knows its *base duration* (one play-through) and its
//! *accumulated duration* (including repetition, possibly infinite). The
//! tree lowers to an [`EngineNode`] description for an animation engine to
//! execute.
//!
//! ## Example
//!
//! ```rust
//! use choreo::animate::{self, Tween};
//! use choreo::{Point, Seconds};
//!
//! let pulse = animate::autoreverse(&animate::scale(Tween::new(0.25).to(1.2))?);
//! let intro = animate::sequence([
//!     animate::move_to(Tween::new(0.5).to(Point::new(100.0, 0.0)))?,
//!     animate::replay(&pulse, 2),
//! ])
//! .build()?;
//!
//! assert_eq!(intro.base_duration(), Seconds::new(1.0));
//! assert_eq!(intro.accumulated_duration(), Seconds::new(2.0));
//! # Ok::<(), choreo::Error>(())
//! ```
//!
//! ## Infinite durations
//!
//! [`Seconds`] is either finite or infinite. Infinity absorbs under max,
//! addition and scaling, so a group containing an endless child is endless
//! while its base duration stays finite. A sequence rejects endless children
//! anywhere but last, since nothing after them could ever start.

mod animation;
mod curve;
mod duration;
mod engine;
mod error;
mod geometry;
mod options;
mod scene;
mod span;
mod value;

pub mod animate;

pub use animation::{
    Animation, AnimationKind, Endpoints, KeyframeAnimation, KeyframeSource, PropertyAnimation,
    ScheduleEntry, Visit,
};
pub use curve::{ControlPoints, ParseCurveError, TimingCurve};
pub use duration::{add_duration, max_duration, scale_duration, Seconds, ENGINE_INFINITY};
pub use engine::{EngineNode, Timing};
pub use error::{Error, Result};
pub use geometry::{
    AffineTransform, Color, EdgeInsets, Path, PathElement, Point, Rect, Size, Transform3D, Vector,
};
pub use options::{FillMode, Options, RepeatPolicy};
pub use scene::{Scene, SceneError, SceneNode};
pub use span::DurationSpan;
pub use value::{EncodeError, EncodedValue, JsonEncoder, KeyframeValue, ValueEncoder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::animate::{self, Keyframes, Motion, Tween};
    pub use crate::animation::{Animation, Endpoints, KeyframeSource};
    pub use crate::curve::TimingCurve;
    pub use crate::duration::Seconds;
    pub use crate::geometry::{Color, Path, Point, Rect, Size, Vector};
    pub use crate::options::{FillMode, Options, RepeatPolicy};
    pub use crate::span::DurationSpan;
}
