//! The combinator facade.
//!
//! Thin, typed wrappers over the [`Animation`] constructors. Property
//! combinators take a [`Tween`] naming the endpoints, duration and options,
//! and encode values with [`JsonEncoder`]. Composites take any iterable of
//! animations or references to animations.
//!
//! # Example
//!
//! ```rust
//! use choreo::animate::{self, Tween};
//! use choreo::{Point, TimingCurve};
//!
//! let intro = animate::sequence([
//!     animate::fade_in(0.25)?,
//!     animate::group([
//!         animate::move_to(Tween::new(0.5).to(Point::new(120.0, 40.0)))?,
//!         animate::rotate_degrees(Tween::new(0.5).by(90.0).curve(TimingCurve::EaseOut))?,
//!     ])
//!     .build(),
//!     animate::wait(1.0),
//!     animate::fade_out(0.25)?,
//! ])
//! .build()?;
//!
//! assert_eq!(intro.base_duration().as_f64(), 2.0);
//! # Ok::<(), choreo::Error>(())
//! ```

use std::borrow::Borrow;

use crate::animation::{Animation, Endpoints, KeyframeSource};
use crate::curve::TimingCurve;
use crate::error::Result;
use crate::geometry::{Path, Point, Size, Vector};
use crate::options::Options;
use crate::span::DurationSpan;
use crate::value::{JsonEncoder, KeyframeValue, ValueEncoder};

/// Engine key paths the typed combinators animate.
pub mod key_path {
    pub const POSITION: &str = "position";
    pub const POSITION_X: &str = "position.x";
    pub const POSITION_Y: &str = "position.y";
    pub const TRANSLATION: &str = "transform.translation";
    pub const TRANSLATION_X: &str = "transform.translation.x";
    pub const TRANSLATION_Y: &str = "transform.translation.y";
    pub const ROTATION: &str = "transform.rotation";
    pub const SCALE: &str = "transform.scale";
    pub const SCALE_X: &str = "transform.scale.x";
    pub const SCALE_Y: &str = "transform.scale.y";
    pub const SCALE_Z: &str = "transform.scale.z";
    pub const OPACITY: &str = "opacity";
}

// =============================================================================
// Arguments
// =============================================================================

/// Endpoints, duration and options for one property animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    endpoints: Endpoints<T>,
    duration: f64,
    options: Options,
}

impl<T> Tween<T> {
    /// A tween lasting `duration` seconds with no endpoints and default
    /// options.
    pub fn new(duration: f64) -> Self {
        Self {
            endpoints: Endpoints::default(),
            duration,
            options: Options::default(),
        }
    }

    /// Sets the start value.
    pub fn from(mut self, value: T) -> Self {
        self.endpoints.from = Some(value);
        self
    }

    /// Sets the relative change.
    pub fn by(mut self, value: T) -> Self {
        self.endpoints.by = Some(value);
        self
    }

    /// Sets the end value.
    pub fn to(mut self, value: T) -> Self {
        self.endpoints.to = Some(value);
        self
    }

    /// Sets the easing curve, keeping the other options.
    pub fn curve(mut self, curve: TimingCurve) -> Self {
        self.options.curve = curve;
        self
    }

    /// Replaces the options, including the curve. Call
    /// [`curve`](Self::curve) afterwards to override only the easing.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    fn map<U>(self, f: impl FnMut(T) -> U) -> Tween<U> {
        Tween {
            endpoints: self.endpoints.map(f),
            duration: self.duration,
            options: self.options,
        }
    }
}

/// Duration and options for combinators with fixed endpoints, such as
/// [`fade_in`].
///
/// A bare `f64` converts with default options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    duration: f64,
    options: Options,
}

impl Motion {
    /// A motion lasting `duration` seconds with default options.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            options: Options::default(),
        }
    }

    /// Sets the easing curve.
    pub fn curve(mut self, curve: TimingCurve) -> Self {
        self.options.curve = curve;
        self
    }

    /// Replaces the options, including the curve. Call
    /// [`curve`](Self::curve) afterwards to override only the easing.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl From<f64> for Motion {
    fn from(duration: f64) -> Self {
        Self::new(duration)
    }
}

/// Keyframe timing for [`move_along`] and [`translate_along`].
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    key_times: Vec<f64>,
    curves: Vec<TimingCurve>,
    duration: f64,
    options: Options,
}

impl Keyframes {
    /// Evenly paced keyframes lasting `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            key_times: Vec::new(),
            curves: Vec::new(),
            duration,
            options: Options::default(),
        }
    }

    /// Sets normalized key times in `[0, 1]`.
    pub fn key_times(mut self, key_times: impl Into<Vec<f64>>) -> Self {
        self.key_times = key_times.into();
        self
    }

    /// Sets per-segment easing curves.
    pub fn curves(mut self, curves: impl Into<Vec<TimingCurve>>) -> Self {
        self.curves = curves.into();
        self
    }

    /// Sets the easing curve of the whole animation.
    pub fn curve(mut self, curve: TimingCurve) -> Self {
        self.options.curve = curve;
        self
    }

    /// Replaces the options, including the curve. Call
    /// [`curve`](Self::curve) afterwards to override only the easing.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

// =============================================================================
// Composites
// =============================================================================

/// Animates nothing for `seconds`.
pub fn wait(seconds: f64) -> Animation {
    Animation::wait(seconds)
}

/// Starts a group of animations playing in parallel.
pub fn group<I>(children: I) -> GroupBuilder
where
    I: IntoIterator,
    I::Item: Borrow<Animation>,
{
    GroupBuilder {
        children: children.into_iter().map(|c| c.borrow().clone()).collect(),
        span: DurationSpan::Automatic,
        options: Options::default(),
        normalized: false,
    }
}

/// Starts a sequence of animations playing back to back.
pub fn sequence<I>(children: I) -> SequenceBuilder
where
    I: IntoIterator,
    I::Item: Borrow<Animation>,
{
    SequenceBuilder {
        children: children.into_iter().map(|c| c.borrow().clone()).collect(),
        span: DurationSpan::Automatic,
        options: Options::default(),
    }
}

/// Plays `animation` `count + 1` times.
pub fn replay(animation: &Animation, count: u32) -> Animation {
    Animation::repeat(animation, Some(count))
}

/// Plays `animation` forever.
pub fn replay_forever(animation: &Animation) -> Animation {
    Animation::repeat(animation, None)
}

/// Plays `animation` forward, then backward.
pub fn autoreverse(animation: &Animation) -> Animation {
    Animation::autoreverse(animation)
}

/// Builder returned by [`group`].
#[derive(Debug, Clone)]
#[must_use = "call .build() to get the animation"]
pub struct GroupBuilder {
    children: Vec<Animation>,
    span: DurationSpan,
    options: Options,
    normalized: bool,
}

impl GroupBuilder {
    /// Sets the duration span. Defaults to automatic.
    pub fn span(mut self, span: impl Into<DurationSpan>) -> Self {
        self.span = span.into();
        self
    }

    /// Sets the easing curve.
    pub fn curve(mut self, curve: TimingCurve) -> Self {
        self.options.curve = curve;
        self
    }

    /// Replaces the options, including the curve. Call
    /// [`curve`](Self::curve) afterwards to override only the easing.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Scales children's speed so they finish with a constant span.
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }

    /// Builds the group.
    pub fn build(self) -> Animation {
        if self.normalized {
            Animation::normalized_group(self.children, self.span, &self.options)
        } else {
            Animation::group(self.children, self.span, &self.options)
        }
    }
}

/// Builder returned by [`sequence`].
#[derive(Debug, Clone)]
#[must_use = "call .build() to get the animation"]
pub struct SequenceBuilder {
    children: Vec<Animation>,
    span: DurationSpan,
    options: Options,
}

impl SequenceBuilder {
    /// Sets the duration span. Defaults to automatic.
    pub fn span(mut self, span: impl Into<DurationSpan>) -> Self {
        self.span = span.into();
        self
    }

    /// Sets the easing curve.
    pub fn curve(mut self, curve: TimingCurve) -> Self {
        self.options.curve = curve;
        self
    }

    /// Replaces the options, including the curve. Call
    /// [`curve`](Self::curve) afterwards to override only the easing.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Builds the sequence.
    ///
    /// # Errors
    /// Returns [`Error::UnreachableChild`](crate::Error::UnreachableChild)
    /// if a child before the last never ends.
    pub fn build(self) -> Result<Animation> {
        Animation::sequence(self.children, self.span, &self.options)
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Animates any property by key path.
///
/// # Errors
/// Returns [`Error::Encode`](crate::Error::Encode) if an endpoint cannot be
/// encoded.
pub fn key_path<T: Into<KeyframeValue>>(key_path: &str, tween: Tween<T>) -> Result<Animation> {
    key_path_with(&JsonEncoder, key_path, tween)
}

/// Like [`key_path`], with a caller-supplied encoder.
///
/// # Errors
/// Returns [`Error::Encode`](crate::Error::Encode) if the encoder rejects an
/// endpoint.
pub fn key_path_with<E, T>(encoder: &E, key_path: &str, tween: Tween<T>) -> Result<Animation>
where
    E: ValueEncoder + ?Sized,
    T: Into<KeyframeValue>,
{
    let tween: Tween<KeyframeValue> = tween.map(Into::into);
    Animation::property(
        encoder,
        key_path,
        &tween.endpoints,
        DurationSpan::Constant(tween.duration),
        &tween.options,
    )
}

macro_rules! property_combinators {
    ($($(#[$doc:meta])* $name:ident($ty:ty) => $path:expr;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            /// Returns [`Error::Encode`](crate::Error::Encode) if an endpoint
            /// is not finite.
            pub fn $name(tween: Tween<$ty>) -> Result<Animation> {
                key_path($path, tween)
            }
        )*
    };
}

property_combinators! {
    /// Moves the layer's position.
    move_to(Point) => key_path::POSITION;
    /// Moves the layer horizontally.
    move_x(f64) => key_path::POSITION_X;
    /// Moves the layer vertically.
    move_y(f64) => key_path::POSITION_Y;
    /// Translates the layer's transform.
    translate(Vector) => key_path::TRANSLATION;
    /// Translates the layer's transform horizontally.
    translate_x(f64) => key_path::TRANSLATION_X;
    /// Translates the layer's transform vertically.
    translate_y(f64) => key_path::TRANSLATION_Y;
    /// Rotates the layer, in radians.
    rotate_radians(f64) => key_path::ROTATION;
    /// Scales the layer uniformly.
    scale(f64) => key_path::SCALE;
    /// Scales the layer horizontally.
    scale_x(f64) => key_path::SCALE_X;
    /// Scales the layer vertically.
    scale_y(f64) => key_path::SCALE_Y;
    /// Scales the layer along z.
    scale_z(f64) => key_path::SCALE_Z;
    /// Changes the layer's opacity.
    fade(f64) => key_path::OPACITY;
}

/// Rotates the layer, in degrees.
///
/// # Errors
/// Returns [`Error::Encode`](crate::Error::Encode) if an endpoint is not
/// finite.
pub fn rotate_degrees(tween: Tween<f64>) -> Result<Animation> {
    rotate_radians(tween.map(f64::to_radians))
}

/// Scales width and height independently.
///
/// Builds a group of a horizontal and a vertical scale, sized to the
/// tween's duration. The options apply to the group; the two children use
/// defaults.
///
/// # Errors
/// Returns [`Error::Encode`](crate::Error::Encode) if an endpoint is not
/// finite.
pub fn scale_size(tween: Tween<Size>) -> Result<Animation> {
    let Tween {
        endpoints,
        duration,
        options,
    } = tween;
    let part = |pick: fn(Size) -> f64| Tween {
        endpoints: endpoints.clone().map(pick),
        duration,
        options: Options {
            curve: options.curve,
            ..Options::default()
        },
    };
    let x = scale_x(part(|s| s.width))?;
    let y = scale_y(part(|s| s.height))?;
    Ok(Animation::group(
        [x, y],
        DurationSpan::Constant(duration),
        &options,
    ))
}

/// Fades the layer to fully opaque.
///
/// # Errors
/// Never fails with the default encoder; the result type matches the other
/// combinators.
pub fn fade_in(motion: impl Into<Motion>) -> Result<Animation> {
    let motion = motion.into();
    fade(Tween::new(motion.duration).to(1.0).options(motion.options))
}

/// Fades the layer to fully transparent.
///
/// # Errors
/// Never fails with the default encoder; the result type matches the other
/// combinators.
pub fn fade_out(motion: impl Into<Motion>) -> Result<Animation> {
    let motion = motion.into();
    fade(Tween::new(motion.duration).to(0.0).options(motion.options))
}

/// Moves the layer's position along `path`.
///
/// # Errors
/// Returns [`Error::Encode`](crate::Error::Encode) for an empty or
/// malformed path, or [`Error::InvalidKeyTimes`](crate::Error::InvalidKeyTimes)
/// when the key times are unusable.
pub fn move_along(path: &Path, keyframes: Keyframes) -> Result<Animation> {
    along(key_path::POSITION, path, keyframes)
}

/// Translates the layer's transform along `path`.
///
/// # Errors
/// Same as [`move_along`].
pub fn translate_along(path: &Path, keyframes: Keyframes) -> Result<Animation> {
    along(key_path::TRANSLATION, path, keyframes)
}

/// Animates any property by key path through discrete keyframe values.
///
/// # Errors
/// Returns [`Error::Encode`](crate::Error::Encode) if a value cannot be
/// encoded, or [`Error::InvalidKeyTimes`](crate::Error::InvalidKeyTimes)
/// when the key times do not match the values.
pub fn keyframes<T: Into<KeyframeValue>>(
    key_path: &str,
    values: impl IntoIterator<Item = T>,
    keyframes: Keyframes,
) -> Result<Animation> {
    let values = values.into_iter().map(Into::into).collect();
    Animation::keyframes(
        &JsonEncoder,
        key_path,
        &KeyframeSource::Values(values),
        keyframes.key_times,
        &keyframes.curves,
        DurationSpan::Constant(keyframes.duration),
        &keyframes.options,
    )
}

fn along(key_path: &str, path: &Path, keyframes: Keyframes) -> Result<Animation> {
    Animation::keyframes(
        &JsonEncoder,
        key_path,
        &KeyframeSource::Path(path.clone()),
        keyframes.key_times,
        &keyframes.curves,
        DurationSpan::Constant(keyframes.duration),
        &keyframes.options,
    )
}
