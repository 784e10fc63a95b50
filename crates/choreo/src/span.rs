//! Declared duration policy for a node.

use serde::{Deserialize, Serialize};

use crate::duration::Seconds;

/// How long a node plays, as declared at construction.
///
/// * [`Automatic`](DurationSpan::Automatic) derives the duration from the
///   children of a group or sequence. Leaf animations have no children and
///   reject it.
/// * [`Constant`](DurationSpan::Constant) fixes the duration in seconds.
/// * [`Infinite`](DurationSpan::Infinite) plays forever.
///
/// A span also converts from a plain number: `0.0` means automatic, `+∞`
/// means infinite and anything else is a constant.
///
/// ```rust
/// use choreo::DurationSpan;
///
/// assert_eq!(DurationSpan::from(0.0), DurationSpan::Automatic);
/// assert_eq!(DurationSpan::from(f64::INFINITY), DurationSpan::Infinite);
/// assert_eq!(DurationSpan::from(0.25), DurationSpan::Constant(0.25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationSpan {
    /// Derived from children.
    #[default]
    Automatic,
    /// A fixed number of seconds.
    Constant(f64),
    /// Never ends.
    Infinite,
}

impl DurationSpan {
    /// Duration used when a caller wants "some" constant span.
    pub const DEFAULT_CONSTANT: f64 = 0.3;

    /// Returns `true` for [`DurationSpan::Automatic`].
    pub const fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic)
    }

    /// Folds a constant of `+∞` into [`DurationSpan::Infinite`], so a
    /// constant span always has a finite length.
    ///
    /// ```rust
    /// use choreo::DurationSpan;
    ///
    /// assert_eq!(DurationSpan::Constant(f64::INFINITY).resolved(), DurationSpan::Infinite);
    /// assert_eq!(DurationSpan::Constant(2.0).resolved(), DurationSpan::Constant(2.0));
    /// ```
    pub fn resolved(self) -> Self {
        match self {
            Self::Constant(secs) if secs == f64::INFINITY => Self::Infinite,
            other => other,
        }
    }

    /// The fixed duration this span declares, if any.
    ///
    /// Automatic spans have no fixed duration; infinite spans declare
    /// [`Seconds::INFINITE`].
    pub fn fixed(&self) -> Option<Seconds> {
        match *self {
            Self::Automatic => None,
            Self::Constant(secs) => Some(Seconds::new(secs)),
            Self::Infinite => Some(Seconds::INFINITE),
        }
    }
}

impl From<f64> for DurationSpan {
    fn from(secs: f64) -> Self {
        if secs == 0.0 {
            Self::Automatic
        } else if secs == f64::INFINITY {
            Self::Infinite
        } else {
            Self::Constant(secs)
        }
    }
}

impl From<Option<f64>> for DurationSpan {
    fn from(secs: Option<f64>) -> Self {
        secs.map_or(Self::Automatic, Self::from)
    }
}
