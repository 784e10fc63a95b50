//! Timing curves and their cubic-bezier control points.
//!
//! Every curve resolves to the four control points of a cubic bezier easing
//! function, the representation animation engines accept. The preset
//! easings follow <http://easings.net/>.
//!
//! # Example
//!
//! ```rust
//! use choreo::{ControlPoints, TimingCurve};
//!
//! assert_eq!(
//!     TimingCurve::EaseOutBack.control_points(),
//!     ControlPoints::new(0.175, 0.885, 0.32, 1.275),
//! );
//!
//! let spring = TimingCurve::Spring { damping: 0.3 }.control_points();
//! assert_eq!(spring.c1x, 0.5);
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two inner control points of a cubic bezier from `(0, 0)` to `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    /// X of the first control point.
    pub c1x: f64,
    /// Y of the first control point.
    pub c1y: f64,
    /// X of the second control point.
    pub c2x: f64,
    /// Y of the second control point.
    pub c2y: f64,
}

impl ControlPoints {
    /// Creates control points from their four coordinates.
    #[inline]
    pub const fn new(c1x: f64, c1y: f64, c2x: f64, c2y: f64) -> Self {
        Self { c1x, c1y, c2x, c2y }
    }

    /// Returns `[c1x, c1y, c2x, c2y]`.
    #[inline]
    pub const fn to_array(self) -> [f64; 4] {
        [self.c1x, self.c1y, self.c2x, self.c2y]
    }
}

impl Default for ControlPoints {
    fn default() -> Self {
        TimingCurve::Linear.control_points()
    }
}

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingCurve {
    /// Constant velocity.
    #[default]
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
    /// Overshooting curve approximating a spring.
    ///
    /// This is a bezier approximation, not a physical simulation: higher
    /// damping produces a larger overshoot of the first control point.
    Spring {
        /// Controls the overshoot; the first control point's y is
        /// `1.1 + damping / 3`.
        damping: f64,
    },
    /// Holds the start value and jumps at the end.
    Discrete,

    /// Slow start, sinusoidal.
    EaseInSine,
    /// Slow end, sinusoidal.
    EaseOutSine,
    /// Slow start and end, sinusoidal.
    EaseInOutSine,
    /// Slow start, quadratic.
    EaseInQuad,
    /// Slow end, quadratic.
    EaseOutQuad,
    /// Slow start and end, quadratic.
    EaseInOutQuad,
    /// Slow start, cubic.
    EaseInCubic,
    /// Slow end, cubic.
    EaseOutCubic,
    /// Slow start and end, cubic.
    EaseInOutCubic,
    /// Slow start, quartic.
    EaseInQuart,
    /// Slow end, quartic.
    EaseOutQuart,
    /// Slow start and end, quartic.
    EaseInOutQuart,
    /// Slow start, quintic.
    EaseInQuint,
    /// Slow end, quintic.
    EaseOutQuint,
    /// Slow start and end, quintic.
    EaseInOutQuint,
    /// Slow start, exponential.
    EaseInExpo,
    /// Slow end, exponential.
    EaseOutExpo,
    /// Slow start and end, exponential.
    EaseInOutExpo,
    /// Slow start, circular.
    EaseInCirc,
    /// Slow end, circular.
    EaseOutCirc,
    /// Slow start and end, circular.
    EaseInOutCirc,
    /// Pulls back before starting.
    EaseInBack,
    /// Overshoots the end.
    EaseOutBack,
    /// Pulls back and overshoots.
    EaseInOutBack,

    /// Arbitrary control points.
    Custom {
        /// X of the first control point.
        c1x: f64,
        /// Y of the first control point.
        c1y: f64,
        /// X of the second control point.
        c2x: f64,
        /// Y of the second control point.
        c2y: f64,
    },
}

impl TimingCurve {
    /// Resolves the curve to its bezier control points.
    pub fn control_points(&self) -> ControlPoints {
        let cp = ControlPoints::new;
        match *self {
            Self::Linear => cp(0.0, 0.0, 1.0, 1.0),
            Self::EaseIn => cp(0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cp(0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cp(0.42, 0.0, 0.58, 1.0),
            Self::Spring { damping } => spring(damping),
            Self::Discrete => cp(1.0, 0.0, 1.0, 1.0),

            Self::EaseInSine => cp(0.47, 0.0, 0.745, 0.715),
            Self::EaseOutSine => cp(0.39, 0.575, 0.565, 1.0),
            Self::EaseInOutSine => cp(0.445, 0.05, 0.55, 0.95),
            Self::EaseInQuad => cp(0.55, 0.085, 0.68, 0.53),
            Self::EaseOutQuad => cp(0.25, 0.46, 0.45, 0.94),
            Self::EaseInOutQuad => cp(0.455, 0.03, 0.515, 0.955),
            Self::EaseInCubic => cp(0.55, 0.055, 0.675, 0.19),
            Self::EaseOutCubic => cp(0.215, 0.61, 0.355, 1.0),
            Self::EaseInOutCubic => cp(0.645, 0.045, 0.355, 1.0),
            Self::EaseInQuart => cp(0.895, 0.03, 0.685, 0.22),
            Self::EaseOutQuart => cp(0.165, 0.84, 0.44, 1.0),
            Self::EaseInOutQuart => cp(0.77, 0.0, 0.175, 1.0),
            Self::EaseInQuint => cp(0.755, 0.05, 0.855, 0.06),
            Self::EaseOutQuint => cp(0.23, 1.0, 0.32, 1.0),
            Self::EaseInOutQuint => cp(0.86, 0.0, 0.07, 1.0),
            Self::EaseInExpo => cp(0.95, 0.05, 0.795, 0.035),
            Self::EaseOutExpo => cp(0.19, 1.0, 0.22, 1.0),
            Self::EaseInOutExpo => cp(1.0, 0.0, 0.0, 1.0),
            Self::EaseInCirc => cp(0.6, 0.04, 0.98, 0.335),
            Self::EaseOutCirc => cp(0.075, 0.82, 0.165, 1.0),
            Self::EaseInOutCirc => cp(0.785, 0.135, 0.15, 0.86),
            Self::EaseInBack => cp(0.6, -0.28, 0.735, 0.045),
            Self::EaseOutBack => cp(0.175, 0.885, 0.32, 1.275),
            Self::EaseInOutBack => cp(0.68, -0.55, 0.265, 1.55),

            Self::Custom { c1x, c1y, c2x, c2y } => cp(c1x, c1y, c2x, c2y),
        }
    }

    /// The canonical kebab-case name of a named curve.
    ///
    /// Returns `None` for the parameterized [`Spring`](Self::Spring) and
    /// [`Custom`](Self::Custom) curves.
    pub const fn name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Discrete => "discrete",
            Self::EaseInSine => "ease-in-sine",
            Self::EaseOutSine => "ease-out-sine",
            Self::EaseInOutSine => "ease-in-out-sine",
            Self::EaseInQuad => "ease-in-quad",
            Self::EaseOutQuad => "ease-out-quad",
            Self::EaseInOutQuad => "ease-in-out-quad",
            Self::EaseInCubic => "ease-in-cubic",
            Self::EaseOutCubic => "ease-out-cubic",
            Self::EaseInOutCubic => "ease-in-out-cubic",
            Self::EaseInQuart => "ease-in-quart",
            Self::EaseOutQuart => "ease-out-quart",
            Self::EaseInOutQuart => "ease-in-out-quart",
            Self::EaseInQuint => "ease-in-quint",
            Self::EaseOutQuint => "ease-out-quint",
            Self::EaseInOutQuint => "ease-in-out-quint",
            Self::EaseInExpo => "ease-in-expo",
            Self::EaseOutExpo => "ease-out-expo",
            Self::EaseInOutExpo => "ease-in-out-expo",
            Self::EaseInCirc => "ease-in-circ",
            Self::EaseOutCirc => "ease-out-circ",
            Self::EaseInOutCirc => "ease-in-out-circ",
            Self::EaseInBack => "ease-in-back",
            Self::EaseOutBack => "ease-out-back",
            Self::EaseInOutBack => "ease-in-out-back",
            Self::Spring { .. } | Self::Custom { .. } => return None,
        };
        Some(name)
    }

    /// Every named curve, in declaration order.
    pub const NAMED: [TimingCurve; 29] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::Discrete,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
    ];
}

/// Bezier approximation of a spring with the given damping.
fn spring(damping: f64) -> ControlPoints {
    ControlPoints::new(0.5, 1.1 + damping / 3.0, 1.0, 1.0)
}

impl From<ControlPoints> for TimingCurve {
    fn from(cp: ControlPoints) -> Self {
        Self::Custom {
            c1x: cp.c1x,
            c1y: cp.c1y,
            c2x: cp.c2x,
            c2y: cp.c2y,
        }
    }
}

impl fmt::Display for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, Self::Spring { damping }) => write!(f, "spring({damping})"),
            (None, _) => {
                let [c1x, c1y, c2x, c2y] = self.control_points().to_array();
                write!(f, "cubic-bezier({c1x}, {c1y}, {c2x}, {c2y})")
            }
        }
    }
}

/// Error returned when parsing an unknown curve name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timing curve: {0:?}")]
pub struct ParseCurveError(pub String);

impl FromStr for TimingCurve {
    type Err = ParseCurveError;

    /// Parses a named curve. Dashes, underscores, spaces and case are
    /// ignored, so `ease-out-back`, `ease_out_back` and `easeOutBack` all
    /// parse to the same curve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Self::NAMED
            .iter()
            .find(|curve| {
                curve
                    .name()
                    .is_some_and(|name| name.replace('-', "") == wanted)
            })
            .copied()
            .ok_or_else(|| ParseCurveError(s.to_string()))
    }
}
