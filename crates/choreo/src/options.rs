//! Playback options baked into a node at construction.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::curve::TimingCurve;

bitflags! {
    /// Whether a node's visual state persists outside its active interval.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FillMode: u8 {
        /// Keep the end state after the node finishes.
        const FORWARDS = 1 << 0;
        /// Apply the start state before the node begins.
        const BACKWARDS = 1 << 1;
        /// Both of the above.
        const BOTH = Self::FORWARDS.bits() | Self::BACKWARDS.bits();
    }
}

impl FillMode {
    /// Neither end persists; the effect is removed outside the interval.
    pub const NONE: Self = Self::empty();

    /// The engine's name for this fill mode.
    pub fn engine_name(self) -> &'static str {
        if self == Self::BOTH {
            "both"
        } else if self == Self::FORWARDS {
            "forwards"
        } else if self == Self::BACKWARDS {
            "backwards"
        } else {
            "removed"
        }
    }
}

impl Default for FillMode {
    fn default() -> Self {
        Self::BOTH
    }
}

/// How many times a node plays.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatPolicy {
    /// Play once.
    #[default]
    None,
    /// Play `n` additional times after the first.
    Count(u32),
    /// Keep repeating until this many seconds have elapsed.
    Duration(f64),
    /// Repeat forever.
    Forever,
}

/// Playback options for a node.
///
/// Options are plain values: build them with the `with_*` methods and pass
/// them to a combinator. Deserializing fills unspecified fields from
/// [`Options::default`].
///
/// ```rust
/// use choreo::{FillMode, Options, RepeatPolicy, TimingCurve};
///
/// let options = Options::default()
///     .with_speed(2.0)
///     .with_fill(FillMode::FORWARDS)
///     .with_repeat(RepeatPolicy::Count(2))
///     .with_curve(TimingCurve::EaseInOut);
///
/// assert_eq!(options.speed, 2.0);
/// assert!(!options.removed_on_completion);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Playback rate multiplier. Must be positive and finite.
    pub speed: f64,
    /// Fill policy outside the active interval.
    pub fill: FillMode,
    /// Whether the effect is discarded once the node finishes.
    pub removed_on_completion: bool,
    /// Whether each play runs forward then backward.
    pub autoreverses: bool,
    /// Repetition policy.
    pub repeat: RepeatPolicy,
    /// Easing curve.
    pub curve: TimingCurve,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            speed: 1.0,
            fill: FillMode::BOTH,
            removed_on_completion: false,
            autoreverses: false,
            repeat: RepeatPolicy::None,
            curve: TimingCurve::Linear,
        }
    }
}

impl Options {
    /// Options used by `wait`: nothing persists and the node is removed
    /// once finished.
    pub fn transient() -> Self {
        Self {
            fill: FillMode::NONE,
            removed_on_completion: true,
            ..Self::default()
        }
    }

    /// Sets the playback rate.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the fill policy.
    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    /// Sets whether the effect is removed on completion.
    pub fn with_removed_on_completion(mut self, removed: bool) -> Self {
        self.removed_on_completion = removed;
        self
    }

    /// Sets autoreversal.
    pub fn with_autoreverses(mut self, autoreverses: bool) -> Self {
        self.autoreverses = autoreverses;
        self
    }

    /// Sets the repetition policy.
    pub fn with_repeat(mut self, repeat: RepeatPolicy) -> Self {
        self.repeat = repeat;
        self
    }

    /// Sets the easing curve.
    pub fn with_curve(mut self, curve: TimingCurve) -> Self {
        self.curve = curve;
        self
    }

    /// The speed to hand to the engine.
    ///
    /// Non-positive or non-finite speeds fall back to `1.0`.
    pub(crate) fn engine_speed(&self) -> f64 {
        if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            warn!(options.speed = self.speed, "Invalid speed, using 1.0");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.fill, FillMode::BOTH);
        assert!(!options.removed_on_completion);
        assert!(!options.autoreverses);
        assert_eq!(options.repeat, RepeatPolicy::None);
        assert_eq!(options.curve, TimingCurve::Linear);
    }

    #[test]
    fn test_transient() {
        let options = Options::transient();
        assert_eq!(options.fill, FillMode::NONE);
        assert!(options.removed_on_completion);
    }

    #[test]
    fn test_fill_engine_names() {
        assert_eq!(FillMode::BOTH.engine_name(), "both");
        assert_eq!(FillMode::FORWARDS.engine_name(), "forwards");
        assert_eq!(FillMode::BACKWARDS.engine_name(), "backwards");
        assert_eq!(FillMode::NONE.engine_name(), "removed");
        assert_eq!(FillMode::FORWARDS | FillMode::BACKWARDS, FillMode::BOTH);
    }

    #[test]
    fn test_engine_speed_rejects_invalid() {
        assert_eq!(Options::default().with_speed(2.0).engine_speed(), 2.0);
        assert_eq!(Options::default().with_speed(0.0).engine_speed(), 1.0);
        assert_eq!(Options::default().with_speed(-1.0).engine_speed(), 1.0);
        assert_eq!(Options::default().with_speed(f64::NAN).engine_speed(), 1.0);
    }

    #[test]
    fn test_partial_deserialize() {
        let options: Options = toml::from_str("speed = 0.5\nautoreverses = true").unwrap();
        assert_eq!(options.speed, 0.5);
        assert!(options.autoreverses);
        assert_eq!(options.fill, FillMode::BOTH);
    }

    #[test]
    fn test_repeat_policy_serde() {
        let json = serde_json::to_string(&RepeatPolicy::Count(3)).unwrap();
        assert_eq!(json, r#"{"count":3}"#);
        let forever: RepeatPolicy = serde_json::from_str(r#""forever""#).unwrap();
        assert_eq!(forever, RepeatPolicy::Forever);
    }
}
