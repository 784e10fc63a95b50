//! Durations with a first-class infinite element.
//!
//! Every timing computation in the node algebra goes through [`Seconds`]
//! and the three operations [`max_duration`], [`add_duration`] and
//! [`scale_duration`]. Infinity absorbs under all three, and the type
//! cannot hold negative values, negative infinity or NaN.
//!
//! # Example
//!
//! ```rust
//! use choreo::{add_duration, max_duration, Seconds};
//!
//! let one = Seconds::new(1.0);
//! let two = Seconds::new(2.0);
//!
//! assert_eq!(add_duration(one, two), Seconds::new(3.0));
//! assert_eq!(max_duration(one, Seconds::INFINITE), Seconds::INFINITE);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The largest finite duration handed to an engine.
///
/// Engines cannot represent an infinite playback window, so infinite
/// durations saturate to this value when lowered.
pub const ENGINE_INFINITY: f64 = f64::MAX;

/// A non-negative duration in seconds that may be infinite.
///
/// Construct finite values with [`Seconds::new`]; out-of-range inputs are
/// clamped into the legal domain rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seconds(Repr);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Repr {
    Finite(f64),
    Infinite,
}

impl Seconds {
    /// Zero seconds; the identity of [`max_duration`] and [`add_duration`].
    pub const ZERO: Self = Self(Repr::Finite(0.0));

    /// Positive infinity.
    pub const INFINITE: Self = Self(Repr::Infinite);

    /// Creates a duration from a raw number of seconds.
    ///
    /// `+∞` maps to [`Seconds::INFINITE`]. Negative values, `-∞` and NaN
    /// are clamped to zero.
    pub fn new(secs: f64) -> Self {
        if secs == f64::INFINITY {
            Self::INFINITE
        } else if secs.is_nan() || secs <= 0.0 {
            Self::ZERO
        } else {
            Self(Repr::Finite(secs))
        }
    }

    /// Returns `true` for positive infinity.
    #[inline]
    pub const fn is_infinite(self) -> bool {
        matches!(self.0, Repr::Infinite)
    }

    /// Returns `true` for any finite duration.
    #[inline]
    pub const fn is_finite(self) -> bool {
        !self.is_infinite()
    }

    /// Returns the number of seconds, or `None` when infinite.
    #[inline]
    pub const fn as_finite(self) -> Option<f64> {
        match self.0 {
            Repr::Finite(secs) => Some(secs),
            Repr::Infinite => None,
        }
    }

    /// Returns the duration as an `f64`, using `f64::INFINITY` for infinity.
    #[inline]
    pub const fn as_f64(self) -> f64 {
        match self.0 {
            Repr::Finite(secs) => secs,
            Repr::Infinite => f64::INFINITY,
        }
    }

    /// Returns the duration an engine should be given, saturating infinity
    /// to [`ENGINE_INFINITY`].
    #[inline]
    pub const fn to_engine(self) -> f64 {
        match self.0 {
            Repr::Finite(secs) => secs,
            Repr::Infinite => ENGINE_INFINITY,
        }
    }

    /// Infinity-absorbing maximum.
    pub fn max(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Repr::Infinite, _) | (_, Repr::Infinite) => Self::INFINITE,
            (Repr::Finite(a), Repr::Finite(b)) => Self(Repr::Finite(a.max(b))),
        }
    }

    /// Infinity-absorbing scaling by a non-negative factor.
    ///
    /// An infinite duration stays infinite for every factor. Negative and
    /// NaN factors are treated as zero.
    pub fn scale(self, factor: f64) -> Self {
        match self.0 {
            Repr::Infinite => Self::INFINITE,
            Repr::Finite(secs) => {
                let factor = if factor.is_nan() { 0.0 } else { factor.max(0.0) };
                Self::new(secs * factor)
            }
        }
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Seconds {
    fn from(secs: f64) -> Self {
        Self::new(secs)
    }
}

impl Add for Seconds {
    type Output = Seconds;

    fn add(self, other: Seconds) -> Seconds {
        match (self.0, other.0) {
            (Repr::Infinite, _) | (_, Repr::Infinite) => Seconds::INFINITE,
            (Repr::Finite(a), Repr::Finite(b)) => Seconds::new(a + b),
        }
    }
}

impl Sum for Seconds {
    fn sum<I: Iterator<Item = Seconds>>(iter: I) -> Self {
        iter.fold(Seconds::ZERO, add_duration)
    }
}

impl Eq for Seconds {}

impl PartialOrd for Seconds {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Seconds {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Repr::Infinite, Repr::Infinite) => Ordering::Equal,
            (Repr::Infinite, Repr::Finite(_)) => Ordering::Greater,
            (Repr::Finite(_), Repr::Infinite) => Ordering::Less,
            (Repr::Finite(a), Repr::Finite(b)) => a.total_cmp(&b),
        }
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Finite(secs) => write!(f, "{secs}s"),
            Repr::Infinite => f.write_str("∞"),
        }
    }
}

impl Serialize for Seconds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Repr::Finite(secs) => serializer.serialize_f64(secs),
            Repr::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl<'de> Deserialize<'de> for Seconds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Word(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(secs) => Ok(Seconds::new(secs)),
            Wire::Word(word) => match word.to_ascii_lowercase().as_str() {
                "infinite" | "infinity" | "inf" | "∞" => Ok(Seconds::INFINITE),
                _ => Err(D::Error::custom(format!("invalid duration: {word:?}"))),
            },
        }
    }
}

/// Infinity-absorbing maximum of two durations.
#[inline]
pub fn max_duration(a: Seconds, b: Seconds) -> Seconds {
    a.max(b)
}

/// Infinity-absorbing sum of two durations.
#[inline]
pub fn add_duration(a: Seconds, b: Seconds) -> Seconds {
    a + b
}

/// Infinity-absorbing scaling of a duration by a non-negative factor.
#[inline]
pub fn scale_duration(a: Seconds, factor: f64) -> Seconds {
    a.scale(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_illegal_values() {
        assert_eq!(Seconds::new(-1.0), Seconds::ZERO);
        assert_eq!(Seconds::new(f64::NAN), Seconds::ZERO);
        assert_eq!(Seconds::new(f64::NEG_INFINITY), Seconds::ZERO);
        assert_eq!(Seconds::new(f64::INFINITY), Seconds::INFINITE);
        assert_eq!(Seconds::new(1.5).as_finite(), Some(1.5));
    }

    #[test]
    fn test_infinity_absorbs() {
        let x = Seconds::new(4.0);
        assert_eq!(max_duration(Seconds::INFINITE, x), Seconds::INFINITE);
        assert_eq!(max_duration(x, Seconds::INFINITE), Seconds::INFINITE);
        assert_eq!(add_duration(Seconds::INFINITE, x), Seconds::INFINITE);
        assert_eq!(add_duration(x, Seconds::INFINITE), Seconds::INFINITE);
        assert_eq!(scale_duration(Seconds::INFINITE, 2.0), Seconds::INFINITE);
        assert_eq!(scale_duration(Seconds::INFINITE, 0.0), Seconds::INFINITE);
    }

    #[test]
    fn test_finite_arithmetic() {
        let a = Seconds::new(1.0);
        let b = Seconds::new(2.5);
        assert_eq!(max_duration(a, b), b);
        assert_eq!(add_duration(a, b), Seconds::new(3.5));
        assert_eq!(scale_duration(b, 2.0), Seconds::new(5.0));
        assert_eq!(scale_duration(b, -3.0), Seconds::ZERO);
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Seconds = core::iter::empty().sum();
        assert_eq!(total, Seconds::ZERO);
    }

    #[test]
    fn test_ordering_puts_infinity_last() {
        let mut values = vec![Seconds::INFINITE, Seconds::new(3.0), Seconds::ZERO];
        values.sort();
        assert_eq!(values, vec![Seconds::ZERO, Seconds::new(3.0), Seconds::INFINITE]);
    }

    #[test]
    fn test_engine_saturation() {
        assert_eq!(Seconds::INFINITE.to_engine(), ENGINE_INFINITY);
        assert_eq!(Seconds::new(2.0).to_engine(), 2.0);
        assert!(Seconds::INFINITE.as_f64().is_infinite());
    }

    #[test]
    fn test_serde_round_trip_words() {
        let json = serde_json::to_string(&Seconds::INFINITE).unwrap();
        assert_eq!(json, "\"infinite\"");
        let back: Seconds = serde_json::from_str("\"inf\"").unwrap();
        assert_eq!(back, Seconds::INFINITE);
        let finite: Seconds = serde_json::from_str("1.25").unwrap();
        assert_eq!(finite, Seconds::new(1.25));
        assert!(serde_json::from_str::<Seconds>("\"soon\"").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Seconds::new(0.5).to_string(), "0.5s");
        assert_eq!(Seconds::INFINITE.to_string(), "∞");
    }
}
