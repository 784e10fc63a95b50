//! The engine-native description of an animation tree.
//!
//! [`Timing`] is the per-node record an animation engine consumes: begin
//! offset, playback duration, speed, fill and repetition. Every
//! [`Animation`](crate::Animation) owns one, and
//! [`Animation::to_engine`](crate::Animation::to_engine) lowers the whole
//! tree to [`EngineNode`]s, the payload handed to the platform.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::curve::ControlPoints;
use crate::duration::ENGINE_INFINITY;
use crate::options::FillMode;
use crate::value::EncodedValue;

/// Engine timing parameters for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Start offset relative to the parent, in seconds.
    pub begin_time: f64,
    /// Playback duration of one pass, in seconds. Infinite spans use
    /// [`ENGINE_INFINITY`].
    pub duration: f64,
    /// Playback rate multiplier.
    pub speed: f64,
    /// Fill policy.
    pub fill: FillMode,
    /// Whether the engine discards the effect when finished.
    pub removed_on_completion: bool,
    /// Whether each pass plays forward then backward.
    pub autoreverses: bool,
    /// Additional passes after the first; `f64::INFINITY` repeats forever.
    #[serde(with = "unbounded")]
    pub repeat_count: f64,
    /// Total seconds to keep repeating; zero when unused.
    pub repeat_duration: f64,
    /// Easing control points.
    pub curve: ControlPoints,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            begin_time: 0.0,
            duration: 0.0,
            speed: 1.0,
            fill: FillMode::BOTH,
            removed_on_completion: false,
            autoreverses: false,
            repeat_count: 0.0,
            repeat_duration: 0.0,
            curve: ControlPoints::default(),
        }
    }
}

impl Timing {
    /// Returns `true` when the playback duration is the infinite sentinel.
    pub fn is_unbounded(&self) -> bool {
        self.duration >= ENGINE_INFINITY
    }
}

/// One node of the lowered animation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineNode {
    /// Interpolates one property between optional endpoints.
    Basic {
        key_path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<EncodedValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by: Option<EncodedValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<EncodedValue>,
        timing: Timing,
    },
    /// Interpolates one property through keyframes or along a path.
    Keyframe {
        key_path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        values: Vec<EncodedValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<EncodedValue>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        key_times: Vec<f64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        timing_functions: Vec<ControlPoints>,
        timing: Timing,
    },
    /// Plays child nodes against a shared local clock.
    Group {
        animations: Vec<EngineNode>,
        timing: Timing,
    },
}

impl EngineNode {
    /// The node's timing record.
    pub fn timing(&self) -> &Timing {
        match self {
            Self::Basic { timing, .. } | Self::Keyframe { timing, .. } | Self::Group { timing, .. } => {
                timing
            }
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[EngineNode] {
        match self {
            Self::Group { animations, .. } => animations,
            Self::Basic { .. } | Self::Keyframe { .. } => &[],
        }
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }
}

/// Serializes `f64::INFINITY` as the string `"infinity"` so the record
/// survives JSON, which has no infinite numbers.
mod unbounded {
    use super::{Deserialize, Deserializer, Serializer};
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str("infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Word(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(n),
            Wire::Word(w) if w == "infinity" => Ok(f64::INFINITY),
            Wire::Word(w) => Err(D::Error::custom(format!("invalid repeat count: {w:?}"))),
        }
    }
}
