//! The animation node algebra.
//!
//! An [`Animation`] is an immutable tree. Leaves animate one property;
//! groups play children in parallel; sequences play them back to back;
//! repeat and autoreverse nodes wrap a single child. Every node computes two
//! durations once, at construction:
//!
//! - **base duration**: one play-through, including autoreverse doubling but
//!   not repetition. Always finite.
//! - **accumulated duration**: total wall-clock time including repetition.
//!   Infinite for nodes that repeat forever.
//!
//! Composite constructors take an independent copy of each child, so the
//! same animation value can be embedded in several composites and each
//! copy gets its own begin offset.
//!
//! # Example
//!
//! ```rust
//! use choreo::{Animation, DurationSpan, Options, Seconds};
//!
//! let a = Animation::wait(1.0);
//! let b = Animation::wait(2.0);
//! let seq = Animation::sequence([&a, &b], DurationSpan::Automatic, &Options::default()).unwrap();
//!
//! assert_eq!(seq.base_duration(), Seconds::new(3.0));
//! assert_eq!(seq.children()[1].timing().begin_time, 1.0);
//! ```

use std::borrow::Borrow;

use tracing::{debug, trace};

use crate::curve::{ControlPoints, TimingCurve};
use crate::duration::{add_duration, max_duration, Seconds};
use crate::engine::{EngineNode, Timing};
use crate::error::{Error, Result};
use crate::geometry::Path;
use crate::options::{Options, RepeatPolicy};
use crate::span::DurationSpan;
use crate::value::{EncodedValue, KeyframeValue, ValueEncoder};

/// Optional `from`/`by`/`to` endpoints of a property animation.
///
/// Any subset may be present; an empty set leaves the engine's defaults in
/// charge.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints<T> {
    /// Start value.
    pub from: Option<T>,
    /// Relative change.
    pub by: Option<T>,
    /// End value.
    pub to: Option<T>,
}

impl<T> Default for Endpoints<T> {
    fn default() -> Self {
        Self {
            from: None,
            by: None,
            to: None,
        }
    }
}

impl<T> Endpoints<T> {
    /// Converts every present endpoint.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Endpoints<U> {
        Endpoints {
            from: self.from.map(&mut f),
            by: self.by.map(&mut f),
            to: self.to.map(&mut f),
        }
    }
}

/// Where a keyframe animation gets its values.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeSource {
    /// Discrete values, one per key time.
    Values(Vec<KeyframeValue>),
    /// A path to travel along.
    Path(Path),
}

/// A leaf that animates one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    /// Engine key path of the property. Empty for `wait`.
    pub key_path: String,
    /// Encoded start value.
    pub from: Option<EncodedValue>,
    /// Encoded relative change.
    pub by: Option<EncodedValue>,
    /// Encoded end value.
    pub to: Option<EncodedValue>,
}

/// A leaf that animates one property through keyframes.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeAnimation {
    /// Engine key path of the property.
    pub key_path: String,
    /// Encoded keyframe values; empty when animating along a path.
    pub values: Vec<EncodedValue>,
    /// Encoded path, when animating along one.
    pub path: Option<EncodedValue>,
    /// Normalized times in `[0, 1]`; empty for evenly spaced keyframes.
    pub key_times: Vec<f64>,
    /// Per-segment easing; empty to use the node's curve throughout.
    pub curves: Vec<ControlPoints>,
}

/// The shape of an animation node.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationKind {
    /// Animates one property between endpoints.
    Property(PropertyAnimation),
    /// Animates one property through keyframes.
    Keyframe(KeyframeAnimation),
    /// Children play in parallel from offset zero.
    Group(Vec<Animation>),
    /// Children play back to back.
    Sequence(Vec<Animation>),
    /// The child plays `count + 1` times, or forever when `count` is `None`.
    Repeat {
        /// The repeated child.
        inner: Box<Animation>,
        /// Additional plays after the first.
        count: Option<u32>,
    },
    /// The child plays forward, then backward.
    Autoreverse(Box<Animation>),
}

/// An immutable node of an animation tree with its computed durations.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    kind: AnimationKind,
    timing: Timing,
    base_duration: Seconds,
    accumulated_duration: Seconds,
}

/// Durations of one pass before options are applied.
#[derive(Debug, Clone, Copy)]
struct Extent {
    /// What the engine plays for one pass.
    engine: Seconds,
    base: Seconds,
    accumulated: Seconds,
    /// The caller fixed the span instead of deriving it from children.
    declared: bool,
}

impl Extent {
    fn of_leaf(span: DurationSpan) -> Self {
        match span.resolved() {
            DurationSpan::Automatic => panic!(
                "a leaf animation cannot use an automatic duration span: \
                 it has no children to derive a duration from"
            ),
            DurationSpan::Constant(secs) => {
                let secs = Seconds::new(secs);
                Self {
                    engine: secs,
                    base: secs,
                    accumulated: secs,
                    declared: true,
                }
            }
            DurationSpan::Infinite => Self {
                engine: Seconds::INFINITE,
                base: Seconds::ZERO,
                accumulated: Seconds::INFINITE,
                declared: true,
            },
        }
    }

    fn of_composite(span: DurationSpan, natural_base: Seconds, natural_accumulated: Seconds) -> Self {
        match span.resolved() {
            DurationSpan::Automatic => Self {
                engine: natural_accumulated,
                base: natural_base,
                accumulated: natural_accumulated,
                declared: false,
            },
            DurationSpan::Constant(secs) => {
                let secs = Seconds::new(secs);
                Self {
                    engine: secs,
                    base: secs,
                    accumulated: secs,
                    declared: true,
                }
            }
            DurationSpan::Infinite => Self {
                engine: Seconds::INFINITE,
                base: natural_base,
                accumulated: Seconds::INFINITE,
                declared: true,
            },
        }
    }

    /// Applies autoreversal and repetition, producing the engine timing and
    /// the node's final durations.
    ///
    /// A declared span already covers forward and backward, so the engine
    /// plays half of it per direction. A derived span covers one direction,
    /// so the node doubles instead.
    fn settle(self, options: &Options) -> (Timing, Seconds, Seconds) {
        let Self {
            mut engine,
            mut base,
            mut accumulated,
            declared,
        } = self;

        if options.autoreverses {
            if declared {
                engine = engine.scale(0.5);
            } else {
                base = base.scale(2.0);
                accumulated = accumulated.scale(2.0);
            }
        }

        let (repeat_count, repeat_duration) = match options.repeat {
            RepeatPolicy::None => (0.0, 0.0),
            RepeatPolicy::Count(n) => {
                accumulated = accumulated.scale(f64::from(n) + 1.0);
                (f64::from(n), 0.0)
            }
            RepeatPolicy::Duration(secs) => {
                let until = Seconds::new(secs);
                if accumulated.is_finite() {
                    accumulated = max_duration(base, until);
                }
                (0.0, until.to_engine())
            }
            RepeatPolicy::Forever => {
                accumulated = Seconds::INFINITE;
                (f64::INFINITY, 0.0)
            }
        };

        let timing = Timing {
            begin_time: 0.0,
            duration: engine.to_engine(),
            speed: options.engine_speed(),
            fill: options.fill,
            removed_on_completion: options.removed_on_completion,
            autoreverses: options.autoreverses,
            repeat_count,
            repeat_duration,
            curve: options.curve.control_points(),
        };
        (timing, base, accumulated)
    }
}

fn copy_children<I>(children: I) -> Vec<Animation>
where
    I: IntoIterator,
    I::Item: Borrow<Animation>,
{
    children
        .into_iter()
        .map(|child| child.borrow().clone())
        .collect()
}

fn encode_endpoint<E: ValueEncoder + ?Sized>(
    encoder: &E,
    value: Option<&KeyframeValue>,
) -> Result<Option<EncodedValue>> {
    Ok(value.map(|v| encoder.encode(v)).transpose()?)
}

fn validate_key_times(key_times: &[f64], values: Option<usize>, curves: usize) -> Result<()> {
    if let Some(bad) = key_times.iter().find(|t| !(0.0..=1.0).contains(*t)) {
        return Err(Error::InvalidKeyTimes(format!("{bad} is outside [0, 1]")));
    }
    if key_times.windows(2).any(|w| w[1] < w[0]) {
        return Err(Error::InvalidKeyTimes("key times must not decrease".into()));
    }
    if let Some(values) = values {
        if !key_times.is_empty() && key_times.len() != values {
            return Err(Error::InvalidKeyTimes(format!(
                "{} key times for {values} values",
                key_times.len()
            )));
        }
    }
    if curves > 0 && !key_times.is_empty() && curves + 1 != key_times.len() {
        return Err(Error::InvalidKeyTimes(format!(
            "{curves} curves for {} key times; expected one per segment",
            key_times.len()
        )));
    }
    Ok(())
}

impl Animation {
    // =========================================================================
    // Leaves
    // =========================================================================

    /// Builds a leaf that animates `key_path` between the given endpoints.
    ///
    /// Each present endpoint is encoded once and stored verbatim.
    ///
    /// # Errors
    /// Returns [`Error::Encode`] if the encoder rejects an endpoint.
    ///
    /// # Panics
    /// Panics if `span` is [`DurationSpan::Automatic`]: a leaf has no
    /// children to derive its duration from, so this is a programming error.
    pub fn property<E: ValueEncoder + ?Sized>(
        encoder: &E,
        key_path: impl Into<String>,
        endpoints: &Endpoints<KeyframeValue>,
        span: DurationSpan,
        options: &Options,
    ) -> Result<Self> {
        let extent = Extent::of_leaf(span);
        let leaf = PropertyAnimation {
            key_path: key_path.into(),
            from: encode_endpoint(encoder, endpoints.from.as_ref())?,
            by: encode_endpoint(encoder, endpoints.by.as_ref())?,
            to: encode_endpoint(encoder, endpoints.to.as_ref())?,
        };
        let (timing, base_duration, accumulated_duration) = extent.settle(options);
        Ok(Self {
            kind: AnimationKind::Property(leaf),
            timing,
            base_duration,
            accumulated_duration,
        })
    }

    /// Builds a leaf that animates `key_path` through keyframes or along a
    /// path.
    ///
    /// # Errors
    /// Returns [`Error::Encode`] if a value is rejected, or
    /// [`Error::InvalidKeyTimes`] if `key_times` is unsorted, outside
    /// `[0, 1]`, or does not line up with the values or curves.
    ///
    /// # Panics
    /// Panics if `span` is [`DurationSpan::Automatic`].
    pub fn keyframes<E: ValueEncoder + ?Sized>(
        encoder: &E,
        key_path: impl Into<String>,
        source: &KeyframeSource,
        key_times: Vec<f64>,
        curves: &[TimingCurve],
        span: DurationSpan,
        options: &Options,
    ) -> Result<Self> {
        let extent = Extent::of_leaf(span);

        let (values, path) = match source {
            KeyframeSource::Values(values) => {
                validate_key_times(&key_times, Some(values.len()), curves.len())?;
                let encoded = values
                    .iter()
                    .map(|v| encoder.encode(v))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                (encoded, None)
            }
            KeyframeSource::Path(path) => {
                validate_key_times(&key_times, None, curves.len())?;
                let encoded = encoder.encode(&KeyframeValue::Path(path.clone()))?;
                (Vec::new(), Some(encoded))
            }
        };

        let leaf = KeyframeAnimation {
            key_path: key_path.into(),
            values,
            path,
            key_times,
            curves: curves.iter().map(TimingCurve::control_points).collect(),
        };
        let (timing, base_duration, accumulated_duration) = extent.settle(options);
        Ok(Self {
            kind: AnimationKind::Keyframe(leaf),
            timing,
            base_duration,
            accumulated_duration,
        })
    }

    /// A leaf that animates nothing for `seconds`.
    ///
    /// Nothing persists outside its interval and the engine removes it once
    /// finished.
    pub fn wait(seconds: f64) -> Self {
        let (timing, base_duration, accumulated_duration) =
            Extent::of_leaf(DurationSpan::Constant(seconds)).settle(&Options::transient());
        Self {
            kind: AnimationKind::Property(PropertyAnimation {
                key_path: String::new(),
                from: None,
                by: None,
                to: None,
            }),
            timing,
            base_duration,
            accumulated_duration,
        }
    }

    // =========================================================================
    // Composites
    // =========================================================================

    /// Plays `children` in parallel, each starting at offset zero.
    ///
    /// With an automatic span the group lasts as long as its longest child:
    /// the base duration is the maximum child base duration and the
    /// accumulated duration is the maximum child accumulated duration. A
    /// constant span sizes the group box; children keep their own pace and
    /// are cut off if they run longer.
    pub fn group<I>(children: I, span: DurationSpan, options: &Options) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Animation>,
    {
        Self::build_group(copy_children(children), span, options, false)
    }

    /// Like [`Animation::group`], but with a constant span every child's
    /// speed is scaled so the longest child finishes exactly when the group
    /// does.
    ///
    /// Normalization needs a finite, non-zero natural duration and a
    /// positive constant span; otherwise it behaves like
    /// [`Animation::group`].
    pub fn normalized_group<I>(children: I, span: DurationSpan, options: &Options) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Animation>,
    {
        Self::build_group(copy_children(children), span, options, true)
    }

    fn build_group(
        mut children: Vec<Animation>,
        span: DurationSpan,
        options: &Options,
        normalize: bool,
    ) -> Self {
        for child in &mut children {
            child.timing.begin_time = 0.0;
        }

        let natural_base = children
            .iter()
            .map(Animation::base_duration)
            .fold(Seconds::ZERO, max_duration);
        let natural_accumulated = children
            .iter()
            .map(Animation::accumulated_duration)
            .fold(Seconds::ZERO, max_duration);

        if let DurationSpan::Constant(secs) = span.resolved() {
            let target = Seconds::new(secs);
            match natural_accumulated.as_finite() {
                Some(natural) if normalize && natural > 0.0 && secs > 0.0 => {
                    let factor = natural / secs;
                    debug!(
                        group.natural = natural,
                        group.target = secs,
                        group.factor = factor,
                        "Normalizing group children speed"
                    );
                    for child in &mut children {
                        child.timing.speed *= factor;
                    }
                }
                _ if natural_accumulated > target => {
                    debug!(
                        group.natural = %natural_accumulated,
                        group.target = %target,
                        "Group span truncates its children"
                    );
                }
                _ => {}
            }
        }

        let (timing, base_duration, accumulated_duration) =
            Extent::of_composite(span, natural_base, natural_accumulated).settle(options);

        trace!(
            animation.kind = "group",
            animation.children = children.len(),
            animation.base = %base_duration,
            animation.accumulated = %accumulated_duration,
            "Built group"
        );

        Self {
            kind: AnimationKind::Group(children),
            timing,
            base_duration,
            accumulated_duration,
        }
    }

    /// Plays `children` back to back, in order.
    ///
    /// Child `i` begins at the sum of the base durations of the children
    /// before it. With an automatic span the base duration is the sum of the
    /// children's base durations and the accumulated duration is the sum of
    /// their accumulated durations.
    ///
    /// # Errors
    /// Returns [`Error::UnreachableChild`] if any child other than the last
    /// has an infinite accumulated duration.
    pub fn sequence<I>(children: I, span: DurationSpan, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<Animation>,
    {
        let mut children = copy_children(children);
        let len = children.len();

        if let Some(index) = children
            .iter()
            .take(len.saturating_sub(1))
            .position(|child| child.accumulated_duration.is_infinite())
        {
            return Err(Error::UnreachableChild { index, len });
        }

        let mut offset = Seconds::ZERO;
        for child in &mut children {
            child.timing.begin_time = offset.to_engine();
            offset = add_duration(offset, child.base_duration);
        }
        let natural_accumulated: Seconds =
            children.iter().map(Animation::accumulated_duration).sum();

        let (timing, base_duration, accumulated_duration) =
            Extent::of_composite(span, offset, natural_accumulated).settle(options);

        trace!(
            animation.kind = "sequence",
            animation.children = len,
            animation.base = %base_duration,
            animation.accumulated = %accumulated_duration,
            "Built sequence"
        );

        Ok(Self {
            kind: AnimationKind::Sequence(children),
            timing,
            base_duration,
            accumulated_duration,
        })
    }

    /// Plays `inner` `count + 1` times, or forever when `count` is `None`.
    ///
    /// The base duration stays that of one play of `inner`; only the
    /// accumulated duration grows.
    pub fn repeat(inner: &Animation, count: Option<u32>) -> Self {
        let mut copy = inner.clone();
        copy.timing.begin_time = 0.0;

        let per_pass = inner.accumulated_duration;
        let (accumulated_duration, repeat_count) = match count {
            Some(n) => (per_pass.scale(f64::from(n) + 1.0), f64::from(n)),
            None => (Seconds::INFINITE, f64::INFINITY),
        };
        let timing = Timing {
            duration: per_pass.to_engine(),
            repeat_count,
            ..Timing::default()
        };

        trace!(
            animation.kind = "repeat",
            animation.count = ?count,
            animation.accumulated = %accumulated_duration,
            "Built repeat"
        );

        Self {
            kind: AnimationKind::Repeat {
                inner: Box::new(copy),
                count,
            },
            timing,
            base_duration: inner.base_duration,
            accumulated_duration,
        }
    }

    /// Plays `inner` forward, then backward, doubling both durations.
    pub fn autoreverse(inner: &Animation) -> Self {
        let mut copy = inner.clone();
        copy.timing.begin_time = 0.0;

        let timing = Timing {
            duration: inner.accumulated_duration.to_engine(),
            autoreverses: true,
            ..Timing::default()
        };

        Self {
            kind: AnimationKind::Autoreverse(Box::new(copy)),
            timing,
            base_duration: inner.base_duration.scale(2.0),
            accumulated_duration: inner.accumulated_duration.scale(2.0),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The node's shape.
    pub fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    /// The engine timing record of this node.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Duration of one play-through, excluding repetition.
    pub fn base_duration(&self) -> Seconds {
        self.base_duration
    }

    /// Total duration including repetition; may be infinite.
    pub fn accumulated_duration(&self) -> Seconds {
        self.accumulated_duration
    }

    /// The node's start offset within its parent.
    pub fn begin_time(&self) -> Seconds {
        Seconds::new(self.timing.begin_time)
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[Animation] {
        match &self.kind {
            AnimationKind::Group(children) | AnimationKind::Sequence(children) => children,
            AnimationKind::Repeat { inner, .. } | AnimationKind::Autoreverse(inner) => {
                std::slice::from_ref(inner.as_ref())
            }
            AnimationKind::Property(_) | AnimationKind::Keyframe(_) => &[],
        }
    }

    /// The animated key path, for leaves.
    pub fn key_path(&self) -> Option<&str> {
        match &self.kind {
            AnimationKind::Property(leaf) => Some(&leaf.key_path),
            AnimationKind::Keyframe(leaf) => Some(&leaf.key_path),
            _ => None,
        }
    }

    /// A short human-readable description of the node.
    pub fn label(&self) -> String {
        match &self.kind {
            AnimationKind::Property(leaf) if leaf.key_path.is_empty() => "wait".to_string(),
            AnimationKind::Property(leaf) => leaf.key_path.clone(),
            AnimationKind::Keyframe(leaf) => format!("keyframes {}", leaf.key_path),
            AnimationKind::Group(children) => format!("group[{}]", children.len()),
            AnimationKind::Sequence(children) => format!("sequence[{}]", children.len()),
            AnimationKind::Repeat { count: Some(n), .. } => format!("repeat x{}", u64::from(*n) + 1),
            AnimationKind::Repeat { count: None, .. } => "repeat forever".to_string(),
            AnimationKind::Autoreverse(_) => "autoreverse".to_string(),
        }
    }

    // =========================================================================
    // Lowering
    // =========================================================================

    /// Lowers the tree to the engine description.
    ///
    /// The result is an independent snapshot; an executor may keep it for
    /// as long as the animation runs.
    pub fn to_engine(&self) -> EngineNode {
        let timing = self.timing.clone();
        match &self.kind {
            AnimationKind::Property(leaf) => EngineNode::Basic {
                key_path: leaf.key_path.clone(),
                from: leaf.from.clone(),
                by: leaf.by.clone(),
                to: leaf.to.clone(),
                timing,
            },
            AnimationKind::Keyframe(leaf) => EngineNode::Keyframe {
                key_path: leaf.key_path.clone(),
                values: leaf.values.clone(),
                path: leaf.path.clone(),
                key_times: leaf.key_times.clone(),
                timing_functions: leaf.curves.clone(),
                timing,
            },
            AnimationKind::Group(_)
            | AnimationKind::Sequence(_)
            | AnimationKind::Repeat { .. }
            | AnimationKind::Autoreverse(_) => EngineNode::Group {
                animations: self.children().iter().map(Animation::to_engine).collect(),
                timing,
            },
        }
    }

    /// Visits every node depth-first with its absolute start time.
    pub fn walk(&self, mut visit: impl FnMut(&Animation, Visit)) {
        self.walk_from(Seconds::ZERO, 0, &mut visit);
    }

    fn walk_from(&self, parent_start: Seconds, depth: usize, visit: &mut impl FnMut(&Animation, Visit)) {
        let start = add_duration(parent_start, self.begin_time());
        visit(self, Visit { depth, start });
        for child in self.children() {
            child.walk_from(start, depth + 1, visit);
        }
    }

    /// Flattens the tree into absolute time windows, one per node, in
    /// depth-first order.
    ///
    /// Each window spans the node's first play from its absolute start to
    /// start plus accumulated duration.
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        let mut entries = Vec::new();
        self.walk(|node, visit| {
            entries.push(ScheduleEntry {
                depth: visit.depth,
                label: node.label(),
                start: visit.start,
                end: add_duration(visit.start, node.accumulated_duration),
            });
        });
        entries
    }
}

/// Position of a node during [`Animation::walk`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    /// Nesting depth; the root is 0.
    pub depth: usize,
    /// Absolute start time of the node.
    pub start: Seconds,
}

/// One row of [`Animation::schedule`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScheduleEntry {
    /// Nesting depth; the root is 0.
    pub depth: usize,
    /// What the node is.
    pub label: String,
    /// Absolute start time.
    pub start: Seconds,
    /// Absolute end time; infinite for endless nodes.
    pub end: Seconds,
}
