//! Visual targets that run attached animations against a local clock.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use choreo::{Animation, EngineNode};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::{Error, Result};

/// Called once when an attachment ends.
///
/// The argument is `true` when the animation played to its end and `false`
/// when it was detached or replaced first.
pub type Completion = Box<dyn FnOnce(bool) + Send + 'static>;

/// Local time base of a layer.
///
/// `local = (global - begin_time) * speed + time_offset`
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeBase {
    begin_time: f64,
    speed: f64,
    time_offset: f64,
}

impl TimeBase {
    fn local(&self, global: f64) -> f64 {
        (global - self.begin_time) * self.speed + self.time_offset
    }
}

struct Attachment {
    engine: EngineNode,
    /// Local time at which the animation ends; `None` if it never does.
    ends_at: Option<f64>,
    removed_on_completion: bool,
    finished: bool,
    completion: Option<Completion>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("ends_at", &self.ends_at)
            .field("removed_on_completion", &self.removed_on_completion)
            .field("finished", &self.finished)
            .field("has_completion", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct LayerState {
    time: TimeBase,
    attachments: BTreeMap<String, Attachment>,
}

/// A visual target that animations attach to.
///
/// Each attachment holds its own lowered snapshot of the animation, so one
/// [`Animation`] can run on many layers at once. All methods take `&self`;
/// a layer can be shared between threads behind an [`Arc`].
///
/// ```rust
/// use std::sync::Arc;
/// use choreo::animate;
/// use stage::{Layer, ManualClock};
///
/// let clock = Arc::new(ManualClock::new(0.0));
/// let layer = Layer::new(clock.clone());
///
/// let key = layer.attach(&animate::wait(1.0), None);
/// clock.advance(1.5);
/// assert_eq!(layer.advance(), vec![key]);
/// ```
pub struct Layer {
    clock: Arc<dyn Clock>,
    state: RwLock<LayerState>,
    next_key: AtomicU64,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

impl Layer {
    /// Creates a layer driven by `clock`, running at speed 1.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(LayerState {
                time: TimeBase {
                    begin_time: 0.0,
                    speed: 1.0,
                    time_offset: 0.0,
                },
                attachments: BTreeMap::new(),
            }),
            next_key: AtomicU64::new(1),
        }
    }

    // =========================================================================
    // Attaching
    // =========================================================================

    /// Attaches `animation` under `key`, or under a generated key when
    /// `None`, and returns the key.
    ///
    /// An existing attachment with the same key is replaced.
    pub fn attach(&self, animation: &Animation, key: Option<&str>) -> String {
        self.insert(animation, key, None)
    }

    /// Like [`Layer::attach`], calling `completion` once the attachment
    /// ends.
    pub fn attach_with_completion<F>(&self, animation: &Animation, key: Option<&str>, completion: F) -> String
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.insert(animation, key, Some(Box::new(completion)))
    }

    fn insert(&self, animation: &Animation, key: Option<&str>, completion: Option<Completion>) -> String {
        let key = key.map_or_else(
            || format!("choreo-{}", self.next_key.fetch_add(1, Ordering::Relaxed)),
            str::to_owned,
        );
        let now = self.clock.now();
        let engine = animation.to_engine();

        let replaced = {
            let mut state = self.state.write();
            let local = state.time.local(now);
            let ends_at = end_time(local, animation, engine.timing().speed);
            debug!(
                layer.key = %key,
                layer.local = local,
                animation.accumulated = %animation.accumulated_duration(),
                animation.nodes = engine.node_count(),
                "Attaching animation"
            );
            state.attachments.insert(
                key.clone(),
                Attachment {
                    removed_on_completion: engine.timing().removed_on_completion,
                    engine,
                    ends_at,
                    finished: false,
                    completion,
                },
            )
        };

        if let Some(old) = replaced {
            debug!(layer.key = %key, "Replaced existing attachment");
            if let Some(done) = old.completion {
                done(false);
            }
        }
        key
    }

    /// Removes the attachment under `key`. A pending completion is called
    /// with `false`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAnimation`] if nothing is attached under `key`.
    pub fn detach(&self, key: &str) -> Result<()> {
        let removed = self.state.write().attachments.remove(key);
        let attachment = removed.ok_or_else(|| Error::UnknownAnimation(key.to_owned()))?;
        debug!(layer.key = %key, "Detached animation");
        if let Some(done) = attachment.completion {
            done(false);
        }
        Ok(())
    }

    /// Marks the attachment under `key` as finished, as a platform engine
    /// would when it reports completion.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAnimation`] if nothing is attached under `key`.
    pub fn finish(&self, key: &str) -> Result<()> {
        let completion = {
            let mut state = self.state.write();
            let attachment = state
                .attachments
                .get_mut(key)
                .ok_or_else(|| Error::UnknownAnimation(key.to_owned()))?;
            attachment.finished = true;
            let completion = attachment.completion.take();
            if attachment.removed_on_completion {
                state.attachments.remove(key);
            }
            completion
        };
        debug!(layer.key = %key, "Animation finished");
        if let Some(done) = completion {
            done(true);
        }
        Ok(())
    }

    /// Finishes every attachment whose end has passed in local time and
    /// returns their keys in key order.
    ///
    /// Attachments that never end are left alone.
    pub fn advance(&self) -> Vec<String> {
        let now = self.clock.now();
        let mut done = Vec::new();
        {
            let mut state = self.state.write();
            let local = state.time.local(now);
            let due: Vec<String> = state
                .attachments
                .iter()
                .filter(|(_, a)| !a.finished && a.ends_at.is_some_and(|end| local >= end))
                .map(|(key, _)| key.clone())
                .collect();
            for key in due {
                let Some(attachment) = state.attachments.get_mut(&key) else {
                    continue;
                };
                attachment.finished = true;
                let completion = attachment.completion.take();
                if attachment.removed_on_completion {
                    state.attachments.remove(&key);
                }
                done.push((key, completion));
            }
        }

        // Completions run unlocked so they may touch the layer.
        let mut keys = Vec::with_capacity(done.len());
        for (key, completion) in done {
            debug!(layer.key = %key, "Animation finished");
            if let Some(completion) = completion {
                completion(true);
            }
            keys.push(key);
        }
        keys
    }

    // =========================================================================
    // Local clock
    // =========================================================================

    /// Freezes the layer's local time.
    pub fn pause(&self) {
        let now = self.clock.now();
        let mut state = self.state.write();
        let local = state.time.local(now);
        state.time = TimeBase {
            begin_time: state.time.begin_time,
            speed: 0.0,
            time_offset: local,
        };
        info!(layer.local = local, "Layer paused");
    }

    /// Resumes at speed 1.
    pub fn resume(&self) {
        self.resume_at_speed(1.0);
    }

    /// Resumes at `speed`, continuing local time from where it stopped.
    ///
    /// A negative or non-finite speed is replaced by 1.
    pub fn resume_at_speed(&self, speed: f64) {
        let speed = if speed.is_finite() && speed >= 0.0 {
            speed
        } else {
            warn!(layer.speed = speed, "Invalid resume speed, using 1.0");
            1.0
        };
        let now = self.clock.now();
        let mut state = self.state.write();
        let local = state.time.local(now);
        state.time = TimeBase {
            begin_time: now,
            speed,
            time_offset: local,
        };
        info!(layer.local = local, layer.speed = speed, "Layer resumed");
    }

    /// Returns `true` while the layer's local time is frozen.
    pub fn is_paused(&self) -> bool {
        self.state.read().time.speed == 0.0
    }

    /// The layer's current local time, in seconds.
    pub fn local_time(&self) -> f64 {
        let now = self.clock.now();
        self.state.read().time.local(now)
    }

    /// The layer's current speed.
    pub fn speed(&self) -> f64 {
        self.state.read().time.speed
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// The lowered snapshot attached under `key`.
    pub fn animation(&self, key: &str) -> Option<EngineNode> {
        self.state.read().attachments.get(key).map(|a| a.engine.clone())
    }

    /// Keys of all current attachments, in key order.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().attachments.keys().cloned().collect()
    }

    /// Returns `true` if `key` has played to its end and is still attached.
    pub fn is_finished(&self, key: &str) -> bool {
        self.state
            .read()
            .attachments
            .get(key)
            .is_some_and(|a| a.finished)
    }

    /// Number of current attachments.
    pub fn len(&self) -> usize {
        self.state.read().attachments.len()
    }

    /// Returns `true` if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.state.read().attachments.is_empty()
    }
}

/// Local time at which an animation attached at `local` ends.
fn end_time(local: f64, animation: &Animation, speed: f64) -> Option<f64> {
    let total = animation.begin_time() + animation.accumulated_duration().scale(speed.recip());
    total.as_finite().map(|secs| local + secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn layer() -> (Arc<ManualClock>, Layer) {
        let clock = Arc::new(ManualClock::new(100.0));
        let layer = Layer::new(clock.clone());
        (clock, layer)
    }

    #[test]
    fn test_local_time_follows_clock() {
        let (clock, layer) = layer();
        assert_eq!(layer.local_time(), 100.0);
        clock.advance(2.0);
        assert_eq!(layer.local_time(), 102.0);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let (clock, layer) = layer();
        clock.advance(1.0);
        layer.pause();
        assert!(layer.is_paused());
        clock.advance(5.0);
        assert_eq!(layer.local_time(), 101.0);

        layer.resume_at_speed(2.0);
        assert!(!layer.is_paused());
        assert_eq!(layer.local_time(), 101.0);
        clock.advance(1.0);
        assert_eq!(layer.local_time(), 103.0);
    }

    #[test]
    fn test_invalid_resume_speed_falls_back() {
        let (_, layer) = layer();
        layer.pause();
        layer.resume_at_speed(f64::NAN);
        assert_eq!(layer.speed(), 1.0);
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let (_, layer) = layer();
        let a = layer.attach(&choreo::animate::wait(1.0), None);
        let b = layer.attach(&choreo::animate::wait(1.0), None);
        assert_ne!(a, b);
        assert!(a.starts_with("choreo-"));
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn test_end_time_accounts_for_speed() {
        let animation = choreo::animate::fade_in(
            choreo::animate::Motion::new(2.0).options(choreo::Options::default().with_speed(2.0)),
        )
        .unwrap();
        assert_eq!(end_time(10.0, &animation, 2.0), Some(11.0));

        let endless = choreo::animate::replay_forever(&animation);
        assert_eq!(end_time(10.0, &endless, 1.0), None);
    }
}
