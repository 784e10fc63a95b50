//! Rendering scene reports.

use std::fmt::Write as _;
use std::sync::Arc;

use choreo::{Animation, EngineNode, ScheduleEntry, Seconds};
use serde::Serialize;
use stage::{Clock, Layer, ManualClock};
use tracing::{debug, info, warn};

/// Everything the CLI reports about a built scene.
#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub base_duration: Seconds,
    pub accumulated_duration: Seconds,
    pub schedule: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<Simulation>,
}

/// Outcome of playing a scene on a headless layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Simulation {
    /// The completion callback fired at this clock reading.
    Finished { at: f64 },
    /// The limit passed without completion.
    Running { until: f64 },
}

impl Report {
    pub fn new(name: &str, animation: &Animation, with_engine: bool) -> Self {
        Self {
            name: name.to_owned(),
            base_duration: animation.base_duration(),
            accumulated_duration: animation.accumulated_duration(),
            schedule: animation.schedule(),
            engine: with_engine.then(|| animation.to_engine()),
            simulation: None,
        }
    }

    /// Renders the indented text form.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let name = if self.name.is_empty() { "(unnamed)" } else { &self.name };
        let _ = writeln!(out, "scene: {name}");
        let _ = writeln!(
            out,
            "base: {}  accumulated: {}",
            self.base_duration, self.accumulated_duration
        );
        for entry in &self.schedule {
            let _ = writeln!(
                out,
                "{:indent$}{} .. {}  {}",
                "",
                entry.start,
                entry.end,
                entry.label,
                indent = 2 * (entry.depth + 1)
            );
        }
        match self.simulation {
            Some(Simulation::Finished { at }) => {
                let _ = writeln!(out, "finished at {at:.3}s");
            }
            Some(Simulation::Running { until }) => {
                let _ = writeln!(out, "still running at {until:.3}s");
            }
            None => {}
        }
        out
    }
}

/// Simulated seconds after which an endless scene is reported as running.
pub const DEFAULT_LIMIT: f64 = 60.0;

/// Attaches `animation` to a fresh layer and steps a manual clock by
/// `step` until the completion callback fires or `limit` is reached.
///
/// A `limit` that is negative or not finite is replaced by
/// [`DEFAULT_LIMIT`].
pub fn simulate(animation: &Animation, step: f64, limit: f64) -> Simulation {
    let step = if step.is_finite() && step > 0.0 { step } else { 0.01 };
    let limit = if limit.is_finite() && limit >= 0.0 {
        limit
    } else {
        warn!(simulation.limit = limit, simulation.default = DEFAULT_LIMIT, "Invalid simulation limit, using default");
        DEFAULT_LIMIT
    };
    let clock = Arc::new(ManualClock::new(0.0));
    let layer = Layer::new(clock.clone());
    let key = layer.attach(animation, Some("scene"));

    let mut ticks: u64 = 0;
    loop {
        let now = clock.now();
        if !layer.advance().is_empty() {
            info!(simulation.at = now, simulation.ticks = ticks, "Scene finished");
            return Simulation::Finished { at: now };
        }
        if now >= limit {
            debug!(simulation.key = %key, simulation.limit = limit, "Simulation limit reached");
            return Simulation::Running { until: now };
        }
        ticks += 1;
        clock.set(ticks as f64 * step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreo::animate;

    #[test]
    fn test_text_report_is_indented() {
        let animation = animate::sequence([animate::wait(0.5), animate::wait(0.25)])
            .build()
            .unwrap();
        let text = Report::new("demo", &animation, false).to_text();
        assert!(text.starts_with("scene: demo\n"));
        assert!(text.contains("base: 0.75s  accumulated: 0.75s"));
        assert!(text.contains("    0.5s .. 0.75s  wait"));
    }

    #[test]
    fn test_simulation_finishes_finite_scenes() {
        let animation = animate::wait(1.0);
        assert_eq!(simulate(&animation, 0.25, 10.0), Simulation::Finished { at: 1.0 });
    }

    #[test]
    fn test_simulation_gives_up_on_endless_scenes() {
        let animation = animate::replay_forever(&animate::wait(1.0));
        assert_eq!(simulate(&animation, 0.5, 2.0), Simulation::Running { until: 2.0 });
    }

    #[test]
    fn test_simulation_limit_falls_back_when_not_finite() {
        let animation = animate::replay_forever(&animate::wait(1.0));
        for limit in [f64::NAN, f64::INFINITY, -1.0] {
            assert_eq!(
                simulate(&animation, 0.5, limit),
                Simulation::Running { until: DEFAULT_LIMIT }
            );
        }
    }
}
