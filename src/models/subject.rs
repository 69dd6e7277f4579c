use serde::{Deserialize, Serialize};

/// Per-subject, per-day study counters.
///
/// `time_seconds` only ever grows within a day: focus blocks add their
/// elapsed time on exit. `milestones_achieved` is always a subset of the
/// active milestone track for the current goal and is cleared whenever the
/// goal changes, even to the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Problems solved so far today.
    #[serde(default)]
    pub solved: u32,
    /// Daily problem target. Zero means no goal is set.
    #[serde(default)]
    pub goal: u32,
    /// Accumulated focused study time, in seconds.
    #[serde(default)]
    pub time_seconds: f64,
    /// Milestone percentages already celebrated today.
    #[serde(default)]
    pub milestones_achieved: Vec<u32>,
}

impl SubjectRecord {
    /// A fresh record with the given daily goal and everything else zeroed.
    pub fn with_goal(goal: u32) -> Self {
        Self {
            solved: 0,
            goal,
            time_seconds: 0.0,
            milestones_achieved: Vec::new(),
        }
    }

    /// Count one solved problem. There is no upper bound, even past the goal.
    pub fn record_solved(&mut self) {
        self.solved += 1;
    }

    /// Add focused study time. Non-positive deltas are ignored.
    pub fn accumulate_time(&mut self, delta_seconds: f64) {
        if delta_seconds > 0.0 {
            self.time_seconds += delta_seconds;
        }
    }

    /// Set a new daily goal. Milestone history is invalidated
    /// unconditionally, even when the new goal equals the old one.
    pub fn set_goal(&mut self, goal: u32) {
        self.goal = goal;
        self.milestones_achieved.clear();
    }

    /// Progress toward the goal in percent. `None` when no goal is set.
    pub fn progress_percent(&self) -> Option<f64> {
        (self.goal > 0).then(|| self.solved as f64 / self.goal as f64 * 100.0)
    }
}
