//! Milestone and goal-completion evaluation.
//!
//! Driven by `solved` and `goal` on a [`SubjectRecord`]. Small goals get a
//! coarse three-step track, larger goals a four-step one. Landing exactly on
//! the goal fires its own event; once progress is at or past 100%, milestone
//! checking stays off for the record until the goal is changed again.

use owo_colors::AnsiColors;
use rand::Rng;

use crate::models::SubjectRecord;

/// Thresholds for small goals (where 20% of the goal is at most 10 problems).
const COARSE_TRACK: &[u32] = &[30, 60, 90];
/// Thresholds for larger goals.
const FINE_TRACK: &[u32] = &[20, 40, 60, 80];

/// Messages celebrating a crossed milestone.
pub const ENCOURAGEMENTS: &[&str] = &[
    "Another stage down. Keep it up!",
    "Excellent work. The effort is paying off.",
    "Incredible pace. Take a breath and keep going.",
    "Nicely done. The goal is getting closer.",
    "Persistence wins. Keep pushing!",
    "Another tough one cracked.",
    "Great rhythm today. Stay on it!",
];

/// Messages celebrating a completed daily goal.
pub const GOAL_COMPLETED: &[&str] = &[
    "Unstoppable. Goal complete!",
    "Congratulations, today's goal for this subject is done!",
    "Mission accomplished. Outstanding work!",
    "That's a wrap. You beat today's target.",
];

/// Highlight colors for celebration lines.
pub const HIGHLIGHT_COLORS: &[AnsiColors] = &[
    AnsiColors::Green,
    AnsiColors::Cyan,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Magenta,
];

/// A one-shot celebration produced by the evaluator.
#[derive(Debug, Clone, Copy)]
pub enum Celebration {
    /// A progress threshold was crossed for the first time.
    Milestone {
        percent: u32,
        message: &'static str,
        color: AnsiColors,
    },
    /// The daily goal was reached exactly.
    GoalCompleted {
        message: &'static str,
        color: AnsiColors,
    },
}

/// The milestone track for a goal. Pure in `goal`.
pub fn milestone_track(goal: u32) -> &'static [u32] {
    if goal as f64 * 0.2 <= 10.0 {
        COARSE_TRACK
    } else {
        FINE_TRACK
    }
}

/// Evaluate a record right after one solved increment.
///
/// Fires at most one event per increment: the completion event on the
/// increment that lands exactly on the goal, otherwise the earliest
/// un-achieved milestone at or below current progress. Even when one jump
/// crosses several thresholds, only the earliest fires; later increments
/// pick up the rest. Returns `None` for goal-less records and for records
/// at or past their goal.
///
/// Message and color are independent uniform picks so the same milestone
/// can celebrate differently on different days; callers inject the RNG.
pub fn evaluate<R: Rng>(record: &mut SubjectRecord, rng: &mut R) -> Option<Celebration> {
    // goal-less records are inert
    let progress = record.progress_percent()?;
    if record.solved == record.goal {
        return Some(Celebration::GoalCompleted {
            message: pick(GOAL_COMPLETED, rng),
            color: pick_color(rng),
        });
    }
    if progress >= 100.0 {
        return None;
    }
    for &percent in milestone_track(record.goal) {
        if progress >= percent as f64 && !record.milestones_achieved.contains(&percent) {
            record.milestones_achieved.push(percent);
            return Some(Celebration::Milestone {
                percent,
                message: pick(ENCOURAGEMENTS, rng),
                color: pick_color(rng),
            });
        }
    }
    None
}

fn pick<R: Rng>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    pool[rng.gen_range(0..pool.len())]
}

fn pick_color<R: Rng>(rng: &mut R) -> AnsiColors {
    HIGHLIGHT_COLORS[rng.gen_range(0..HIGHLIGHT_COLORS.len())]
}
