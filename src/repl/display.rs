//! Terminal presentation for the interactive loop.
//!
//! Everything here builds plain strings; the loop decides where and how to
//! print them. Keeping rendering pure makes the output testable.

use std::collections::BTreeMap;

use crate::chart::format_hms;
use crate::models::DailyLog;

/// The main-menu prompt. The reminder task re-prints it after a notice.
pub const PROMPT: &str = "tracker >";

/// The prompt shown inside a subject's focus mode.
pub fn focus_prompt(label: &str) -> String {
    format!("[{}] >", label)
}

pub fn banner() -> &'static str {
    "--- studytrack ---"
}

/// Status block for one day.
///
/// The total line includes the running session's elapsed time when the
/// caller passes it in; per-subject lines show `solved/goal` (or just
/// `solved` for goal-less subjects) plus focus time once there is any.
pub fn render_status(
    title: &str,
    day: &DailyLog,
    subjects: &BTreeMap<String, String>,
    session_elapsed_seconds: f64,
) -> String {
    let total = day.total_study_seconds + session_elapsed_seconds;

    let mut output = format!("\n--- Study status for {} ---\n", title);
    output.push_str(&format!("Total session time: {}\n", format_hms(total)));
    output.push_str(&"-".repeat(35));
    output.push('\n');

    if day.subjects.is_empty() {
        output.push_str("No subject data for this day.\n");
    } else {
        output.push_str("Progress per subject:\n");
        for (key, label) in subjects {
            let (solved, goal, time_seconds) = day
                .subjects
                .get(key)
                .map(|r| (r.solved, r.goal, r.time_seconds))
                .unwrap_or((0, 0, 0.0));
            let time = if time_seconds > 0.0 {
                format!(" ({})", format_hms(time_seconds))
            } else {
                String::new()
            };
            if goal > 0 {
                output.push_str(&format!("  - {}: {}/{}{}\n", label, solved, goal, time));
            } else {
                output.push_str(&format!("  - {}: {}{}\n", label, solved, time));
            }
        }
    }
    output.push_str(&"=".repeat(35));
    output.push('\n');
    output
}

pub fn help_text(subjects: &BTreeMap<String, String>) -> String {
    let names: Vec<&str> = subjects.keys().map(String::as_str).collect();
    format!(
        "\n--- Commands ---\n\
         \x20 start <subject>          - start studying and enter focus mode\n\
         \x20 stop                     - end the current study session\n\
         \x20 status [y|YYYY-MM-DD]    - show a day's status (y: yesterday)\n\
         \x20 chart <count|time> [t|w|m] - render a progress chart\n\
         \x20 goal <subject> <n>       - set a subject's daily goal\n\
         \x20 help                     - show this help\n\
         \x20 quit                     - save and exit\n\
         \n\
         \x20 Subjects: {}\n",
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectRecord;

    fn subjects(keys: &[&str]) -> BTreeMap<String, String> {
        keys.iter()
            .map(|k| (k.to_string(), k.to_string()))
            .collect()
    }

    #[test]
    fn test_status_includes_session_elapsed() {
        let day = DailyLog {
            total_study_seconds: 60.0,
            subjects: BTreeMap::new(),
        };
        let output = render_status("today", &day, &subjects(&[]), 30.0);
        assert!(output.contains("Total session time: 00:01:30"));
        assert!(output.contains("No subject data for this day."));
    }

    #[test]
    fn test_status_formats_goal_and_time() {
        let mut day = DailyLog::default();
        day.subjects.insert(
            "math".to_string(),
            SubjectRecord {
                solved: 3,
                goal: 50,
                time_seconds: 750.0,
                milestones_achieved: Vec::new(),
            },
        );
        day.subjects
            .insert("english".to_string(), SubjectRecord::with_goal(0));

        let output = render_status("today", &day, &subjects(&["math", "english"]), 0.0);
        assert!(output.contains("  - math: 3/50 (00:12:30)"));
        // no goal and no time yet: bare count
        assert!(output.contains("  - english: 0\n"));
    }

    #[test]
    fn test_status_empty_day_notice() {
        let day = DailyLog::default();
        let output = render_status("2024-01-01", &day, &subjects(&["math"]), 0.0);
        assert!(output.contains("No subject data for this day."));
    }

    #[test]
    fn test_status_defaults_unrecorded_subject_to_zero() {
        let mut day = DailyLog::default();
        day.subjects
            .insert("math".to_string(), SubjectRecord::with_goal(50));

        // "physics" is configured but has no record yet for this day
        let output = render_status("today", &day, &subjects(&["math", "physics"]), 0.0);
        assert!(output.contains("  - math: 0/50\n"));
        assert!(output.contains("  - physics: 0\n"));
    }

    #[test]
    fn test_help_lists_subjects() {
        let output = help_text(&subjects(&["english", "math"]));
        assert!(output.contains("Subjects: english, math"));
        assert!(output.contains("start <subject>"));
    }
}
