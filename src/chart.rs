//! Aggregation and terminal rendering of progress charts.
//!
//! Aggregation sums each subject's counters over a date range anchored at
//! today; rendering turns the totals into a horizontal bar chart of each
//! subject's share. Rendering is pure string-building so it can be tested
//! without a terminal.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::store::{parse_date_key, LogData};

const BAR_WIDTH: usize = 20;

/// Date range selector for aggregation. Ranges run up to and including
/// today: `Week` starts on Monday, `Month` on the 1st.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    /// Parse the command-line selector. A leading letter is enough
    /// (`t`, `w`, `m`).
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.chars().next()? {
            't' => Some(Self::Today),
            'w' => Some(Self::Week),
            'm' => Some(Self::Month),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "this week",
            Self::Month => "this month",
        }
    }

    /// First date included when aggregating up to `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => today,
            Self::Week => {
                let back = today.weekday().num_days_from_monday() as u64;
                today.checked_sub_days(Days::new(back)).unwrap_or(today)
            }
            Self::Month => today.with_day(1).unwrap_or(today),
        }
    }
}

/// Which counter a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    Time,
}

impl Metric {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "count" => Some(Self::Count),
            "time" => Some(Self::Time),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Count => "Problems solved",
            Self::Time => "Time spent",
        }
    }
}

/// Per-subject totals over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubjectTotals {
    pub solved: u32,
    pub time_seconds: f64,
}

/// Sum solved counts and focus time per subject across the period.
///
/// Every configured subject appears in the result, zeroed if it has no
/// data. Store entries with unparseable date keys are skipped; subjects no
/// longer in the config are ignored.
pub fn aggregate(
    data: &LogData,
    subjects: &BTreeMap<String, String>,
    period: Period,
    today: NaiveDate,
) -> BTreeMap<String, SubjectTotals> {
    let start = period.start_date(today);
    let mut agg: BTreeMap<String, SubjectTotals> = subjects
        .keys()
        .map(|key| (key.clone(), SubjectTotals::default()))
        .collect();

    for (date_key, day) in data {
        let Some(date) = parse_date_key(date_key) else {
            continue;
        };
        if date < start || date > today {
            continue;
        }
        for (key, record) in &day.subjects {
            if let Some(totals) = agg.get_mut(key) {
                totals.solved += record.solved;
                totals.time_seconds += record.time_seconds;
            }
        }
    }
    agg
}

/// Render per-subject shares of the chosen metric as horizontal bars.
///
/// Subjects with a zero value are left out. Returns `None` when there is
/// nothing to chart in the range.
pub fn render_bars(
    agg: &BTreeMap<String, SubjectTotals>,
    metric: Metric,
    title: &str,
) -> Option<String> {
    let values: Vec<(&str, f64)> = agg
        .iter()
        .map(|(key, totals)| {
            let value = match metric {
                Metric::Count => totals.solved as f64,
                Metric::Time => totals.time_seconds,
            };
            (key.as_str(), value)
        })
        .filter(|(_, value)| *value > 0.0)
        .collect();

    let total: f64 = values.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return None;
    }

    let label_width = values.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut output = format!("{}\n\n", title);
    for (key, value) in &values {
        let share = value / total;
        let filled = (share * BAR_WIDTH as f64).round() as usize;
        let bar: String = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH));
        let shown = match metric {
            Metric::Count => format!("{}", *value as u32),
            Metric::Time => format_hms(*value),
        };
        output.push_str(&format!(
            "  {:<width$}  {}  {} ({:.1}%)\n",
            key,
            bar,
            shown,
            share * 100.0,
            width = label_width
        ));
    }
    Some(output)
}

/// `HH:MM:SS` from fractional seconds, truncating sub-second precision.
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
