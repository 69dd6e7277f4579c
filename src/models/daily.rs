use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SubjectRecord;

/// One day's study record.
///
/// `total_study_seconds` counts whole sessions (start to stop), while each
/// subject's `time_seconds` counts its own focus blocks. The two are
/// accumulated independently and never reconciled against each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Seconds of session time accumulated across the day.
    #[serde(default)]
    pub total_study_seconds: f64,
    /// Per-subject records, keyed by subject name. A `BTreeMap` keeps the
    /// on-disk key order stable.
    #[serde(default)]
    pub subjects: BTreeMap<String, SubjectRecord>,
}
