use crate::models::{Infrastructure, Timetable};
use chrono::{Duration, NaiveTime};

/// Counts shown in the status panel once a stage has loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSummary {
    pub nodes: usize,
    pub resources: usize,
    pub waypoints: usize,
    pub network_length: f64,
    pub trains: usize,
    pub operations: usize,
    /// Earliest start and latest end of all operations, in seconds
    pub time_span: Option<(f64, f64)>,
}

impl DataSummary {
    #[must_use]
    pub fn from_infrastructure(infrastructure: &Infrastructure) -> Self {
        Self {
            nodes: infrastructure.nodes.len(),
            resources: infrastructure.resources.len(),
            waypoints: infrastructure.waypoint_count(),
            network_length: infrastructure.total_length(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timetable(mut self, timetable: &Timetable) -> Self {
        self.trains = timetable.trains.len();
        self.operations = timetable.operation_count();
        self.time_span = timetable.time_span();
        self
    }

    /// Time span as `HH:MM – HH:MM`, with a day suffix past midnight
    #[must_use]
    pub fn format_time_span(&self) -> Option<String> {
        let (start, end) = self.time_span?;
        Some(format!("{} – {}", format_clock(start), format_clock(end)))
    }
}

/// Format seconds since timetable start as a clock time.
///
/// Times outside the current day get a signed day suffix. Times too large
/// for a `chrono::Duration` fall back to plain seconds.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let Some(whole) = Duration::try_seconds(seconds.round() as i64) else {
        return format!("{seconds}s");
    };
    let total = whole.num_seconds();
    let days = total.div_euclid(SECONDS_PER_DAY);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds_of_day = total.rem_euclid(SECONDS_PER_DAY) as u32;
    let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(seconds_of_day, 0) else {
        return format!("{seconds}s");
    };
    if days == 0 {
        time.format("%H:%M").to_string()
    } else {
        format!("{} ({days:+}d)", time.format("%H:%M"))
    }
}

const SECONDS_PER_DAY: i64 = 86_400;
