// View window and time mapping
// Fixed 7-hour span: 1 hour of lookback, 6 of lookahead

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::utils::time::minutes_of_day;

/// Minutes shown before the anchor.
pub const LOOKBACK_MINUTES: i64 = 60;
/// Minutes shown after the anchor.
pub const LOOKAHEAD_MINUTES: i64 = 360;
/// Total visible span; constant, zoom does not change it.
pub const WINDOW_MINUTES: i64 = LOOKBACK_MINUTES + LOOKAHEAD_MINUTES;
/// Interaction snapping increment.
pub const SNAP_MINUTES: i64 = 15;

/// Map a wall-clock time to a horizontal position in percent of the
/// window width. Values outside [0, 100] are valid off-screen positions.
pub fn time_to_percent(t: NaiveDateTime, window_start: NaiveDateTime, window_minutes: i64) -> f64 {
    let offset = t.signed_duration_since(window_start).num_minutes() as f64;
    offset / window_minutes as f64 * 100.0
}

/// Inverse of [`time_to_percent`], at minute precision.
pub fn percent_to_time(
    percent: f64,
    window_start: NaiveDateTime,
    window_minutes: i64,
) -> NaiveDateTime {
    let minutes = (percent / 100.0 * window_minutes as f64).round() as i64;
    window_start + Duration::minutes(minutes)
}

/// Round minutes to the nearest 15-minute boundary; halves round up.
pub fn snap_minutes(minutes: i64) -> i64 {
    ((minutes as f64 / SNAP_MINUTES as f64).round() as i64) * SNAP_MINUTES
}

/// One vertical grid line, derived from the mapper so lines and blocks
/// can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub time: NaiveDateTime,
    pub percent: f64,
    /// Whole hours draw stronger than half hours
    pub on_hour: bool,
}

/// The visible time span: an anchor plus the fixed lookback/lookahead.
///
/// The anchor either tracks the live clock (advancing on a minute tick) or
/// sits wherever the caller last navigated it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewWindow {
    anchor: NaiveDateTime,
    live: bool,
}

impl ViewWindow {
    /// Window anchored at a caller-supplied fixed time.
    pub fn fixed(anchor: NaiveDateTime) -> Self {
        Self {
            anchor: truncate_to_minute(anchor),
            live: false,
        }
    }

    /// Window tracking the live clock, starting from `now`.
    pub fn live(now: NaiveDateTime) -> Self {
        Self {
            anchor: truncate_to_minute(now),
            live: true,
        }
    }

    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Window start; subtracting the lookback crosses midnight into the
    /// previous calendar day when the anchor is early enough.
    pub fn start(&self) -> NaiveDateTime {
        self.anchor - Duration::minutes(LOOKBACK_MINUTES)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::minutes(WINDOW_MINUTES)
    }

    /// Advance or retreat by whole hours. Manual navigation detaches the
    /// window from the live clock.
    pub fn shift_hours(&mut self, hours: i64) {
        self.anchor += Duration::hours(hours);
        self.live = false;
    }

    /// Advance or retreat by whole days, keeping the time-of-day.
    pub fn shift_days(&mut self, days: i64) {
        self.anchor += Duration::days(days);
        self.live = false;
    }

    /// Re-enable or disable live tracking. Re-enabling resumes from the
    /// supplied current time; missed ticks are not replayed.
    pub fn set_live(&mut self, live: bool, now: NaiveDateTime) {
        self.live = live;
        if live {
            self.anchor = truncate_to_minute(now);
        }
    }

    /// Minute tick: advance the anchor while live tracking is on.
    pub fn tick(&mut self, now: NaiveDateTime) {
        if self.live {
            self.anchor = truncate_to_minute(now);
        }
    }

    pub fn time_to_percent(&self, t: NaiveDateTime) -> f64 {
        time_to_percent(t, self.start(), WINDOW_MINUTES)
    }

    pub fn percent_to_time(&self, percent: f64) -> NaiveDateTime {
        percent_to_time(percent, self.start(), WINDOW_MINUTES)
    }

    /// Pinned position of the "now" indicator while live tracking.
    pub fn now_percent(&self) -> Option<f64> {
        self.live
            .then(|| LOOKBACK_MINUTES as f64 / WINDOW_MINUTES as f64 * 100.0)
    }

    /// Every whole-hour and half-hour line inside the window, in order.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let start = self.start();
        let end = self.end();

        // First half-hour boundary at or after the window start
        let rem = minutes_of_day(start.time()) % 30;
        let mut t = if rem == 0 {
            start
        } else {
            start + Duration::minutes(30 - rem)
        };

        let mut lines = Vec::new();
        while t <= end {
            lines.push(GridLine {
                time: t,
                percent: self.time_to_percent(t),
                on_hour: t.time().minute() == 0,
            });
            t += Duration::minutes(30);
        }
        lines
    }
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_mapper_endpoints() {
        let window = ViewWindow::fixed(dt(18, 0));
        assert_eq!(window.start(), dt(17, 0));
        assert_eq!(window.time_to_percent(dt(17, 0)), 0.0);
        assert_eq!(window.time_to_percent(window.end()), 100.0);
        // Anchor sits at the pinned lookback fraction
        let pct = window.time_to_percent(dt(18, 0));
        assert!((pct - 60.0 / 420.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_mapper_off_screen_values() {
        let window = ViewWindow::fixed(dt(18, 0));
        assert!(window.time_to_percent(dt(16, 0)) < 0.0);
        assert!(window.time_to_percent(dt(23, 30)) > 100.0);
    }

    #[test]
    fn test_percent_round_trip_exact_at_minute_precision() {
        let window = ViewWindow::fixed(dt(18, 0));
        for minutes in [0, 1, 59, 60, 250, 420] {
            let t = window.start() + Duration::minutes(minutes);
            assert_eq!(window.percent_to_time(window.time_to_percent(t)), t);
        }
    }

    #[test]
    fn test_window_start_crosses_midnight() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        let window = ViewWindow::fixed(anchor);
        let start = window.start();
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(start.time(), chrono::NaiveTime::from_hms_opt(23, 30, 0).unwrap());
    }

    #[test]
    fn test_snap_rule() {
        // The documented rule: round(minutes / 15) * 15, halves up
        assert_eq!(snap_minutes(18 * 60 + 7), 18 * 60);
        assert_eq!(snap_minutes(18 * 60 + 8), 18 * 60 + 15);
        assert_eq!(snap_minutes(0), 0);
        assert_eq!(snap_minutes(22), 15);
        assert_eq!(snap_minutes(23), 30);
    }

    #[test]
    fn test_live_tick_and_resume() {
        let mut window = ViewWindow::live(dt(18, 0));
        assert_eq!(window.now_percent().map(|p| p.round()), Some(14.0));

        window.tick(dt(18, 1));
        assert_eq!(window.anchor(), dt(18, 1));

        // Manual navigation detaches from the clock; ticks stop moving it
        window.shift_hours(1);
        assert!(!window.is_live());
        let anchor = window.anchor();
        window.tick(dt(18, 30));
        assert_eq!(window.anchor(), anchor);
        assert_eq!(window.now_percent(), None);

        // Re-enabling resumes from the real clock, no replay
        window.set_live(true, dt(19, 45));
        assert_eq!(window.anchor(), dt(19, 45));
    }

    #[test]
    fn test_grid_lines_cover_hours_and_half_hours() {
        let window = ViewWindow::fixed(dt(18, 0));
        let lines = window.grid_lines();
        // 17:00 .. 24:00 is 7 hours -> 15 boundaries at every half hour
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0].time, dt(17, 0));
        assert!(lines[0].on_hour);
        assert_eq!(lines[1].time, dt(17, 30));
        assert!(!lines[1].on_hour);
        // Line percents come from the same mapper as blocks
        for line in &lines {
            let expected = window.time_to_percent(line.time);
            assert!((line.percent - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_lines_with_odd_anchor() {
        // A live clock anchor of 18:07 starts the window at 17:07;
        // the first line is 17:30, not some independently rounded value
        let window = ViewWindow::fixed(dt(18, 7));
        let lines = window.grid_lines();
        assert_eq!(lines[0].time, dt(17, 30));
        assert!(lines.iter().all(|l| l.time.time().minute() % 30 == 0));
    }
}
