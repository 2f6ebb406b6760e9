//! Day/hour/minute simulation clock.
//!
//! The clock advances in whole simulated minutes, driven by wall-clock
//! deltas from the owning update loop. Fractional minutes accumulate
//! between calls so no time is lost to frame boundaries.
//!
//! An optional [`ActiveWindow`] restricts the playable part of the day.
//! Two independent policies govern what happens at the window end:
//! auto-pause (first crossing per day freezes the clock at the window
//! end) and wrap (overflow past the end skips to the next day's window
//! start). When both are configured, auto-pause wins the first crossing
//! and wrap handles overflow after a resume.

use serde::{Deserialize, Serialize};

/// Minutes in a full day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A point in simulated time. Days start at 1; hour and minute are
/// always normalized (0-23 / 0-59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTime {
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
}

impl SimTime {
    /// Create a time, clamping out-of-range fields instead of failing.
    pub fn new(day: u32, hour: u8, minute: u8) -> Self {
        Self {
            day: day.max(1),
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Minutes elapsed since midnight (0..1439).
    pub fn minute_of_day(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Fraction of the day elapsed (0.0..1.0).
    pub fn fraction_of_day(&self) -> f32 {
        f32::from(self.minute_of_day()) / f32::from(MINUTES_PER_DAY)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "day {} {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        Self::new(1, 8, 0)
    }
}

/// Coarse classification of the current time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimePeriod {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimePeriod::Morning => "Morning",
            TimePeriod::Afternoon => "Afternoon",
            TimePeriod::Evening => "Evening",
            TimePeriod::Night => "Night",
        }
    }
}

/// An inclusive hour:minute range within a day. Ranges where the end
/// precedes the start wrap across midnight (e.g. 22:00-05:59).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
}

impl TimeRange {
    pub fn new(start_hour: u8, start_minute: u8, end_hour: u8, end_minute: u8) -> Self {
        Self {
            start_hour: start_hour.min(23),
            start_minute: start_minute.min(59),
            end_hour: end_hour.min(23),
            end_minute: end_minute.min(59),
        }
    }

    /// Whether the given clock reading falls inside the range.
    pub fn includes(&self, hour: u8, minute: u8) -> bool {
        let total = u16::from(hour) * 60 + u16::from(minute);
        let start = u16::from(self.start_hour) * 60 + u16::from(self.start_minute);
        let end = u16::from(self.end_hour) * 60 + u16::from(self.end_minute);
        if end >= start {
            total >= start && total <= end
        } else {
            // wraps around midnight
            total >= start || total <= end
        }
    }
}

/// The four default time periods (06:00-11:59, 12:00-17:59, 18:00-21:59,
/// 22:00-05:59).
pub fn default_periods() -> [(TimePeriod, TimeRange); 4] {
    [
        (TimePeriod::Morning, TimeRange::new(6, 0, 11, 59)),
        (TimePeriod::Afternoon, TimeRange::new(12, 0, 17, 59)),
        (TimePeriod::Evening, TimeRange::new(18, 0, 21, 59)),
        (TimePeriod::Night, TimeRange::new(22, 0, 5, 59)),
    ]
}

/// Restriction of the clock to a same-day window of active hours,
/// expressed in minutes since midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveWindow {
    start: u16,
    end: u16,
    pub pause_at_end: bool,
    pub wrap_to_start: bool,
}

impl ActiveWindow {
    /// Build a window from clock readings. A window whose end precedes
    /// its start is collapsed to zero length at the start point.
    pub fn new(
        start_hour: u8,
        start_minute: u8,
        end_hour: u8,
        end_minute: u8,
        pause_at_end: bool,
        wrap_to_start: bool,
    ) -> Self {
        let start = u16::from(start_hour.min(23)) * 60 + u16::from(start_minute.min(59));
        let mut end = u16::from(end_hour.min(23)) * 60 + u16::from(end_minute.min(59));
        if end < start {
            log::warn!(
                "active window end {} precedes start {}; collapsing to zero length",
                end,
                start
            );
            end = start;
        }
        Self {
            start,
            end,
            pause_at_end,
            wrap_to_start,
        }
    }

    pub fn start_minute_of_day(&self) -> u16 {
        self.start
    }

    pub fn end_minute_of_day(&self) -> u16 {
        self.end
    }
}

/// Change notifications produced while the clock advances. Drained and
/// dispatched by the owning driver once per tick; delivery is
/// synchronous and single-threaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    MinuteChanged { hour: u8, minute: u8, day: u32 },
    HourChanged { hour: u8, minute: u8, day: u32 },
    DayChanged { day: u32 },
}

/// The simulation clock.
#[derive(Debug, Clone)]
pub struct SimClock {
    time: SimTime,
    minutes_per_second: f32,
    paused: bool,
    window: Option<ActiveWindow>,
    minute_accumulator: f64,
    /// Day on which the auto-pause already fired, so it triggers at most
    /// once per day.
    auto_paused_day: Option<u32>,
    period: TimePeriod,
}

impl SimClock {
    /// Create a clock at the given start time, advancing at
    /// `minutes_per_second` simulated minutes per wall-clock second.
    pub fn new(start: SimTime, minutes_per_second: f32) -> Self {
        let mut clock = Self {
            time: start,
            minutes_per_second: minutes_per_second.max(0.0),
            paused: false,
            window: None,
            minute_accumulator: 0.0,
            auto_paused_day: None,
            period: TimePeriod::Night,
        };
        clock.period = clock.classify_period();
        clock
    }

    /// Attach an active-hours window. If the current time falls before
    /// the window it is silently snapped to the window start.
    pub fn with_window(mut self, window: ActiveWindow) -> Self {
        self.window = Some(window);
        self.apply_window_clamp();
        self
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn window(&self) -> Option<&ActiveWindow> {
        self.window.as_ref()
    }

    /// Current coarse time period.
    pub fn period(&self) -> TimePeriod {
        self.period
    }

    /// Simulated minutes advanced per wall-clock second.
    pub fn rate(&self) -> f32 {
        self.minutes_per_second
    }

    pub fn set_rate(&mut self, minutes_per_second: f32) {
        self.minutes_per_second = minutes_per_second.max(0.0);
    }

    /// Pause or resume the clock. Resuming after an auto-pause does not
    /// re-arm the auto-pause for the same day; the wrap policy (if
    /// configured) takes over for further overflow.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whether the window auto-pause already fired on the current day.
    pub fn auto_paused_today(&self) -> bool {
        self.auto_paused_day == Some(self.time.day)
    }

    /// Mark the auto-pause as already fired (or not) for the current
    /// day. Call after [`set_time`](Self::set_time) when restoring a
    /// snapshot taken at the window-end pause, so resuming does not
    /// snap back and re-pause.
    pub fn set_auto_paused_today(&mut self, fired: bool) {
        self.auto_paused_day = if fired { Some(self.time.day) } else { None };
    }

    /// Advance by a wall-clock delta, emitting events for every whole
    /// simulated minute crossed. Negative deltas are treated as zero,
    /// and a single call advances at most one full day — larger jumps
    /// go through [`add_minutes`](Self::add_minutes) or
    /// [`set_time`](Self::set_time).
    pub fn tick(&mut self, delta_wall_seconds: f32) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        if self.paused {
            return events;
        }
        let delta = f64::from(delta_wall_seconds.max(0.0));
        let gained = delta * f64::from(self.minutes_per_second);
        if gained > f64::from(MINUTES_PER_DAY) {
            log::warn!("tick of {:.0} minutes truncated to one day", gained);
        }
        self.minute_accumulator += gained.min(f64::from(MINUTES_PER_DAY));

        while self.minute_accumulator >= 1.0 {
            self.minute_accumulator -= 1.0;
            self.increment_minute(&mut events);
            if self.enforce_window(&mut events) {
                // Remaining accumulated minutes carry over to the next
                // tick; the fractional accumulator is preserved.
                break;
            }
        }
        events
    }

    /// Advance by whole minutes, firing events as if ticked naturally.
    /// Non-positive amounts are a no-op; the clock never runs backward.
    pub fn add_minutes(&mut self, minutes: i32) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        for _ in 0..minutes.max(0) {
            self.increment_minute(&mut events);
            if self.enforce_window(&mut events) {
                break;
            }
        }
        events
    }

    /// Directly set the clock, e.g. when restoring a save. Inputs are
    /// clamped, the window clamp is re-applied, and no change events
    /// fire.
    pub fn set_time(&mut self, day: u32, hour: u8, minute: u8) {
        self.time = SimTime::new(day, hour, minute);
        self.apply_window_clamp();
        self.minute_accumulator = 0.0;
        self.auto_paused_day = None;
        self.period = self.classify_period();
    }

    /// Directly set the clock from a day plus fraction-of-day, as the
    /// save snapshot stores it.
    pub fn set_time_fraction(&mut self, day: u32, fraction_of_day: f32) {
        let total = (fraction_of_day.clamp(0.0, 1.0) * f32::from(MINUTES_PER_DAY)) as u16;
        let total = total.min(MINUTES_PER_DAY - 1);
        self.set_time(day, (total / 60) as u8, (total % 60) as u8);
    }

    fn classify_period(&self) -> TimePeriod {
        for (period, range) in default_periods() {
            if range.includes(self.time.hour, self.time.minute) {
                return period;
            }
        }
        TimePeriod::Night
    }

    fn increment_minute(&mut self, events: &mut Vec<ClockEvent>) {
        self.time.minute += 1;
        let mut rolled_hour = false;
        let mut rolled_day = false;
        if self.time.minute >= 60 {
            self.time.minute = 0;
            self.time.hour += 1;
            rolled_hour = true;
            if self.time.hour >= 24 {
                self.time.hour = 0;
                self.time.day += 1;
                rolled_day = true;
            }
        }

        self.period = self.classify_period();

        // Day fires before hour and minute so listeners rebuild their
        // per-day state before reacting to the new reading.
        if rolled_day {
            events.push(ClockEvent::DayChanged { day: self.time.day });
        }
        if rolled_hour {
            events.push(ClockEvent::HourChanged {
                hour: self.time.hour,
                minute: self.time.minute,
                day: self.time.day,
            });
        }
        events.push(ClockEvent::MinuteChanged {
            hour: self.time.hour,
            minute: self.time.minute,
            day: self.time.day,
        });
    }

    /// Apply the window-end policies after a minute step. Returns true
    /// if the minute loop should stop for this tick.
    fn enforce_window(&mut self, events: &mut Vec<ClockEvent>) -> bool {
        let Some(window) = self.window else {
            return false;
        };
        let current = self.time.minute_of_day();

        if window.pause_at_end
            && current >= window.end_minute_of_day()
            && self.auto_paused_day != Some(self.time.day)
        {
            // Snap to exactly the window end and freeze until resumed.
            let end = window.end_minute_of_day();
            self.time.hour = (end / 60) as u8;
            self.time.minute = (end % 60) as u8;
            self.paused = true;
            self.auto_paused_day = Some(self.time.day);
            log::debug!("clock auto-paused at {}", self.time);
            return true;
        }

        if window.wrap_to_start && current > window.end_minute_of_day() {
            let start = window.start_minute_of_day();
            self.time.day += 1;
            self.time.hour = (start / 60) as u8;
            self.time.minute = (start % 60) as u8;
            self.period = self.classify_period();
            log::debug!("clock wrapped past window end to {}", self.time);
            events.push(ClockEvent::DayChanged { day: self.time.day });
            events.push(ClockEvent::HourChanged {
                hour: self.time.hour,
                minute: self.time.minute,
                day: self.time.day,
            });
            events.push(ClockEvent::MinuteChanged {
                hour: self.time.hour,
                minute: self.time.minute,
                day: self.time.day,
            });
            return true;
        }

        false
    }

    /// Snap a directly-set time into the window without firing events.
    fn apply_window_clamp(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let current = self.time.minute_of_day();
        let target = if current < window.start_minute_of_day() {
            Some(window.start_minute_of_day())
        } else if !window.wrap_to_start && current > window.end_minute_of_day() {
            Some(window.end_minute_of_day())
        } else {
            None
        };
        if let Some(total) = target {
            self.time.hour = (total / 60) as u8;
            self.time.minute = (total % 60) as u8;
        }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(SimTime::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes_only(events: &[ClockEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, ClockEvent::MinuteChanged { .. }))
            .count()
    }

    #[test]
    fn test_minute_overflow_advances_hour() {
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 60.0);
        // One second at 60 minutes/second is a full hour.
        let events = clock.tick(1.0);
        assert_eq!(clock.time(), SimTime::new(1, 9, 0));
        let hours = events
            .iter()
            .filter(|e| matches!(e, ClockEvent::HourChanged { .. }))
            .count();
        assert_eq!(hours, 1);
        assert_eq!(minutes_only(&events), 60);
    }

    #[test]
    fn test_day_overflow() {
        let mut clock = SimClock::new(SimTime::new(1, 0, 0), 1.0);
        let events = clock.tick(1440.0);
        assert_eq!(clock.time(), SimTime::new(2, 0, 0));
        let days = events
            .iter()
            .filter(|e| matches!(e, ClockEvent::DayChanged { .. }))
            .count();
        assert_eq!(days, 1);
    }

    #[test]
    fn test_day_fires_before_minute_on_rollover() {
        let mut clock = SimClock::new(SimTime::new(1, 23, 59), 1.0);
        let events = clock.tick(1.0);
        assert_eq!(events[0], ClockEvent::DayChanged { day: 2 });
        assert!(matches!(events.last(), Some(ClockEvent::MinuteChanged { .. })));
    }

    #[test]
    fn test_fractional_accumulation() {
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 1.0);
        assert!(clock.tick(0.5).is_empty());
        let events = clock.tick(0.5);
        assert_eq!(minutes_only(&events), 1);
        assert_eq!(clock.time(), SimTime::new(1, 8, 1));
    }

    #[test]
    fn test_negative_delta_is_noop() {
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 10.0);
        let events = clock.tick(-100.0);
        assert!(events.is_empty());
        assert_eq!(clock.time(), SimTime::new(1, 8, 0));
    }

    #[test]
    fn test_monotonic_over_ticks() {
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 3.0);
        let mut last = clock.time();
        for _ in 0..200 {
            clock.tick(7.3);
            assert!(clock.time() >= last);
            last = clock.time();
        }
    }

    #[test]
    fn test_pause_at_window_end() {
        let window = ActiveWindow::new(8, 0, 22, 0, true, false);
        let mut clock = SimClock::new(SimTime::new(1, 21, 58), 1.0).with_window(window);
        clock.tick(10.0);
        assert!(clock.is_paused());
        assert_eq!(clock.time(), SimTime::new(1, 22, 0));
    }

    #[test]
    fn test_pause_is_idempotent_per_day() {
        let window = ActiveWindow::new(8, 0, 22, 0, true, false);
        let mut clock = SimClock::new(SimTime::new(1, 21, 59), 1.0).with_window(window);
        clock.tick(5.0);
        assert!(clock.is_paused());
        let frozen = clock.time();
        // Further ticks while paused do nothing.
        assert!(clock.tick(100.0).is_empty());
        assert_eq!(clock.time(), frozen);
        // After resume the pause does not re-trigger on the same day.
        clock.set_paused(false);
        clock.tick(5.0);
        assert!(!clock.is_paused());
        assert!(clock.time() > frozen);
    }

    #[test]
    fn test_wrap_to_next_day_start() {
        let window = ActiveWindow::new(8, 0, 22, 0, false, true);
        let mut clock = SimClock::new(SimTime::new(1, 21, 59), 1.0).with_window(window);
        let events = clock.tick(5.0);
        // One minute to 22:00 (inside), next minute overflows and wraps.
        assert_eq!(clock.time(), SimTime::new(2, 8, 0));
        assert!(events.contains(&ClockEvent::DayChanged { day: 2 }));
    }

    #[test]
    fn test_pause_takes_priority_over_wrap() {
        let window = ActiveWindow::new(8, 0, 22, 0, true, true);
        let mut clock = SimClock::new(SimTime::new(1, 21, 59), 1.0).with_window(window);
        clock.tick(10.0);
        assert!(clock.is_paused());
        assert_eq!(clock.time(), SimTime::new(1, 22, 0));
        // After a resume the wrap policy handles overflow past the end.
        clock.set_paused(false);
        clock.tick(2.0);
        assert_eq!(clock.time(), SimTime::new(2, 8, 0));
        // The new day re-arms the auto-pause.
        let mut minutes_to_end = i32::from(MINUTES_PER_DAY); // more than enough
        while !clock.is_paused() && minutes_to_end > 0 {
            clock.tick(60.0);
            minutes_to_end -= 60;
        }
        assert!(clock.is_paused());
        assert_eq!(clock.time(), SimTime::new(2, 22, 0));
    }

    #[test]
    fn test_oversized_tick_truncates_to_one_day() {
        let mut clock = SimClock::new(SimTime::new(1, 0, 0), 60.0);
        let events = clock.tick(f32::MAX);
        assert_eq!(clock.time(), SimTime::new(2, 0, 0));
        assert_eq!(minutes_only(&events), usize::from(MINUTES_PER_DAY));
        // The truncated remainder is discarded, not deferred.
        assert!(clock.tick(0.0).is_empty());
        assert_eq!(clock.time(), SimTime::new(2, 0, 0));
    }

    #[test]
    fn test_restored_pause_marker_not_rearmed() {
        let window = ActiveWindow::new(8, 0, 21, 0, true, false);
        let mut clock = SimClock::new(SimTime::new(1, 12, 0), 1.0).with_window(window);
        // Rebuild the state a snapshot taken at the window-end pause
        // restores: time at the end, paused, marker already fired.
        clock.set_time(1, 21, 0);
        clock.set_paused(true);
        clock.set_auto_paused_today(true);
        assert!(clock.auto_paused_today());

        clock.set_paused(false);
        let events = clock.add_minutes(2);
        assert_eq!(clock.time(), SimTime::new(1, 21, 2));
        assert!(!clock.is_paused());
        assert_eq!(minutes_only(&events), 2);
    }

    #[test]
    fn test_malformed_window_collapses() {
        let window = ActiveWindow::new(10, 0, 8, 0, false, false);
        assert_eq!(window.start_minute_of_day(), window.end_minute_of_day());
    }

    #[test]
    fn test_set_time_is_silent_and_clamped() {
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 1.0);
        clock.set_time(3, 99, 99);
        assert_eq!(clock.time(), SimTime::new(3, 23, 59));
    }

    #[test]
    fn test_set_time_snaps_into_window() {
        let window = ActiveWindow::new(8, 0, 22, 0, true, false);
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 1.0).with_window(window);
        clock.set_time(2, 5, 30);
        assert_eq!(clock.time(), SimTime::new(2, 8, 0));
    }

    #[test]
    fn test_set_time_fraction() {
        let mut clock = SimClock::new(SimTime::new(1, 8, 0), 1.0);
        clock.set_time_fraction(4, 0.5);
        assert_eq!(clock.time(), SimTime::new(4, 12, 0));
    }

    #[test]
    fn test_add_minutes_rolls_days() {
        let mut clock = SimClock::new(SimTime::new(1, 23, 0), 1.0);
        let events = clock.add_minutes(120);
        assert_eq!(clock.time(), SimTime::new(2, 1, 0));
        assert!(events.contains(&ClockEvent::DayChanged { day: 2 }));
        // Negative adjustments never run the clock backward.
        assert!(clock.add_minutes(-30).is_empty());
        assert_eq!(clock.time(), SimTime::new(2, 1, 0));
    }

    #[test]
    fn test_time_periods() {
        let clock = SimClock::new(SimTime::new(1, 9, 0), 1.0);
        assert_eq!(clock.period(), TimePeriod::Morning);
        let clock = SimClock::new(SimTime::new(1, 13, 0), 1.0);
        assert_eq!(clock.period(), TimePeriod::Afternoon);
        let clock = SimClock::new(SimTime::new(1, 19, 0), 1.0);
        assert_eq!(clock.period(), TimePeriod::Evening);
        let clock = SimClock::new(SimTime::new(1, 2, 0), 1.0);
        assert_eq!(clock.period(), TimePeriod::Night);
    }

    #[test]
    fn test_range_wraps_midnight() {
        let night = TimeRange::new(22, 0, 5, 59);
        assert!(night.includes(23, 30));
        assert!(night.includes(2, 0));
        assert!(!night.includes(12, 0));
    }
}
