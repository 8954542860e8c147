use super::ticks;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const MONTH: f64 = DAY * 30.0;
const YEAR: f64 = DAY * 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Candidate tick intervals, ordered by duration.
const TICK_INTERVALS: [(Unit, i64, f64); 18] = [
    (Unit::Second, 1, SECOND),
    (Unit::Second, 5, 5.0 * SECOND),
    (Unit::Second, 15, 15.0 * SECOND),
    (Unit::Second, 30, 30.0 * SECOND),
    (Unit::Minute, 1, MINUTE),
    (Unit::Minute, 5, 5.0 * MINUTE),
    (Unit::Minute, 15, 15.0 * MINUTE),
    (Unit::Minute, 30, 30.0 * MINUTE),
    (Unit::Hour, 1, HOUR),
    (Unit::Hour, 3, 3.0 * HOUR),
    (Unit::Hour, 6, 6.0 * HOUR),
    (Unit::Hour, 12, 12.0 * HOUR),
    (Unit::Day, 1, DAY),
    (Unit::Day, 2, 2.0 * DAY),
    (Unit::Week, 1, WEEK),
    (Unit::Month, 1, MONTH),
    (Unit::Month, 3, 3.0 * MONTH),
    (Unit::Year, 1, YEAR),
];

/// UTC time scale: a linear scale over epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (DateTime<Utc>, DateTime<Utc>),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    fn domain_ms(&self) -> (f64, f64) {
        (
            self.domain.0.timestamp_millis() as f64,
            self.domain.1.timestamp_millis() as f64,
        )
    }

    pub fn scale(&self, t: DateTime<Utc>) -> f64 {
        self.scale_ms(t.timestamp_millis() as f64)
    }

    pub fn scale_ms(&self, ms: f64) -> f64 {
        let (d0, d1) = self.domain_ms();
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0 + (r1 - r0) * 0.5;
        }
        r0 + (ms - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Epoch milliseconds under pixel `px`.
    pub fn invert_ms(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain_ms();
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0 + (d1 - d0) * 0.5;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    pub fn invert(&self, px: f64) -> Option<DateTime<Utc>> {
        let ms = self.invert_ms(px);
        if !ms.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt(ms.round() as i64).single()
    }

    /// Calendar-aligned ticks inside the domain, about `count` of them.
    pub fn ticks(&self, count: f64) -> Vec<DateTime<Utc>> {
        let (mut start, mut stop) = self.domain;
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut out = match tick_interval(start, stop, count) {
            Some((unit, step)) => interval_range(unit, step, start, stop),
            None => Vec::new(),
        };
        if reverse {
            out.reverse();
        }
        out
    }

    /// Multi-scale tick label: the coarsest calendar field that is not at its boundary decides
    /// the format (`.%L`, `:%S`, `%I:%M`, `%I %p`, `%a %d`, `%b %d`, `%B`, `%Y`).
    pub fn tick_format(&self, t: DateTime<Utc>) -> String {
        format_multi(t)
    }
}

fn tick_interval(start: DateTime<Utc>, stop: DateTime<Utc>, count: f64) -> Option<(Unit, i64)> {
    if !(count > 0.0) {
        return None;
    }
    let span = (stop.timestamp_millis() - start.timestamp_millis()).abs() as f64;
    let target = span / count;
    let i = TICK_INTERVALS.partition_point(|(_, _, d)| *d <= target);
    if i == TICK_INTERVALS.len() {
        let step = ticks::tick_step(
            start.timestamp_millis() as f64 / YEAR,
            stop.timestamp_millis() as f64 / YEAR,
            count,
        );
        let step = if step.is_finite() { step.round().max(1.0) } else { 1.0 };
        return Some((Unit::Year, step as i64));
    }
    if i == 0 {
        let step = ticks::tick_step(
            start.timestamp_millis() as f64,
            stop.timestamp_millis() as f64,
            count,
        );
        let step = if step.is_finite() { step.max(1.0) } else { 1.0 };
        return Some((Unit::Millisecond, step.round() as i64));
    }
    let (lo, hi) = (TICK_INTERVALS[i - 1], TICK_INTERVALS[i]);
    let (unit, step, _) = if target / lo.2 < hi.2 / target { lo } else { hi };
    Some((unit, step))
}

fn floor_unit(unit: Unit, t: DateTime<Utc>) -> DateTime<Utc> {
    let date = t.date_naive();
    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    let floored = match unit {
        Unit::Millisecond => Some(t),
        Unit::Second => t.with_nanosecond(0),
        Unit::Minute => t.with_nanosecond(0).and_then(|t| t.with_second(0)),
        Unit::Hour => t
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0)),
        Unit::Day => midnight(date),
        Unit::Week => {
            let back = date.weekday().num_days_from_sunday() as i64;
            midnight(date - Duration::days(back))
        }
        Unit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).and_then(midnight),
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).and_then(midnight),
    };
    floored.unwrap_or(t)
}

fn offset_unit(unit: Unit, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match unit {
        Unit::Millisecond => t.checked_add_signed(Duration::milliseconds(1)),
        Unit::Second => t.checked_add_signed(Duration::seconds(1)),
        Unit::Minute => t.checked_add_signed(Duration::minutes(1)),
        Unit::Hour => t.checked_add_signed(Duration::hours(1)),
        Unit::Day => t.checked_add_signed(Duration::days(1)),
        Unit::Week => t.checked_add_signed(Duration::weeks(1)),
        Unit::Month => t.checked_add_months(chrono::Months::new(1)),
        Unit::Year => t.checked_add_months(chrono::Months::new(12)),
    }
}

fn matches_every(unit: Unit, step: i64, t: DateTime<Utc>) -> bool {
    if step <= 1 {
        return true;
    }
    let field = match unit {
        Unit::Millisecond => t.timestamp_millis(),
        Unit::Second => t.second() as i64,
        Unit::Minute => t.minute() as i64,
        Unit::Hour => t.hour() as i64,
        Unit::Day => t.day() as i64 - 1,
        Unit::Week => return true,
        Unit::Month => t.month0() as i64,
        Unit::Year => t.year() as i64,
    };
    field.rem_euclid(step) == 0
}

fn interval_range(
    unit: Unit,
    step: i64,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    const MAX_TICKS: usize = 10_000;

    if unit == Unit::Millisecond {
        let step = step.max(1);
        let first = start.timestamp_millis().div_euclid(step) * step;
        let first = if first < start.timestamp_millis() {
            first + step
        } else {
            first
        };
        let last = stop.timestamp_millis();
        return (0..)
            .map(|k| first + k * step)
            .take_while(|ms| *ms <= last)
            .take(MAX_TICKS)
            .filter_map(|ms| Utc.timestamp_millis_opt(ms).single())
            .collect();
    }

    let mut cur = floor_unit(unit, start);
    if cur < start {
        cur = match offset_unit(unit, cur) {
            Some(next) => floor_unit(unit, next),
            None => return Vec::new(),
        };
    }
    let mut out = Vec::new();
    while cur <= stop && out.len() < MAX_TICKS {
        if matches_every(unit, step, cur) {
            out.push(cur);
        }
        cur = match offset_unit(unit, cur) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

fn format_multi(t: DateTime<Utc>) -> String {
    let at = |unit: Unit| floor_unit(unit, t) == t;
    if !at(Unit::Second) {
        return format!(".{:03}", t.timestamp_subsec_millis());
    }
    let pattern = if !at(Unit::Minute) {
        ":%S"
    } else if !at(Unit::Hour) {
        "%I:%M"
    } else if !at(Unit::Day) {
        "%I %p"
    } else if !at(Unit::Month) {
        if !at(Unit::Week) { "%a %d" } else { "%b %d" }
    } else if !at(Unit::Year) {
        "%B"
    } else {
        "%Y"
    };
    t.format(pattern).to_string()
}
