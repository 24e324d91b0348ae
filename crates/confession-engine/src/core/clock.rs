use serde::{Deserialize, Serialize};

use super::duration::pad2;

/// A civil timestamp in the host's local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStamp {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    /// 1-based day of month.
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
}

impl LocalStamp {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self { year, month, day, hour, minute, second }
    }
}

/// Wall clock and timezone conversion, supplied by the host.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;

    /// Convert an epoch timestamp into local civil time.
    fn to_local(&self, epoch_ms: f64) -> LocalStamp;

    /// Convert local civil time into an epoch timestamp.
    fn from_local(&self, stamp: &LocalStamp) -> f64;
}

/// `2025年10月22日 17:00` style stamp shown on the celebration overlay.
pub fn format_celebration_date(stamp: &LocalStamp) -> String {
    format!(
        "{}年{}月{}日 {}:{}",
        stamp.year,
        pad2(stamp.month),
        pad2(stamp.day),
        pad2(stamp.hour),
        pad2(stamp.minute),
    )
}

// Proleptic Gregorian day counting (days since 1970-01-01).

pub(crate) fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

pub(crate) fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = (yoe + era * 400 + if month <= 2 { 1 } else { 0 }) as i32;
    (year, month, day)
}
