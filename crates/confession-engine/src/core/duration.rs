//! Elapsed-time formatting for the page counters.

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Zero-pad a value to two digits ("7" -> "07"). Wider values are left as-is.
pub fn pad2(value: u32) -> String {
    format!("{:02}", value)
}

/// Format a millisecond delta as `D 天 HH 小时 MM 分钟 SS 秒`.
///
/// Negative deltas render as zero. Partial seconds are truncated, so the
/// display only changes once a full second has elapsed.
pub fn format_duration(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let days = total_secs / SECS_PER_DAY;
    let hours = (total_secs % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_secs % SECS_PER_MINUTE;
    format!(
        "{} 天 {} 小时 {} 分钟 {} 秒",
        days,
        pad2(hours as u32),
        pad2(minutes as u32),
        pad2(seconds as u32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_padded() {
        assert_eq!(format_duration(0), "0 天 00 小时 00 分钟 00 秒");
    }

    #[test]
    fn negative_clamps_to_zero() {
        assert_eq!(format_duration(-1), format_duration(0));
        assert_eq!(format_duration(-86_400_000), format_duration(0));
    }

    #[test]
    fn sub_second_truncates() {
        assert_eq!(format_duration(999), "0 天 00 小时 00 分钟 00 秒");
        assert_eq!(format_duration(1_000), "0 天 00 小时 00 分钟 01 秒");
    }

    #[test]
    fn decomposes_days_hours_minutes_seconds() {
        let ms = ((3 * 86_400) + (4 * 3_600) + (5 * 60) + 6) * 1000 + 450;
        assert_eq!(format_duration(ms), "3 天 04 小时 05 分钟 06 秒");
    }

    #[test]
    fn days_are_not_padded() {
        let ms = 123 * 86_400 * 1000 + 23 * 3_600_000 + 59 * 60_000 + 59_000;
        assert_eq!(format_duration(ms), "123 天 23 小时 59 分钟 59 秒");
    }

    #[test]
    fn matches_decomposition_over_a_range() {
        for secs in (0..200_000i64).step_by(7_919) {
            let text = format_duration(secs * 1000);
            let parts: Vec<&str> = text.split(' ').collect();
            assert_eq!(parts.len(), 8, "unexpected layout: {}", text);
            let d: i64 = parts[0].parse().unwrap();
            let h: i64 = parts[2].parse().unwrap();
            let m: i64 = parts[4].parse().unwrap();
            let s: i64 = parts[6].parse().unwrap();
            assert_eq!(parts[2].len(), 2);
            assert_eq!(parts[4].len(), 2);
            assert_eq!(parts[6].len(), 2);
            assert_eq!(d * 86_400 + h * 3_600 + m * 60 + s, secs);
        }
    }

    #[test]
    fn pad2_pads_single_digits_only() {
        assert_eq!(pad2(0), "00");
        assert_eq!(pad2(9), "09");
        assert_eq!(pad2(10), "10");
        assert_eq!(pad2(2025), "2025");
    }
}
