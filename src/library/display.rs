//! Human-readable formatting for durations and sizes.

/// Format seconds as `m:ss`. Negative and non-finite inputs render as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Library-wide playtime: `"{h}h {m}m"` from one hour up, otherwise `"{m} min"`.
pub fn format_total_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins} min")
    }
}

/// Decimal (1000-based) byte count, the way file browsers show file sizes.
pub fn format_byte_count(bytes: u64) -> String {
    const KB: f64 = 1000.0;
    const MB: f64 = KB * 1000.0;
    const GB: f64 = MB * 1000.0;

    let b = bytes as f64;
    if bytes == 0 {
        "Zero KB".to_string()
    } else if b < KB {
        format!("{bytes} bytes")
    } else if b < MB {
        format!("{:.0} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_clock_pads_seconds() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(9.9), "0:09");
        assert_eq!(format_clock(61.0), "1:01");
        assert_eq!(format_clock(3725.0), "62:05");
        assert_eq!(format_clock(-4.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
    }

    #[test]
    fn format_total_duration_switches_to_hours() {
        assert_eq!(format_total_duration(0.0), "0 min");
        assert_eq!(format_total_duration(59.0 * 60.0), "59 min");
        assert_eq!(format_total_duration(3600.0 + 5.0 * 60.0), "1h 5m");
    }

    #[test]
    fn format_byte_count_uses_decimal_units() {
        assert_eq!(format_byte_count(0), "Zero KB");
        assert_eq!(format_byte_count(512), "512 bytes");
        assert_eq!(format_byte_count(12_000), "12 KB");
        assert_eq!(format_byte_count(4_200_000), "4.2 MB");
        assert_eq!(format_byte_count(1_500_000_000), "1.50 GB");
    }
}
