//! 時間格式轉換工具
//!
//! 秒數與顯示字串之間的互相轉換，不持有任何狀態

/// 將秒數格式化為播放器顯示用的字串
///
/// 不足一小時顯示 `m:ss`，超過一小時顯示 `h:mm:ss`。
/// 負數、NaN 或無限大一律視為 0。
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// 將秒數格式化為 ffmpeg `-ss` 參數（`HH:MM:SS.mmm`）
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let total = millis / 1000;

    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total / 3600,
        (total % 3600) / 60,
        total % 60,
        millis % 1000
    )
}

/// 解析 `ss`、`m:ss` 或 `h:mm:ss` 格式（秒數可含小數）
///
/// 分與秒欄位在有上一層欄位時必須小於 60
#[must_use]
pub fn parse_time(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let value: f64 = part.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        if i > 0 && value >= 60.0 {
            return None;
        }
        // 只有最後一個欄位可以有小數
        if i + 1 < parts.len() && value.fract() != 0.0 {
            return None;
        }
        total = total * 60.0 + value;
    }

    Some(total)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_minutes() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(599.0), "9:59");
    }

    #[test]
    fn test_format_time_hours() {
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(3723.4), "1:02:03");
    }

    #[test]
    fn test_format_time_invalid_input() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(2.0), "00:00:02.000");
        assert_eq!(format_timestamp(3725.25), "01:02:05.250");
        assert_eq!(format_timestamp(-1.0), "00:00:00.000");
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("42"), Some(42.0));
        assert_eq!(parse_time("1:05"), Some(65.0));
        assert_eq!(parse_time("1:02:03"), Some(3723.0));
        assert_eq!(parse_time(" 0:01.5 "), Some(1.5));
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("abc"), None);
        assert_eq!(parse_time("1:60"), None);
        assert_eq!(parse_time("1.5:00"), None);
        assert_eq!(parse_time("-5"), None);
        assert_eq!(parse_time("1:2:3:4"), None);
    }

    #[test]
    fn test_parse_reverses_format() {
        for seconds in [0.0, 59.0, 61.0, 3599.0, 7322.0] {
            assert_eq!(parse_time(&format_time(seconds)), Some(seconds));
        }
    }
}
