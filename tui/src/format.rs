use std::borrow::Cow;

use chrono::Utc;
use unicode_width::UnicodeWidthStr;

use skillpath_engine::parse_timestamp;
use skillpath_types::sanitize_terminal_text;

/// Backend text made safe for the terminal.
pub(crate) fn clean(text: &str) -> Cow<'_, str> {
    sanitize_terminal_text(text)
}

/// `1234567` -> `1,234,567`.
pub(crate) fn format_xp(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Text progress bar `filled` cells wide out of `width`.
pub(crate) fn progress_bar(ratio: f64, width: usize, full: &str, empty: &str) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let mut bar = full.repeat(filled);
    bar.push_str(&empty.repeat(width - filled));
    bar
}

/// "just now", "5m ago", "3h ago", "2d ago"; the raw text when unparseable.
pub(crate) fn relative_time(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let Some(at) = parse_timestamp(raw) else {
        return clean(raw).into_owned();
    };
    let secs = Utc::now().signed_duration_since(at).num_seconds().max(0);
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86_400 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Pad `text` with spaces to `width` display columns.
pub(crate) fn pad_to_width(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - used))
}

#[cfg(test)]
mod tests {
    use super::{format_xp, pad_to_width, progress_bar, relative_time};

    #[test]
    fn xp_gets_thousands_separators() {
        assert_eq!(format_xp(0), "0");
        assert_eq!(format_xp(999), "999");
        assert_eq!(format_xp(1000), "1,000");
        assert_eq!(format_xp(1_234_567), "1,234,567");
    }

    #[test]
    fn progress_bar_rounds_and_clamps() {
        assert_eq!(progress_bar(0.5, 4, "#", "-"), "##--");
        assert_eq!(progress_bar(2.0, 3, "#", "-"), "###");
        assert_eq!(progress_bar(-1.0, 3, "#", "-"), "---");
    }

    #[test]
    fn relative_time_falls_back_to_raw_text() {
        assert_eq!(relative_time(None), "");
        assert_eq!(relative_time(Some("last week")), "last week");
        assert!(relative_time(Some("2001-01-01T00:00:00Z")).ends_with("d ago"));
    }

    #[test]
    fn pad_counts_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }
}
