//! Raw ANSI escapes for table cells and summaries, plus helpers to measure
//! text that contains them.

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"))
}

pub fn strip_ansi(s: &str) -> String {
    ansi_re().replace_all(s, "").into_owned()
}

/// Terminal columns taken by `s`, escapes excluded.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

/// Cut plain text to at most `max` columns, ending in `...` when cut.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }

    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Grey placeholder for a missing value, plain text otherwise.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}

/// This app's own records stand out from other entry channels.
pub fn color_for_method(method: &str, own_label: &str) -> &'static str {
    if method == own_label { GREEN } else { CYAN }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_escapes() {
        let s = format!("{GREEN}Student App{RESET}");
        assert_eq!(visible_width(&s), 11);
        assert_eq!(strip_ansi("\x1b[38;2;255;153;51minit\x1b[0m"), "init");
    }

    #[test]
    fn width_counts_terminal_columns() {
        assert_eq!(visible_width("教师登记"), 8);
        assert_eq!(visible_width("Cafe\u{301} kiosk"), 10);
        assert_eq!(visible_width(&format!("{CYAN}教师{RESET}")), 4);
    }

    #[test]
    fn truncation_never_splits_a_wide_char() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghijkl", 10), "abcdefg...");
        let cut = truncate_to_width("教师登记教师登记", 10);
        assert_eq!(cut, "教师登...");
        assert!(visible_width(&cut) <= 10);
    }

    #[test]
    fn optional_values() {
        assert_eq!(colorize_optional(Some("2024-01-01")), "2024-01-01");
        assert_eq!(strip_ansi(&colorize_optional(Some("  "))), "--");
        assert_eq!(strip_ansi(&colorize_optional(None)), "--");
    }
}
