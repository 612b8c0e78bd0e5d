//! User-facing status lines: colored icon, then the message.

use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
    Hint,
}

impl Level {
    fn color(self) -> &'static str {
        match self {
            Level::Info | Level::Hint => "\x1b[34m",
            Level::Success => "\x1b[32m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
            Level::Hint => "💡",
        }
    }
}

fn render(level: Level, msg: impl fmt::Display) -> String {
    format!("{}{}{} {}{}", level.color(), BOLD, level.icon(), RESET, msg)
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Info, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Success, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Warning, msg));
}

/// Errors and hints go to stderr.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", render(Level::Error, msg));
}

pub fn hint<T: fmt::Display>(msg: T) {
    eprintln!("{}", render(Level::Hint, msg));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::colors::strip_ansi;

    #[test]
    fn icon_then_message() {
        assert_eq!(strip_ansi(&render(Level::Success, "done")), "✅ done");
        assert_eq!(strip_ansi(&render(Level::Error, 42)), "❌ 42");
    }
}
