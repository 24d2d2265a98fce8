//! Shared output helpers: global flag checks and terminal styling.

/// Whether `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("BIZSCOUT_QUIET").is_ok()
}

/// Whether `--json` was passed.
pub fn is_json() -> bool {
    std::env::var("BIZSCOUT_JSON").is_ok()
}

/// Whether `--no-color` was passed (or NO_COLOR is set).
pub fn is_no_color() -> bool {
    std::env::var("BIZSCOUT_NO_COLOR").is_ok() || std::env::var("NO_COLOR").is_ok()
}

/// Print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Minimal status symbols, color-aware.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self {
            color: !is_no_color(),
        }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "[OK]"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "[!!]"
        }
    }

    pub fn fail_sym(&self) -> &'static str {
        if self.color {
            "\x1b[31m✗\x1b[0m"
        } else {
            "[XX]"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_plain_symbols() {
        let s = Styled { color: false };
        assert_eq!(s.ok_sym(), "[OK]");
        assert_eq!(s.warn_sym(), "[!!]");
        assert_eq!(s.fail_sym(), "[XX]");
    }
}
