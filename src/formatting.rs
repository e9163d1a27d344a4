use crate::age::AgeStatus;
use crate::inflammation::RiskLevel;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiMode {
    Auto,   // Use emoji if terminal supports Unicode
    Always, // Always use emoji
    Never,  // Never use emoji
}

impl EmojiMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_emoji(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_emoji_support(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: EmojiMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: EmojiMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode, emoji: EmojiMode) -> Self {
        Self { color, emoji }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        // Check CLICOLOR environment variable
        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        // Check CLICOLOR_FORCE environment variable
        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// Create a plain output configuration (ASCII-only, no colors, no emoji)
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: EmojiMode::Never,
        }
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn emoji(&self, emoji: &str, fallback: &str) -> String;
    fn bold(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
}

pub struct ColoredFormatter {
    config: FormattingConfig,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        // Set colored control based on configuration
        if config.color.should_use_color() {
            colored::control::set_override(true);
        } else {
            colored::control::set_override(false);
        }

        Self { config }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        if self.config.color.should_use_color() {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.config.color.should_use_color() {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.config.color.should_use_color() {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        if self.config.color.should_use_color() {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn emoji(&self, emoji: &str, fallback: &str) -> String {
        if self.config.emoji.should_use_emoji() {
            emoji.to_string()
        } else {
            fallback.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.config.color.should_use_color() {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.config.color.should_use_color() {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn emoji(&self, _emoji: &str, fallback: &str) -> String {
        fallback.to_string()
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Check if stdout is a TTY
    std::io::stdout().is_terminal()
}

fn detect_emoji_support() -> bool {
    // Same detection as color support
    detect_color_support()
}

/// Glyph and ASCII fallback for an inflammation risk level
pub fn risk_glyph(level: RiskLevel) -> (&'static str, &'static str) {
    match level {
        RiskLevel::Optimal => ("🟢", "[OK]"),
        RiskLevel::LowInflammation => ("🟢", "[LOW]"),
        RiskLevel::Borderline => ("🟡", "[BORDERLINE]"),
        RiskLevel::ModerateInflammation => ("🟡", "[MODERATE]"),
        RiskLevel::HighInflammation => ("🟠", "[HIGH]"),
        RiskLevel::SevereInflammation => ("🔴", "[SEVERE]"),
        RiskLevel::CriticalInflammation => ("🔴", "[CRITICAL]"),
        RiskLevel::ExtremeRisk => ("🚨", "[EXTREME]"),
    }
}

/// Glyph and ASCII fallback for an age differential status
pub fn status_glyph(status: AgeStatus) -> (&'static str, &'static str) {
    match status {
        AgeStatus::Rejuvenated => ("🌱", "[REJUVENATED]"),
        AgeStatus::TrendingYounger => ("📉", "[YOUNGER]"),
        AgeStatus::Normal => ("✓", "[NORMAL]"),
        AgeStatus::TrendingOlder => ("📈", "[OLDER]"),
        AgeStatus::Aged => ("⚠", "[AGED]"),
    }
}

/// Paint text by how alarming a risk level is
pub fn paint_risk(formatter: &dyn OutputFormatter, level: RiskLevel, text: &str) -> String {
    match level {
        RiskLevel::Optimal | RiskLevel::LowInflammation => formatter.success(text),
        RiskLevel::Borderline | RiskLevel::ModerateInflammation => formatter.warning(text),
        _ => formatter.error(text),
    }
}

/// Paint text by how alarming an age status is.
/// Younger than the calendar reads as good news, same as normal.
pub fn paint_status(formatter: &dyn OutputFormatter, status: AgeStatus, text: &str) -> String {
    if status.is_concerning() {
        formatter.error(text)
    } else {
        formatter.success(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_parse() {
        assert_eq!(ColorMode::parse("auto"), Some(ColorMode::Auto));
        assert_eq!(ColorMode::parse("ALWAYS"), Some(ColorMode::Always));
        assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
        assert_eq!(ColorMode::parse("sometimes"), None);
    }

    #[test]
    fn test_plain_formatter_passes_fallbacks_through() {
        let formatter = PlainFormatter;
        assert_eq!(formatter.emoji("🟢", "[OK]"), "[OK]");
        assert_eq!(formatter.bold("x"), "x");
    }

    #[test]
    fn test_plain_config_disables_color_and_emoji() {
        let config = FormattingConfig::plain();
        assert!(!config.color.should_use_color());
        assert!(!config.emoji.should_use_emoji());
        let formatter = ColoredFormatter::new(config);
        assert_eq!(formatter.emoji("🟢", "[OK]"), "[OK]");
    }

    #[test]
    fn test_every_risk_level_has_a_fallback() {
        for level in RiskLevel::all() {
            let (_, fallback) = risk_glyph(*level);
            assert!(fallback.starts_with('['));
        }
    }
}
