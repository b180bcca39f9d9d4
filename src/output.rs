//! # Output Configuration
//!
//! This module controls how the CLI reports results: whether colors and
//! emoji markers are used, and the per-outcome markers shown for each
//! deployment mapping.
//!
//! The color decision is made once at startup and carried around as an
//! immutable [`OutputConfig`] value.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sharables::output::{OutputConfig, Marker};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Deployed", config.marker(Marker::Success));
//! ```

use console::Style;
use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

/// Distinct markers for each reported outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Success,
    Fallback,
    Skip,
    Failure,
    Info,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Also covers legacy Windows consoles without ANSI support
        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The marker text for an outcome, emoji when colors are on.
    pub fn marker(&self, marker: Marker) -> &'static str {
        match marker {
            Marker::Success => emoji(self, "✓", "[OK]"),
            Marker::Fallback => emoji(self, "↻", "[FALLBACK]"),
            Marker::Skip => emoji(self, "⚠", "[SKIP]"),
            Marker::Failure => emoji(self, "✗", "[FAIL]"),
            Marker::Info => emoji(self, "•", "-"),
        }
    }

    /// Paint `text` in the color associated with `marker`.
    pub fn paint(&self, marker: Marker, text: &str) -> String {
        let style = match marker {
            Marker::Success => Style::new().green(),
            Marker::Fallback | Marker::Skip => Style::new().yellow().bold(),
            Marker::Failure => Style::new().red(),
            Marker::Info => Style::new().blue(),
        };
        style.force_styling(self.use_color).apply_to(text).to_string()
    }

    /// A full report line: colored marker followed by the message.
    pub fn line(&self, marker: Marker, message: &str) -> String {
        self.paint(marker, &format!("{} {}", self.marker(marker), message))
    }

    /// A section heading such as `=== Deploying Sharables Sections ===`.
    pub fn heading(&self, title: &str) -> String {
        self.paint(Marker::Info, &format!("=== {} ===", title))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the appropriate string based on color configuration.
///
/// When colors are enabled, returns the emoji. When disabled, returns
/// the plain text alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
