//! Message formatting and display.

use std::io::{self, IsTerminal};

use crate::config::PipelineConfig;

/// Level of an output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Verbose-only detail.
    Debug,
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from the run configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.quiet && !config.dry_run, config.verbose)
    }

    /// Create a quiet formatter (errors and warnings only).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Whether non-error output is shown at all.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Whether verbose detail is shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Informational message; suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print(MessageLevel::Info, message);
        }
    }

    /// Success message; suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print(MessageLevel::Success, message);
        }
    }

    /// Warning; always shown.
    pub fn warning(&self, message: &str) {
        self.print(MessageLevel::Warning, message);
    }

    /// Error; always shown.
    pub fn error(&self, message: &str) {
        self.print(MessageLevel::Error, message);
    }

    /// Verbose-only detail line.
    pub fn debug(&self, message: &str) {
        if self.verbose && !self.quiet {
            self.print(MessageLevel::Debug, message);
        }
    }

    /// Section heading.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("--- {title} ---");
        }
    }

    /// Key/value detail line.
    pub fn detail(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {key}: {value}");
        }
    }

    /// Blank separator line.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    fn print(&self, level: MessageLevel, message: &str) {
        let (prefix, color) = match level {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"),
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"),
            MessageLevel::Error => ("✗ ", "\x1b[31m"),
            MessageLevel::Debug => ("→ ", "\x1b[36m"),
        };

        let line = if self.colored && !color.is_empty() {
            format!("{color}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        };

        match level {
            MessageLevel::Error | MessageLevel::Warning => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_suppresses_info() {
        let formatter = OutputFormatter::quiet();
        assert!(!formatter.should_print());
        assert!(!formatter.is_verbose());
    }

    #[test]
    fn test_dry_run_overrides_quiet() {
        let config = PipelineConfig {
            quiet: true,
            dry_run: true,
            ..Default::default()
        };
        let formatter = OutputFormatter::from_config(&config);
        assert!(formatter.should_print());
    }

    #[test]
    fn test_verbose_from_config() {
        let config = PipelineConfig {
            verbose: true,
            ..Default::default()
        };
        let formatter = OutputFormatter::from_config(&config);
        assert!(formatter.is_verbose());
    }
}
