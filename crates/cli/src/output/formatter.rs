//! Human and JSON reporting for swc commands
//!
//! Results go to stdout, diagnostics to stderr. In JSON mode stdout only
//! ever carries one JSON document.

use console::style;
use serde::Serialize;
use sw_core::Error;

use super::OutputConfig;
use crate::exit_code::ExitCode;

/// Writes command results according to the output flags
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

#[derive(Serialize)]
struct JsonError<'a> {
    error: &'a str,
    exit_code: i32,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Styling applies to human output only
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Report a failed step and map it to the process exit code
    ///
    /// Always printed, even in quiet mode.
    pub fn fail(&self, context: &str, error: &Error) -> ExitCode {
        let message = if context.is_empty() {
            error.to_string()
        } else {
            format!("{context}: {error}")
        };
        self.error(&message, ExitCode::from_error(error))
    }

    /// Report a failure that ends the run with `code`
    pub fn error(&self, message: &str, code: ExitCode) -> ExitCode {
        if self.config.json {
            let body = JsonError {
                error: message,
                exit_code: code.as_i32(),
            };
            match serde_json::to_string_pretty(&body) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{message}"),
            }
        } else {
            eprintln!("{} {message}", self.mark("✗", console::Color::Red));
        }
        code
    }

    /// Final line of a successful human-readable run
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{} {message}", self.mark("✓", console::Color::Green));
    }

    /// Something the user should know about but that does not fail the run
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{} {message}", self.mark("⚠", console::Color::Yellow));
    }

    /// A labelled result value, such as the website URL
    pub fn field(&self, key: &str, value: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        if self.colors_enabled() {
            println!("{} {value}", style(format!("{key}:")).bold());
        } else {
            println!("{key}: {value}");
        }
    }

    /// Free-form human output, such as a rendered plan table
    pub fn println(&self, text: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{text}");
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    fn mark(&self, symbol: &'static str, color: console::Color) -> String {
        if self.colors_enabled() {
            style(symbol).fg(color).to_string()
        } else {
            symbol.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(json: bool, no_color: bool) -> Formatter {
        Formatter::new(OutputConfig {
            json,
            no_color,
            ..Default::default()
        })
    }

    #[test]
    fn test_json_mode_disables_colors() {
        assert!(formatter(false, false).colors_enabled());
        assert!(!formatter(false, true).colors_enabled());
        assert!(!formatter(true, false).colors_enabled());
    }

    #[test]
    fn test_fail_maps_exit_code() {
        let quiet = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        let missing = Error::Config("No static directory".into());
        assert_eq!(quiet.fail("", &missing), ExitCode::UsageError);

        let taken = Error::Conflict("bucket site exists".into());
        assert_eq!(formatter(true, false).fail("Deployment failed", &taken), ExitCode::Conflict);
    }

    #[test]
    fn test_marks_are_plain_without_color() {
        let plain = formatter(false, true);
        assert_eq!(plain.mark("✓", console::Color::Green), "✓");
    }
}
