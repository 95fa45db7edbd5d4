//! Terminal output of swc
//!
//! `Formatter` reports results and failures, `ApplyProgress` follows a
//! running deployment. Both honour the same `OutputConfig`.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ApplyProgress;

/// Output flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub no_color: bool,
    pub no_progress: bool,
    pub quiet: bool,
}

impl OutputConfig {
    /// Whether a live progress bar may be drawn
    pub fn shows_progress(&self) -> bool {
        !(self.json || self.quiet || self.no_progress)
    }
}
