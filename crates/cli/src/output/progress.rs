//! Progress of a running deployment
//!
//! Counts resources as the engine creates them.

use sw_core::{ApplyEvent, ApplyPhase};

use super::OutputConfig;

/// Progress bar over the resources of one apply
///
/// Hidden in quiet, JSON and `--no-progress` modes.
#[derive(Debug)]
pub struct ApplyProgress {
    bar: Option<indicatif::ProgressBar>,
}

impl ApplyProgress {
    /// Create a progress bar over `total` resources
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        let bar = config.shows_progress().then(|| {
            let bar = indicatif::ProgressBar::new(total);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
                    .expect("valid template")
                    .progress_chars("#>-"),
            );
            bar
        });

        Self { bar }
    }

    /// Reflect an apply event
    pub fn observe(&self, event: &ApplyEvent) {
        let Some(bar) = &self.bar else {
            return;
        };
        match event.phase {
            ApplyPhase::Creating => bar.set_message(format!(
                "creating {} {}",
                event.resource_type.short_name(),
                event.urn.name()
            )),
            ApplyPhase::Created => bar.inc(1),
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
