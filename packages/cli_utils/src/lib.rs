#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the ARDA scraper.
//!
//! [`init_logger`] installs `pretty_env_logger` behind
//! `indicatif-log-bridge` so log lines are printed above the progress bar
//! instead of tearing through it. [`IndicatifProgress`] is the terminal
//! implementation of [`ProgressCallback`].

use std::sync::Arc;
use std::time::Duration;

use arda_source::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Creates a bar counting county requests.
    ///
    /// The bar starts as a spinner and gets its length from
    /// [`ProgressCallback::set_total`] once the acquisition loop knows how
    /// many counties it has.
    #[must_use]
    pub fn counties_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        Arc::new(Self { bar })
    }

    fn counties_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg} {wide_bar:.green/dim} {pos}/{len} counties [{elapsed_precise}, eta {eta}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(Self::counties_style());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Initializes the global logger, routed through `indicatif-log-bridge`.
///
/// The level comes from `RUST_LOG` and defaults to `info` when the
/// variable is unset. Returns the [`MultiProgress`] every progress bar
/// must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Already set in tests.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_tracks_county_progress() {
        let progress = IndicatifProgress {
            bar: ProgressBar::hidden(),
        };

        progress.set_total(92);
        assert_eq!(progress.bar.length(), Some(92));
        assert_eq!(progress.bar.position(), 0);

        progress.inc(1);
        progress.inc(1);
        progress.set_message("IN: 17 features".to_string());
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.message(), "IN: 17 features");
        assert!(!progress.bar.is_finished());

        progress.finish("IN: done".to_string());
        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "IN: done");
    }

    #[test]
    fn init_logger_is_idempotent() {
        let _first = init_logger();
        let _second = init_logger();
        assert!(log::max_level() >= log::LevelFilter::Error);
    }
}
