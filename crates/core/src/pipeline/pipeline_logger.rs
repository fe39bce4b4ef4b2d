use std::collections::BTreeMap;
use std::time::Instant;

/// Cross-cutting logger for use-case orchestration events.
///
/// Decouples use cases from specific output mechanisms so callers can
/// observe progress without changing the orchestration code.
pub trait PipelineLogger: Send {
    /// Report item-level progress (faces labelled, headshots registered).
    fn progress(&mut self, current: usize, total: usize);

    /// Count one item under a named outcome (e.g. `labelled`, `skipped`).
    fn outcome(&mut self, name: &str);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn outcome(&mut self, _name: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger backed by the `log` facade, with a per-outcome summary.
pub struct LogPipelineLogger {
    label: String,
    outcomes: BTreeMap<String, usize>,
    start_time: Instant,
    total: usize,
}

impl LogPipelineLogger {
    /// `label` names the items being processed, e.g. `"faces"`.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            outcomes: BTreeMap::new(),
            start_time: Instant::now(),
            total: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was processed.
    pub fn summary_string(&self) -> Option<String> {
        if self.outcomes.is_empty() && self.total == 0 {
            return None;
        }
        let counts = self
            .outcomes
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        let elapsed = self.start_time.elapsed().as_secs_f64();
        Some(format!(
            "Run summary ({} {}, {elapsed:.1}s): {}",
            self.total,
            self.label,
            if counts.is_empty() { "none" } else { counts.as_str() }
        ))
    }

    pub fn count(&self, name: &str) -> usize {
        self.outcomes.get(name).copied().unwrap_or(0)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total = total;
        log::info!("Processing {current}/{total} {}", self.label);
    }

    fn outcome(&mut self, name: &str) {
        *self.outcomes.entry(name.to_string()).or_default() += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.outcome("labelled");
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_outcomes_are_counted() {
        let mut logger = LogPipelineLogger::new("faces");
        logger.outcome("labelled");
        logger.outcome("skipped");
        logger.outcome("labelled");

        assert_eq!(logger.count("labelled"), 2);
        assert_eq!(logger.count("skipped"), 1);
        assert_eq!(logger.count("failed"), 0);
    }

    #[test]
    fn test_summary_lists_outcomes_sorted() {
        let mut logger = LogPipelineLogger::new("faces");
        logger.progress(3, 3);
        logger.outcome("skipped");
        logger.outcome("labelled");
        logger.outcome("labelled");

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Run summary (3 faces"));
        assert!(summary.ends_with("labelled: 2, skipped: 1"));
    }

    #[test]
    fn test_summary_with_progress_but_no_outcomes() {
        let mut logger = LogPipelineLogger::new("headshots");
        logger.progress(0, 4);
        assert!(logger.summary_string().unwrap().ends_with("none"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = LogPipelineLogger::new("faces");
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_info_is_not_counted_as_outcome() {
        let mut logger = LogPipelineLogger::new("faces");
        logger.info("hello world");
        assert_eq!(logger.count("hello world"), 0);
        assert!(logger.summary_string().is_none());
    }
}
