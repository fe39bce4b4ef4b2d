use crate::annotation::domain::breakdown::BreakdownDocument;
use crate::annotation::domain::video_annotator::VideoAnnotator;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::rate_limiter::SlidingWindowRateLimiter;
use crate::registry::domain::face_registry::FaceRegistry;
use crate::registry::domain::person_group::Candidate;
use crate::registry::infrastructure::retry_policy::{RetryDecision, RetryPolicy};
use crate::shared::service_error::ServiceError;

/// Counts for one labelling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelReport {
    pub labelled: usize,
    pub skipped: usize,
}

/// Identifies each face of a breakdown against the registry and writes the
/// matched person's name back to the annotation service.
///
/// Faces are handled strictly in document order, one identify call per
/// limiter slot. Retried identify attempts each take a fresh slot. The first
/// remote failure that is not retried aborts the run; faces after it are not
/// processed.
pub struct LabelFacesUseCase {
    registry: Box<dyn FaceRegistry>,
    annotator: Box<dyn VideoAnnotator>,
    limiter: SlidingWindowRateLimiter,
    group_id: String,
    logger: Box<dyn PipelineLogger>,
    retry: RetryPolicy,
}

impl LabelFacesUseCase {
    pub fn new(
        registry: Box<dyn FaceRegistry>,
        annotator: Box<dyn VideoAnnotator>,
        limiter: SlidingWindowRateLimiter,
        group_id: &str,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            registry,
            annotator,
            limiter,
            group_id: group_id.to_string(),
            logger,
            retry: RetryPolicy::default(),
        }
    }

    /// Retries transient identify failures. Off by default.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn execute(
        &mut self,
        document: &BreakdownDocument,
    ) -> Result<LabelReport, Box<dyn std::error::Error>> {
        let breakdown_id = document.breakdown_id()?;
        let faces = document.faces();
        let mut report = LabelReport::default();

        for (i, face) in faces.iter().enumerate() {
            self.logger.progress(i + 1, faces.len());

            let candidates = self.identify(&face.thumbnail_full_url)?;
            let Some(best) = candidates.first() else {
                log::debug!("No candidates for face {}", face.id);
                self.logger.outcome("skipped");
                report.skipped += 1;
                continue;
            };

            let person = self.registry.get_person(&self.group_id, &best.person_id)?;
            self.annotator
                .label_face(breakdown_id, &face.id, &person.name)?;
            self.logger.info(&format!(
                "Labelled face {} as {} (confidence {:.2})",
                face.id, person.name, best.confidence
            ));
            self.logger.outcome("labelled");
            report.labelled += 1;
        }

        self.logger.summary();
        Ok(report)
    }

    fn identify(&mut self, image_url: &str) -> Result<Vec<Candidate>, ServiceError> {
        let mut attempt = 1;
        loop {
            self.limiter.acquire();
            let error = match self.registry.identify_face(&self.group_id, image_url) {
                Ok(candidates) => return Ok(candidates),
                Err(e) => e,
            };
            match self.retry.decide(attempt, &error) {
                RetryDecision::NoRetry => return Err(error),
                RetryDecision::RetryAfter(delay) => {
                    log::warn!(
                        "identify_face failed (attempt {attempt}/{}): {error}; retrying in {:.1}s",
                        self.retry.max_attempts,
                        delay.as_secs_f64()
                    );
                    self.limiter.pause(delay);
                    attempt += 1;
                }
            }
        }
    }
}
