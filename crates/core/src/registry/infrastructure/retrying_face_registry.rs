use crate::registry::domain::face_registry::FaceRegistry;
use crate::registry::domain::person_group::{Candidate, DetectedFace, Person, PersonGroup};
use crate::registry::infrastructure::retry_policy::{RetryDecision, RetryPolicy};
use crate::shared::clock::{Clock, SystemClock};
use crate::shared::service_error::ServiceError;

/// Decorator that repeats registry calls failing with transient errors.
///
/// Non-idempotent calls (`add_person`, `add_face`) are retried too, so a
/// request that succeeded remotely but timed out locally may register a
/// duplicate.
///
/// `identify_face` is passed through untouched: every identify attempt has
/// to take its own rate limiter slot, so the labelling use case retries it.
pub struct RetryingFaceRegistry {
    inner: Box<dyn FaceRegistry>,
    policy: RetryPolicy,
    clock: Box<dyn Clock>,
}

impl RetryingFaceRegistry {
    pub fn new(inner: Box<dyn FaceRegistry>, policy: RetryPolicy) -> Self {
        Self::with_clock(inner, policy, Box::new(SystemClock::new()))
    }

    pub fn with_clock(
        inner: Box<dyn FaceRegistry>,
        policy: RetryPolicy,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            inner,
            policy,
            clock,
        }
    }

    fn run<T>(
        &self,
        operation: &str,
        mut call: impl FnMut(&dyn FaceRegistry) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut attempt = 1;
        loop {
            match call(self.inner.as_ref()) {
                Ok(value) => return Ok(value),
                Err(e) => match self.policy.decide(attempt, &e) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(delay) => {
                        log::warn!(
                            "{operation} failed (attempt {attempt}/{}): {e}; retrying in {:.1}s",
                            self.policy.max_attempts,
                            delay.as_secs_f64()
                        );
                        self.clock.sleep(delay);
                        attempt += 1;
                    }
                },
            }
        }
    }
}

impl FaceRegistry for RetryingFaceRegistry {
    fn create_group(&self, group_id: &str, user_data: &str) -> Result<PersonGroup, ServiceError> {
        self.run("create_group", |r| r.create_group(group_id, user_data))
    }

    fn list_groups(&self) -> Result<Vec<PersonGroup>, ServiceError> {
        self.run("list_groups", |r| r.list_groups())
    }

    fn delete_group(&self, group_id: &str) -> Result<(), ServiceError> {
        self.run("delete_group", |r| r.delete_group(group_id))
    }

    fn add_person(
        &self,
        group_id: &str,
        name: &str,
        user_data: &str,
    ) -> Result<String, ServiceError> {
        self.run("add_person", |r| r.add_person(group_id, name, user_data))
    }

    fn get_person(&self, group_id: &str, person_id: &str) -> Result<Person, ServiceError> {
        self.run("get_person", |r| r.get_person(group_id, person_id))
    }

    fn add_face(
        &self,
        group_id: &str,
        person_id: &str,
        image_url: &str,
    ) -> Result<String, ServiceError> {
        self.run("add_face", |r| r.add_face(group_id, person_id, image_url))
    }

    fn train(&self, group_id: &str) -> Result<(), ServiceError> {
        self.run("train", |r| r.train(group_id))
    }

    fn detect_face(&self, image_url: &str) -> Result<Vec<DetectedFace>, ServiceError> {
        self.run("detect_face", |r| r.detect_face(image_url))
    }

    fn identify_face(
        &self,
        group_id: &str,
        image_url: &str,
    ) -> Result<Vec<Candidate>, ServiceError> {
        self.inner.identify_face(group_id, image_url)
    }
}
