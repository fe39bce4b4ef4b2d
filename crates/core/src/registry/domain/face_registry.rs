use crate::registry::domain::person_group::{Candidate, DetectedFace, Person, PersonGroup};
use crate::shared::service_error::ServiceError;

/// Domain interface for the face-identity registry.
///
/// Every call is one remote round trip (two for [`identify_face`]) and
/// nothing is cached locally. Training is asynchronous on the remote side;
/// [`train`] only requests it.
///
/// [`identify_face`]: FaceRegistry::identify_face
/// [`train`]: FaceRegistry::train
pub trait FaceRegistry: Send {
    /// Creates the group, replacing any existing group with the same id.
    fn create_group(&self, group_id: &str, user_data: &str) -> Result<PersonGroup, ServiceError>;

    fn list_groups(&self) -> Result<Vec<PersonGroup>, ServiceError>;

    /// Removes the group and all its persons. An absent group is not an error.
    fn delete_group(&self, group_id: &str) -> Result<(), ServiceError>;

    /// Registers a person and returns the id the registry assigned.
    fn add_person(&self, group_id: &str, name: &str, user_data: &str)
        -> Result<String, ServiceError>;

    fn get_person(&self, group_id: &str, person_id: &str) -> Result<Person, ServiceError>;

    /// Submits a reference image for a person and returns the persisted face id.
    fn add_face(
        &self,
        group_id: &str,
        person_id: &str,
        image_url: &str,
    ) -> Result<String, ServiceError>;

    fn train(&self, group_id: &str) -> Result<(), ServiceError>;

    fn detect_face(&self, image_url: &str) -> Result<Vec<DetectedFace>, ServiceError>;

    /// Detects faces in the image and matches the first one against the group.
    ///
    /// Returns the registry's ranked candidates, empty when nothing matched
    /// or no face was detected.
    fn identify_face(&self, group_id: &str, image_url: &str)
        -> Result<Vec<Candidate>, ServiceError>;
}
