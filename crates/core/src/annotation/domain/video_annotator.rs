use crate::shared::service_error::ServiceError;

/// Domain interface for writing resolved names back into a video breakdown.
pub trait VideoAnnotator: Send {
    /// Names the detected-face instance `face_id` inside breakdown `breakdown_id`.
    fn label_face(&self, breakdown_id: &str, face_id: &str, name: &str)
        -> Result<(), ServiceError>;
}
