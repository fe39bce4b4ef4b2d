pub mod cognitive_face_client;
pub mod retry_policy;
pub mod retrying_face_registry;
