pub mod face_registry;
pub mod person_group;
