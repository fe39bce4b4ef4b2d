pub mod label_faces_use_case;
pub mod pipeline_logger;
pub mod populate_registry_use_case;
pub mod rate_limiter;
