use crate::shared::service_error::ServiceError;

/// A reference photo available for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headshot {
    /// Object name inside the container, e.g. `"Smith, John [No Logo].jpg"`.
    pub file_name: String,
    /// Publicly addressable URL the face registry can fetch.
    pub url: String,
}

/// Domain interface for enumerating candidate headshot images.
pub trait HeadshotSource: Send {
    fn headshots(&self) -> Result<Vec<Headshot>, ServiceError>;
}
