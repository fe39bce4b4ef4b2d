pub mod blob_headshot_source;
pub mod blob_listing;
