pub mod clock;
pub mod constants;
pub mod headshot_name;
pub mod http;
pub mod secrets;
pub mod service_error;
