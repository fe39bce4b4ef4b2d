use std::time::Duration;

pub const DEFAULT_REGION: &str = "westeurope";
pub const DEFAULT_GROUP_ID: &str = "oireachtas";
pub const DEFAULT_CONTAINER: &str = "faces";

pub const VIDEO_INDEXER_BASE_URL: &str = "https://videobreakdown.azure-api.net";

/// Identify calls allowed per rolling window on the free Face API tier.
pub const IDENTIFY_MAX_CALLS: usize = 10;
pub const IDENTIFY_PERIOD: Duration = Duration::from_secs(60);

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const SECRETS_FILE_NAME: &str = "secrets.json";
pub const CONFIG_DIR_NAME: &str = "FaceLabeller";

/// Longest person group id the Face API accepts.
pub const MAX_GROUP_ID_LEN: usize = 64;

pub fn face_api_base_url(region: &str) -> String {
    format!("https://{region}.api.cognitive.microsoft.com/face/v1.0")
}

pub fn blob_service_base_url(account: &str) -> String {
    format!("https://{account}.blob.core.windows.net")
}
