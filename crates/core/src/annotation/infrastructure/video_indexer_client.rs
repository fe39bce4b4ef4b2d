use reqwest::Method;
use url::Url;

use crate::annotation::domain::video_annotator::VideoAnnotator;
use crate::shared::constants::VIDEO_INDEXER_BASE_URL;
use crate::shared::http::ServiceClient;
use crate::shared::service_error::ServiceError;

/// Video annotator backed by the Video Indexer breakdowns partner API.
pub struct VideoIndexerClient {
    client: ServiceClient,
    base_url: String,
}

impl VideoIndexerClient {
    pub fn new(api_key: &str) -> Result<Self, ServiceError> {
        Self::with_base_url(api_key, VIDEO_INDEXER_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client: ServiceClient::new(api_key)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn update_face_name_url(
        &self,
        breakdown_id: &str,
        face_id: &str,
        name: &str,
    ) -> Result<Url, ServiceError> {
        let endpoint = format!(
            "{}/Breakdowns/Api/Partner/Breakdowns/UpdateFaceName",
            self.base_url
        );
        let mut url = Url::parse(&endpoint)
            .map_err(|source| ServiceError::InvalidUrl { url: endpoint, source })?;
        // The id is one path segment, so '/', '?' and '#' get percent-encoded.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(breakdown_id);
        }
        url.query_pairs_mut()
            .append_pair("faceId", face_id)
            .append_pair("newName", name);
        Ok(url)
    }
}

impl VideoAnnotator for VideoIndexerClient {
    fn label_face(
        &self,
        breakdown_id: &str,
        face_id: &str,
        name: &str,
    ) -> Result<(), ServiceError> {
        let url = self.update_face_name_url(breakdown_id, face_id, name)?;
        self.client.send(Method::PUT, url.as_str())?;
        Ok(())
    }
}
