use reqwest::Method;
use url::Url;

use crate::shared::constants::blob_service_base_url;
use crate::shared::http::{redact_url, ServiceClient};
use crate::shared::service_error::ServiceError;
use crate::storage::domain::headshot_source::{Headshot, HeadshotSource};
use crate::storage::infrastructure::blob_listing::parse_list_blobs;

/// Headshots listed from a blob storage container via a SAS token.
///
/// Follows continuation markers until the listing is exhausted. A page that
/// hands back the marker it was requested with is an error. Returned URLs
/// carry no token; the container is expected to allow public reads.
pub struct BlobHeadshotSource {
    client: ServiceClient,
    base_url: String,
    container: String,
    sas_token: String,
}

impl BlobHeadshotSource {
    pub fn new(account: &str, container: &str, sas_token: &str) -> Result<Self, ServiceError> {
        Self::with_base_url(&blob_service_base_url(account), container, sas_token)
    }

    pub fn with_base_url(
        base_url: &str,
        container: &str,
        sas_token: &str,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            client: ServiceClient::anonymous()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            container: container.to_string(),
            sas_token: sas_token.trim_start_matches('?').to_string(),
        })
    }

    fn container_url(&self) -> Result<Url, ServiceError> {
        let raw = format!("{}/{}", self.base_url, self.container);
        Url::parse(&raw).map_err(|source| ServiceError::InvalidUrl { url: raw, source })
    }

    fn list_url(&self, marker: Option<&str>) -> Result<Url, ServiceError> {
        let mut url = self.container_url()?;
        url.set_query((!self.sas_token.is_empty()).then_some(self.sas_token.as_str()));
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("restype", "container").append_pair("comp", "list");
            if let Some(marker) = marker {
                query.append_pair("marker", marker);
            }
        }
        Ok(url)
    }

    fn blob_url(&self, name: &str) -> Result<String, ServiceError> {
        let mut url = self.container_url()?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(name.split('/'));
        }
        Ok(url.to_string())
    }
}

impl HeadshotSource for BlobHeadshotSource {
    fn headshots(&self) -> Result<Vec<Headshot>, ServiceError> {
        let mut headshots = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let url = self.list_url(marker.as_deref())?;
            let body = self.client.send(Method::GET, url.as_str())?;
            let page = parse_list_blobs(&body);
            log::debug!(
                "Listed {} blobs from {}{}",
                page.names.len(),
                self.container,
                if page.next_marker.is_some() { " (more pages)" } else { "" }
            );
            for name in page.names {
                let url = self.blob_url(&name)?;
                headshots.push(Headshot {
                    file_name: name,
                    url,
                });
            }
            match page.next_marker {
                Some(next) if marker.as_deref() == Some(next.as_str()) => {
                    return Err(ServiceError::RepeatedMarker {
                        url: redact_url(url.as_str()),
                        marker: next,
                    });
                }
                Some(next) => marker = Some(next),
                None => break,
            }
        }
        Ok(headshots)
    }
}
