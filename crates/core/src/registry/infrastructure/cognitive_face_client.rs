use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::registry::domain::face_registry::FaceRegistry;
use crate::registry::domain::person_group::{
    Candidate, DetectedFace, IdentifyResult, Person, PersonGroup,
};
use crate::shared::constants::face_api_base_url;
use crate::shared::http::{decode, redact_url, ServiceClient};
use crate::shared::service_error::ServiceError;

/// Face registry backed by the Cognitive Services Face REST API (v1.0).
pub struct CognitiveFaceClient {
    client: ServiceClient,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedPerson {
    person_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedFace {
    persisted_face_id: String,
}

impl CognitiveFaceClient {
    /// Client for the regional public endpoint, e.g. `westeurope`.
    pub fn new(api_key: &str, region: &str) -> Result<Self, ServiceError> {
        Self::with_base_url(api_key, &face_api_base_url(region))
    }

    /// Client for an explicit API root (everything before `/persongroups`).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client: ServiceClient::new(api_key)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn group_url(&self, group_id: &str) -> String {
        format!("{}/persongroups/{group_id}", self.base_url)
    }

    fn person_url(&self, group_id: &str, person_id: &str) -> String {
        format!("{}/persons/{person_id}", self.group_url(group_id))
    }
}

impl FaceRegistry for CognitiveFaceClient {
    fn create_group(&self, group_id: &str, user_data: &str) -> Result<PersonGroup, ServiceError> {
        let url = self.group_url(group_id);
        self.client.send_json(
            Method::PUT,
            &url,
            &json!({ "name": group_id, "userData": user_data }),
        )?;
        Ok(PersonGroup {
            person_group_id: group_id.to_string(),
            name: group_id.to_string(),
            user_data: Some(user_data.to_string()),
        })
    }

    fn list_groups(&self) -> Result<Vec<PersonGroup>, ServiceError> {
        let url = format!("{}/persongroups", self.base_url);
        let body = self.client.send(Method::GET, &url)?;
        decode(&url, &body)
    }

    fn delete_group(&self, group_id: &str) -> Result<(), ServiceError> {
        let url = self.group_url(group_id);
        match self.client.send(Method::DELETE, &url) {
            Ok(_) => Ok(()),
            Err(e) if e.status() == Some(404) => {
                log::debug!("Group {group_id} did not exist; nothing to delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn add_person(
        &self,
        group_id: &str,
        name: &str,
        user_data: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/persons", self.group_url(group_id));
        let body = self.client.send_json(
            Method::POST,
            &url,
            &json!({ "name": name, "userData": user_data }),
        )?;
        let created: CreatedPerson = decode(&url, &body)?;
        Ok(created.person_id)
    }

    fn get_person(&self, group_id: &str, person_id: &str) -> Result<Person, ServiceError> {
        let url = self.person_url(group_id, person_id);
        let body = self.client.send(Method::GET, &url)?;
        decode(&url, &body)
    }

    fn add_face(
        &self,
        group_id: &str,
        person_id: &str,
        image_url: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/persistedFaces", self.person_url(group_id, person_id));
        let body = self
            .client
            .send_json(Method::POST, &url, &json!({ "url": image_url }))?;
        let face: PersistedFace = decode(&url, &body)?;
        Ok(face.persisted_face_id)
    }

    fn train(&self, group_id: &str) -> Result<(), ServiceError> {
        let url = format!("{}/train", self.group_url(group_id));
        self.client.send(Method::POST, &url)?;
        Ok(())
    }

    fn detect_face(&self, image_url: &str) -> Result<Vec<DetectedFace>, ServiceError> {
        let url = format!("{}/detect?returnFaceId=true", self.base_url);
        let body = self
            .client
            .send_json(Method::POST, &url, &json!({ "url": image_url }))?;
        decode(&url, &body)
    }

    fn identify_face(
        &self,
        group_id: &str,
        image_url: &str,
    ) -> Result<Vec<Candidate>, ServiceError> {
        let detected = self.detect_face(image_url)?;
        let Some(face) = detected.first() else {
            log::debug!("No face detected in {}", redact_url(image_url));
            return Ok(Vec::new());
        };

        let url = format!("{}/identify", self.base_url);
        let body = self.client.send_json(
            Method::POST,
            &url,
            &json!({ "personGroupId": group_id, "faceIds": [face.face_id] }),
        )?;
        let results: Vec<IdentifyResult> = decode(&url, &body)?;
        Ok(results
            .into_iter()
            .next()
            .map(|r| r.candidates)
            .unwrap_or_default())
    }
}
