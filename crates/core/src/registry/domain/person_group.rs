use serde::{Deserialize, Serialize};

/// A named collection of registered people in the face registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonGroup {
    pub person_group_id: String,
    pub name: String,
    #[serde(default)]
    pub user_data: Option<String>,
}

/// A registered identity within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub person_id: String,
    pub name: String,
    #[serde(default)]
    pub user_data: Option<String>,
    #[serde(default)]
    pub persisted_face_ids: Vec<String>,
}

/// A face found by the detect call. Only the id is needed for identification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    pub face_id: String,
}

/// A ranked possible identity match for a detected face.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub person_id: String,
    pub confidence: f64,
}

/// Identification outcome for one detected face, candidates ranked by the
/// registry (best first).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResult {
    pub face_id: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}
