use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreakdownError {
    #[error("failed to read breakdown document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed breakdown document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("breakdown document lists no breakdowns")]
    NoBreakdown,
}

/// A video indexer breakdown export, reduced to the parts the labelling
/// workflow reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownDocument {
    pub summarized_insights: SummarizedInsights,
    #[serde(default)]
    pub breakdowns: Vec<BreakdownRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummarizedInsights {
    #[serde(default)]
    pub faces: Vec<BreakdownFace>,
}

/// A face detected in the video, in document order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownFace {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub thumbnail_full_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakdownRef {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

/// Exports use numeric face ids; the annotation API takes them as text.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl BreakdownDocument {
    pub fn load(path: &Path) -> Result<Self, BreakdownError> {
        let json = fs::read_to_string(path).map_err(|source| BreakdownError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, BreakdownError> {
        serde_json::from_str(json).map_err(BreakdownError::Parse)
    }

    /// Id of the first listed breakdown, the one faces are labelled in.
    pub fn breakdown_id(&self) -> Result<&str, BreakdownError> {
        self.breakdowns
            .first()
            .map(|b| b.id.as_str())
            .ok_or(BreakdownError::NoBreakdown)
    }

    pub fn faces(&self) -> &[BreakdownFace] {
        &self.summarized_insights.faces
    }
}
