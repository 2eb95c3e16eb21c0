use crate::error::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A place returned by a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub name: String,
    /// Address or short description
    pub description: String,
    /// 0.0 to 5.0, 0.0 when unrated
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
}

impl PlaceCandidate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, rating: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rating,
            photo_ref: None,
        }
    }

    pub fn with_photo_ref(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }
}

/// Source of real-world place suggestions
#[async_trait]
pub trait PlaceOracle: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Search for places matching `query` of kind `type_hint` in `destination`
    async fn search(
        &self,
        query: &str,
        type_hint: &str,
        destination: &str,
    ) -> Result<Vec<PlaceCandidate>>;
}

/// Oracle that never finds anything; leaves every slot unenriched
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlaceOracle;

#[async_trait]
impl PlaceOracle for NoopPlaceOracle {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn search(
        &self,
        _query: &str,
        _type_hint: &str,
        _destination: &str,
    ) -> Result<Vec<PlaceCandidate>> {
        Ok(Vec::new())
    }
}
