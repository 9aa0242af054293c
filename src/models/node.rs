use crate::utils::error::{ModelError, Result, ValidationError, ViolationKind};
use serde::{Deserialize, Serialize};
use url::Url;

/// Error body returned by the node on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Error {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub source: String,
    pub genesis_hash: String,
    pub best_hash: String,
    pub difficulty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<Vec<String>>,
}

impl Ping {
    /// Whether both nodes are on the same chain.
    pub fn same_chain(&self, genesis_hash: &str) -> bool {
        self.genesis_hash == genesis_hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Uri {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Uri {
    pub fn parse(&self) -> Result<Option<Url>> {
        let Some(raw) = self.uri.as_deref() else {
            return Ok(None);
        };
        Url::parse(raw).map(Some).map_err(|e| {
            ModelError::Validation(ValidationError {
                model: "Uri".to_string(),
                field: "uri".to_string(),
                path: "$.uri".to_string(),
                kind: ViolationKind::TypeMismatch,
                expected: format!("a valid URI ({})", e),
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    pub revision: String,
    pub genesis_hash: String,
}
