use crate::core::union::UnionPolicy;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Where raw payloads come from and go to.
///
/// The codec never talks to the network itself; a transport implements this
/// and hands decoded JSON over. Paths are relative to the node's API root.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Value>;
    async fn submit(&self, path: &str, body: &Value) -> Result<Value>;
}

/// Settings the codec and the payload sources read, whatever their origin.
pub trait ConfigProvider: Send + Sync {
    fn union_policy(&self) -> UnionPolicy;
    fn node_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}
