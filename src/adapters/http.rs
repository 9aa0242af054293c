use crate::domain::ports::{ConfigProvider, PayloadSource};
use crate::models::{self, TypedModel};
use crate::utils::error::{ModelError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Payload source backed by a node's HTTP API.
pub struct HttpPayloadSource {
    client: Client,
    base_url: Url,
}

impl HttpPayloadSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_url("node.base_url", base_url)?;
        let mut base_url = Url::parse(base_url).map_err(|e| ModelError::InvalidConfigValueError {
            field: "node.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        // join() 會取代最後一段路徑，所以 base 需要以 '/' 結尾
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.node_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ModelError::InvalidConfigValueError {
                field: "path".to_string(),
                value: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn read_payload(response: Response) -> Result<Value> {
        let status = response.status();
        tracing::debug!("Node response status: {}", status);

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // 錯誤回應的 body 依 Error model 解讀，無法解讀時保留原文
        let body = response.text().await?;
        let reason = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|raw| models::Error::from_wire(&raw).ok())
            .and_then(|error| error.reason)
            .unwrap_or(body);

        tracing::warn!("Node request failed with {}: {}", status, reason);
        Err(ModelError::HttpStatus {
            status: status.as_u16(),
            reason,
        })
    }
}

#[async_trait]
impl PayloadSource for HttpPayloadSource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_payload(response).await
    }

    async fn submit(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::read_payload(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_api_prefix() {
        let source = HttpPayloadSource::new("http://127.0.0.1:3013/v2", Duration::from_secs(5)).unwrap();
        assert_eq!(source.base_url().as_str(), "http://127.0.0.1:3013/v2/");
        assert_eq!(
            source.endpoint("/top").unwrap().as_str(),
            "http://127.0.0.1:3013/v2/top"
        );
        assert_eq!(
            source.endpoint("block/height/3").unwrap().as_str(),
            "http://127.0.0.1:3013/v2/block/height/3"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(HttpPayloadSource::new("ftp://node", Duration::from_secs(5)).is_err());
    }
}
