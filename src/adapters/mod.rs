// Adapters layer: glue between a payload source and the schema codec.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpPayloadSource;

use crate::core::codec::Codec;
use crate::domain::model::ModelInstance;
use crate::domain::ports::PayloadSource;
use crate::models::TypedModel;
use crate::utils::error::Result;
use serde_json::Value;

/// Fetch `path` and decode it as `T`.
pub async fn fetch_model<T, S>(source: &S, path: &str) -> Result<T>
where
    T: TypedModel,
    S: PayloadSource + ?Sized,
{
    let raw = source.fetch(path).await?;
    T::from_wire(&raw)
}

/// Fetch `path` and decode it as the schema named at runtime.
pub async fn fetch_instance<S>(
    source: &S,
    codec: &Codec<'_>,
    path: &str,
    schema: &str,
) -> Result<ModelInstance>
where
    S: PayloadSource + ?Sized,
{
    // 先確認 schema 存在，避免白白發出請求
    codec.lookup(schema)?;
    let raw = source.fetch(path).await?;
    codec.from_wire(schema, &raw)
}

/// Encode `body` and post it to `path`; the raw reply is returned undecoded.
pub async fn submit_model<T, S>(source: &S, path: &str, body: &T) -> Result<Value>
where
    T: TypedModel,
    S: PayloadSource + ?Sized,
{
    let payload = body.to_wire()?;
    source.submit(path, &payload).await
}
