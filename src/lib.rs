//! Typed models and a schema-driven codec for the Aeternity Epoch REST API.
//!
//! Every API schema object is described once in [`crate::core::catalog`] and
//! registered in a process-wide immutable [`Registry`]. The generic [`Codec`]
//! turns raw JSON payloads into validated [`ModelInstance`]s and back, and the
//! [`models`] module offers one serde-backed Rust type per schema on top of it.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod models;
pub mod utils;

pub use crate::config::TomlConfig;
pub use crate::core::codec::{construct, from_wire, to_wire, Codec};
pub use crate::core::registry::{registry, Registry};
pub use crate::core::union::UnionPolicy;
pub use crate::domain::model::{FieldValue, ModelInstance};
pub use crate::domain::ports::{ConfigProvider, PayloadSource};
pub use crate::models::TypedModel;
pub use crate::utils::error::{ModelError, Result, ValidationError, ViolationKind};
