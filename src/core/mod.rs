pub mod catalog;
pub mod codec;
pub mod registry;
pub mod union;

pub use crate::domain::model::{FieldValue, ModelInstance};
pub use crate::domain::schema::{FieldSpec, FieldType, SchemaDescriptor, SchemaKind};
pub use crate::utils::error::Result;
pub use codec::Codec;
pub use registry::{registry, Registry};
pub use union::UnionPolicy;
