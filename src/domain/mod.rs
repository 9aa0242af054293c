// Domain layer: schema descriptors, validated instances and the transport port.

pub mod model;
pub mod ports;
pub mod schema;
