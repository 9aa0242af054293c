pub mod toml_config;

pub use toml_config::{CodecConfig, LoggingConfig, NodeConfig, TomlConfig};
