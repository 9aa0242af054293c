use crate::core::codec::Codec;
use crate::core::union::UnionPolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ModelError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3013/v2";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub node: NodeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub union_policy: UnionPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ModelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ModelError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NODE_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ModelError::ConfigError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("node.base_url", &self.node.base_url)?;

        if let Some(timeout) = self.node.timeout_seconds {
            validate_range("node.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(level) = &self.logging.level {
            validate_non_empty_string("logging.level", level)?;
            validate_one_of("logging.level", level, LOG_LEVELS)?;
        }

        Ok(())
    }

    /// 以此配置的 union 策略建立 codec
    pub fn codec(&self) -> Codec<'static> {
        Codec::default().with_policy(self.codec.union_policy)
    }
}

impl ConfigProvider for TomlConfig {
    fn union_policy(&self) -> UnionPolicy {
        self.codec.union_policy
    }

    fn node_base_url(&self) -> &str {
        &self.node.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.node.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[codec]
union_policy = "first_match"

[logging]
level = "debug"
json = true

[node]
base_url = "https://node.example.com/v2"
timeout_seconds = 10
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.union_policy(), UnionPolicy::FirstMatch);
        assert_eq!(config.codec().policy(), UnionPolicy::FirstMatch);
        assert_eq!(config.logging.level(), "debug");
        assert_eq!(config.node_base_url(), "https://node.example.com/v2");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.union_policy(), UnionPolicy::Strict);
        assert_eq!(config.node_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EPOCH_MODELS_TEST_NODE", "https://test.node.com/v2");

        let toml_content = r#"
[node]
base_url = "${EPOCH_MODELS_TEST_NODE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.node.base_url, "https://test.node.com/v2");

        std::env::remove_var("EPOCH_MODELS_TEST_NODE");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[node]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());

        let bad_policy = TomlConfig::from_toml_str("[codec]\nunion_policy = \"any\"\n");
        assert!(matches!(bad_policy, Err(ModelError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[codec]\nunion_policy = \"strict\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.union_policy(), UnionPolicy::Strict);
    }
}
