use crate::config::toml_config::LoggingConfig;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("epoch_models={}", level)))
}

/// Install the compact logger; returns false when a global subscriber already exists.
pub fn init_logger(verbose: bool) -> bool {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("epoch_models=debug,info"))
    } else {
        filter_for("info")
    };

    // try_init: embedding applications may already own the global subscriber
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
    report(installed)
}

pub fn init_json_logger(level: &str) -> bool {
    let installed = tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init();
    report(installed)
}

fn report(installed: Result<(), TryInitError>) -> bool {
    match installed {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Keeping the existing global subscriber: {}", e);
            false
        }
    }
}

pub fn init_from_config(config: &LoggingConfig) -> bool {
    let level = config.level();
    if config.json.unwrap_or(false) {
        init_json_logger(level)
    } else {
        init_logger(level == "debug" || level == "trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LoggingConfig {
            level: Some("debug".to_string()),
            json: Some(true),
        };
        init_from_config(&config);
        // 全域 subscriber 已存在，再次初始化只回報 false
        assert!(!init_logger(false));
        assert!(!init_from_config(&LoggingConfig::default()));
        tracing::debug!("logger initialised twice");
    }
}
