// src/pipeline/validate.rs

use tracing::{error, info};

use crate::error::Result;
use crate::models::Config;

/// Validate configuration values.
pub fn run_validate(config: &Config) -> Result<()> {
    match config.validate() {
        Ok(()) => {
            info!("Config OK");
            info!("    backend: {:?}", config.storage.backend);
            info!("    local_root: {}", config.storage.local_root);
            info!("    bucket: {}", config.storage.bucket);
            info!("    page_size: {}", config.storage.page_size);
            info!(
                "    request_timeout_secs: {}",
                config.service.request_timeout_secs
            );
            Ok(())
        }
        Err(e) => {
            error!("Config validation failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_validate() {
        assert!(run_validate(&Config::default()).is_ok());

        let mut config = Config::default();
        config.storage.page_size = 0;
        assert!(run_validate(&config).is_err());
    }
}
