// src/pipeline/validate.rs

use crate::error::Result;
use crate::logging::Logger;
use crate::models::Config;

/// Validate configuration and list what would be monitored.
pub fn run_validate(config: &Config, logger: &Logger) -> Result<()> {
    logger.header("Validating configuration");

    if let Err(e) = config.validate() {
        logger.error(&format!("Config validation failed: {}", e));
        return Err(e);
    }

    logger.info("✓ Config OK");
    logger.sub_item(&format!("Data directory: {}", config.paths.data_dir.display()));
    logger.sub_item(&format!(
        "Store files: {}, {}",
        config.paths.hash_file, config.paths.content_file
    ));
    logger.sub_item(&format!(
        "Minimum content length: {}",
        config.monitor.min_content_length
    ));
    logger.sub_item(&format!("Page timeout: {}s", config.fetch.timeout_secs));
    for target in config.targets()? {
        logger.sub_item(&format!("{} → {}", target.name, target.url));
    }
    Ok(())
}
