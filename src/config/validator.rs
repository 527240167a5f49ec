use crate::config::{Config, TimingConfig};
use crate::error::{Error, Result};

/// Validates the base domain generated addresses are built on
pub fn validate_base_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::ConfigInvalid("Base domain is empty".to_string()));
    }

    for label in domain.split('.') {
        let valid = !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(Error::ConfigInvalid(format!(
                "Base domain '{}' is not a valid hostname",
                domain
            )));
        }
    }

    Ok(())
}

/// Validates tick length and transition delays
pub fn validate_timing(timing: &TimingConfig) -> Result<()> {
    if timing.tick_millis == 0 {
        return Err(Error::ConfigInvalid("tickMillis must be positive".to_string()));
    }
    if timing.start_ticks == 0 || timing.stop_ticks == 0 {
        return Err(Error::ConfigInvalid(
            "startTicks and stopTicks must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Full configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_domain(&config.base_domain)?;
    validate_timing(&config.timing)?;

    if config.event_history == 0 {
        return Err(Error::ConfigInvalid("eventHistory must be positive".to_string()));
    }

    Ok(())
}
