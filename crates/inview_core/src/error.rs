//! Configuration error taxonomy
//!
//! All configuration problems surface at setup time, never during an
//! animation. A missing viewport capability is deliberately NOT an error:
//! the observer degrades to treating every element as visible, because
//! hiding content is the worse failure mode.

use thiserror::Error;

/// Errors raised while configuring an observation or reveal
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The preset name is not one of the known motion presets
    #[error("unknown motion preset `{0}`")]
    UnknownPreset(String),

    /// Reveal delay must be finite and non-negative
    #[error("invalid reveal delay {0} ms (must be finite and >= 0)")]
    InvalidDelay(f32),

    /// Intersection threshold must be a fraction of the element's area
    #[error("invalid intersection threshold {0} (must be within 0.0..=1.0)")]
    InvalidThreshold(f32),
}

impl ConfigError {
    /// Validate a delay in milliseconds
    pub fn check_delay(delay_ms: f32) -> Result<f32, ConfigError> {
        if !delay_ms.is_finite() || delay_ms < 0.0 {
            return Err(ConfigError::InvalidDelay(delay_ms));
        }
        Ok(delay_ms)
    }

    /// Validate an intersection threshold fraction
    pub fn check_threshold(threshold: f32) -> Result<f32, ConfigError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_delay() {
        assert_eq!(ConfigError::check_delay(0.0), Ok(0.0));
        assert_eq!(ConfigError::check_delay(300.0), Ok(300.0));
        assert!(ConfigError::check_delay(-1.0).is_err());
        assert!(ConfigError::check_delay(f32::NAN).is_err());
        assert!(ConfigError::check_delay(f32::INFINITY).is_err());
    }

    #[test]
    fn test_check_threshold() {
        assert_eq!(ConfigError::check_threshold(0.0), Ok(0.0));
        assert_eq!(ConfigError::check_threshold(0.1), Ok(0.1));
        assert_eq!(ConfigError::check_threshold(1.0), Ok(1.0));
        assert!(ConfigError::check_threshold(1.5).is_err());
        assert!(ConfigError::check_threshold(-0.1).is_err());
        assert!(ConfigError::check_threshold(f32::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::UnknownPreset("zoom".into());
        assert_eq!(err.to_string(), "unknown motion preset `zoom`");
    }
}
