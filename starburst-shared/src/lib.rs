use serde::{Deserialize, Serialize};
use starburst_core::MotionConfig;
use thiserror::Error;

/// Value the speed dropdown is set to on startup
pub const DEFAULT_SPEED_CHOICE: &str = "2";

/// Value the slide-prevention dropdown is set to on startup
pub const DEFAULT_PREVENT_SLIDE_CHOICE: &str = "0";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("speed must be a number, got {0:?}")]
    InvalidSpeed(String),

    #[error("speed must be finite and non-negative, got {0}")]
    SpeedOutOfRange(f32),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-facing animation settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub speed: f32,
    pub prevent_slide: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let config = MotionConfig::default();
        Self {
            speed: config.speed,
            prevent_slide: config.prevent_slide,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        validate_speed(settings.speed)?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Settings> for MotionConfig {
    fn from(settings: Settings) -> Self {
        MotionConfig::new(settings.speed, settings.prevent_slide)
    }
}

/// Accept only finite, non-negative speeds.
pub fn validate_speed(speed: f32) -> Result<f32, SettingsError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(speed)
    } else {
        Err(SettingsError::SpeedOutOfRange(speed))
    }
}

/// Parse the value of the speed dropdown.
pub fn parse_speed(value: &str) -> Result<f32, SettingsError> {
    let speed = value
        .trim()
        .parse::<f32>()
        .map_err(|_| SettingsError::InvalidSpeed(value.to_string()))?;
    validate_speed(speed)
}

/// Parse the value of the slide-prevention dropdown. Only a value equal to
/// one turns prevention on.
pub fn parse_prevent_slide(value: &str) -> bool {
    value.trim().parse::<f64>().map_or(false, |v| v == 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_motion_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.speed, 2.0);
        assert!(!settings.prevent_slide);
        assert_eq!(MotionConfig::from(settings), MotionConfig::default());
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed(DEFAULT_SPEED_CHOICE).unwrap(), 2.0);
        assert_eq!(parse_speed(" 0.5 ").unwrap(), 0.5);
        assert_eq!(parse_speed("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_speed_rejects_bad_values() {
        assert!(matches!(parse_speed("abc"), Err(SettingsError::InvalidSpeed(_))));
        assert!(matches!(parse_speed(""), Err(SettingsError::InvalidSpeed(_))));
        assert!(matches!(parse_speed("-1"), Err(SettingsError::SpeedOutOfRange(_))));
        assert!(matches!(parse_speed("inf"), Err(SettingsError::SpeedOutOfRange(_))));
        assert!(matches!(parse_speed("NaN"), Err(SettingsError::SpeedOutOfRange(_))));
    }

    #[test]
    fn test_parse_prevent_slide() {
        assert!(parse_prevent_slide("1"));
        assert!(parse_prevent_slide("1.0"));
        assert!(!parse_prevent_slide(DEFAULT_PREVENT_SLIDE_CHOICE));
        assert!(!parse_prevent_slide(""));
        assert!(!parse_prevent_slide("yes"));
        assert!(!parse_prevent_slide("2"));
    }

    #[test]
    fn test_settings_json() {
        let settings = Settings::from_json(r#"{"speed": 4.0, "prevent_slide": true}"#).unwrap();
        assert_eq!(
            settings,
            Settings {
                speed: 4.0,
                prevent_slide: true
            }
        );

        let partial = Settings::from_json(r#"{"prevent_slide": true}"#).unwrap();
        assert_eq!(partial.speed, 2.0);

        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_settings_json_rejects_negative_speed() {
        let err = Settings::from_json(r#"{"speed": -3.0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::SpeedOutOfRange(_)));
        assert!(Settings::from_json("not json").is_err());
    }
}
