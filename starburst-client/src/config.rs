use anyhow::{Context, Result};
use starburst_shared::Settings;
use std::fs;
use std::path::Path;

/// Read settings from a JSON file, or fall back to the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings = Settings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

/// Command-line flags win over whatever the settings file says.
pub fn apply_overrides(mut settings: Settings, speed: Option<f32>, prevent_slide: bool) -> Settings {
    if let Some(speed) = speed {
        settings.speed = speed;
    }
    if prevent_slide {
        settings.prevent_slide = true;
    }
    settings
}

pub fn validate_surface(width: f32, height: f32) -> Result<()> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        anyhow::bail!("Surface must have a positive size, got {}x{}", width, height);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_settings(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings"));
    }

    #[test]
    fn test_overrides() {
        let base = Settings {
            speed: 3.0,
            prevent_slide: true,
        };
        assert_eq!(apply_overrides(base, None, false), base);

        let changed = apply_overrides(Settings::default(), Some(5.0), true);
        assert_eq!(changed.speed, 5.0);
        assert!(changed.prevent_slide);
    }

    #[test]
    fn test_validate_surface() {
        assert!(validate_surface(500.0, 500.0).is_ok());
        assert!(validate_surface(0.0, 500.0).is_err());
        assert!(validate_surface(500.0, f32::NAN).is_err());
    }
}
