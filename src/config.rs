//! Persisted defaults for both front-ends
//!
//! Stored as TOML in the platform config directory, e.g.
//! `~/.config/deskjobs/config.toml` on Linux or
//! `%APPDATA%\deskjobs\config\config.toml` on Windows.
//! The UI pre-fills its form from these values and writes them back after a
//! run has been validated and started.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::upscale::Scale;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub upscale: UpscaleSettings,
    pub ocr: OcrSettings,
}

/// Raw (unvalidated) upscaler form values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpscaleSettings {
    pub exe_path: String,
    pub models_dir: String,
    pub input_path: String,
    pub output_dir: String,
    pub model_name: String,
    pub scale: Scale,
}

impl Default for UpscaleSettings {
    fn default() -> Self {
        Self {
            exe_path: "realesrgan-ncnn-vulkan".to_string(),
            models_dir: "models".to_string(),
            input_path: "input".to_string(),
            output_dir: "results".to_string(),
            model_name: crate::upscale::MODELS[0].to_string(),
            scale: Scale::Auto,
        }
    }
}

/// Raw (unvalidated) OCR watcher form values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
    pub pattern: String,
    pub threshold: String,
    pub page_seg_mode: String,
    pub interval_ms: String,
    pub whitelist: String,
    pub require_digit: bool,
    pub copy_to_clipboard: bool,
    pub tesseract_path: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            left: "0".to_string(),
            top: "0".to_string(),
            width: "400".to_string(),
            height: "120".to_string(),
            pattern: r"\b[A-Z0-9]{5,7}\b".to_string(),
            threshold: "150".to_string(),
            page_seg_mode: "6".to_string(),
            interval_ms: "1000".to_string(),
            whitelist: crate::ocr::DEFAULT_WHITELIST.to_string(),
            require_digit: true,
            copy_to_clipboard: true,
            tesseract_path: "tesseract".to_string(),
        }
    }
}

impl Settings {
    /// Location of the config file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load settings, falling back to defaults if the file is missing or broken
    pub fn load() -> Self {
        match Self::config_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Load settings, writing a default file first if none exists
    pub fn load_or_create() -> Self {
        if let Ok(path) = Self::config_path() {
            if !path.exists() {
                if let Err(e) = Self::default().save_to(&path) {
                    tracing::warn!(error = %e, "could not create default config");
                }
            }
        }
        Self::load()
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "deskjobs").context("Could not determine home directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.upscale.exe_path = "/opt/esrgan/realesrgan-ncnn-vulkan".into();
        settings.upscale.scale = Scale::X4;
        settings.ocr.pattern = "[0-9]{4}".into();
        settings.ocr.require_digit = false;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[upscale]\nmodel_name = \"realesrgan-x4plus-anime\"\n").unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.upscale.model_name, "realesrgan-x4plus-anime");
        assert_eq!(loaded.upscale.scale, Scale::Auto);
        assert_eq!(loaded.ocr, OcrSettings::default());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
