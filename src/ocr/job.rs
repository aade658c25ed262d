//! Validated watcher configuration

use std::str::FromStr;
use std::time::Duration;

use crate::config::OcrSettings;
use crate::error::ConfigError;

use super::matcher::CodeMatcher;

/// Screen rectangle in virtual-desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Recognition parameters handed to the OCR engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeSettings {
    /// Tesseract page segmentation mode (0-13)
    pub page_seg_mode: u8,
    /// Characters the engine may emit
    pub whitelist: String,
}

/// Everything the watcher needs for one run.
#[derive(Debug, Clone)]
pub struct WatchJob {
    pub region: Region,
    pub matcher: CodeMatcher,
    /// Luma cut-off: pixels above become white, the rest black
    pub threshold: u8,
    pub recognize: RecognizeSettings,
    pub poll_interval: Duration,
    pub copy_to_clipboard: bool,
}

fn parse_in_range<T>(field: &'static str, raw: &str, min: i64, max: i64) -> Result<T, ConfigError>
where
    T: FromStr + Into<i64> + Copy,
{
    let value: T = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        field,
        value: raw.trim().to_string(),
    })?;
    let wide: i64 = value.into();
    if wide < min || wide > max {
        return Err(ConfigError::OutOfRange { field, min, max });
    }
    Ok(value)
}

impl WatchJob {
    pub fn validate(form: &OcrSettings) -> Result<Self, ConfigError> {
        let left: i32 = parse_in_range("Left", &form.left, i32::MIN as i64, i32::MAX as i64)?;
        let top: i32 = parse_in_range("Top", &form.top, i32::MIN as i64, i32::MAX as i64)?;
        let width: u32 = parse_in_range("Width", &form.width, 0, 16_384)?;
        let height: u32 = parse_in_range("Height", &form.height, 0, 16_384)?;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyRegion);
        }

        let threshold: u8 = parse_in_range("Threshold", &form.threshold, 0, 255)?;
        let page_seg_mode: u8 = parse_in_range("Mode", &form.page_seg_mode, 0, 13)?;
        let interval_ms: u32 = parse_in_range("Interval", &form.interval_ms, 50, 600_000)?;

        let whitelist: String = form
            .whitelist
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        if whitelist.is_empty() {
            return Err(ConfigError::EmptyWhitelist);
        }

        if form.pattern.trim().is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        let matcher = CodeMatcher::new(form.pattern.trim(), form.require_digit)?;

        Ok(Self {
            region: Region {
                left,
                top,
                width,
                height,
            },
            matcher,
            threshold,
            recognize: RecognizeSettings {
                page_seg_mode,
                whitelist,
            },
            poll_interval: Duration::from_millis(interval_ms as u64),
            copy_to_clipboard: form.copy_to_clipboard,
        })
    }
}
