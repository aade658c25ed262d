//! Validated upscaler job configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::UpscaleSettings;
use crate::error::ConfigError;

/// Models shipped with the Real-ESRGAN ncnn release.
pub const MODELS: &[&str] = &["realesrgan-x4plus", "realesrgan-x4plus-anime"];

/// Requested output scale. `Auto` leaves the model's native scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scale {
    #[default]
    Auto,
    #[serde(rename = "2")]
    X2,
    #[serde(rename = "4")]
    X4,
}

/// Scale choices as shown in the form
pub const SCALE_LABELS: &[&str] = &["Auto", "2", "4"];

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::Auto, Scale::X2, Scale::X4];

    pub fn from_label(label: &str) -> Option<Scale> {
        Scale::ALL.into_iter().find(|s| s.label() == label.trim())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scale::Auto => "Auto",
            Scale::X2 => "2",
            Scale::X4 => "4",
        }
    }

    /// Value for the `-s` argument, if one should be passed
    pub fn arg(&self) -> Option<&'static str> {
        match self {
            Scale::Auto => None,
            other => Some(other.label()),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the batch worker needs. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpscaleJob {
    pub exe_path: PathBuf,
    /// Only set when the folder exists; otherwise `-m` is omitted
    pub models_dir: Option<PathBuf>,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub model_name: String,
    pub scale: Scale,
}

/// A job that passed validation plus advisory notes for the log.
#[derive(Debug)]
pub struct ValidatedJob {
    pub job: UpscaleJob,
    pub warnings: Vec<String>,
}

impl UpscaleJob {
    /// Check the form values and build a job.
    ///
    /// Creates the output folder as a side effect. A missing models folder is
    /// only a warning.
    pub fn validate(form: &UpscaleSettings) -> Result<ValidatedJob, ConfigError> {
        let exe_path = PathBuf::from(form.exe_path.trim());
        let models_dir = PathBuf::from(form.models_dir.trim());
        let input_path = PathBuf::from(form.input_path.trim());
        let output_raw = form.output_dir.trim();

        if form.exe_path.trim().is_empty() || !exe_path.is_file() {
            return Err(ConfigError::InvalidExecutable(exe_path));
        }

        if form.input_path.trim().is_empty() || !input_path.exists() {
            return Err(ConfigError::MissingInput(input_path));
        }

        if output_raw.is_empty() {
            return Err(ConfigError::MissingOutput);
        }
        let output_dir = PathBuf::from(output_raw);

        let mut warnings = Vec::new();
        let models_dir = if !form.models_dir.trim().is_empty() && models_dir.is_dir() {
            Some(models_dir)
        } else {
            warnings.push("Models folder not found; running the tool without -m.".to_string());
            None
        };

        ensure_dir(&output_dir)?;

        Ok(ValidatedJob {
            job: UpscaleJob {
                exe_path,
                models_dir,
                input_path,
                output_dir,
                model_name: form.model_name.clone(),
                scale: form.scale,
            },
            warnings,
        })
    }
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(path).map_err(|source| ConfigError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}
