//! Text recognition through the tesseract command-line tool

use image::{GrayImage, ImageFormat};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

use super::job::RecognizeSettings;

#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("could not encode frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("could not run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("recognizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Turns a binarized frame into best-effort text.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, frame: &GrayImage, settings: &RecognizeSettings)
        -> Result<String, RecognizeError>;
}

/// Runs `tesseract stdin stdout`, piping the frame in as PNG.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    pub program: PathBuf,
    pub language: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }
}

impl TesseractCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn args(&self, settings: &RecognizeSettings) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--psm".to_string(),
            settings.page_seg_mode.to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", settings.whitelist),
        ]
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(
        &self,
        frame: &GrayImage,
        settings: &RecognizeSettings,
    ) -> Result<String, RecognizeError> {
        let mut png = Vec::new();
        frame.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let launch = |source| RecognizeError::Launch {
            program: self.program.display().to_string(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(self.args(settings))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(launch)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).map_err(launch)?;
        }
        let output = child.wait_with_output().map_err(launch)?;

        if !output.status.success() {
            return Err(RecognizeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
