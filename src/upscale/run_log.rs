//! Append-only run log kept next to the upscaled images
//!
//! Each run appends one section:
//!
//! ```text
//! ======================================================================
//! Run at: 2024-05-01 10:00:00
//! Model: realesrgan-x4plus | Scale: Auto
//! Input: /photos
//! Output: /photos/out
//!
//! [1/2] INPUT: /photos/a.png
//! CMD: realesrgan-ncnn-vulkan -i /photos/a.png -o /photos/out/a_upscaled.png -n realesrgan-x4plus
//! STATUS: SUCCESS
//!
//! Summary: 1/2 succeeded
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::events::{ItemOutcome, RunSummary, TIMESTAMP_FORMAT};

use super::job::UpscaleJob;

pub const RUN_LOG_FILE: &str = "log.txt";
const SEPARATOR_WIDTH: usize = 70;

/// Writer for one run's section. Only the worker thread touches it.
pub struct RunLog {
    file: File,
    path: PathBuf,
}

impl RunLog {
    /// Open (or create) `log.txt` inside `output_dir` for appending
    pub fn open(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(RUN_LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open run log: {}", path.display()))?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Separator, timestamp and configuration summary
    pub fn begin_run(&mut self, job: &UpscaleJob) -> io::Result<()> {
        writeln!(self.file)?;
        writeln!(self.file, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(self.file, "Run at: {}", Local::now().format(TIMESTAMP_FORMAT))?;
        writeln!(self.file, "Model: {} | Scale: {}", job.model_name, job.scale)?;
        writeln!(self.file, "Input: {}", job.input_path.display())?;
        writeln!(self.file, "Output: {}", job.output_dir.display())?;
        self.file.flush()
    }

    /// Header of one item block, written before the tool runs
    pub fn item(&mut self, index: usize, total: usize, input: &Path, command_line: &str) -> io::Result<()> {
        writeln!(self.file)?;
        writeln!(self.file, "[{}/{}] INPUT: {}", index, total, input.display())?;
        writeln!(self.file, "CMD: {}", command_line)?;
        self.file.flush()
    }

    /// Status line (and error text on failure) closing an item block
    pub fn outcome(&mut self, outcome: &ItemOutcome) -> io::Result<()> {
        match outcome {
            ItemOutcome::Succeeded { .. } => writeln!(self.file, "STATUS: SUCCESS")?,
            ItemOutcome::Failed { error, .. } => {
                writeln!(self.file, "STATUS: FAILED")?;
                if !error.is_empty() {
                    writeln!(self.file, "ERROR: {}", error)?;
                }
            }
        }
        self.file.flush()
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.file)?;
        writeln!(self.file, "{}", summary.line())?;
        self.file.flush()
    }
}
