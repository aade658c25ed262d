//! Running the external upscaler
//!
//! [`ToolRunner`] is the seam between the batch loop and real processes so the
//! loop can be driven by a scripted runner in tests.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully built command line: program plus arguments, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Space-joined rendering for logs. Not shell-quoted.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// How a finished invocation exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Captured stderr, trimmed
    pub stderr: String,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches external tools synchronously.
pub trait ToolRunner: Send + Sync {
    /// Run the invocation to completion. `Err` means it could not be launched.
    fn run(&self, invocation: &Invocation) -> io::Result<ExitReport>;

    /// Combined stdout and stderr of `<program> -h`.
    fn help_text(&self, program: &Path) -> io::Result<String>;
}

/// [`ToolRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ExitReport> {
        tracing::debug!(command = %invocation.command_line(), "launching upscaler");
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ExitReport {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn help_text(&self, program: &Path) -> io::Result<String> {
        let output = Command::new(program)
            .arg("-h")
            .stdin(Stdio::null())
            .output()?;

        Ok(format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_joins_args() {
        let inv = Invocation::new("/opt/esrgan/upscaler")
            .arg("-i")
            .arg("/in/a.png")
            .arg("-n")
            .arg("realesrgan-x4plus");
        assert_eq!(
            inv.command_line(),
            "/opt/esrgan/upscaler -i /in/a.png -n realesrgan-x4plus"
        );
    }

    #[test]
    fn test_exit_report_success_only_on_zero() {
        let ok = ExitReport { code: Some(0), stderr: String::new() };
        let bad = ExitReport { code: Some(2), stderr: "x".into() };
        let killed = ExitReport { code: None, stderr: String::new() };
        assert!(ok.success());
        assert!(!bad.success());
        assert!(!killed.success());
    }

    #[test]
    fn test_process_runner_launch_failure_is_err() {
        let inv = Invocation::new("/definitely/not/a/real/tool-binary");
        assert!(ProcessRunner.run(&inv).is_err());
        assert!(ProcessRunner.help_text(Path::new("/definitely/not/a/real/tool-binary")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_exit_code_and_stderr() {
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-upscaler.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = \"-h\" ]; then echo 'usage: -i in -o out -s scale'; exit 0; fi\necho 'model not found' >&2\nexit 2\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let report = ProcessRunner.run(&Invocation::new(&script).arg("-i")).unwrap();
        assert_eq!(report.code, Some(2));
        assert_eq!(report.stderr, "model not found");

        let help = ProcessRunner.help_text(&script).unwrap();
        assert!(help.contains("-s scale"));
    }
}
