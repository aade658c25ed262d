//! The batch loop: one synchronous upscaler call per image

use std::path::{Path, PathBuf};

use crate::bridge::Publisher;
use crate::cancel::CancellationFlag;
use crate::events::{ItemOutcome, ProgressEvent, RunSummary, TerminalState};
use crate::worker::RunOutcome;

use super::collect::collect_images;
use super::job::UpscaleJob;
use super::probe::supports_scale_arg;
use super::run_log::RunLog;
use super::runner::{Invocation, ToolRunner};

const OUTPUT_SUFFIX: &str = "_upscaled";

/// `<stem>_upscaled.<ext>` inside `output_dir`
pub fn output_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    output_dir.join(name)
}

/// Build the upscaler command line for one image
pub fn build_invocation(
    job: &UpscaleJob,
    source: &Path,
    target: &Path,
    scale_supported: bool,
) -> Invocation {
    let mut inv = Invocation::new(&job.exe_path)
        .arg("-i")
        .arg(source)
        .arg("-o")
        .arg(target)
        .arg("-n")
        .arg(&job.model_name);

    if let Some(models_dir) = &job.models_dir {
        inv = inv.arg("-m").arg(models_dir);
    }

    if let (Some(scale), true) = (job.scale.arg(), scale_supported) {
        inv = inv.arg("-s").arg(scale);
    }
    inv
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_one(runner: &dyn ToolRunner, invocation: &Invocation, target: &Path) -> ItemOutcome {
    match runner.run(invocation) {
        Ok(report) if report.success() => ItemOutcome::Succeeded {
            output: target.to_path_buf(),
        },
        Ok(report) => ItemOutcome::Failed {
            error: report.stderr,
            code: report.code,
        },
        Err(e) => ItemOutcome::Failed {
            error: e.to_string(),
            code: None,
        },
    }
}

/// Process every image of `job`, stopping early if `cancel` is raised.
///
/// Per-item failures are recorded and the loop moves on. Only setup problems
/// (unreadable input folder, unwritable run log) end the run as `Failed`.
pub fn run_batch(
    job: &UpscaleJob,
    runner: &dyn ToolRunner,
    cancel: &CancellationFlag,
    out: &Publisher,
) -> RunOutcome {
    let images = match collect_images(&job.input_path) {
        Ok(images) => images,
        Err(e) => {
            tracing::error!(error = %e, "cannot collect input images");
            out.publish(ProgressEvent::error(format!("{:#}", e)));
            return RunOutcome::failed("Cannot read input");
        }
    };

    let total = images.len();
    if total == 0 {
        out.publish(ProgressEvent::info("No images found to process."));
        out.publish(ProgressEvent::info("Processing finished: 0/0 succeeded"));
        return RunOutcome {
            state: TerminalState::Completed,
            summary: RunSummary {
                status: "No images found".to_string(),
                ..RunSummary::default()
            },
        };
    }

    let scale_supported = match job.scale.arg() {
        Some(_) => {
            let supported = supports_scale_arg(runner, &job.exe_path);
            if !supported {
                out.publish(ProgressEvent::warning(
                    "This build does not support -s; using the model's default scale.",
                ));
            }
            supported
        }
        None => false,
    };

    let mut run_log = match RunLog::open(&job.output_dir) {
        Ok(log) => log,
        Err(e) => {
            tracing::error!(error = %e, "cannot open run log");
            out.publish(ProgressEvent::error(format!("{:#}", e)));
            return RunOutcome::failed("Cannot write run log");
        }
    };
    let mut log_ok = run_log.begin_run(job).is_ok();

    tracing::info!(total, input = %job.input_path.display(), "batch started");

    let mut processed = 0;
    let mut succeeded = 0;
    let mut cancelled = false;

    for (idx, source) in images.iter().enumerate() {
        if cancel.is_cancelled() {
            out.publish(ProgressEvent::warning("Processing stopped."));
            cancelled = true;
            break;
        }
        let index = idx + 1;

        let target = output_path(source, &job.output_dir);
        let invocation = build_invocation(job, source, &target, scale_supported);

        out.publish(ProgressEvent::info(format!(
            "[{}/{}] Processing: {}",
            index,
            total,
            file_name(source)
        )));
        log_ok &= run_log
            .item(index, total, source, &invocation.command_line())
            .is_ok();

        let outcome = run_one(runner, &invocation, &target);
        processed += 1;

        match &outcome {
            ItemOutcome::Succeeded { output } => {
                succeeded += 1;
                out.publish(ProgressEvent::success(format!("Done: {}", file_name(output))));
            }
            ItemOutcome::Failed { code, .. } => {
                let reason = outcome.failure_reason().unwrap_or_default();
                tracing::warn!(input = %source.display(), ?code, %reason, "upscale failed");
                out.publish(ProgressEvent::error(format!("Failed: {}", file_name(source))));
                out.publish(ProgressEvent::error(format!("   {}", reason)));
            }
        }
        log_ok &= run_log.outcome(&outcome).is_ok();

        out.publish(ProgressEvent::ItemFinished {
            index,
            total,
            outcome,
        });
        out.publish(ProgressEvent::Progress { processed, total });
        out.publish(ProgressEvent::Status(format!("{}/{} processed", index, total)));
    }

    let (state, status, closing) = if cancelled {
        (
            TerminalState::Cancelled,
            format!("Stopped: {}/{}", succeeded, total),
            format!(
                "Processing cancelled: {}/{} succeeded ({} processed)",
                succeeded, total, processed
            ),
        )
    } else {
        (
            TerminalState::Completed,
            format!("Finished: {}/{}", succeeded, total),
            format!("Processing finished: {}/{} succeeded", succeeded, total),
        )
    };

    let summary = RunSummary {
        total,
        processed,
        succeeded,
        status,
    };
    log_ok &= run_log.summary(&summary).is_ok();
    if !log_ok {
        out.publish(ProgressEvent::warning(format!(
            "Some entries could not be written to {}",
            run_log.path().display()
        )));
    }

    out.publish(ProgressEvent::info(closing));
    RunOutcome { state, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge;
    use crate::upscale::run_log::RUN_LOG_FILE;
    use crate::upscale::runner::testing::{Scripted, ScriptedRunner};
    use crate::upscale::Scale;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        job: UpscaleJob,
    }

    fn fixture(images: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        for name in images {
            fs::write(input.join(name), b"img").unwrap();
        }
        Fixture {
            job: UpscaleJob {
                exe_path: PathBuf::from("/tools/upscaler"),
                models_dir: None,
                input_path: input,
                output_dir: output,
                model_name: "realesrgan-x4plus".into(),
                scale: Scale::Auto,
            },
            _dir: dir,
        }
    }

    fn item_events(events: &[ProgressEvent]) -> Vec<(usize, ItemOutcome)> {
        events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::ItemFinished { index, outcome, .. } => {
                    Some((*index, outcome.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_output_path_keeps_extension() {
        let out = output_path(Path::new("/in/cat.JPG"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/cat_upscaled.JPG"));
        let bare = output_path(Path::new("/in/noext"), Path::new("/out"));
        assert_eq!(bare, PathBuf::from("/out/noext_upscaled"));
    }

    #[test]
    fn test_build_invocation_optional_args() {
        let fx = fixture(&[]);
        let mut job = fx.job.clone();
        let src = Path::new("/in/a.png");
        let dst = Path::new("/out/a_upscaled.png");

        let plain = build_invocation(&job, src, dst, true);
        assert_eq!(
            plain.command_line(),
            "/tools/upscaler -i /in/a.png -o /out/a_upscaled.png -n realesrgan-x4plus"
        );

        job.models_dir = Some(PathBuf::from("/tools/models"));
        job.scale = Scale::X2;
        let full = build_invocation(&job, src, dst, true);
        assert!(full.command_line().ends_with("-m /tools/models -s 2"));

        let unsupported = build_invocation(&job, src, dst, false);
        assert!(!unsupported.command_line().contains("-s"));
    }

    #[test]
    fn test_all_items_then_single_summary() {
        let fx = fixture(&["a.png", "b.jpg", "c.webp"]);
        let runner = ScriptedRunner::new(None, vec![]);
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &CancellationFlag::new(), &publisher);
        let events = drain.drain_all();

        assert_eq!(outcome.state, TerminalState::Completed);
        assert_eq!(outcome.summary.total, 3);
        assert_eq!(outcome.summary.processed, 3);
        assert_eq!(outcome.summary.succeeded, 3);
        assert_eq!(outcome.summary.status, "Finished: 3/3");

        let items = item_events(&events);
        assert_eq!(items.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(items.iter().all(|(_, o)| o.is_success()));
        assert_eq!(runner.invocations().len(), 3);
    }

    #[test]
    fn test_progress_reaches_one_hundred() {
        let fx = fixture(&["a.png", "b.png", "c.png"]);
        let runner = ScriptedRunner::new(None, vec![]);
        let (publisher, drain) = bridge::channel();
        run_batch(&fx.job, &runner, &CancellationFlag::new(), &publisher);

        let percents: Vec<u16> = drain
            .drain_all()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Progress { processed, total } => {
                    Some(ProgressEvent::percent(*processed, *total))
                }
                _ => None,
            })
            .collect();
        assert_eq!(percents, vec![33, 66, 100]);
    }

    #[test]
    fn test_cancel_before_item_k() {
        // Flag raised while item 2 runs, so item 3 must never start
        let fx = fixture(&["a.png", "b.png", "c.png", "d.png"]);
        let cancel = CancellationFlag::new();
        let runner = ScriptedRunner::new(
            None,
            vec![
                Scripted::Exit(0, ""),
                Scripted::SucceedThenCancel(cancel.clone()),
            ],
        );
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &cancel, &publisher);
        let events = drain.drain_all();

        assert_eq!(outcome.state, TerminalState::Cancelled);
        assert_eq!(outcome.summary.total, 4);
        assert_eq!(outcome.summary.processed, 2);
        assert!(outcome.summary.processed < outcome.summary.total);
        assert_eq!(item_events(&events).len(), 2);
        assert_eq!(runner.invocations().len(), 2);

        let log = fs::read_to_string(fx.job.output_dir.join(RUN_LOG_FILE)).unwrap();
        assert!(!log.contains("c.png"));
        assert!(log.contains("Summary: 2/4 succeeded"));
    }

    #[test]
    fn test_cancel_before_first_item() {
        let fx = fixture(&["a.png"]);
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let runner = ScriptedRunner::new(None, vec![]);
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &cancel, &publisher);
        assert_eq!(outcome.state, TerminalState::Cancelled);
        assert_eq!(outcome.summary.processed, 0);
        assert!(item_events(&drain.drain_all()).is_empty());
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_failing_item_is_recorded_and_loop_continues() {
        let fx = fixture(&["a.png", "b.png"]);
        let runner = ScriptedRunner::new(
            None,
            vec![Scripted::Exit(2, "model not found"), Scripted::Exit(0, "")],
        );
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &CancellationFlag::new(), &publisher);
        let events = drain.drain_all();

        assert_eq!(outcome.state, TerminalState::Completed);
        assert_eq!(outcome.summary.succeeded, 1);
        assert_eq!(outcome.summary.total, 2);

        let failures: Vec<_> = item_events(&events)
            .into_iter()
            .filter(|(_, o)| !o.is_success())
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].1,
            ItemOutcome::Failed {
                error: "model not found".into(),
                code: Some(2),
            }
        );

        let log = fs::read_to_string(fx.job.output_dir.join(RUN_LOG_FILE)).unwrap();
        assert_eq!(log.matches("STATUS: FAILED").count(), 1);
        assert!(log.contains("ERROR: model not found"));
        assert!(log.contains("Summary: 1/2 succeeded"));
    }

    #[test]
    fn test_launch_failure_counts_as_failed_item() {
        let fx = fixture(&["a.png"]);
        let runner = ScriptedRunner::new(None, vec![Scripted::LaunchError("tool not found")]);
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &CancellationFlag::new(), &publisher);
        assert_eq!(outcome.summary.succeeded, 0);
        assert_eq!(outcome.summary.processed, 1);
        let items = item_events(&drain.drain_all());
        assert!(matches!(&items[0].1, ItemOutcome::Failed { error, code: None } if error.contains("tool not found")));
    }

    #[test]
    fn test_silent_failure_writes_no_error_line() {
        let fx = fixture(&["a.png"]);
        let runner = ScriptedRunner::new(None, vec![Scripted::Exit(3, "")]);
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &CancellationFlag::new(), &publisher);
        assert_eq!(outcome.summary.succeeded, 0);

        let events = drain.drain_all();
        assert_eq!(
            item_events(&events)[0].1,
            ItemOutcome::Failed {
                error: String::new(),
                code: Some(3),
            }
        );
        // the UI still gets a reason
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::Log(line) if line.text == "   exited with code 3"
        )));

        let log = fs::read_to_string(fx.job.output_dir.join(RUN_LOG_FILE)).unwrap();
        assert!(log.contains("STATUS: FAILED\n\nSummary: 0/1 succeeded"));
        assert!(!log.contains("ERROR:"));
    }

    #[test]
    fn test_empty_input_completes_with_zero_summary() {
        let fx = fixture(&["notes.txt"]);
        let runner = ScriptedRunner::new(None, vec![]);
        let (publisher, drain) = bridge::channel();

        let outcome = run_batch(&fx.job, &runner, &CancellationFlag::new(), &publisher);
        assert_eq!(outcome.state, TerminalState::Completed);
        assert_eq!(outcome.summary, RunSummary {
            status: "No images found".into(),
            ..RunSummary::default()
        });
        let events = drain.drain_all();
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::Log(l) if l.text.contains("0/0 succeeded"))));
    }

    #[test]
    fn test_unsupported_scale_warns_and_omits_flag() {
        let fx = fixture(&["a.png"]);
        let mut job = fx.job.clone();
        job.scale = Scale::X4;
        let runner = ScriptedRunner::new(Some("usage: -i -o -n"), vec![]);
        let (publisher, drain) = bridge::channel();

        run_batch(&job, &runner, &CancellationFlag::new(), &publisher);
        let events = drain.drain_all();

        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::Log(l) if l.level == crate::events::LogLevel::Warning && l.text.contains("-s")
        )));
        let args = &runner.invocations()[0].args;
        assert!(!args.iter().any(|a| a == "-s"));
    }

    #[test]
    fn test_supported_scale_passes_flag() {
        let fx = fixture(&["a.png"]);
        let mut job = fx.job.clone();
        job.scale = Scale::X2;
        let runner = ScriptedRunner::new(Some("  -s scale  upscale ratio"), vec![]);
        let (publisher, _drain) = bridge::channel();

        run_batch(&job, &runner, &CancellationFlag::new(), &publisher);
        assert!(runner.invocations()[0].command_line().ends_with("-s 2"));
    }

    #[test]
    fn test_missing_input_dir_fails_run() {
        let fx = fixture(&[]);
        let mut job = fx.job.clone();
        job.input_path = job.input_path.join("gone");
        let runner = ScriptedRunner::new(None, vec![]);
        let (publisher, _drain) = bridge::channel();

        let outcome = run_batch(&job, &runner, &CancellationFlag::new(), &publisher);
        assert_eq!(outcome.state, TerminalState::Failed);
        assert!(runner.invocations().is_empty());
    }
}
