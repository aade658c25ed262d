//! The polling loop: capture, binarize, recognize, match, repeat

use std::thread;
use std::time::{Duration, Instant};

use crate::bridge::Publisher;
use crate::cancel::CancellationFlag;
use crate::events::{ProgressEvent, RunSummary, TerminalState};
use crate::worker::RunOutcome;

use super::capture::{binarize, FrameSource};
use super::clipboard::ClipboardSink;
use super::job::WatchJob;
use super::matcher::normalize;
use super::recognize::TextRecognizer;

const PAUSE_SLICE: Duration = Duration::from_millis(50);

/// External collaborators of the watcher.
pub struct WatchServices<'a> {
    pub source: &'a dyn FrameSource,
    pub recognizer: &'a dyn TextRecognizer,
    pub clipboard: &'a dyn ClipboardSink,
}

/// One capture + recognize cycle, returning normalized text.
pub fn scan_once(job: &WatchJob, services: &WatchServices<'_>) -> anyhow::Result<String> {
    let frame = services.source.capture(&job.region)?;
    let bw = binarize(&frame, job.threshold);
    let raw = services.recognizer.recognize(&bw, &job.recognize)?;
    Ok(normalize(&raw, &job.recognize.whitelist))
}

/// Sleep up to `interval`, waking early once `cancel` is raised.
fn pause(interval: Duration, cancel: &CancellationFlag) {
    let deadline = Instant::now() + interval;
    loop {
        let now = Instant::now();
        if now >= deadline || cancel.is_cancelled() {
            return;
        }
        thread::sleep((deadline - now).min(PAUSE_SLICE));
    }
}

/// Poll the region until a match is found or the user stops the run.
///
/// The flag is checked before every cycle. At most one match is reported;
/// finding it ends the run as `Completed`.
pub fn run_watch(
    job: &WatchJob,
    services: &WatchServices<'_>,
    cancel: &CancellationFlag,
    out: &Publisher,
) -> RunOutcome {
    tracing::info!(
        pattern = job.matcher.pattern(),
        left = job.region.left,
        top = job.region.top,
        width = job.region.width,
        height = job.region.height,
        "watch started"
    );

    let mut cycles = 0usize;
    let mut last_error: Option<String> = None;

    loop {
        if cancel.is_cancelled() {
            out.publish(ProgressEvent::warning("Watching stopped."));
            out.publish(ProgressEvent::info(format!(
                "Watching finished: 0/{} succeeded",
                cycles
            )));
            return RunOutcome {
                state: TerminalState::Cancelled,
                summary: RunSummary {
                    total: cycles,
                    processed: cycles,
                    succeeded: 0,
                    status: format!("Stopped after {} scans", cycles),
                },
            };
        }

        cycles += 1;
        out.publish(ProgressEvent::Status(format!("Scanning... ({})", cycles)));

        match scan_once(job, services) {
            Ok(text) => {
                last_error = None;
                out.publish(ProgressEvent::Preview(text.clone()));

                if let Some(code) = job.matcher.find(&text) {
                    tracing::info!(%code, cycles, "match found");
                    out.publish(ProgressEvent::MatchFound(code.clone()));
                    out.publish(ProgressEvent::success(format!("Match found: {}", code)));

                    if job.copy_to_clipboard {
                        match services.clipboard.set_text(&code) {
                            Ok(()) => out.publish(ProgressEvent::info("Copied to clipboard.")),
                            Err(e) => out.publish(ProgressEvent::warning(format!(
                                "Could not copy to clipboard: {:#}",
                                e
                            ))),
                        }
                    }

                    out.publish(ProgressEvent::info(format!(
                        "Watching finished: 1/{} succeeded",
                        cycles
                    )));
                    return RunOutcome {
                        state: TerminalState::Completed,
                        summary: RunSummary {
                            total: cycles,
                            processed: cycles,
                            succeeded: 1,
                            status: format!("Found: {}", code),
                        },
                    };
                }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                if last_error.as_deref() != Some(message.as_str()) {
                    tracing::warn!(error = %message, cycles, "scan cycle failed");
                    out.publish(ProgressEvent::warning(format!("Scan failed: {}", message)));
                }
                last_error = Some(message);
            }
        }

        pause(job.poll_interval, cancel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge;
    use crate::config::OcrSettings;
    use crate::ocr::capture::CaptureError;
    use crate::ocr::job::{RecognizeSettings, Region};
    use crate::ocr::recognize::RecognizeError;
    use image::{GrayImage, RgbaImage};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct BlankScreen {
        captures: Mutex<usize>,
        fail: bool,
    }

    impl BlankScreen {
        fn new() -> Self {
            Self { captures: Mutex::new(0), fail: false }
        }
    }

    impl FrameSource for BlankScreen {
        fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError> {
            *self.captures.lock().unwrap() += 1;
            if self.fail {
                return Err(CaptureError::Backend("display unavailable".into()));
            }
            Ok(RgbaImage::new(region.width, region.height))
        }
    }

    /// Returns scripted text per cycle, then an empty string forever.
    /// Raises `cancel_after` (if set) once the script is exhausted.
    struct ScriptedOcr {
        texts: Mutex<VecDeque<&'static str>>,
        cancel_after: Option<CancellationFlag>,
    }

    impl TextRecognizer for ScriptedOcr {
        fn recognize(
            &self,
            _frame: &GrayImage,
            _settings: &RecognizeSettings,
        ) -> Result<String, RecognizeError> {
            let next = self.texts.lock().unwrap().pop_front();
            match next {
                Some(text) => Ok(text.to_string()),
                None => {
                    if let Some(flag) = &self.cancel_after {
                        flag.cancel();
                    }
                    Ok(String::new())
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        copied: Mutex<Vec<String>>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&self, text: &str) -> anyhow::Result<()> {
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl ClipboardSink for BrokenClipboard {
        fn set_text(&self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("no display")
        }
    }

    fn job() -> WatchJob {
        let form = OcrSettings {
            width: "8".into(),
            height: "4".into(),
            interval_ms: "50".into(),
            ..OcrSettings::default()
        };
        let mut job = WatchJob::validate(&form).unwrap();
        job.poll_interval = Duration::from_millis(1);
        job
    }

    fn ocr(texts: Vec<&'static str>, cancel_after: Option<CancellationFlag>) -> ScriptedOcr {
        ScriptedOcr {
            texts: Mutex::new(texts.into()),
            cancel_after,
        }
    }

    #[test]
    fn test_match_stops_loop_and_copies() {
        let screen = BlankScreen::new();
        let recognizer = ocr(
            vec!["loading", "thank you for playing code ab12cd7 today", "ZZ99ZZ9"],
            None,
        );
        let clipboard = RecordingClipboard::default();
        let services = WatchServices {
            source: &screen,
            recognizer: &recognizer,
            clipboard: &clipboard,
        };
        let (publisher, drain) = bridge::channel();

        let outcome = run_watch(&job(), &services, &CancellationFlag::new(), &publisher);
        let events = drain.drain_all();

        assert_eq!(outcome.state, TerminalState::Completed);
        assert_eq!(outcome.summary.succeeded, 1);
        assert_eq!(outcome.summary.processed, 2);
        assert_eq!(*screen.captures.lock().unwrap(), 2);

        let matches: Vec<&String> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::MatchFound(code) => Some(code),
                _ => None,
            })
            .collect();
        assert_eq!(matches, vec!["AB12CD7"]);
        assert_eq!(*clipboard.copied.lock().unwrap(), vec!["AB12CD7".to_string()]);

        let previews: Vec<&String> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Preview(text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(previews, vec!["LOADING", "THANK YOU FOR PLAYING CODE AB12CD7 TODAY"]);
    }

    #[test]
    fn test_cancel_checked_before_first_capture() {
        let screen = BlankScreen::new();
        let recognizer = ocr(vec!["AB12CD7"], None);
        let clipboard = RecordingClipboard::default();
        let services = WatchServices {
            source: &screen,
            recognizer: &recognizer,
            clipboard: &clipboard,
        };
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let (publisher, drain) = bridge::channel();

        let outcome = run_watch(&job(), &services, &cancel, &publisher);
        assert_eq!(outcome.state, TerminalState::Cancelled);
        assert_eq!(outcome.summary.processed, 0);
        assert_eq!(*screen.captures.lock().unwrap(), 0);
        assert!(!drain
            .drain_all()
            .iter()
            .any(|e| matches!(e, ProgressEvent::MatchFound(_))));
    }

    #[test]
    fn test_cancel_mid_run_finishes_current_cycle_only() {
        let screen = BlankScreen::new();
        let cancel = CancellationFlag::new();
        let recognizer = ocr(vec!["nothing", "still nothing"], Some(cancel.clone()));
        let clipboard = RecordingClipboard::default();
        let services = WatchServices {
            source: &screen,
            recognizer: &recognizer,
            clipboard: &clipboard,
        };
        let (publisher, _drain) = bridge::channel();

        let outcome = run_watch(&job(), &services, &cancel, &publisher);
        // Third cycle raises the flag during recognition; no fourth capture
        assert_eq!(outcome.state, TerminalState::Cancelled);
        assert_eq!(outcome.summary.processed, 3);
        assert_eq!(*screen.captures.lock().unwrap(), 3);
        assert!(clipboard.copied.lock().unwrap().is_empty());
    }

    #[test]
    fn test_capture_errors_are_reported_once_and_loop_continues() {
        let screen = BlankScreen {
            captures: Mutex::new(0),
            fail: true,
        };
        let cancel = CancellationFlag::new();
        let recognizer = ocr(vec![], None);
        let clipboard = RecordingClipboard::default();
        let services = WatchServices {
            source: &screen,
            recognizer: &recognizer,
            clipboard: &clipboard,
        };
        let (publisher, drain) = bridge::channel();

        let stopper = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            stopper.cancel();
        });
        let outcome = run_watch(&job(), &services, &cancel, &publisher);
        handle.join().unwrap();

        assert_eq!(outcome.state, TerminalState::Cancelled);
        assert!(*screen.captures.lock().unwrap() >= 1);
        let failures = drain
            .drain_all()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Log(l) if l.text.starts_with("Scan failed")))
            .count();
        assert_eq!(failures, 1);
    }

    #[test]
    fn test_clipboard_failure_is_only_a_warning() {
        let screen = BlankScreen::new();
        let recognizer = ocr(vec!["CODE AB12CD7"], None);
        let services = WatchServices {
            source: &screen,
            recognizer: &recognizer,
            clipboard: &BrokenClipboard,
        };
        let (publisher, drain) = bridge::channel();

        let outcome = run_watch(&job(), &services, &CancellationFlag::new(), &publisher);
        assert_eq!(outcome.state, TerminalState::Completed);
        assert!(drain.drain_all().iter().any(|e| matches!(
            e,
            ProgressEvent::Log(l) if l.level == crate::events::LogLevel::Warning && l.text.contains("clipboard")
        )));
    }

    #[test]
    fn test_pause_returns_early_when_cancelled() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let started = Instant::now();
        pause(Duration::from_secs(5), &cancel);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
