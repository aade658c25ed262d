//! Screen OCR watcher front-end

use std::path::PathBuf;
use std::sync::Arc;

use ratatui::Frame;

use crate::config::{OcrSettings, Settings};
use crate::ocr::{
    run_watch, ClipboardSink, FrameSource, ScreenCapture, SystemClipboard, TesseractCli,
    TextRecognizer, WatchJob, WatchServices,
};
use crate::shell::Session;
use crate::worker::StartError;

use super::form::{Field, Form};
use super::{screens, TuiApp};

const LEFT: usize = 0;
const TOP: usize = 1;
const WIDTH: usize = 2;
const HEIGHT: usize = 3;
const PATTERN: usize = 4;
const THRESHOLD: usize = 5;
const MODE: usize = 6;
const INTERVAL: usize = 7;
const WHITELIST: usize = 8;
const REQUIRE_DIGIT: usize = 9;
const CLIPBOARD: usize = 10;
const TESSERACT: usize = 11;

/// Capture, recognition and clipboard backends.
#[derive(Clone)]
pub struct OcrBackends {
    pub source: Arc<dyn FrameSource>,
    pub clipboard: Arc<dyn ClipboardSink>,
    /// Fixed recognizer; `None` runs tesseract from the path in the form
    pub recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl Default for OcrBackends {
    fn default() -> Self {
        Self {
            source: Arc::new(ScreenCapture),
            clipboard: Arc::new(SystemClipboard),
            recognizer: None,
        }
    }
}

pub struct OcrApp {
    pub(crate) session: Session,
    pub(crate) form: Form,
    pub(crate) tick: u64,
    settings: Settings,
    config_path: Option<PathBuf>,
    backends: OcrBackends,
}

impl OcrApp {
    pub fn new(settings: Settings, config_path: Option<PathBuf>) -> Self {
        Self::with_backends(settings, config_path, OcrBackends::default())
    }

    pub fn with_backends(
        settings: Settings,
        config_path: Option<PathBuf>,
        backends: OcrBackends,
    ) -> Self {
        let s = &settings.ocr;
        let form = Form::new(vec![
            Field::text("Left", s.left.clone()),
            Field::text("Top", s.top.clone()),
            Field::text("Width", s.width.clone()),
            Field::text("Height", s.height.clone()),
            Field::text("Pattern", s.pattern.clone()),
            Field::text("Threshold", s.threshold.clone()),
            Field::text("Mode", s.page_seg_mode.clone()),
            Field::text("Interval (ms)", s.interval_ms.clone()),
            Field::text("Allowed chars", s.whitelist.clone()),
            Field::toggle("Require digit", s.require_digit),
            Field::toggle("Copy to clipboard", s.copy_to_clipboard),
            Field::text("Tesseract", s.tesseract_path.clone()),
        ]);
        Self {
            session: Session::new("Idle"),
            form,
            tick: 0,
            settings,
            config_path,
            backends,
        }
    }

    pub fn form_values(&self) -> OcrSettings {
        OcrSettings {
            left: self.form.value(LEFT).to_string(),
            top: self.form.value(TOP).to_string(),
            width: self.form.value(WIDTH).to_string(),
            height: self.form.value(HEIGHT).to_string(),
            pattern: self.form.value(PATTERN).to_string(),
            threshold: self.form.value(THRESHOLD).to_string(),
            page_seg_mode: self.form.value(MODE).to_string(),
            interval_ms: self.form.value(INTERVAL).to_string(),
            whitelist: self.form.value(WHITELIST).to_string(),
            require_digit: self.form.is_on(REQUIRE_DIGIT),
            copy_to_clipboard: self.form.is_on(CLIPBOARD),
            tesseract_path: self.form.value(TESSERACT).to_string(),
        }
    }

    fn persist(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            tracing::warn!(error = %e, "could not save settings");
        }
    }
}

impl TuiApp for OcrApp {
    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    fn form(&mut self) -> &mut Form {
        &mut self.form
    }

    fn start(&mut self) {
        if self.session.is_busy() {
            self.session.inform("Info", StartError::AlreadyRunning);
            return;
        }

        let values = self.form_values();
        let job = match WatchJob::validate(&values) {
            Ok(job) => job,
            Err(e) => {
                tracing::info!(error = %e, "watcher settings rejected");
                self.session.show_error("Invalid settings", e);
                return;
            }
        };

        let recognizer = match &self.backends.recognizer {
            Some(fixed) => Arc::clone(fixed),
            None => {
                let program = values.tesseract_path.trim();
                let program = if program.is_empty() { "tesseract" } else { program };
                Arc::new(TesseractCli::new(program)) as Arc<dyn TextRecognizer>
            }
        };

        self.settings.ocr = values;
        self.persist();

        let source = Arc::clone(&self.backends.source);
        let clipboard = Arc::clone(&self.backends.clipboard);
        self.session
            .start("ocr-watcher", "Watching...", move |cancel, out| {
                let services = WatchServices {
                    source: source.as_ref(),
                    recognizer: recognizer.as_ref(),
                    clipboard: clipboard.as_ref(),
                };
                run_watch(&job, &services, cancel, out)
            });
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    fn render(&self, f: &mut Frame) {
        screens::ocr::render(f, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{CaptureError, RecognizeError, RecognizeSettings, Region};
    use crate::shell::{NoticeKind, WorkerState};
    use image::{GrayImage, Rgba, RgbaImage};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct WhiteScreen;

    impl FrameSource for WhiteScreen {
        fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError> {
            Ok(RgbaImage::from_pixel(region.width, region.height, Rgba([255, 255, 255, 255])))
        }
    }

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(
            &self,
            _frame: &GrayImage,
            _settings: &RecognizeSettings,
        ) -> Result<String, RecognizeError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct Clip(Mutex<Vec<String>>);

    impl ClipboardSink for Clip {
        fn set_text(&self, text: &str) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.ocr.width = "16".into();
        settings.ocr.height = "8".into();
        settings.ocr.interval_ms = "50".into();
        settings
    }

    #[test]
    fn test_form_round_trips_settings() {
        let settings = settings();
        let app = OcrApp::new(settings.clone(), None);
        assert_eq!(app.form_values(), settings.ocr);
    }

    #[test]
    fn test_bad_region_shows_error() {
        let mut settings = settings();
        settings.ocr.width = "wide".into();
        let mut app = OcrApp::new(settings, None);
        app.start();

        let notice = app.session.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.contains("Width"));
        assert_eq!(app.session.state.worker, WorkerState::Idle);
    }

    #[test]
    fn test_watch_finds_code_and_copies_it() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let clip = Arc::new(Clip::default());
        let backends = OcrBackends {
            source: Arc::new(WhiteScreen),
            clipboard: clip.clone(),
            recognizer: Some(Arc::new(FixedText("thank you ab12cd7"))),
        };
        let mut app = OcrApp::with_backends(settings(), Some(config.clone()), backends);

        app.start();
        app.session.wait_for_worker();
        app.session.tick();

        let state = &app.session.state;
        assert_eq!(state.worker, WorkerState::Completed);
        assert_eq!(state.found.as_deref(), Some("AB12CD7"));
        assert_eq!(state.preview, "THANK YOU AB12CD7");
        assert_eq!(clip.0.lock().unwrap().as_slice(), ["AB12CD7".to_string()]);
        assert!(config.exists());
    }
}
