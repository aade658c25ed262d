//! Screen-region OCR watcher
//!
//! Polls a rectangle of the screen, thresholds it, runs tesseract over it and
//! stops at the first code matching the configured pattern.

pub mod capture;
pub mod clipboard;
pub mod job;
pub mod matcher;
pub mod recognize;
pub mod watch;

/// Characters tesseract may emit by default.
pub const DEFAULT_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub use capture::{binarize, CaptureError, FrameSource, ScreenCapture};
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use job::{RecognizeSettings, Region, WatchJob};
pub use matcher::{normalize, CodeMatcher};
pub use recognize::{RecognizeError, TesseractCli, TextRecognizer};
pub use watch::{run_watch, scan_once, WatchServices};
