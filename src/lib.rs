//! Deskjobs library crate
//!
//! Two terminal utilities built on one worker/UI bridge: a batch front-end for
//! the Real-ESRGAN upscaler and a screen-region OCR watcher.

pub mod bridge;
pub mod cancel;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod ocr;
pub mod shell;
pub mod tui;
pub mod upscale;
pub mod worker;
