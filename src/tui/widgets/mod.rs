//! Reusable TUI widgets

pub mod log_view;
pub mod notice;
pub mod progress;
pub mod shortcuts;

pub use log_view::*;
pub use notice::*;
pub use progress::*;
pub use shortcuts::*;
