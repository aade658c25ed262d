//! Where a found code ends up

use anyhow::Result;

pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// The system clipboard. A fresh handle is opened for every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        use anyhow::Context;

        let mut clipboard = arboard::Clipboard::new().context("clipboard init failed")?;
        clipboard
            .set_text(text.to_string())
            .context("clipboard write failed")
    }
}

#[cfg(not(feature = "clipboard"))]
impl ClipboardSink for SystemClipboard {
    fn set_text(&self, _text: &str) -> Result<()> {
        anyhow::bail!("clipboard support is not compiled in")
    }
}
