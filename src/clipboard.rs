use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use copypasta::{ClipboardContext, ClipboardProvider};
use std::io::{self, Write};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard write failed: {0}")]
    Io(#[from] io::Error),
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard rejected the text: {0}")]
    WriteFailed(String),
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Sets the terminal clipboard through an OSC 52 escape sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Osc52Clipboard<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        write!(writer, "\x1b]52;c;{}\x07", BASE64.encode(text.as_bytes()))?;
        writer.flush()?;
        Ok(())
    }
}

/// The desktop clipboard. The context is opened on first write and kept, so
/// the selection stays owned while the process runs.
#[derive(Default)]
pub struct SystemClipboard {
    context: Mutex<Option<ClipboardContext>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut context = self
            .context
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if context.is_none() {
            let opened = ClipboardContext::new()
                .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
            debug!("clipboard context opened");
            *context = Some(opened);
        }
        let Some(context) = context.as_mut() else {
            return Err(ClipboardError::Unavailable("no clipboard context".to_string()));
        };
        context
            .set_contents(text.to_string())
            .map_err(|err| ClipboardError::WriteFailed(err.to_string()))
    }
}
