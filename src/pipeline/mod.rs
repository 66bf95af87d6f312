//! Debounced, single-flight conversion controller.
//!
//! Input events arm a timer; only the last event of a burst reaches the
//! converter. While one conversion runs, further triggers are dropped rather
//! than queued. Every finished conversion overwrites the output.

mod converter;
mod session;
pub mod status;

pub use converter::{Conversion, ConvertOptions, Converter, Notice};
pub use session::{ProcessingGuard, Session};
pub use status::{ConsoleSurface, Status, StatusKind, Surface};

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::providers::{Analyzer, TranslationService};
use crate::transliterator::AnalyzerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input was empty; the output was cleared.
    Cleared,
    /// Same text as last time; nothing scheduled.
    Unchanged,
    /// A conversion is scheduled after the typing delay.
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Empty,
    Failed,
}

pub struct Pipeline<T, A, S> {
    inner: Arc<Inner<T, A, S>>,
}

struct Inner<T, A, S> {
    converter: Converter<T, A>,
    surface: S,
    session: Session,
    typing_delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T, A, S> Clone for Pipeline<T, A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, A, S> Pipeline<T, A, S>
where
    T: TranslationService + 'static,
    A: Analyzer + 'static,
    S: Surface + 'static,
{
    pub fn new(converter: Converter<T, A>, surface: S, typing_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                converter,
                surface,
                session: Session::new(),
                typing_delay,
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn converter(&self) -> &Converter<T, A> {
        &self.inner.converter
    }

    pub async fn initialize(&self) -> AnalyzerState {
        self.show_status(Status::busy(status::INITIALIZING));
        let state = self.inner.converter.analyzer().initialize().await;
        match state {
            AnalyzerState::Ready => self.show_status(Status::success(status::READY)),
            _ => self.show_status(Status::failed(status::INIT_FAILED)),
        }
        state
    }

    /// Handles one input event. Must be called inside a tokio runtime.
    pub fn on_input(&self, raw: &str) -> InputOutcome {
        let text = raw.trim();
        if text.is_empty() {
            self.cancel_pending();
            self.inner.session.forget_input();
            self.inner.session.set_output("");
            self.inner.surface.show_output("");
            return InputOutcome::Cleared;
        }
        if !self.inner.session.remember_input(text) {
            return InputOutcome::Unchanged;
        }
        debug!("input changed: {}", text);
        self.show_status(Status::busy(status::PREPARING));

        let pipeline = self.clone();
        let text = text.to_string();
        let delay = self.inner.typing_delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // aborting the timer must not cancel a conversion already running
            let run = tokio::spawn(async move {
                pipeline.trigger(&text).await;
            });
            let _ = run.await;
        });
        if let Some(previous) = self.lock_pending().replace(timer) {
            previous.abort();
        }
        InputOutcome::Scheduled
    }

    /// Runs one conversion unless another is already in flight.
    pub async fn trigger(&self, text: &str) -> Option<Conversion> {
        let Some(_guard) = self.inner.session.try_begin() else {
            debug!("conversion already running; dropping trigger");
            return None;
        };
        self.show_status(Status::busy(status::CONVERTING));
        let conversion = self.inner.converter.convert(text).await;
        info!(
            "converted {:?} -> {:?} (notices: {:?})",
            conversion.source, conversion.output, conversion.notices
        );
        self.inner.session.set_output(&conversion.output);
        self.inner.surface.show_output(&conversion.output);
        self.show_status(conversion.status());
        Some(conversion)
    }

    /// Converts immediately, skipping the typing delay.
    pub async fn convert_now(&self, raw: &str) -> Option<Conversion> {
        let text = raw.trim();
        if text.is_empty() {
            self.show_status(Status::failed(status::EMPTY_INPUT));
            return None;
        }
        self.cancel_pending();
        self.inner.session.remember_input(text);
        self.trigger(text).await
    }

    /// Waits for the scheduled conversion, if any, to finish.
    pub async fn flush(&self) {
        let pending = self.lock_pending().take();
        if let Some(handle) = pending {
            let _ = handle.await;
        }
    }

    pub fn copy_output<C: Clipboard + ?Sized>(&self, clipboard: &C) -> CopyOutcome {
        let output = self.inner.session.output();
        if output.is_empty() {
            self.show_status(Status::failed(status::NOTHING_TO_COPY));
            return CopyOutcome::Empty;
        }
        match clipboard.write_text(&output) {
            Ok(()) => {
                self.show_status(Status::success(status::COPIED));
                CopyOutcome::Copied
            }
            Err(err) => {
                warn!("clipboard write failed: {}", err);
                self.show_status(Status::failed(status::COPY_FAILED));
                CopyOutcome::Failed
            }
        }
    }

    fn cancel_pending(&self) {
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn show_status(&self, status: Status) {
        self.inner.surface.show_status(&status);
    }
}
