use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-controller conversion state: the last seen input, the single-flight
/// flag and the currently displayed output.
#[derive(Debug, Default)]
pub struct Session {
    last_input: Mutex<String>,
    processing: AtomicBool,
    output: Mutex<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `text` as the latest input. Returns `false` when it is unchanged.
    pub fn remember_input(&self, text: &str) -> bool {
        let mut last = lock(&self.last_input);
        if *last == text {
            return false;
        }
        *last = text.to_string();
        true
    }

    pub fn forget_input(&self) {
        lock(&self.last_input).clear();
    }

    pub fn last_input(&self) -> String {
        lock(&self.last_input).clone()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Claims the single-flight slot; `None` while another conversion runs.
    pub fn try_begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ProcessingGuard { session: self })
    }

    pub fn output(&self) -> String {
        lock(&self.output).clone()
    }

    pub(crate) fn set_output(&self, text: &str) {
        let mut output = lock(&self.output);
        output.clear();
        output.push_str(text);
    }
}

/// Releases the processing flag on drop.
#[derive(Debug)]
pub struct ProcessingGuard<'a> {
    session: &'a Session,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.session.processing.store(false, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_input_is_detected() {
        let session = Session::new();
        assert!(session.remember_input("abc"));
        assert!(!session.remember_input("abc"));
        assert!(session.remember_input("abcd"));
        session.forget_input();
        assert!(session.remember_input("abcd"));
        assert_eq!(session.last_input(), "abcd");
    }

    #[test]
    fn only_one_guard_at_a_time() {
        let session = Session::new();
        let guard = session.try_begin().expect("first");
        assert!(session.is_processing());
        assert!(session.try_begin().is_none());
        drop(guard);
        assert!(!session.is_processing());
        assert!(session.try_begin().is_some());
    }

    #[test]
    fn output_is_overwritten() {
        let session = Session::new();
        session.set_output("イチ");
        session.set_output("ニ");
        assert_eq!(session.output(), "ニ");
    }
}
