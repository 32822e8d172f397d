//! Navigator that records instead of navigating
//!
//! The event bridge drains it after every event and hands the URLs to the
//! frontend, which performs the actual navigation.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

use crate::collaborators::Navigator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "url", rename_all = "snake_case")]
pub enum Navigation {
    Replace(String),
    Open(String),
}

/// Clones share one log, so a clone can be handed to the controller while
/// the caller keeps another to drain it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    log: Rc<RefCell<Vec<Navigation>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded since the last call
    pub fn take(&self) -> Vec<Navigation> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&mut self, url: &str) {
        tracing::info!(url, "Navigating");
        self.log.borrow_mut().push(Navigation::Replace(url.to_string()));
    }

    fn open(&mut self, url: &str) {
        tracing::info!(url, "Opening tab");
        self.log.borrow_mut().push(Navigation::Open(url.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let navigator = RecordingNavigator::new();
        let mut handle = navigator.clone();

        handle.replace("https://a.test");
        handle.open("https://b.test");

        assert_eq!(
            navigator.take(),
            vec![
                Navigation::Replace("https://a.test".to_string()),
                Navigation::Open("https://b.test".to_string()),
            ]
        );
        assert!(navigator.take().is_empty());
    }
}
