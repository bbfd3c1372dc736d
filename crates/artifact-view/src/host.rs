//! Host capabilities
//!
//! The viewer never touches the page or the clipboard itself; it asks the
//! embedding application through [`Host`]. Hosts are shared handles, so
//! methods take `&self`.

use crate::error::HostError;
use parking_lot::Mutex;
use std::fmt::Debug;

/// Page-level scrolling state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageScroll {
    /// Page scrolls normally
    #[default]
    Auto,
    /// Page scrolling suspended (an artifact is expanded to full viewport)
    Locked,
}

/// Capabilities the embedding application provides
pub trait Host: Send + Sync + Debug {
    /// Suspend or restore page-level scrolling
    fn set_page_scroll(&self, scroll: PageScroll);

    /// Copy text to the system clipboard
    ///
    /// # Errors
    /// [`HostError::Clipboard`] if the clipboard is unavailable
    fn write_clipboard(&self, text: &str) -> Result<(), HostError>;
}

/// In-memory host for headless use
///
/// Remembers the page scroll state and the last copied text.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    state: Mutex<HeadlessState>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    page_scroll: PageScroll,
    clipboard: Option<String>,
}

impl HeadlessHost {
    /// Create host with page scrolling enabled and an empty clipboard
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page scroll state
    #[must_use]
    pub fn page_scroll(&self) -> PageScroll {
        self.state.lock().page_scroll
    }

    /// Last text written to the clipboard
    #[must_use]
    pub fn clipboard(&self) -> Option<String> {
        self.state.lock().clipboard.clone()
    }
}

impl Host for HeadlessHost {
    fn set_page_scroll(&self, scroll: PageScroll) {
        self.state.lock().page_scroll = scroll;
    }

    fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        self.state.lock().clipboard = Some(text.to_string());
        Ok(())
    }
}
