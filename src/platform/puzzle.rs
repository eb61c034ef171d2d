//! Puzzle popup window (WASM only)
//!
//! The puzzle is a separate page opened with `window.open`. It reports its
//! result through LocalStorage; the scene only needs to know when it closes.

use web_sys::Window;

use crate::progress::PuzzleHandle;

/// Handle to an open puzzle window
pub struct PuzzleWindow {
    handle: Window,
    close_reported: bool,
}

impl PuzzleWindow {
    /// Open the puzzle page. `None` when the popup was blocked.
    pub fn open(url: &str, name: &str, features: &str) -> Option<Self> {
        let window = web_sys::window()?;
        match window.open_with_url_and_target_and_features(url, name, features) {
            Ok(Some(handle)) => {
                log::info!("Opened puzzle window '{}'", url);
                Some(Self {
                    handle,
                    close_reported: false,
                })
            }
            Ok(None) => {
                log::warn!("Puzzle window was blocked by the browser");
                None
            }
            Err(e) => {
                log::warn!("Could not open puzzle window: {:?}", e);
                None
            }
        }
    }
}

impl PuzzleHandle for PuzzleWindow {
    /// Polled from the frame loop: an `unload` listener on a fresh popup
    /// fires as soon as its initial blank document is replaced.
    fn poll_closed(&mut self) -> bool {
        if self.close_reported {
            return false;
        }
        // A window we can no longer query is as good as closed
        if self.handle.closed().unwrap_or(true) {
            self.close_reported = true;
            return true;
        }
        false
    }

    fn focus(&self) {
        let _ = self.handle.focus();
    }
}
