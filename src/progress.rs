//! Puzzle session flags
//!
//! Persisted to LocalStorage so the puzzle page (a separate document) can
//! report its result back to the scene.

use crate::persistence::{Storage, keys, read_flag, write_flag};
use crate::sim::{SceneEvent, SceneState};

/// What the scene knows about the puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleProgress {
    /// `false` while the puzzle window is open
    pub scene_running: bool,
    /// Result reported by the puzzle page
    pub solved: bool,
}

impl Default for PuzzleProgress {
    fn default() -> Self {
        Self {
            scene_running: true,
            solved: false,
        }
    }
}

impl PuzzleProgress {
    /// Read both flags; missing or unreadable ones take their defaults
    pub fn load(store: &dyn Storage) -> Self {
        let progress = Self {
            scene_running: read_flag(store, keys::GAME_STATE).unwrap_or(true),
            solved: read_flag(store, keys::ENIGME_SOLVED).unwrap_or(false),
        };
        log::info!(
            "Loaded puzzle progress (running: {}, solved: {})",
            progress.scene_running,
            progress.solved
        );
        progress
    }

    /// A stored `gameState = "false"` at startup means the page was left while
    /// the puzzle was open. The window is gone, so mark the scene running again.
    /// Returns whether anything was recovered.
    pub fn recover_interrupted(&mut self, store: &dyn Storage) -> bool {
        if self.scene_running {
            return false;
        }
        log::warn!("Previous puzzle session was interrupted, resuming scene");
        self.scene_running = true;
        if let Err(e) = write_flag(store, keys::GAME_STATE, true) {
            log::warn!("Could not persist game state: {}", e);
        }
        true
    }

    /// Puzzle window opened: scene paused, result cleared
    pub fn begin(&mut self, store: &dyn Storage) {
        self.scene_running = false;
        self.solved = false;
        for key in [keys::GAME_STATE, keys::ENIGME_SOLVED] {
            if let Err(e) = write_flag(store, key, false) {
                log::warn!("Could not persist '{}': {}", key, e);
            }
        }
    }

    /// Puzzle window closed: scene running again, result re-read from storage
    pub fn finish(&mut self, store: &dyn Storage) -> bool {
        self.scene_running = true;
        if let Err(e) = write_flag(store, keys::GAME_STATE, true) {
            log::warn!("Could not persist game state: {}", e);
        }
        self.solved = read_flag(store, keys::ENIGME_SOLVED).unwrap_or(false);
        log::info!("Puzzle closed (solved: {})", self.solved);
        self.solved
    }
}

/// An open puzzle window as seen by the scene
pub trait PuzzleHandle {
    /// True exactly once, on the first poll after the window closed
    fn poll_closed(&mut self) -> bool;
    fn focus(&self);
}

/// Ties the puzzle window to the scene and the persisted flags
#[derive(Debug)]
pub struct PuzzleSession<H> {
    progress: PuzzleProgress,
    window: Option<H>,
}

impl<H: PuzzleHandle> PuzzleSession<H> {
    pub fn new(progress: PuzzleProgress) -> Self {
        Self {
            progress,
            window: None,
        }
    }

    pub fn progress(&self) -> &PuzzleProgress {
        &self.progress
    }

    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// Open the window through `open` and pause the scene.
    ///
    /// `open` returning `None` (popup blocked) changes nothing: the scene
    /// keeps running and no flag is written. With a window already open it
    /// is focused instead. Returns whether a window was opened.
    pub fn open(
        &mut self,
        state: &mut SceneState,
        store: &dyn Storage,
        open: impl FnOnce() -> Option<H>,
    ) -> bool {
        if self.window.is_some() {
            self.focus();
            return false;
        }
        let Some(window) = open() else {
            log::warn!("Puzzle window did not open, scene keeps running");
            return false;
        };
        self.progress.begin(store);
        state.begin_puzzle();
        self.window = Some(window);
        true
    }

    pub fn focus(&self) {
        if let Some(window) = &self.window {
            window.focus();
        }
    }

    /// Check the window; once it has closed, re-read the result and resume
    pub fn poll(&mut self, state: &mut SceneState, store: &dyn Storage) -> Vec<SceneEvent> {
        let closed = self.window.as_mut().is_some_and(|w| w.poll_closed());
        if !closed {
            return Vec::new();
        }
        self.window = None;
        let solved = self.progress.finish(store);
        state.finish_puzzle(solved)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::sim::{ScenePhase, StatusText, fixtures};

    /// Window the test closes by hand
    #[derive(Clone, Default)]
    struct TestWindow {
        closed: Rc<Cell<bool>>,
        reported: bool,
        focused: Rc<Cell<u32>>,
    }

    impl PuzzleHandle for TestWindow {
        fn poll_closed(&mut self) -> bool {
            if self.reported || !self.closed.get() {
                return false;
            }
            self.reported = true;
            true
        }

        fn focus(&self) {
            self.focused.set(self.focused.get() + 1);
        }
    }

    fn scene() -> SceneState {
        SceneState::new(fixtures::town_map(), fixtures::config()).unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let store = MemoryStorage::new();
        assert_eq!(PuzzleProgress::load(&store), PuzzleProgress::default());
    }

    #[test]
    fn test_begin_clears_result() {
        let store = MemoryStorage::new();
        store.set_item(keys::ENIGME_SOLVED, "true").unwrap();
        let mut progress = PuzzleProgress::load(&store);
        assert!(progress.solved);

        progress.begin(&store);
        assert!(!progress.scene_running);
        assert!(!progress.solved);
        assert_eq!(store.get_item(keys::GAME_STATE).as_deref(), Some("false"));
        assert_eq!(store.get_item(keys::ENIGME_SOLVED).as_deref(), Some("false"));
    }

    #[test]
    fn test_finish_reads_puzzle_result() {
        let store = MemoryStorage::new();
        let mut progress = PuzzleProgress::load(&store);
        progress.begin(&store);

        // The puzzle page writes its result
        store.set_item(keys::ENIGME_SOLVED, "true").unwrap();
        assert!(progress.finish(&store));
        assert!(progress.scene_running);
        assert_eq!(store.get_item(keys::GAME_STATE).as_deref(), Some("true"));
    }

    #[test]
    fn test_finish_unsolved() {
        let store = MemoryStorage::new();
        let mut progress = PuzzleProgress::default();
        progress.begin(&store);
        assert!(!progress.finish(&store));
    }

    #[test]
    fn test_recover_interrupted() {
        let store = MemoryStorage::new();
        store.set_item(keys::GAME_STATE, "false").unwrap();
        let mut progress = PuzzleProgress::load(&store);
        assert!(!progress.scene_running);
        assert!(progress.recover_interrupted(&store));
        assert!(progress.scene_running);
        assert_eq!(store.get_item(keys::GAME_STATE).as_deref(), Some("true"));
        assert!(!progress.recover_interrupted(&store));
    }

    #[test]
    fn test_blocked_popup_changes_nothing() {
        let store = MemoryStorage::new();
        let mut state = scene();
        let mut session = PuzzleSession::<TestWindow>::new(PuzzleProgress::load(&store));

        assert!(!session.open(&mut state, &store, || None));
        assert!(!session.is_open());
        assert_eq!(state.phase, ScenePhase::Exploring);
        assert_eq!(store.get_item(keys::GAME_STATE), None);
        assert_eq!(store.get_item(keys::ENIGME_SOLVED), None);
    }

    #[test]
    fn test_open_pauses_and_persists() {
        let store = MemoryStorage::new();
        store.set_item(keys::ENIGME_SOLVED, "true").unwrap();
        let mut state = scene();
        let mut session = PuzzleSession::new(PuzzleProgress::load(&store));

        let window = TestWindow::default();
        assert!(session.open(&mut state, &store, || Some(window.clone())));
        assert!(state.is_paused());
        assert!(!session.progress().scene_running);
        assert_eq!(store.get_item(keys::GAME_STATE).as_deref(), Some("false"));
        assert_eq!(store.get_item(keys::ENIGME_SOLVED).as_deref(), Some("false"));

        // Still open: nothing to resume
        assert!(session.poll(&mut state, &store).is_empty());
        assert!(state.is_paused());
    }

    #[test]
    fn test_second_open_focuses_existing_window() {
        let store = MemoryStorage::new();
        let mut state = scene();
        let mut session = PuzzleSession::new(PuzzleProgress::default());
        let window = TestWindow::default();
        session.open(&mut state, &store, || Some(window.clone()));

        let opened_again = session.open(&mut state, &store, || {
            panic!("a second window must not be opened")
        });
        assert!(!opened_again);
        assert_eq!(window.focused.get(), 1);
    }

    #[test]
    fn test_close_unsolved_resumes_in_place() {
        let store = MemoryStorage::new();
        let mut state = scene();
        let mut session = PuzzleSession::new(PuzzleProgress::default());
        let window = TestWindow::default();
        session.open(&mut state, &store, || Some(window.clone()));

        window.closed.set(true);
        let events = session.poll(&mut state, &store);
        assert!(events.is_empty());
        assert!(!session.is_open());
        assert_eq!(state.phase, ScenePhase::Exploring);
        assert_eq!(state.player.pos, Vec2::new(600.0, 346.0));
        assert_eq!(store.get_item(keys::GAME_STATE).as_deref(), Some("true"));

        // Reported once only
        assert!(session.poll(&mut state, &store).is_empty());
    }

    #[test]
    fn test_close_solved_teleports() {
        let store = MemoryStorage::new();
        let mut state = scene();
        let mut session = PuzzleSession::new(PuzzleProgress::default());
        let window = TestWindow::default();
        session.open(&mut state, &store, || Some(window.clone()));

        // The puzzle page reports success before closing
        store.set_item(keys::ENIGME_SOLVED, "true").unwrap();
        window.closed.set(true);
        let events = session.poll(&mut state, &store);
        assert_eq!(
            events,
            vec![SceneEvent::Teleported {
                to: Vec2::new(1000.0, 300.0)
            }]
        );
        assert!(session.progress().solved);
        assert_eq!(state.status, StatusText::Solved);
        assert_eq!(state.phase, ScenePhase::Exploring);
    }
}
