//! Trigger zone and status label

use super::rect::Rect;

/// Edge transitions of a trigger zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEdge {
    Entered,
    Exited,
}

/// An invisible rectangle that reports when a sprite enters or leaves it
#[derive(Debug, Clone)]
pub struct TriggerZone {
    pub rect: Rect,
    /// Whether the tracked sprite was inside at the last check
    pub occupied: bool,
}

impl TriggerZone {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            occupied: false,
        }
    }

    /// Re-test against `bounds`, reporting only changes
    pub fn update(&mut self, bounds: &Rect) -> Option<ZoneEdge> {
        let inside = bounds.intersects(&self.rect);
        match (self.occupied, inside) {
            (false, true) => {
                self.occupied = true;
                Some(ZoneEdge::Entered)
            }
            (true, false) => {
                self.occupied = false;
                Some(ZoneEdge::Exited)
            }
            _ => None,
        }
    }

    /// Unconditional re-test (after a teleport)
    pub fn recheck(&mut self, bounds: &Rect) -> bool {
        self.occupied = bounds.intersects(&self.rect);
        self.occupied
    }
}

/// Text shown in the on-screen status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusText {
    #[default]
    Hidden,
    /// Player stands at the tree
    Prompt,
    /// Puzzle solved and player moved away from the tree
    Solved,
}

impl StatusText {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusText::Hidden => "",
            StatusText::Prompt => "Appuyer sur E pour lancer l'enigme",
            StatusText::Solved => "Enigme Solved",
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, StatusText::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn zone() -> TriggerZone {
        TriggerZone::new(Rect::new(786.0, 300.0, 64.0, 92.0))
    }

    #[test]
    fn test_edges_fire_once() {
        let mut zone = zone();
        let outside = Rect::new(600.0, 314.0, 32.0, 64.0);
        let inside = outside.translated(Vec2::new(190.0, 0.0));

        assert_eq!(zone.update(&outside), None);
        assert_eq!(zone.update(&inside), Some(ZoneEdge::Entered));
        assert_eq!(zone.update(&inside), None);
        assert_eq!(zone.update(&inside.translated(Vec2::new(5.0, 0.0))), None);
        assert_eq!(zone.update(&outside), Some(ZoneEdge::Exited));
        assert_eq!(zone.update(&outside), None);
        assert!(!zone.occupied);
    }

    #[test]
    fn test_touching_counts_as_inside() {
        let mut zone = zone();
        // Right edge exactly on the zone's left edge
        let touching = Rect::new(754.0, 314.0, 32.0, 64.0);
        assert_eq!(zone.update(&touching), Some(ZoneEdge::Entered));
    }

    #[test]
    fn test_recheck_sets_state() {
        let mut zone = zone();
        zone.occupied = true;
        assert!(!zone.recheck(&Rect::new(984.0, 268.0, 32.0, 64.0)));
        assert!(!zone.occupied);
        assert!(zone.recheck(&Rect::new(800.0, 320.0, 32.0, 64.0)));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(StatusText::Hidden.as_str(), "");
        assert_eq!(StatusText::Prompt.as_str(), "Appuyer sur E pour lancer l'enigme");
        assert_eq!(StatusText::Solved.as_str(), "Enigme Solved");
        assert!(!StatusText::Hidden.is_visible());
    }
}
