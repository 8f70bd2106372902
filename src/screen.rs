//! Maps session phases onto the three full-screen views.

use log::debug;

use crate::session::Phase;

/// The mutually exclusive views. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Quiz,
    Results,
}

impl Screen {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Idle | Phase::Loading => Screen::Landing,
            Phase::Active => Screen::Quiz,
            Phase::Finalized => Screen::Results,
        }
    }
}

/// Tracks the active view and its scroll position.
#[derive(Debug)]
pub struct ScreenController {
    active: Screen,
    scroll: u16,
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenController {
    pub fn new() -> Self {
        Self {
            active: Screen::Landing,
            scroll: 0,
        }
    }

    pub fn active(&self) -> Screen {
        self.active
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Switches to the view for `phase`. Returns true on a switch, which also
    /// scrolls back to the top.
    pub fn sync(&mut self, phase: Phase) -> bool {
        let target = Screen::for_phase(phase);
        if target == self.active {
            return false;
        }
        debug!("Screen {:?} -> {:?}", self.active, target);
        self.active = target;
        self.scroll = 0;
        true
    }

    pub fn scroll_down(&mut self, max: u16) {
        self.scroll = self.scroll.saturating_add(1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        assert_eq!(Screen::for_phase(Phase::Idle), Screen::Landing);
        assert_eq!(Screen::for_phase(Phase::Loading), Screen::Landing);
        assert_eq!(Screen::for_phase(Phase::Active), Screen::Quiz);
        assert_eq!(Screen::for_phase(Phase::Finalized), Screen::Results);
    }

    #[test]
    fn test_transition_resets_scroll() {
        let mut screens = ScreenController::new();
        assert!(screens.sync(Phase::Finalized));
        screens.scroll_down(10);
        screens.scroll_down(10);
        assert_eq!(screens.scroll(), 2);

        assert!(!screens.sync(Phase::Finalized));
        assert_eq!(screens.scroll(), 2);

        assert!(screens.sync(Phase::Idle));
        assert_eq!(screens.active(), Screen::Landing);
        assert_eq!(screens.scroll(), 0);
    }

    #[test]
    fn test_loading_stays_on_landing() {
        let mut screens = ScreenController::new();
        assert!(!screens.sync(Phase::Loading));
        assert_eq!(screens.active(), Screen::Landing);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut screens = ScreenController::new();
        screens.scroll_up();
        assert_eq!(screens.scroll(), 0);
        for _ in 0..5 {
            screens.scroll_down(3);
        }
        assert_eq!(screens.scroll(), 3);
    }

    #[test]
    fn test_scroll_down_saturates_at_u16_max() {
        let mut screens = ScreenController::new();
        screens.scroll = u16::MAX;
        screens.scroll_down(u16::MAX);
        assert_eq!(screens.scroll(), u16::MAX);
    }
}
