//! Visibility state machine
//!
//! A revealed region is in one of two states. The transition function is
//! pure: the next state depends only on the current state, the latest
//! intersection reading, and the `once` flag. Rapid crossings coalesce to
//! the most recent reading; there is no queue of pending transitions.

/// Visibility state of an observed region
///
/// Every region starts `Hidden`. With `once = true`, `Visible` is terminal;
/// otherwise the state follows the latest intersection reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Visible,
}

impl VisibilityState {
    pub fn is_visible(self) -> bool {
        matches!(self, VisibilityState::Visible)
    }

    /// Compute the next state from the latest intersection reading
    pub fn apply_reading(self, intersecting: bool, once: bool) -> VisibilityState {
        match (self, intersecting) {
            (VisibilityState::Hidden, true) => VisibilityState::Visible,
            (VisibilityState::Visible, false) if !once => VisibilityState::Hidden,
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_hidden() {
        assert_eq!(VisibilityState::default(), VisibilityState::Hidden);
    }

    #[test]
    fn test_reveal_on_intersection() {
        let state = VisibilityState::Hidden.apply_reading(true, true);
        assert_eq!(state, VisibilityState::Visible);
    }

    #[test]
    fn test_once_latches_visible() {
        let mut state = VisibilityState::Hidden;

        // Enter, exit, re-enter, exit again: once=true never goes back
        for reading in [true, false, true, false, false, true] {
            state = state.apply_reading(reading, true);
        }
        assert_eq!(state, VisibilityState::Visible);
    }

    #[test]
    fn test_repeatable_follows_latest_reading() {
        let mut state = VisibilityState::Hidden;

        for (reading, expected) in [
            (true, VisibilityState::Visible),
            (false, VisibilityState::Hidden),
            (true, VisibilityState::Visible),
            (true, VisibilityState::Visible),
            (false, VisibilityState::Hidden),
        ] {
            state = state.apply_reading(reading, false);
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_hidden_stays_hidden_without_intersection() {
        let state = VisibilityState::Hidden.apply_reading(false, false);
        assert_eq!(state, VisibilityState::Hidden);
    }
}
