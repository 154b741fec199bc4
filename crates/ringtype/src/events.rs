use std::collections::HashSet;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
    Quit,
}

/// Logical controller inputs, independent of the physical button layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum Control {
    Confirm,
    Delete,
    Space,
    Newline,
    AcceptSuggestion,
    Up,
    Down,
    Left,
    Right,
    /// Held: switch to the alternate character set.
    AlternateSet,
    /// Held: type upper-case letters.
    Uppercase,
}

/// One sample of controller state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerFrame {
    /// Left stick, screen-space: x right, y down, both in `[-1, 1]`.
    pub left_stick: (f64, f64),
    pub held: HashSet<Control>,
    pub just_pressed: HashSet<Control>,
}

impl ControllerFrame {
    /// Builds a frame from button levels, deriving press edges from the
    /// previous frame's held set.
    pub fn from_levels(
        left_stick: (f64, f64),
        held: HashSet<Control>,
        previously_held: &HashSet<Control>,
    ) -> Self {
        let just_pressed = held.difference(previously_held).copied().collect();
        Self {
            left_stick,
            held,
            just_pressed,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn pressed(&self, control: Control) -> bool {
        self.just_pressed.contains(&control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_edges_from_levels() {
        let prev: HashSet<_> = [Control::AlternateSet].into_iter().collect();
        let held: HashSet<_> = [Control::AlternateSet, Control::Confirm].into_iter().collect();
        let frame = ControllerFrame::from_levels((0.0, 0.0), held, &prev);

        assert!(frame.pressed(Control::Confirm));
        assert!(!frame.pressed(Control::AlternateSet));
        assert!(frame.is_held(Control::AlternateSet));

        let next = ControllerFrame::from_levels((0.0, 0.0), frame.held.clone(), &frame.held);
        assert!(next.just_pressed.is_empty());
    }
}
