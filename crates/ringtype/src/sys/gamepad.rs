//! Reads the first connected controller through gilrs.

use crate::events::{Control, ControllerFrame};
use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GamepadError {
    #[error("Failed to initialise gamepad support: {0}")]
    Init(String),
}

/// Physical button → logical control (Xbox naming: South = A, East = B).
pub fn control_for(button: Button) -> Option<Control> {
    match button {
        Button::South => Some(Control::Confirm),
        Button::East => Some(Control::Delete),
        Button::West => Some(Control::Space),
        Button::North => Some(Control::Newline),
        Button::RightTrigger2 => Some(Control::AcceptSuggestion),
        Button::DPadUp => Some(Control::Up),
        Button::DPadDown => Some(Control::Down),
        Button::DPadLeft => Some(Control::Left),
        Button::DPadRight => Some(Control::Right),
        Button::LeftTrigger => Some(Control::AlternateSet),
        Button::RightTrigger => Some(Control::Uppercase),
        _ => None,
    }
}

const MAPPED_BUTTONS: &[Button] = &[
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::RightTrigger2,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::LeftTrigger,
    Button::RightTrigger,
];

pub struct GamepadInput {
    gilrs: Gilrs,
    active: Option<GamepadId>,
    previously_held: HashSet<Control>,
}

impl GamepadInput {
    pub fn new() -> Result<Self, GamepadError> {
        let gilrs = Gilrs::new().map_err(|e| GamepadError::Init(e.to_string()))?;
        let active = gilrs.gamepads().next().map(|(id, pad)| {
            log::info!("Using gamepad {}: {}", id, pad.name());
            id
        });
        Ok(Self {
            gilrs,
            active,
            previously_held: HashSet::new(),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    fn handle_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    log::info!("Gamepad connected: {} ({})", id, self.gilrs.gamepad(id).name());
                    self.active.get_or_insert(id);
                }
                EventType::Disconnected => {
                    log::info!("Gamepad disconnected: {}", id);
                    if self.active == Some(id) {
                        self.active = self.gilrs.gamepads().map(|(other, _)| other).next();
                        self.previously_held.clear();
                    }
                }
                _ => {}
            }
        }
    }

    /// Samples the active controller. Without one the frame is empty.
    pub fn poll(&mut self) -> ControllerFrame {
        self.handle_events();

        let Some(pad) = self.active.and_then(|id| self.gilrs.connected_gamepad(id)) else {
            return ControllerFrame::default();
        };

        let held: HashSet<Control> = MAPPED_BUTTONS
            .iter()
            .filter(|b| pad.is_pressed(**b))
            .filter_map(|b| control_for(*b))
            .collect();
        // gilrs reports up as positive; the selector wants screen-space
        let stick = (
            pad.value(Axis::LeftStickX) as f64,
            -(pad.value(Axis::LeftStickY) as f64),
        );

        let frame = ControllerFrame::from_levels(stick, held, &self.previously_held);
        self.previously_held = frame.held.clone();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mapped_button_has_a_control() {
        let controls: HashSet<_> = MAPPED_BUTTONS.iter().filter_map(|b| control_for(*b)).collect();
        assert_eq!(controls.len(), MAPPED_BUTTONS.len());
        assert_eq!(control_for(Button::Start), None);
    }
}
