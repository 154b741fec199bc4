//! Analog stick → ring selection.

use crate::config::SelectorConfig;
use crate::layout::{CaseMode, CharSet, Layout, RingLevel, Token};
use std::f64::consts::TAU;
use std::time::Instant;

/// What the stick currently points at, plus the held modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub active_set: CharSet,
    pub active_ring: RingLevel,
    pub selected_index: usize,
    pub case_mode: CaseMode,
}

/// Clockwise angle from stick-up, in `[0, 2π)`. `y` is screen-space (down is positive).
pub fn stick_angle(x: f64, y: f64) -> f64 {
    let angle = x.atan2(-y);
    if angle < 0.0 { angle + TAU } else { angle }
}

pub fn segment_index(angle: f64, ring_len: usize) -> usize {
    let segment = TAU / ring_len as f64;
    (angle.rem_euclid(TAU) / segment).floor() as usize % ring_len
}

#[derive(Debug, Clone)]
pub struct RadialSelector {
    layout: Layout,
    config: SelectorConfig,
    state: SelectionState,
    magnitude: f64,
    last_commit: Option<Instant>,
}

impl RadialSelector {
    pub fn new(layout: Layout, config: SelectorConfig) -> Self {
        Self {
            layout,
            config,
            state: SelectionState::default(),
            magnitude: 0.0,
            last_commit: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn set_config(&mut self, config: SelectorConfig) {
        self.config = config;
    }

    /// True while the stick is outside the dead zone.
    pub fn is_engaged(&self) -> bool {
        self.magnitude > self.config.dead_zone
    }

    /// Momentary modifiers; both fall back to their defaults when released.
    pub fn set_modifiers(&mut self, alternate_held: bool, upper_held: bool) {
        self.state.active_set = if alternate_held {
            CharSet::Alternate
        } else {
            CharSet::Default
        };
        self.state.case_mode = if upper_held {
            CaseMode::Upper
        } else {
            CaseMode::Lower
        };
    }

    /// Feeds one stick sample. Inside the dead zone the previous ring and
    /// index are kept so a released stick doesn't lose its selection.
    pub fn update(&mut self, x: f64, y: f64) -> SelectionState {
        self.magnitude = x.hypot(y);
        if !self.is_engaged() {
            return self.state;
        }

        self.state.active_ring = if self.magnitude > self.config.ring_boundary {
            RingLevel::Outer
        } else {
            RingLevel::Inner
        };

        let angle = stick_angle(x, y);
        let ring_len = self.current_ring().len();
        self.state.selected_index = segment_index(angle, ring_len);
        self.state
    }

    pub fn current_ring(&self) -> &[Token] {
        self.layout
            .ring(self.state.active_set, self.state.active_ring)
    }

    pub fn selected_token(&self) -> Option<&Token> {
        self.current_ring().get(self.state.selected_index)
    }

    /// Confirms the live selection. Returns `None` when the stick is centred
    /// or when the previous commit is still inside the debounce window.
    pub fn commit(&mut self, now: Instant) -> Option<Token> {
        if self
            .last_commit
            .is_some_and(|last| now.saturating_duration_since(last) <= self.config.debounce)
        {
            log::debug!("Commit ignored: inside debounce window");
            return None;
        }
        if !self.is_engaged() {
            return None;
        }

        let token = self.selected_token().cloned()?;
        self.last_commit = Some(now);
        Some(token)
    }
}
