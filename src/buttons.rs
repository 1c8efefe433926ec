//! Edge classification for the stock cruise stalk buttons.
//!
//! The vehicle layer decodes the stalk frame into a [`ButtonSnapshot`]
//! once per tick. Diffing two consecutive snapshots yields one
//! [`ButtonAction`] per button:
//!
//! | previous | current | action    |
//! |----------|---------|-----------|
//! | false    | false   | `NoPress` |
//! | false    | true    | `Rising`  |
//! | true     | true    | `Pressed` |
//! | true     | false   | `Falling` |
//!
//! `Undefined` is never produced by [`classify`]; it only seeds the
//! "previous action" slot before the first classified tick.

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Cruise stalk buttons, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Button {
    AccelCruise = 0,
    DecelCruise = 1,
    Cancel = 2,
    SetCruise = 3,
    ResumeCruise = 4,
    GapAdjustCruise = 5,
    LongUp = 6,
    LongDown = 7,
}

impl Button {
    pub const COUNT: usize = 8;

    pub const ALL: [Button; Button::COUNT] = [
        Button::AccelCruise,
        Button::DecelCruise,
        Button::Cancel,
        Button::SetCruise,
        Button::ResumeCruise,
        Button::GapAdjustCruise,
        Button::LongUp,
        Button::LongDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AccelCruise => "accelCruise",
            Self::DecelCruise => "decelCruise",
            Self::Cancel => "cancel",
            Self::SetCruise => "setCruise",
            Self::ResumeCruise => "resumeCruise",
            Self::GapAdjustCruise => "gapAdjustCruise",
            Self::LongUp => "longUp",
            Self::LongDown => "longDown",
        }
    }
}

/// Raw pressed state of every button for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSnapshot([bool; Button::COUNT]);

impl ButtonSnapshot {
    /// Nothing pressed.
    pub const fn released() -> Self {
        Self([false; Button::COUNT])
    }

    /// Builder-style: a copy with `button` set to `pressed`.
    #[must_use]
    pub fn with(mut self, button: Button, pressed: bool) -> Self {
        self.set(button, pressed);
        self
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.0[button as usize] = pressed;
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.0[button as usize]
    }
}

/// Edge-classified state of one button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    #[default]
    Undefined,
    NoPress,
    Pressed,
    Rising,
    Falling,
}

impl ButtonAction {
    /// Single-character glyph used in trace output.
    pub fn glyph(self) -> char {
        match self {
            Self::Undefined => '?',
            Self::NoPress => '_',
            Self::Pressed => '=',
            Self::Rising => '^',
            Self::Falling => 'v',
        }
    }
}

/// One [`ButtonAction`] per button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonActions([ButtonAction; Button::COUNT]);

impl ButtonActions {
    pub fn get(&self, button: Button) -> ButtonAction {
        self.0[button as usize]
    }

    pub fn is(&self, button: Button, action: ButtonAction) -> bool {
        self.get(button) == action
    }

    /// Compact `| ^ _ _ ... |` rendering in wire order.
    pub fn trace(&self) -> heapless::String<24> {
        let mut s = heapless::String::new();
        for action in self.0 {
            // Capacity covers 8 glyphs plus separators.
            let _ = s.push(action.glyph());
        }
        s
    }
}

/// Classify one button from its previous and current raw state.
pub fn classify_one(previous: bool, current: bool) -> ButtonAction {
    match (previous, current) {
        (false, true) => ButtonAction::Rising,
        (true, false) => ButtonAction::Falling,
        (false, false) => ButtonAction::NoPress,
        (true, true) => ButtonAction::Pressed,
    }
}

/// Diff two snapshots into per-button actions.
pub fn classify(previous: &ButtonSnapshot, current: &ButtonSnapshot) -> ButtonActions {
    let mut actions = ButtonActions::default();
    for button in Button::ALL {
        actions.0[button as usize] =
            classify_one(previous.is_pressed(button), current.is_pressed(button));
    }
    actions
}

/// A raw press or release, reported once on the tick it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEvent {
    pub button: Button,
    pub pressed: bool,
}

/// Every button whose raw state changed between the two snapshots, in
/// wire order.
pub fn button_events(
    previous: &ButtonSnapshot,
    current: &ButtonSnapshot,
) -> Vec<ButtonEvent, { Button::COUNT }> {
    let mut events = Vec::new();
    for button in Button::ALL {
        let pressed = current.is_pressed(button);
        if pressed != previous.is_pressed(button) {
            // At most one event per button, so this never overflows.
            let _ = events.push(ButtonEvent { button, pressed });
        }
    }
    events
}
