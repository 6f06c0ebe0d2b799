//! Trigger layer — button combos read from the host's per-frame input.
//!
//! A combo fires on the frame where every one of its buttons is held and
//! at least one of them was newly pressed. Holding a combo fires it once.

use crate::{
    store::{SLOT_DOUBLE, SLOT_SINGLE},
    types::SlotIndex,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller button bits.
pub mod buttons {
    pub const A_BUTTON: u16     = 0x8000;
    pub const B_BUTTON: u16     = 0x4000;
    pub const Z_TRIG: u16       = 0x2000;
    pub const START_BUTTON: u16 = 0x1000;
    pub const U_JPAD: u16       = 0x0800;
    pub const D_JPAD: u16       = 0x0400;
    pub const L_JPAD: u16       = 0x0200;
    pub const R_JPAD: u16       = 0x0100;
    pub const L_TRIG: u16       = 0x0020;
    pub const R_TRIG: u16       = 0x0010;
    pub const U_CBUTTONS: u16   = 0x0008;
    pub const D_CBUTTONS: u16   = 0x0004;
    pub const L_CBUTTONS: u16   = 0x0002;
    pub const R_CBUTTONS: u16   = 0x0001;

    /// Names accepted in configuration files.
    pub const NAMES: [(&str, u16); 14] = [
        ("A", A_BUTTON),
        ("B", B_BUTTON),
        ("Z", Z_TRIG),
        ("START", START_BUTTON),
        ("D_UP", U_JPAD),
        ("D_DOWN", D_JPAD),
        ("D_LEFT", L_JPAD),
        ("D_RIGHT", R_JPAD),
        ("L", L_TRIG),
        ("R", R_TRIG),
        ("C_UP", U_CBUTTONS),
        ("C_DOWN", D_CBUTTONS),
        ("C_LEFT", L_CBUTTONS),
        ("C_RIGHT", R_CBUTTONS),
    ];
}

use buttons::*;

/// One frame of controller input, read-only to the practice layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    #[serde(default)]
    pub buttons_down:    u16,
    #[serde(default)]
    pub buttons_pressed: u16,
    #[serde(default)]
    pub stick_x:         i8,
    #[serde(default)]
    pub stick_y:         i8,
}

impl InputFrame {
    /// Derive this frame's input from the held mask and last frame's.
    pub fn from_held(held: u16, previous: u16) -> Self {
        Self {
            buttons_down:    held,
            buttons_pressed: held & !previous,
            stick_x:         0,
            stick_y:         0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ButtonCombo(pub u16);

impl ButtonCombo {
    pub const NONE: ButtonCombo = ButtonCombo(0);

    /// An empty combo never fires.
    pub fn is_triggered(self, input: &InputFrame) -> bool {
        input.buttons_down & self.0 == self.0 && input.buttons_pressed & self.0 != 0
    }

    pub fn names(self) -> Vec<String> {
        buttons::NAMES
            .iter()
            .filter(|(_, bit)| self.0 & bit != 0)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

impl TryFrom<Vec<String>> for ButtonCombo {
    type Error = String;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        names.iter().try_fold(ButtonCombo::NONE, |combo, name| {
            let upper = name.to_ascii_uppercase();
            buttons::NAMES
                .iter()
                .find(|(n, _)| *n == upper)
                .map(|(_, bit)| ButtonCombo(combo.0 | bit))
                .ok_or_else(|| format!("unknown button '{name}'"))
        })
    }
}

impl From<ButtonCombo> for Vec<String> {
    fn from(combo: ButtonCombo) -> Self {
        combo.names()
    }
}

impl fmt::Display for ButtonCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join("+"))
    }
}

/// Actions bound to combos, in the order they are checked each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
    SaveSlot1,
    SaveSlot2,
    LoadSlot1,
    LoadSlot2,
    ToggleFreecam,
    LevelReset,
    SoftReset,
}

impl TriggerAction {
    /// Slot targeted by a save or load action.
    pub fn slot(self) -> Option<SlotIndex> {
        match self {
            TriggerAction::SaveSlot1 | TriggerAction::LoadSlot1 => Some(SLOT_SINGLE),
            TriggerAction::SaveSlot2 | TriggerAction::LoadSlot2 => Some(SLOT_DOUBLE),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboBindings {
    pub save_slot_1:    ButtonCombo,
    pub save_slot_2:    ButtonCombo,
    pub load_slot_1:    ButtonCombo,
    pub load_slot_2:    ButtonCombo,
    pub toggle_freecam: ButtonCombo,
    pub level_reset:    ButtonCombo,
    pub soft_reset:     ButtonCombo,
}

impl Default for ComboBindings {
    fn default() -> Self {
        Self {
            save_slot_1:    ButtonCombo(L_TRIG | R_TRIG | U_CBUTTONS),
            save_slot_2:    ButtonCombo(L_TRIG | R_TRIG | D_CBUTTONS),
            load_slot_1:    ButtonCombo(L_TRIG | R_TRIG | L_CBUTTONS),
            load_slot_2:    ButtonCombo(L_TRIG | R_TRIG | R_CBUTTONS),
            toggle_freecam: ButtonCombo(L_TRIG | R_TRIG | A_BUTTON),
            level_reset:    ButtonCombo(L_TRIG | R_TRIG | B_BUTTON),
            soft_reset:     ButtonCombo(A_BUTTON | B_BUTTON | Z_TRIG | START_BUTTON),
        }
    }
}

impl ComboBindings {
    /// Every binding in check order.
    pub fn bindings(&self) -> [(TriggerAction, ButtonCombo); 7] {
        [
            (TriggerAction::SaveSlot1, self.save_slot_1),
            (TriggerAction::SaveSlot2, self.save_slot_2),
            (TriggerAction::LoadSlot1, self.load_slot_1),
            (TriggerAction::LoadSlot2, self.load_slot_2),
            (TriggerAction::ToggleFreecam, self.toggle_freecam),
            (TriggerAction::LevelReset, self.level_reset),
            (TriggerAction::SoftReset, self.soft_reset),
        ]
    }

    /// Actions whose combos fired this frame, in check order.
    pub fn poll(&self, input: &InputFrame) -> Vec<TriggerAction> {
        self.bindings()
            .into_iter()
            .filter(|(_, combo)| combo.is_triggered(input))
            .map(|(action, _)| action)
            .collect()
    }
}
