//! Practice events — what a session did on a given frame.
//!
//! RULE: The session reports every outcome as an event, including
//! rejections, so callers and tests never have to infer what happened.

use crate::types::{Frame, Scope, SlotIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PracticeEvent {
    // ── Savestates ─────────────────────────────────
    StateSaved {
        frame: Frame,
        slot: SlotIndex,
        scope: Scope,
        objects_saved: usize,
        objects_dropped: usize,
    },
    StateLoaded {
        frame: Frame,
        slot: SlotIndex,
        objects_matched: Option<usize>,
    },
    SaveRejected {
        frame: Frame,
        slot: SlotIndex,
        reason: String,
    },
    LoadRejected {
        frame: Frame,
        slot: SlotIndex,
        reason: String,
    },
    SlotsCleared {
        frame: Frame,
    },

    // ── Practice tools ─────────────────────────────
    FreecamToggled {
        frame: Frame,
        enabled: bool,
    },
    LevelResetRequested {
        frame: Frame,
        attempt: u32,
    },
    SoftResetRequested {
        frame: Frame,
    },
}

impl PracticeEvent {
    /// Stable name for logs and the runner's output.
    pub fn type_name(&self) -> &'static str {
        match self {
            PracticeEvent::StateSaved { .. }          => "state_saved",
            PracticeEvent::StateLoaded { .. }         => "state_loaded",
            PracticeEvent::SaveRejected { .. }        => "save_rejected",
            PracticeEvent::LoadRejected { .. }        => "load_rejected",
            PracticeEvent::SlotsCleared { .. }        => "slots_cleared",
            PracticeEvent::FreecamToggled { .. }      => "freecam_toggled",
            PracticeEvent::LevelResetRequested { .. } => "level_reset_requested",
            PracticeEvent::SoftResetRequested { .. }  => "soft_reset_requested",
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            PracticeEvent::StateSaved { frame, .. }
            | PracticeEvent::StateLoaded { frame, .. }
            | PracticeEvent::SaveRejected { frame, .. }
            | PracticeEvent::LoadRejected { frame, .. }
            | PracticeEvent::SlotsCleared { frame }
            | PracticeEvent::FreecamToggled { frame, .. }
            | PracticeEvent::LevelResetRequested { frame, .. }
            | PracticeEvent::SoftResetRequested { frame } => *frame,
        }
    }
}
