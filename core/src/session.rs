//! Practice session — the once-per-frame entry point.
//!
//! FRAME ORDER (fixed):
//!   1. Advance timers
//!   2. Update HUD overlays from the actor and this frame's input
//!   3. Poll combos against this frame's input
//!   4. Dispatch fired actions in check order
//!
//! RULES:
//!   - The host calls `update` exactly once per simulation frame, from its
//!     own update loop. Everything completes inside that call.
//!   - Every dispatched action yields exactly one event, success or not.
//!   - `render` only reads; the host calls it from its draw pass.

use crate::{
    clock::PracticeTimers,
    config::PracticeConfig,
    engine::{CaptureReport, SavestateEngine},
    error::SavestateResult,
    event::PracticeEvent,
    host::SimulationHandle,
    hud::{HudOverlay, TextSink},
    input::{ComboBindings, InputFrame, TriggerAction},
    store::SLOT_SINGLE,
    types::{Frame, SlotIndex},
};

pub struct PracticeSession {
    pub engine: SavestateEngine,
    pub timers: PracticeTimers,
    pub hud:    HudOverlay,
    combos:     ComboBindings,
    freecam:    bool,
    last_input: InputFrame,
}

impl Default for PracticeSession {
    fn default() -> Self { Self::new(PracticeConfig::default()) }
}

impl PracticeSession {
    pub fn new(config: PracticeConfig) -> Self {
        Self {
            engine:     SavestateEngine::new(config.savestates),
            timers:     PracticeTimers::new(),
            hud:        HudOverlay::new(&config.hud),
            combos:     config.combos,
            freecam:    false,
            last_input: InputFrame::default(),
        }
    }

    pub fn combos(&self) -> &ComboBindings {
        &self.combos
    }

    pub fn freecam_enabled(&self) -> bool {
        self.freecam
    }

    /// Run one frame of the practice layer.
    pub fn update<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        input: &InputFrame,
    ) -> Vec<PracticeEvent> {
        self.timers.tick();
        self.hud.update(host.actor(), input);
        self.last_input = *input;

        self.combos
            .poll(input)
            .into_iter()
            .map(|action| self.dispatch(host, action))
            .collect()
    }

    /// The host dropped a frame; counted for the debug overlay.
    pub fn lag_frame(&mut self) {
        self.timers.record_lag_frame();
    }

    /// Draw the enabled overlays for the most recent frame.
    pub fn render<H: SimulationHandle + ?Sized, S: TextSink + ?Sized>(&self, host: &H, sink: &mut S) {
        self.hud.render(sink, host.actor(), host.hud(), &self.timers, &self.last_input);
    }

    /// Apply one action immediately, as if its combo had fired.
    pub fn dispatch<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        action: TriggerAction,
    ) -> PracticeEvent {
        let frame = self.timers.igt_frames;
        match action {
            TriggerAction::SaveSlot1 | TriggerAction::SaveSlot2 => {
                let slot = action.slot().unwrap_or_default();
                self.save(host, slot)
            }
            TriggerAction::LoadSlot1 | TriggerAction::LoadSlot2 => {
                let slot = action.slot().unwrap_or_default();
                self.load(host, slot)
            }
            TriggerAction::ToggleFreecam => {
                self.freecam = !self.freecam;
                log::debug!("frame={frame} freecam {}", if self.freecam { "on" } else { "off" });
                PracticeEvent::FreecamToggled { frame, enabled: self.freecam }
            }
            TriggerAction::LevelReset => {
                self.timers.increment_attempts();
                self.timers.reset_section();
                host.request_level_reset();
                PracticeEvent::LevelResetRequested { frame, attempt: self.timers.attempts }
            }
            TriggerAction::SoftReset => {
                host.request_soft_reset();
                PracticeEvent::SoftResetRequested { frame }
            }
        }
    }

    pub fn save<H: SimulationHandle + ?Sized>(&mut self, host: &mut H, slot: SlotIndex) -> PracticeEvent {
        let frame = self.timers.igt_frames;
        let result = self.engine.capture(host, slot, frame);
        save_event(frame, slot, result)
    }

    pub fn load<H: SimulationHandle + ?Sized>(&mut self, host: &mut H, slot: SlotIndex) -> PracticeEvent {
        let frame = self.timers.igt_frames;
        match self.engine.restore(host, slot) {
            Ok(report) => PracticeEvent::StateLoaded {
                frame,
                slot,
                objects_matched: report.objects.map(|o| o.matched),
            },
            Err(e) => {
                log::debug!("frame={frame} load from slot {slot} rejected: {e}");
                PracticeEvent::LoadRejected { frame, slot, reason: e.to_string() }
            }
        }
    }

    /// Call when the host transitions into a new level.
    pub fn enter_level(&mut self) -> PracticeEvent {
        self.engine.on_level_enter();
        self.timers.reset_section();
        PracticeEvent::SlotsCleared { frame: self.timers.igt_frames }
    }

    /// Call when the host awards a star. Saves into the single slot when
    /// auto-save is on.
    pub fn star_collected<H: SimulationHandle + ?Sized>(&mut self, host: &mut H) -> Option<PracticeEvent> {
        self.timers.reset_star_grab();
        let frame = self.timers.igt_frames;
        self.engine
            .on_star_collect(host, frame)
            .transpose()
            .map(|result| save_event(frame, SLOT_SINGLE, result))
    }
}

fn save_event(frame: Frame, slot: SlotIndex, result: SavestateResult<CaptureReport>) -> PracticeEvent {
    match result {
        Ok(report) => PracticeEvent::StateSaved {
            frame,
            slot,
            scope: report.scope,
            objects_saved: report.objects_saved,
            objects_dropped: report.objects_dropped,
        },
        Err(e) => {
            log::debug!("frame={frame} save into slot {slot} rejected: {e}");
            PracticeEvent::SaveRejected { frame, slot, reason: e.to_string() }
        }
    }
}
