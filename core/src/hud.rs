//! HUD overlays — per-frame display state drawn through the host's text primitive.
//!
//! UPDATE ORDER (fixed, once per frame from the session):
//!   1. Speed     (current, max, smoothed average)
//!   2. Input     (history ring)
//!   3. Wallkick  (latched frame, display countdown)
//!
//! RULES:
//!   - An overlay only updates while it is enabled. Toggling the speed
//!     display on resets its max.
//!   - Rendering never mutates overlay state. Only enabled overlays draw.
//!   - Drawing goes through `TextSink`; the layer never owns a renderer.

use crate::{
    clock::PracticeTimers,
    config::HudSettings,
    host::{actions, ActorState, HudCounters},
    input::{buttons::*, InputFrame},
};
use serde::{Deserialize, Serialize};

/// RGBA, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color  = Color(0xFFFF_FFFF);
    pub const GREEN: Color  = Color(0x00FF_00FF);
    pub const YELLOW: Color = Color(0xFFFF_00FF);
    pub const CYAN: Color   = Color(0x00FF_FFFF);
    pub const GRAY: Color   = Color(0x8080_80FF);
}

/// The host's "draw string at X,Y in color" facility. Fire and forget.
pub trait TextSink {
    fn draw_text(&mut self, x: i16, y: i16, text: &str, color: Color);
}

// ── Layout ─────────────────────────────────────────────────────

pub const TIMER_POS: (i16, i16)    = (16, 32);
pub const DEBUG_POS: (i16, i16)    = (16, 100);
pub const WALLKICK_POS: (i16, i16) = (16, 180);
pub const INPUT_POS: (i16, i16)    = (280, 200);
pub const SPEED_POS: (i16, i16)    = (16, 212);

const DEBUG_LINE_HEIGHT: i16 = 14;

/// Weight of the newest sample in the smoothed speed.
pub const SPEED_SMOOTHING: f32 = 0.1;
pub const INPUT_HISTORY_LEN: usize = 8;
/// Frames the wallkick readout stays up after the kick ends.
pub const WALLKICK_DISPLAY_FRAMES: u8 = 60;

// ── Speed ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedFormat {
    /// XZ-plane speed.
    #[default]
    Horizontal,
    Total,
    Forward,
    /// Velocity components. Not tracked as a scalar.
    Detailed,
}

impl SpeedFormat {
    pub fn measure(self, actor: &ActorState) -> f32 {
        let [x, y, z] = actor.vel;
        match self {
            SpeedFormat::Horizontal => actor.horizontal_speed(),
            SpeedFormat::Total      => (x * x + y * y + z * z).sqrt(),
            SpeedFormat::Forward    => actor.forward_vel,
            SpeedFormat::Detailed   => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedDisplay {
    pub enabled:       bool,
    pub format:        SpeedFormat,
    pub show_decimals: bool,
    pub show_max:      bool,
    pub current:       f32,
    pub max:           f32,
    pub average:       f32,
}

impl SpeedDisplay {
    pub fn new(settings: &HudSettings) -> Self {
        Self {
            enabled:       settings.speed,
            format:        settings.speed_format,
            show_decimals: true,
            show_max:      settings.show_max_speed,
            current:       0.0,
            max:           0.0,
            average:       0.0,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        if self.enabled {
            self.max = 0.0;
        }
    }

    pub fn update(&mut self, actor: &ActorState) {
        if !self.enabled {
            return;
        }
        self.current = self.format.measure(actor);
        if self.current > self.max {
            self.max = self.current;
        }
        self.average = SPEED_SMOOTHING * self.current + (1.0 - SPEED_SMOOTHING) * self.average;
    }

    fn render<S: TextSink + ?Sized>(&self, sink: &mut S, actor: &ActorState) {
        let (x, y) = SPEED_POS;
        let text = match self.format {
            SpeedFormat::Horizontal => format!("Speed: {}", self.number(self.current)),
            SpeedFormat::Total      => format!("3D Speed: {}", self.number(self.current)),
            SpeedFormat::Forward    => format!("Forward: {}", self.number(actor.forward_vel)),
            SpeedFormat::Detailed   => {
                let [vx, vy, vz] = actor.vel;
                format!("Vel: {vx:.1},{vy:.1},{vz:.1}")
            }
        };
        sink.draw_text(x, y, &text, Color::WHITE);
        if self.show_max {
            sink.draw_text(x, y + 16, &format!("Max: {:.2}", self.max), Color::YELLOW);
        }
    }

    fn number(&self, value: f32) -> String {
        if self.show_decimals {
            format!("{value:.2}")
        } else {
            format!("{value:.0}")
        }
    }
}

// ── Input ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSample {
    pub buttons: u16,
    pub stick_x: i8,
    pub stick_y: i8,
}

/// Button cells: x offset, y offset, mask, label.
const BUTTON_LAYOUT: [(i16, i16, u16, &str); 14] = [
    (0, 0, A_BUTTON, "A"),
    (20, 0, B_BUTTON, "B"),
    (40, 0, Z_TRIG, "Z"),
    (60, 0, START_BUTTON, "S"),
    (0, 20, U_CBUTTONS, "C^"),
    (25, 20, D_CBUTTONS, "Cv"),
    (50, 20, L_CBUTTONS, "C<"),
    (75, 20, R_CBUTTONS, "C>"),
    (0, 40, U_JPAD, "D^"),
    (25, 40, D_JPAD, "Dv"),
    (50, 40, L_JPAD, "D<"),
    (75, 40, R_JPAD, "D>"),
    (0, 60, L_TRIG, "L"),
    (20, 60, R_TRIG, "R"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct InputDisplay {
    pub enabled: bool,
    history:     [InputSample; INPUT_HISTORY_LEN],
    next:        usize,
}

impl InputDisplay {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            history: [InputSample::default(); INPUT_HISTORY_LEN],
            next: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn update(&mut self, input: &InputFrame) {
        if !self.enabled {
            return;
        }
        self.history[self.next] = InputSample {
            buttons: input.buttons_down,
            stick_x: input.stick_x,
            stick_y: input.stick_y,
        };
        self.next = (self.next + 1) % INPUT_HISTORY_LEN;
    }

    /// Recorded frames, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &InputSample> + '_ {
        self.history[self.next..].iter().chain(&self.history[..self.next])
    }

    fn render<S: TextSink + ?Sized>(&self, sink: &mut S, input: &InputFrame) {
        let (x, y) = INPUT_POS;
        for (dx, dy, mask, label) in BUTTON_LAYOUT {
            let color = if input.buttons_down & mask != 0 { Color::WHITE } else { Color::GRAY };
            sink.draw_text(x + dx, y + dy, label, color);
        }
        let stick = format!("Stick: {},{}", input.stick_x, input.stick_y);
        sink.draw_text(x, y + 80, &stick, Color::WHITE);
    }
}

// ── Wallkick ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallkickDisplay {
    pub enabled:       bool,
    pub show_angle:    bool,
    pub frame:         u16,
    pub angle:         i16,
    pub display_timer: u8,
}

impl WallkickDisplay {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ..Self::default() }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Latch the kick while airborne from it, then count the readout down.
    pub fn update(&mut self, actor: &ActorState) {
        if !self.enabled {
            return;
        }
        if actor.action == actions::WALL_KICK_AIR {
            self.frame = actor.action_timer;
            self.angle = actor.face_angle[1];
            self.display_timer = WALLKICK_DISPLAY_FRAMES;
        } else {
            self.display_timer = self.display_timer.saturating_sub(1);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.enabled && self.display_timer > 0
    }

    fn render<S: TextSink + ?Sized>(&self, sink: &mut S) {
        let (x, y) = WALLKICK_POS;
        let text = if self.show_angle {
            format!("Wallkick: F{} A{}", self.frame, self.angle)
        } else {
            format!("Wallkick: Frame {}", self.frame)
        };
        sink.draw_text(x, y, &text, Color::CYAN);
    }
}

// ── Overlay set ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HudOverlay {
    pub show_igt:       bool,
    pub speed:          SpeedDisplay,
    pub input:          InputDisplay,
    pub wallkick:       WallkickDisplay,
    pub debug:          bool,
    pub debug_advanced: bool,
}

impl Default for HudOverlay {
    fn default() -> Self { Self::new(&HudSettings::default()) }
}

impl HudOverlay {
    pub fn new(settings: &HudSettings) -> Self {
        Self {
            show_igt:       settings.show_igt,
            speed:          SpeedDisplay::new(settings),
            input:          InputDisplay::new(settings.input),
            wallkick:       WallkickDisplay::new(settings.wallkick),
            debug:          settings.debug,
            debug_advanced: false,
        }
    }

    pub fn update(&mut self, actor: Option<&ActorState>, input: &InputFrame) {
        if let Some(actor) = actor {
            self.speed.update(actor);
        }
        self.input.update(input);
        if let Some(actor) = actor {
            self.wallkick.update(actor);
        }
    }

    /// Draw every enabled overlay. Actor-based overlays are skipped when
    /// the host has no actor.
    pub fn render<S: TextSink + ?Sized>(
        &self,
        sink: &mut S,
        actor: Option<&ActorState>,
        hud: HudCounters,
        timers: &PracticeTimers,
        input: &InputFrame,
    ) {
        if self.show_igt {
            let (x, y) = TIMER_POS;
            sink.draw_text(x, y, &timers.igt_display(), Color::WHITE);
        }
        if self.input.enabled {
            self.input.render(sink, input);
        }
        let Some(actor) = actor else {
            return;
        };
        if self.speed.enabled {
            self.speed.render(sink, actor);
        }
        if self.wallkick.is_visible() {
            self.wallkick.render(sink);
        }
        if self.debug {
            self.render_debug(sink, actor, hud, timers);
        }
    }

    fn render_debug<S: TextSink + ?Sized>(
        &self,
        sink: &mut S,
        actor: &ActorState,
        hud: HudCounters,
        timers: &PracticeTimers,
    ) {
        let [px, py, pz] = actor.pos;
        let [ax, ay, az] = actor.face_angle;
        let mut lines = vec![
            format!("Pos: {px:.1},{py:.1},{pz:.1}"),
            format!("Angle: {ax},{ay},{az}"),
            format!("Action: {:08X}", actor.action),
        ];
        if self.debug_advanced {
            lines.push(format!("Health: {} Lives: {}", actor.health, hud.lives));
            lines.push(format!("Flags: {:08X}", actor.flags));
            lines.push(format!("Timer: {} State: {}", actor.action_timer, actor.action_state));
            lines.push(format!("Lag: {}", timers.lag_frames));
        }

        let (x, mut y) = DEBUG_POS;
        for line in &lines {
            sink.draw_text(x, y, line, Color::GREEN);
            y += DEBUG_LINE_HEIGHT;
        }
    }
}
