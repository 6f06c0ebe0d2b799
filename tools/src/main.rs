//! practice-runner: headless driver for the savestate practice layer.
//!
//! Usage:
//!   practice-runner --frames 240
//!   practice-runner --config practice.json --ipc-mode

mod demo_host;

use anyhow::{Context, Result};
use demo_host::DemoHost;
use savestate_core::{
    config::PracticeConfig,
    event::PracticeEvent,
    host::SimulationHandle,
    hud::{Color, TextSink},
    input::InputFrame,
    session::PracticeSession,
    store::MAX_SAVESTATES,
    types::{Frame, LevelId, Scope},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Frame {
        #[serde(default)]
        held: u16,
        #[serde(default)]
        stick_x: i8,
        #[serde(default)]
        stick_y: i8,
        #[serde(default = "one")]
        count: u32,
    },
    EnterLevel {
        level: u16,
        #[serde(default = "one_area")]
        area: u16,
    },
    Star,
    /// The host dropped `count` frames.
    Lag {
        #[serde(default = "one")]
        count: u32,
    },
    ToggleOverlay {
        overlay: Overlay,
    },
    Quit,
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum Overlay {
    Igt,
    Speed,
    Input,
    Wallkick,
    Debug,
    DebugAdvanced,
}

fn one() -> u32 { 1 }
fn one_area() -> u16 { 1 }

#[derive(serde::Serialize)]
struct UiState {
    frame:       Frame,
    igt:         String,
    scope:       Scope,
    actor_pos:   [f32; 3],
    actor_speed: f32,
    freecam:     bool,
    attempts:    u32,
    lag_frames:  u32,
    slots:       Vec<Option<String>>,
    hud:         Vec<HudLine>,
    events:      Vec<PracticeEvent>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct HudLine {
    x:     i16,
    y:     i16,
    text:  String,
    color: Color,
}

/// Collects the overlay text a real host would draw this frame.
#[derive(Default)]
struct HudCapture(Vec<HudLine>);

impl TextSink for HudCapture {
    fn draw_text(&mut self, x: i16, y: i16, text: &str, color: Color) {
        self.0.push(HudLine { x, y, text: text.to_string(), color });
    }
}

/// Session plus host plus the held mask from the previous frame.
struct Runner {
    session:   PracticeSession,
    host:      DemoHost,
    prev_held: u16,
}

impl Runner {
    fn new(config: PracticeConfig) -> Self {
        Self {
            session:   PracticeSession::new(config),
            host:      DemoHost::new(LevelId::WDW, 1),
            prev_held: 0,
        }
    }

    fn frame(&mut self, held: u16, stick_x: i8, stick_y: i8) -> Vec<PracticeEvent> {
        let input = InputFrame {
            stick_x,
            stick_y,
            ..InputFrame::from_held(held, self.prev_held)
        };
        self.prev_held = held;
        self.host.step(&input);
        let events = self.session.update(&mut self.host, &input);
        for event in &events {
            log::debug!("{}: {}", event.type_name(), serde_json::to_string(event).unwrap_or_default());
        }
        events
    }

    fn enter_level(&mut self, level: LevelId, area: u16) -> PracticeEvent {
        self.host.load_level(level, area);
        self.session.enter_level()
    }

    fn toggle_overlay(&mut self, overlay: Overlay) {
        let hud = &mut self.session.hud;
        match overlay {
            Overlay::Igt           => hud.show_igt = !hud.show_igt,
            Overlay::Speed         => hud.speed.toggle(),
            Overlay::Input         => hud.input.toggle(),
            Overlay::Wallkick      => hud.wallkick.toggle(),
            Overlay::Debug         => hud.debug = !hud.debug,
            Overlay::DebugAdvanced => hud.debug_advanced = !hud.debug_advanced,
        }
        log::debug!("toggled {overlay:?} overlay");
    }

    fn ui_state(&self, events: Vec<PracticeEvent>) -> UiState {
        let actor = self.host.actor_state();
        let mut hud = HudCapture::default();
        self.session.render(&self.host, &mut hud);
        UiState {
            frame:       self.host.frame(),
            igt:         self.session.timers.igt_display(),
            scope:       self.host.scope(),
            actor_pos:   actor.pos,
            actor_speed: actor.horizontal_speed(),
            freecam:     self.session.freecam_enabled(),
            attempts:    self.session.timers.attempts,
            lag_frames:  self.session.timers.lag_frames,
            slots:       (0..MAX_SAVESTATES)
                .map(|slot| self.session.engine.slot_summary(slot).map(|s| s.to_string()))
                .collect(),
            hud:         hud.0,
            events,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let frames = parse_arg(&args, "--frames", 240u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let config = match config_path {
        Some(path) => PracticeConfig::load(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => PracticeConfig::default(),
    };

    if !ipc_mode {
        println!("practice-runner");
        println!("  frames:    {frames}");
        println!("  config:    {}", config_path.unwrap_or("(defaults)"));
        println!("  save 1:    {}", config.combos.save_slot_1);
        println!("  load 1:    {}", config.combos.load_slot_1);
        println!();
    }

    let mut runner = Runner::new(config);

    if ipc_mode {
        run_ipc_loop(&mut runner)?;
    } else {
        let events = run_scripted(&mut runner, frames);
        print_summary(&runner, &events);
    }

    Ok(())
}

fn run_ipc_loop(runner: &mut Runner) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Vec::new(),
            IpcCommand::Frame { held, stick_x, stick_y, count } => (0..count)
                .flat_map(|_| runner.frame(held, stick_x, stick_y))
                .collect(),
            IpcCommand::EnterLevel { level, area } => vec![runner.enter_level(LevelId(level), area)],
            IpcCommand::Star => runner
                .session
                .star_collected(&mut runner.host)
                .into_iter()
                .collect(),
            IpcCommand::Lag { count } => {
                (0..count).for_each(|_| runner.session.lag_frame());
                Vec::new()
            }
            IpcCommand::ToggleOverlay { overlay } => {
                runner.toggle_overlay(overlay);
                Vec::new()
            }
        };
        let state = runner.ui_state(events);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Walk right, save, keep walking, then load twice. The walkers patrol
/// the whole time, so the second half of the run exercises matching.
fn run_scripted(runner: &mut Runner, frames: u32) -> Vec<PracticeEvent> {
    let save = runner.session.combos().save_slot_1.0;
    let load = runner.session.combos().load_slot_1.0;
    let quarter = (frames / 4).max(1);

    let mut events = Vec::new();
    for frame in 0..frames {
        let held = if frame == quarter {
            save
        } else if frame == quarter * 3 || frame + 1 == frames {
            load
        } else {
            0
        };
        let stick_x = if frame < quarter * 3 { 48 } else { 0 };
        events.extend(runner.frame(held, stick_x, 0));
    }

    // Release, then a level reset through its combo.
    let reset = runner.session.combos().level_reset.0;
    events.extend(runner.frame(0, 0, 0));
    events.extend(runner.frame(reset, 0, 0));
    events
}

fn print_summary(runner: &Runner, events: &[PracticeEvent]) {
    let state = runner.ui_state(Vec::new());

    println!("=== RUN SUMMARY ===");
    println!("  frames run:     {}", state.frame);
    println!("  igt:            {}", state.igt);
    println!("  scope:          {}", state.scope);
    println!(
        "  actor pos:      ({:.2}, {:.2}, {:.2})",
        state.actor_pos[0], state.actor_pos[1], state.actor_pos[2]
    );
    println!("  attempts:       {}", state.attempts);
    println!("  lag frames:     {}", state.lag_frames);
    println!("  level resets:   {}", runner.host.level_resets);
    println!("  soft resets:    {}", runner.host.soft_resets);

    println!();
    println!("=== EVENTS ===");
    if events.is_empty() {
        println!("  (none)");
    }
    for event in events {
        match event {
            PracticeEvent::StateSaved { frame, slot, objects_saved, objects_dropped, .. } => println!(
                "  {frame:>5} | saved slot {slot} | {objects_saved} objects, {objects_dropped} dropped"
            ),
            PracticeEvent::StateLoaded { frame, slot, objects_matched } => println!(
                "  {frame:>5} | loaded slot {slot} | {} objects matched",
                objects_matched.map_or_else(|| "-".to_string(), |n| n.to_string())
            ),
            other => println!("  {:>5} | {}", other.frame(), other.type_name()),
        }
    }

    println!();
    println!("=== SLOTS ===");
    for (slot, summary) in state.slots.iter().enumerate() {
        match summary {
            Some(text) => println!("{text}"),
            None => println!("Slot {slot}: empty"),
        }
    }

    println!();
    println!("=== WALKERS ===");
    for (name, pos) in runner.host.walker_positions() {
        println!("  {name:<8} ({:.2}, {:.2}, {:.2})", pos[0], pos[1], pos[2]);
    }

    println!();
    println!("=== HUD ===");
    if state.hud.is_empty() {
        println!("  (no overlays enabled)");
    }
    for line in &state.hud {
        println!("  ({:>3}, {:>3}) {}", line.x, line.y, line.text);
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
