//! A tiny stand-in simulation for exercising the practice layer headless.
//!
//! The actor walks with the stick, a handful of walkers patrol back and
//! forth, and the camera trails the actor. Level resets put the actor back
//! at the level spawn; soft resets return to the castle.

use savestate_core::{
    behavior::{BehaviorKind, BehaviorRegistry},
    host::{
        actions, ActorState, AudioCue, CameraState, HudCounters, LiveObject, SimulationHandle,
        StageKind, StageState,
    },
    input::InputFrame,
    types::{AreaIndex, BehaviorId, LevelId, Scope},
};

const NUM_LISTS: usize = 3;
const WALK_SPEED: f32 = 12.0;
const PATROL_SPEED: f32 = 2.0;
const PATROL_PERIOD: u32 = 60;
const CAMERA_OFFSET: [f32; 3] = [0.0, 300.0, -600.0];
const SPAWN: [f32; 3] = [0.0, 0.0, 0.0];

pub struct DemoHost {
    actor:    ActorState,
    camera:   CameraState,
    scope:    Scope,
    hud:      HudCounters,
    stage:    StageState,
    registry: BehaviorRegistry,
    lists:    Vec<Vec<LiveObject>>,
    frame:    u32,
    walker:   BehaviorId,
    player:   BehaviorId,
    pub level_resets: u32,
    pub soft_resets:  u32,
}

impl DemoHost {
    pub fn new(level: LevelId, area: AreaIndex) -> Self {
        let mut registry = BehaviorRegistry::new();
        let player = registry.register("player", BehaviorKind::Player);
        registry.register("camera_pivot", BehaviorKind::CameraPivot);
        registry.register("tree", BehaviorKind::StaticDecoration);
        let walker = registry.register("walker", BehaviorKind::Dynamic);

        let mut host = Self {
            actor:    ActorState::default(),
            camera:   CameraState::default(),
            scope:    Scope::new(level, area),
            hud:      HudCounters { timer: 0, coins: 0, lives: 4 },
            stage:    StageState::None,
            registry,
            lists:    vec![Vec::new(); NUM_LISTS],
            frame:    0,
            walker,
            player,
            level_resets: 0,
            soft_resets:  0,
        };
        host.load_level(level, area);
        host
    }

    /// Replace the level contents with a fresh layout.
    pub fn load_level(&mut self, level: LevelId, area: AreaIndex) {
        self.scope = Scope::new(level, area);
        self.stage = initial_stage(StageKind::for_level(level));
        self.actor = ActorState {
            pos:    SPAWN,
            health: 8,
            action: actions::IDLE,
            ..ActorState::default()
        };
        self.follow_actor();

        for list in &mut self.lists {
            list.clear();
        }
        self.lists[0].push(live(self.player, SPAWN));
        for i in 0..4 {
            let pos = [400.0 * (i as f32 + 1.0), 0.0, 250.0 * i as f32];
            self.lists[1 + i % 2].push(live(self.walker, pos));
        }
    }

    /// Advance one simulated frame.
    pub fn step(&mut self, input: &InputFrame) {
        self.frame = self.frame.wrapping_add(1);
        if self.frame % 30 == 0 {
            self.hud.timer = self.hud.timer.wrapping_add(1);
        }

        let (sx, sy) = (f32::from(input.stick_x) / 64.0, f32::from(input.stick_y) / 64.0);
        if sx.abs() > 0.1 || sy.abs() > 0.1 {
            self.actor.action = actions::WALKING;
            self.actor.vel = [sx * WALK_SPEED, 0.0, sy * WALK_SPEED];
            self.actor.forward_vel = self.actor.horizontal_speed();
            self.actor.face_angle[1] = (sx.atan2(sy) / std::f32::consts::TAU * 65536.0) as i32 as i16;
        } else {
            self.actor.action = actions::IDLE;
            self.actor.vel = [0.0; 3];
            self.actor.forward_vel = 0.0;
        }
        for axis in 0..3 {
            self.actor.pos[axis] += self.actor.vel[axis];
        }
        self.lists[0][0].pos = self.actor.pos;

        let direction = if (self.frame / PATROL_PERIOD) % 2 == 0 { PATROL_SPEED } else { -PATROL_SPEED };
        let walker = self.walker;
        self.lists
            .iter_mut()
            .flatten()
            .filter(|o| o.active && o.behavior == Some(walker))
            .for_each(|o| {
                o.pos[0] += direction;
                o.action = u32::from(direction > 0.0);
            });

        if let StageState::Water { height, state } = &mut self.stage {
            if self.frame % 30 == 0 && *state == 1 {
                *height = height.saturating_add(4);
            }
        }

        self.follow_actor();
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn actor_state(&self) -> &ActorState {
        &self.actor
    }

    /// Dynamic objects by registered name, in list order.
    pub fn walker_positions(&self) -> Vec<(&str, [f32; 3])> {
        self.lists
            .iter()
            .flatten()
            .filter(|o| o.active)
            .filter_map(|o| {
                let id = o.behavior?;
                if self.registry.is_excluded(id) {
                    return None;
                }
                Some((self.registry.name(id).unwrap_or("unknown"), o.pos))
            })
            .collect()
    }

    fn follow_actor(&mut self) {
        let p = self.actor.pos;
        self.camera.focus = p;
        self.camera.pos = [p[0] + CAMERA_OFFSET[0], p[1] + CAMERA_OFFSET[1], p[2] + CAMERA_OFFSET[2]];
    }
}

fn live(behavior: BehaviorId, pos: [f32; 3]) -> LiveObject {
    LiveObject {
        active: true,
        behavior: Some(behavior),
        pos,
        health: 1,
        ..LiveObject::default()
    }
}

fn initial_stage(kind: StageKind) -> StageState {
    match kind {
        StageKind::None      => StageState::None,
        StageKind::Clock     => StageState::Clock { setting: 0, frame: 0 },
        StageKind::Water     => StageState::Water { height: -256, state: 1 },
        StageKind::Submarine => StageState::Submarine { position: 0, state: 0 },
        StageKind::Mist      => StageState::Mist { enabled: true },
    }
}

impl SimulationHandle for DemoHost {
    fn actor(&self) -> Option<&ActorState> {
        Some(&self.actor)
    }

    fn actor_mut(&mut self) -> Option<&mut ActorState> {
        Some(&mut self.actor)
    }

    fn actor_restored(&mut self) {
        self.lists[0][0].pos = self.actor.pos;
    }

    fn camera(&self) -> Option<&CameraState> {
        Some(&self.camera)
    }

    fn camera_mut(&mut self) -> Option<&mut CameraState> {
        Some(&mut self.camera)
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn hud(&self) -> HudCounters {
        self.hud
    }

    fn set_hud(&mut self, hud: HudCounters) {
        self.hud = hud;
    }

    fn stage_state(&self, kind: StageKind) -> StageState {
        if self.stage.kind() == kind { self.stage } else { StageState::None }
    }

    fn set_stage_state(&mut self, state: StageState) {
        self.stage = state;
    }

    fn behaviors(&self) -> &BehaviorRegistry {
        &self.registry
    }

    fn object_list_count(&self) -> usize {
        self.lists.len()
    }

    fn object_list(&self, list: usize) -> &[LiveObject] {
        &self.lists[list]
    }

    fn object_list_mut(&mut self, list: usize) -> &mut [LiveObject] {
        &mut self.lists[list]
    }

    fn play_cue(&mut self, cue: AudioCue) {
        log::info!("cue: {cue:?}");
    }

    fn request_level_reset(&mut self) {
        self.level_resets += 1;
        self.load_level(self.scope.level, self.scope.area);
    }

    fn request_soft_reset(&mut self) {
        self.soft_resets += 1;
        self.hud = HudCounters { timer: 0, coins: 0, lives: 4 };
        self.load_level(LevelId::CASTLE, 1);
    }
}
