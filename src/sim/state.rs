//! Session state
//!
//! `SimulationContext` owns everything a session needs: the world, the
//! strategy controller, level progress and the seeded RNG. It is created at
//! game start, reset explicitly, and dropped at session end.

use std::fmt;

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::forces::ForceModel;
use super::level::{Level, default_levels, level_for};
use super::strategy::{Action, StrategyController, StrategyState};
use super::world::World;
use crate::settings::Settings;

/// Who drives the bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// The strategy controller acts every tick
    #[default]
    Single,
    /// Reserved for human players; the controller stays idle
    Multi,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::Multi => "multi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" => Some(GameMode::Single),
            "multi" => Some(GameMode::Multi),
            _ => None,
        }
    }
}

/// Commands a UI layer can dispatch by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Start,
    Pause,
    Reset,
}

impl Trigger {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Trigger::Start),
            "pause" => Some(Trigger::Pause),
            "reset" => Some(Trigger::Reset),
            _ => None,
        }
    }
}

/// Status changes surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started(GameMode),
    Paused,
    Resumed,
    Reset,
    LevelUp { level: u32, score: u64 },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Started(GameMode::Single) => write!(f, "Single player game started!"),
            GameEvent::Started(GameMode::Multi) => write!(f, "Multi player game started!"),
            GameEvent::Paused => write!(f, "Game paused"),
            GameEvent::Resumed => write!(f, "Game resumed"),
            GameEvent::Reset => write!(f, "Game reset"),
            GameEvent::LevelUp { .. } => write!(f, "Level up! Score +{}", crate::consts::LEVEL_UP_BONUS),
        }
    }
}

/// Per-body view for displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub angle: f64,
    pub fill: String,
    pub mass: f64,
    pub charge: f64,
    pub spin: f64,
    pub entangled_with: Option<u32>,
}

/// Serializable summary of a session, handed to the UI and the native runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub seed: u64,
    pub time_ticks: u64,
    pub level: u32,
    pub objective: Option<String>,
    pub score: u64,
    pub mode: GameMode,
    pub paused: bool,
    pub strategy: StrategyState,
    pub selected: Option<u32>,
    pub bodies: Vec<BodyView>,
}

/// Complete session state
#[derive(Debug)]
pub struct SimulationContext {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub world: World,
    pub controller: StrategyController,
    pub forces: ForceModel,
    pub levels: Vec<Level>,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    pub mode: GameMode,
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Body picked by the UI for the property panel
    pub selected: Option<BodyId>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl SimulationContext {
    /// Create an idle session; call `start_game` to spawn the first level
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        Self {
            world: World::new(settings.arena_width, settings.arena_height),
            forces: ForceModel::new(settings.breathing),
            settings,
            seed,
            controller: StrategyController::new(),
            levels: default_levels(),
            level: 1,
            score: 0,
            mode: GameMode::Single,
            paused: false,
            time_ticks: 0,
            selected: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn with_levels(mut self, levels: Vec<Level>) -> Self {
        self.levels = levels;
        self
    }

    pub fn current_level(&self) -> Option<&Level> {
        level_for(&self.levels, self.level)
    }

    /// Switch to `level` and respawn its bodies
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.selected = None;
        let count = self.current_level().map_or(0, |l| l.object_count);
        log::info!("Level {}: spawning {} bodies", self.level, count);
        self.world.populate(count, &mut self.rng);
    }

    pub fn start_game(&mut self, mode: GameMode) {
        log::info!("Starting game in {} mode", mode.as_str());
        self.mode = mode;
        self.set_level(self.level);
        self.paused = false;
        self.push_event(GameEvent::Started(mode));
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.push_event(if self.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
    }

    pub fn reset_game(&mut self) {
        log::info!("Resetting game");
        self.world.clear();
        self.score = 0;
        self.level = 1;
        self.paused = false;
        self.time_ticks = 0;
        self.controller.reset();
        self.start_game(self.mode);
        self.push_event(GameEvent::Reset);
    }

    pub fn internal_trigger(&mut self, trigger: Trigger, mode: GameMode) {
        log::info!("Internal trigger: {:?}, mode: {}", trigger, mode.as_str());
        match trigger {
            Trigger::Start => self.start_game(mode),
            Trigger::Pause => self.toggle_pause(),
            Trigger::Reset => self.reset_game(),
        }
    }

    /// String form of `internal_trigger`. Unknown names are logged and ignored.
    pub fn internal_trigger_str(&mut self, trigger: &str, mode: &str) -> bool {
        let Some(trigger) = Trigger::from_str(trigger) else {
            log::warn!("Invalid trigger: {}", trigger);
            return false;
        };
        let mode = GameMode::from_str(mode).unwrap_or(self.mode);
        self.internal_trigger(trigger, mode);
        true
    }

    /// Run one frame tick
    pub fn update_game(&mut self) -> Option<Action> {
        super::tick::update_game(self)
    }

    pub fn entangle_objects(&mut self, a: BodyId, b: BodyId) -> bool {
        self.world.entangle(a, b)
    }

    /// Pick the body under `point` (None clears the selection)
    pub fn select_at(&mut self, point: DVec2) -> Option<BodyId> {
        self.selected = self.world.query_point(point);
        self.selected
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let bodies = self
            .world
            .bodies()
            .iter()
            .map(|b| BodyView {
                id: b.id.0,
                x: b.pos.x,
                y: b.pos.y,
                radius: b.radius,
                angle: b.angle,
                fill: b.fill.to_hex(),
                mass: b.properties.mass,
                charge: b.properties.charge,
                spin: b.properties.spin,
                entangled_with: self.world.partner(b.id).map(|p| p.0),
            })
            .collect();

        SessionSnapshot {
            seed: self.seed,
            time_ticks: self.time_ticks,
            level: self.level,
            objective: self.current_level().map(|l| l.objective.clone()),
            score: self.score,
            mode: self.mode,
            paused: self.paused,
            strategy: self.controller.state.clone(),
            selected: self.selected.map(|id| id.0),
            bodies,
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        log::info!("Status: {}", event);
        self.events.push(event);
    }

    /// Take all events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SimulationContext {
        SimulationContext::new(Settings::default(), 1234)
    }

    #[test]
    fn test_start_spawns_level_one() {
        let mut ctx = context();
        assert!(ctx.world.is_empty());
        ctx.start_game(GameMode::Single);
        assert_eq!(ctx.world.len(), 5);
        assert_eq!(ctx.world.entanglement().len(), 2);
        assert_eq!(ctx.drain_events(), vec![GameEvent::Started(GameMode::Single)]);
        assert!(ctx.drain_events().is_empty());
    }

    #[test]
    fn test_toggle_pause_events() {
        let mut ctx = context();
        ctx.toggle_pause();
        assert!(ctx.paused);
        ctx.toggle_pause();
        assert!(!ctx.paused);
        assert_eq!(ctx.drain_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut ctx = context();
        ctx.start_game(GameMode::Multi);
        ctx.score = 50;
        ctx.set_level(2);
        ctx.paused = true;
        ctx.controller.adapt(0.95);

        ctx.reset_game();
        assert_eq!(ctx.score, 0);
        assert_eq!(ctx.level, 1);
        assert!(!ctx.paused);
        assert_eq!(ctx.mode, GameMode::Multi);
        assert_eq!(ctx.world.len(), 5);
        assert!(ctx.controller.state.performance_history.is_empty());
        assert_eq!(ctx.controller.state.exploration_rate, 0.1);
        assert_eq!(ctx.drain_events().last(), Some(&GameEvent::Reset));
    }

    #[test]
    fn test_internal_trigger_str() {
        let mut ctx = context();
        assert!(ctx.internal_trigger_str("start", "multi"));
        assert_eq!(ctx.mode, GameMode::Multi);
        assert!(ctx.internal_trigger_str("PAUSE", ""));
        assert!(ctx.paused);
        assert!(!ctx.internal_trigger_str("explode", "single"));
        assert!(ctx.paused);
    }

    #[test]
    fn test_entangle_objects_symmetric() {
        let mut ctx = context();
        ctx.start_game(GameMode::Single);
        let ids: Vec<_> = ctx.world.bodies().iter().map(|b| b.id).collect();
        assert!(ctx.entangle_objects(ids[4], ids[0]));
        assert_eq!(ctx.world.partner(ids[4]), Some(ids[0]));
        assert_eq!(ctx.world.partner(ids[0]), Some(ids[4]));
        assert_eq!(ctx.world.partner(ids[1]), None);
    }

    #[test]
    fn test_select_at() {
        let mut ctx = context();
        ctx.start_game(GameMode::Single);
        let body = ctx.world.bodies()[2].clone();
        assert!(ctx.select_at(body.pos).is_some());
        assert_eq!(ctx.select_at(DVec2::new(-1e6, -1e6)), None);
        assert_eq!(ctx.selected, None);
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(GameEvent::LevelUp { level: 2, score: 10 }.to_string(), "Level up! Score +10");
        assert_eq!(GameEvent::Started(GameMode::Multi).to_string(), "Multi player game started!");
    }

    #[test]
    fn test_snapshot_reports_entanglement() {
        let mut ctx = context();
        ctx.start_game(GameMode::Single);
        let snapshot = ctx.snapshot();

        assert_eq!(snapshot.bodies.len(), 5);
        assert_eq!(snapshot.objective.as_deref(), Some("Merge all objects"));
        let first = &snapshot.bodies[0];
        let second = &snapshot.bodies[1];
        assert_eq!(first.entangled_with, Some(second.id));
        assert_eq!(second.entangled_with, Some(first.id));
        assert_eq!(snapshot.bodies[4].entangled_with, None);
        assert!(first.fill.starts_with('#') && first.fill.len() == 7);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"strategy\""));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(GameMode::from_str("Single"), Some(GameMode::Single));
        assert_eq!(GameMode::from_str("co-op"), None);
    }
}
