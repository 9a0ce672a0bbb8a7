//! Adaptive strategy controller
//!
//! Epsilon-greedy action selection over a fixed set of five actions. After
//! each action a performance sample in [0, 1] is recorded; the mean of the
//! last ten samples picks the strategy label and the exploration rate.
//!
//! Thresholds are recomputed every tick with no hysteresis, so the label can
//! flip back and forth while the mean sits near 0.3 or 0.7.

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::world::World;
use crate::consts::*;
use crate::normalize_angle;

/// Capacity of the performance history
pub const HISTORY_CAPACITY: usize = 10;
/// Initial exploration rate
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.1;
/// Initial learning rate
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
/// Learning rate multiplier per adaptation
pub const LEARNING_RATE_DECAY: f64 = 0.99;
/// Learning rate never decays below this
pub const MIN_LEARNING_RATE: f64 = 0.001;

/// The five things the controller can do to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Interact with the nearest other body
    Merge,
    /// Replace the body with two smaller children
    Split,
    /// Velocity x1.5
    Accelerate,
    /// Velocity x0.5
    Decelerate,
    /// Orientation +π/4
    Rotate,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Merge,
        ActionKind::Split,
        ActionKind::Accelerate,
        ActionKind::Decelerate,
        ActionKind::Rotate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Merge => "merge",
            ActionKind::Split => "split",
            ActionKind::Accelerate => "accelerate",
            ActionKind::Decelerate => "decelerate",
            ActionKind::Rotate => "rotate",
        }
    }
}

/// One action against one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub target: BodyId,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.target)
    }
}

/// Coarse strategy derived from recent performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrategyLabel {
    /// Before the first adaptation
    #[default]
    Random,
    Exploratory,
    Balanced,
    Exploitative,
}

impl StrategyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyLabel::Random => "random",
            StrategyLabel::Exploratory => "exploratory",
            StrategyLabel::Balanced => "balanced",
            StrategyLabel::Exploitative => "exploitative",
        }
    }
}

/// Self-tuning controller parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyState {
    /// In (0, 1]
    pub exploration_rate: f64,
    pub learning_rate: f64,
    pub label: StrategyLabel,
    /// Oldest first, at most HISTORY_CAPACITY samples
    pub performance_history: VecDeque<f64>,
}

impl Default for StrategyState {
    fn default() -> Self {
        Self {
            exploration_rate: DEFAULT_EXPLORATION_RATE,
            learning_rate: DEFAULT_LEARNING_RATE,
            label: StrategyLabel::Random,
            performance_history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }
}

impl StrategyState {
    /// Record a performance sample and retune from the moving average
    pub fn adapt(&mut self, performance: f64) {
        self.performance_history.push_back(performance);
        while self.performance_history.len() > HISTORY_CAPACITY {
            self.performance_history.pop_front();
        }

        let mean = self.mean_performance().unwrap_or(performance);
        let (label, exploration_rate) = if mean < 0.3 {
            (StrategyLabel::Exploratory, 0.3)
        } else if mean < 0.7 {
            (StrategyLabel::Balanced, 0.1)
        } else {
            (StrategyLabel::Exploitative, 0.05)
        };
        if label != self.label {
            log::debug!(
                "Strategy {} -> {} (mean performance {:.3})",
                self.label.as_str(),
                label.as_str(),
                mean
            );
        }
        self.label = label;
        self.exploration_rate = exploration_rate;

        self.learning_rate = (self.learning_rate * LEARNING_RATE_DECAY).max(MIN_LEARNING_RATE);
    }

    /// Arithmetic mean of the history
    pub fn mean_performance(&self) -> Option<f64> {
        if self.performance_history.is_empty() {
            return None;
        }
        let sum: f64 = self.performance_history.iter().sum();
        Some(sum / self.performance_history.len() as f64)
    }
}

/// Chooses an action when the controller is exploiting
pub trait ExploitPolicy {
    fn best_action(&mut self, world: &World, rng: &mut dyn RngCore) -> Option<Action>;
}

/// Scores the outcome of an action, in [0, 1]
pub trait PerformanceEvaluator {
    fn evaluate(&mut self, action: &Action, world: &World, rng: &mut dyn RngCore) -> f64;
}

/// Called when a merge finds a partner
pub trait InteractionHook {
    fn interact(&mut self, world: &mut World, a: BodyId, b: BodyId);
}

/// Exploitation placeholder: no learned policy exists, so it explores
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFallback;

impl ExploitPolicy for RandomFallback {
    fn best_action(&mut self, world: &World, rng: &mut dyn RngCore) -> Option<Action> {
        explore_random_action(world, rng)
    }
}

/// Performance placeholder: a uniform draw
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomScore;

impl PerformanceEvaluator for RandomScore {
    fn evaluate(&mut self, _action: &Action, _world: &World, rng: &mut dyn RngCore) -> f64 {
        rng.random::<f64>()
    }
}

/// Merge placeholder: logs the pair and leaves the world untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct LogInteraction;

impl InteractionHook for LogInteraction {
    fn interact(&mut self, _world: &mut World, a: BodyId, b: BodyId) {
        log::debug!("Bodies {} and {} interacting", a, b);
    }
}

/// Uniform action kind against a uniform target; None when the world is empty
pub fn explore_random_action<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Option<Action> {
    let bodies = world.bodies();
    if bodies.is_empty() {
        return None;
    }
    let kind = ActionKind::ALL[rng.random_range(0..ActionKind::ALL.len())];
    let target = bodies[rng.random_range(0..bodies.len())].id;
    Some(Action { kind, target })
}

/// Epsilon-greedy controller with pluggable exploitation, scoring and merge behaviour
pub struct StrategyController {
    pub state: StrategyState,
    exploit: Box<dyn ExploitPolicy>,
    evaluator: Box<dyn PerformanceEvaluator>,
    interaction: Box<dyn InteractionHook>,
}

impl fmt::Debug for StrategyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for StrategyController {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyController {
    pub fn new() -> Self {
        Self {
            state: StrategyState::default(),
            exploit: Box::new(RandomFallback),
            evaluator: Box::new(RandomScore),
            interaction: Box::new(LogInteraction),
        }
    }

    pub fn with_exploit_policy(mut self, policy: impl ExploitPolicy + 'static) -> Self {
        self.exploit = Box::new(policy);
        self
    }

    pub fn with_evaluator(mut self, evaluator: impl PerformanceEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn with_interaction_hook(mut self, hook: impl InteractionHook + 'static) -> Self {
        self.interaction = Box::new(hook);
        self
    }

    /// Back to default parameters and an empty history; plug-ins are kept
    pub fn reset(&mut self) {
        self.state = StrategyState::default();
    }

    /// Explore with probability `exploration_rate`, otherwise exploit
    pub fn select_action(&mut self, world: &World, rng: &mut dyn RngCore) -> Option<Action> {
        if rng.random::<f64>() < self.state.exploration_rate {
            explore_random_action(world, rng)
        } else {
            self.exploit.best_action(world, rng)
        }
    }

    /// Select and apply one action. None when there was nothing to act on.
    pub fn step(&mut self, world: &mut World, rng: &mut dyn RngCore) -> Option<Action> {
        let action = self.select_action(world, rng)?;
        self.apply_action(world, &action);
        Some(action)
    }

    /// Returns false when the action had no effect (missing target, no partner, too small to split)
    pub fn apply_action(&mut self, world: &mut World, action: &Action) -> bool {
        let target = action.target;
        match action.kind {
            ActionKind::Merge => match world.nearest(target) {
                Some(other) => {
                    self.interaction.interact(world, target, other);
                    true
                }
                None => false,
            },
            ActionKind::Split => world.split(target).is_some(),
            ActionKind::Accelerate => scale_velocity(world, target, ACCELERATE_FACTOR),
            ActionKind::Decelerate => scale_velocity(world, target, DECELERATE_FACTOR),
            ActionKind::Rotate => match world.get_mut(target) {
                Some(body) => {
                    body.angle = normalize_angle(body.angle + ROTATE_STEP);
                    true
                }
                None => false,
            },
        }
    }

    /// Score the action's outcome, clamped to [0, 1]
    pub fn record_performance(
        &mut self,
        action: &Action,
        world: &World,
        rng: &mut dyn RngCore,
    ) -> f64 {
        self.evaluator.evaluate(action, world, rng).clamp(0.0, 1.0)
    }

    pub fn adapt(&mut self, performance: f64) {
        self.state.adapt(performance);
    }

    /// step → record_performance → adapt
    pub fn run(&mut self, world: &mut World, rng: &mut dyn RngCore) -> Option<Action> {
        let action = self.step(world, rng)?;
        let performance = self.record_performance(&action, world, rng);
        self.adapt(performance);
        log::trace!("AI {} scored {:.3}", action, performance);
        Some(action)
    }
}

fn scale_velocity(world: &mut World, id: BodyId, factor: f64) -> bool {
    match world.get_mut(id) {
        Some(body) => {
            body.vel *= factor;
            true
        }
        None => false,
    }
}
