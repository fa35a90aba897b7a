//! Level definitions
//!
//! Levels are pure data: the engine code path is the same for all of them.
//! Built-in levels mirror the four islands of the game; custom levels can be
//! loaded from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CAPTURE_RADIUS, PATH_EPSILON, TILE_SIZE};
use crate::error::{Error, Result};
use crate::sim::{Command, Constraint, ObjectiveSpec, Pose, Span, Target, TiledPath};

/// When a level counts as solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// Objective sequence performed and the whole program executed
    #[default]
    Objective,
    /// Objective performed and every required target collected
    ObjectiveAndTargets,
    /// Every required target collected; objective tracked for display only
    TargetsOnly,
}

impl CompletionRule {
    /// `program_done` is true on the tick that executes the last command
    pub fn is_met(&self, objective_satisfied: bool, targets_collected: bool, program_done: bool) -> bool {
        match self {
            CompletionRule::Objective => objective_satisfied && program_done,
            CompletionRule::ObjectiveAndTargets => objective_satisfied && targets_collected,
            CompletionRule::TargetsOnly => targets_collected,
        }
    }
}

/// Static per-level parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: String,
    pub title: String,
    pub step_distance: f32,
    pub start: Pose,
    pub constraint: Constraint,
    #[serde(default)]
    pub targets: Vec<Target>,
    pub objective: ObjectiveSpec,
    #[serde(default)]
    pub completion: CompletionRule,
}

impl LevelConfig {
    /// Reject configs no run could make sense of
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(Error::InvalidLevelConfig(format!("{}: {}", self.id, reason)));

        if let Err(reason) = self.objective.validate() {
            return invalid(reason);
        }
        if !(self.step_distance.is_finite() && self.step_distance > 0.0) {
            return invalid("step distance must be positive".to_string());
        }
        if let Some(t) = self.targets.iter().find(|t| !(t.radius.is_finite() && t.radius > 0.0)) {
            return invalid(format!("target '{}' radius must be positive", t.name));
        }
        if !(self.start.x.is_finite() && self.start.z.is_finite() && self.start.heading.is_finite()) {
            return invalid("start pose must be finite".to_string());
        }
        let has_required = self.targets.iter().any(|t| t.required);
        match self.completion {
            CompletionRule::TargetsOnly if !has_required => {
                return invalid("targets-only completion needs a required target".to_string());
            }
            CompletionRule::ObjectiveAndTargets if !has_required => {
                return invalid("objective-and-targets completion needs a required target".to_string());
            }
            _ => {}
        }
        if let Err(reason) = self.constraint.validate() {
            return invalid(reason);
        }
        if let Constraint::Path(path) = &self.constraint {
            if path.turn_stage >= self.objective.len() {
                return invalid("path turn stage is past the last objective group".to_string());
            }
        }
        if !self.constraint.is_legal(self.start.position(), 0) {
            return invalid("start pose violates the level constraint".to_string());
        }
        Ok(())
    }

    /// Parse and validate a level from JSON; the start heading is wrapped
    /// into (-π, π]
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        config.start = Pose::new(config.start.x, config.start.z, config.start.heading);
        log::info!("Loaded level '{}' from JSON", config.id);
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a built-in level
    pub fn builtin(id: &str) -> Result<Self> {
        let config = match id {
            "level1" => level1(),
            "level2" => level2(),
            "level3" => level3(),
            "level4" => level4(),
            _ => return Err(Error::UnknownLevel(id.to_string())),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Ids of the built-in levels in play order
pub const BUILTIN_LEVELS: [&str; 4] = ["level1", "level2", "level3", "level4"];

/// Level that follows `id`, if any
pub fn next_level(id: &str) -> Option<&'static str> {
    let i = BUILTIN_LEVELS.iter().position(|l| *l == id)?;
    BUILTIN_LEVELS.get(i + 1).copied()
}

/// Swim three tiles forward across the open platform
fn level1() -> LevelConfig {
    LevelConfig {
        id: "level1".to_string(),
        title: "First Strokes".to_string(),
        step_distance: TILE_SIZE,
        start: Pose::new(1.0, -1.6, 0.0),
        constraint: Constraint::Box {
            x: Span::new(-5.0, 15.0),
            z: Span::new(-8.0, 8.0),
        },
        targets: Vec::new(),
        objective: ObjectiveSpec::new(&[(Command::Forward, 3)]),
        completion: CompletionRule::Objective,
    }
}

/// Follow the walkway: three tiles along the row, then turn right onto the
/// column
fn level2() -> LevelConfig {
    LevelConfig {
        id: "level2".to_string(),
        title: "The Bend".to_string(),
        step_distance: TILE_SIZE,
        start: Pose::new(-3.5, -6.0, 0.0),
        constraint: Constraint::Path(TiledPath {
            row_z: -6.0,
            columns: Span::new(-3.5, 10.0),
            turn_column_x: 10.0,
            rows: Span::new(-15.0, -6.0),
            turn_stage: 1,
            epsilon: PATH_EPSILON,
        }),
        targets: Vec::new(),
        objective: ObjectiveSpec::new(&[(Command::Forward, 3), (Command::TurnRight, 1)]),
        completion: CompletionRule::Objective,
    }
}

/// Two forward, turn right, one forward onto the key
fn level3() -> LevelConfig {
    LevelConfig {
        id: "level3".to_string(),
        title: "The Lost Key".to_string(),
        step_distance: TILE_SIZE,
        start: Pose::new(-2.0, -4.0, 0.0),
        constraint: Constraint::Box {
            x: Span::new(-8.0, 8.0),
            z: Span::new(-10.0, 8.0),
        },
        targets: vec![Target::new("key", Vec2::new(7.0, -8.5), CAPTURE_RADIUS)],
        objective: ObjectiveSpec::new(&[
            (Command::Forward, 2),
            (Command::TurnRight, 1),
            (Command::Forward, 1),
        ]),
        completion: CompletionRule::ObjectiveAndTargets,
    }
}

/// Collect all three coins, in any route that stays on the reef
fn level4() -> LevelConfig {
    LevelConfig {
        id: "level4".to_string(),
        title: "Coin Reef".to_string(),
        step_distance: TILE_SIZE,
        start: Pose::new(1.0, -1.6, 0.0),
        constraint: Constraint::Box {
            x: Span::new(-5.0, 30.0),
            z: Span::new(-8.0, 12.0),
        },
        targets: vec![
            Target::new("coin_1", Vec2::new(15.0, -1.6), 2.0),
            Target::new("coin_2", Vec2::new(28.0, -1.6), 2.0),
            Target::new("coin_3", Vec2::new(15.0, 8.0), 2.0),
        ],
        objective: ObjectiveSpec::new(&[(Command::Forward, 3)]),
        completion: CompletionRule::TargetsOnly,
    }
}
