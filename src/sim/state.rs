//! Run state and core engine types
//!
//! Everything a single execution owns lives here, so a replay is just a fresh
//! [`RunState`] built from the same level.

use serde::{Deserialize, Serialize};

use super::constraint::AbortReason;
use super::kinematics::{Command, Pose};
use super::objective::ObjectiveMatcher;
use super::proximity::Target;
use crate::levels::LevelConfig;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Nothing queued (fresh, or program ran out without completing)
    Idle,
    /// Executing the program, one command per tick
    Running,
    /// Stopped by a constraint violation
    Aborted,
    /// Level solved
    Completed,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Aborted | RunPhase::Completed)
    }
}

/// Observable effects for the renderer/UI, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    Started { commands: usize },
    Moved { command: Command, pose: Pose },
    TargetCaptured { name: String },
    ObjectiveSatisfied,
    Aborted { reason: AbortReason, message: String },
    Completed { collected: Vec<String> },
    /// Program finished without solving the level
    Exhausted,
}

/// Mutable state of one execution
#[derive(Debug, Clone)]
pub struct RunState {
    pub phase: RunPhase,
    pub pose: Pose,
    pub targets: Vec<Target>,
    pub matcher: ObjectiveMatcher,
    /// Program being executed
    pub program: Vec<Command>,
    /// Index of the next command to execute
    pub cursor: usize,
    /// Commands executed so far
    pub ticks: u32,
    /// Forward steps taken so far
    pub forward_steps: u32,
    /// Pending events (drained by the host)
    pub events: Vec<RunEvent>,
}

impl RunState {
    /// Fresh state at the level defaults
    pub fn new(config: &LevelConfig) -> Self {
        let mut targets = config.targets.clone();
        for target in &mut targets {
            target.collected = false;
        }
        Self {
            phase: RunPhase::Idle,
            pose: Pose::new(config.start.x, config.start.z, config.start.heading),
            targets,
            matcher: ObjectiveMatcher::new(config.objective.clone()),
            program: Vec::new(),
            cursor: 0,
            ticks: 0,
            forward_steps: 0,
            events: Vec::new(),
        }
    }

    /// Commands left to execute
    pub fn remaining(&self) -> usize {
        self.program.len().saturating_sub(self.cursor)
    }

    /// Names of collected targets, in level order
    pub fn collected(&self) -> Vec<String> {
        self.targets
            .iter()
            .filter(|t| t.collected)
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn push_event(&mut self, event: RunEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }
}
