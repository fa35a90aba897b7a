//! Run handle: one level instance and its in-flight execution
//!
//! All run-scoped mutable state sits behind this handle and only moves when
//! the host calls [`RunHandle::tick`].

use super::kinematics::{Command, Pose};
use super::state::{RunEvent, RunPhase, RunState};
use super::tick::{ExecutionResult, start, tick};
use crate::error::Result;
use crate::levels::LevelConfig;

#[derive(Debug, Clone)]
pub struct RunHandle {
    config: LevelConfig,
    state: RunState,
}

impl RunHandle {
    /// Validate the level and prepare an idle run at its defaults
    pub fn new(config: LevelConfig) -> Result<Self> {
        config.validate()?;
        let state = RunState::new(&config);
        log::info!("Level '{}' ready", config.id);
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == RunPhase::Running
    }

    /// Queue a program; empty programs are ignored
    pub fn start(&mut self, program: &[Command]) -> Result<()> {
        start(&mut self.state, &self.config, program)
    }

    /// Execute one command
    pub fn tick(&mut self) -> Option<ExecutionResult> {
        tick(&mut self.state, &self.config)
    }

    pub fn current_pose(&self) -> Pose {
        self.state.pose
    }

    pub fn captured_targets(&self) -> Vec<String> {
        self.state.collected()
    }

    /// (completed groups, total groups) of the objective
    pub fn objective_progress(&self) -> (usize, usize) {
        let matcher = &self.state.matcher;
        (matcher.stage().min(matcher.stage_count()), matcher.stage_count())
    }

    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        self.state.drain_events()
    }

    /// Discard the run and return to Idle at the level defaults
    pub fn reset(&mut self) {
        if self.is_running() {
            log::info!("Run on '{}' cancelled", self.config.id);
        }
        self.state = RunState::new(&self.config);
    }
}
