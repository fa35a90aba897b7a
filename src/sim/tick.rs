//! Command execution tick
//!
//! Advances a run by exactly one command. The host owns pacing: it calls
//! [`tick`] once per interval until a non-`Continue` result comes back.

use serde::{Deserialize, Serialize};

use super::constraint::AbortReason;
use super::kinematics::{Command, Pose, step};
use super::objective::Progress;
use super::proximity::{all_required_collected, check_capture};
use super::state::{RunEvent, RunPhase, RunState};
use crate::error::{Error, Result};
use crate::levels::LevelConfig;

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// More commands to go
    Continue { pose: Pose },
    /// Constraint violated; the pose is the last legal one
    Aborted { reason: AbortReason, pose: Pose },
    /// Level solved
    Completed { pose: Pose, collected: Vec<String> },
    /// Program ran out without solving the level; run is Idle again
    Exhausted { pose: Pose },
}

impl ExecutionResult {
    pub fn pose(&self) -> Pose {
        match self {
            ExecutionResult::Continue { pose }
            | ExecutionResult::Aborted { pose, .. }
            | ExecutionResult::Completed { pose, .. }
            | ExecutionResult::Exhausted { pose } => *pose,
        }
    }

    /// Whether the host should keep ticking
    pub fn is_continue(&self) -> bool {
        matches!(self, ExecutionResult::Continue { .. })
    }
}

/// Begin executing `program` from the level defaults
///
/// Empty programs are a silent no-op. Starting while a run is executing is
/// rejected; terminal and idle runs are re-initialized first.
pub fn start(state: &mut RunState, config: &LevelConfig, program: &[Command]) -> Result<()> {
    if program.is_empty() {
        return Ok(());
    }
    if state.phase == RunPhase::Running {
        log::warn!("Ignoring start for '{}': run already in progress", config.id);
        return Err(Error::RunInProgress);
    }

    if state.phase.is_terminal() {
        log::debug!("Replaying '{}' after a {:?} run", config.id, state.phase);
    }
    *state = RunState::new(config);
    state.program = program.to_vec();
    state.phase = RunPhase::Running;
    state.push_event(RunEvent::Started {
        commands: program.len(),
    });
    log::info!("Run started on '{}' with {} commands", config.id, program.len());
    Ok(())
}

/// Execute the next command of a running program
///
/// Returns `None` when the run is not executing.
pub fn tick(state: &mut RunState, config: &LevelConfig) -> Option<ExecutionResult> {
    if state.phase != RunPhase::Running {
        return None;
    }
    let Some(&command) = state.program.get(state.cursor) else {
        state.phase = RunPhase::Idle;
        return Some(ExecutionResult::Exhausted { pose: state.pose });
    };
    state.cursor += 1;
    state.ticks += 1;

    // Move
    let next = step(state.pose, command, config.step_distance);

    // Constraint check; turns and waits keep the last legal position. The
    // walkway leg follows the furthest stage reached, so a broken sequence
    // never drops the character back onto the row.
    if command.translates() && !config.constraint.is_legal(next.position(), state.matcher.peak_stage()) {
        let reason = config.constraint.violation();
        state.phase = RunPhase::Aborted;
        state.push_event(RunEvent::Aborted {
            reason,
            message: reason.message().to_string(),
        });
        log::info!(
            "Run aborted on '{}' at command {} ({:?}): {:?}",
            config.id,
            state.cursor,
            command,
            reason
        );
        return Some(ExecutionResult::Aborted {
            reason,
            pose: state.pose,
        });
    }

    // Commit
    state.pose = next;
    if command == Command::Forward {
        state.forward_steps += 1;
    }
    state.push_event(RunEvent::Moved {
        command,
        pose: next,
    });
    log::debug!(
        "tick {}: {:?} -> ({:.2}, {:.2}, {:.3})",
        state.ticks,
        command,
        next.x,
        next.z,
        next.heading
    );

    // Pickups
    for name in check_capture(next.position(), &mut state.targets) {
        log::info!("Target '{}' captured", name);
        state.push_event(RunEvent::TargetCaptured { name });
    }

    // Objective
    match state.matcher.feed(command) {
        Progress::Satisfied => state.push_event(RunEvent::ObjectiveSatisfied),
        Progress::Reset => log::debug!("Objective sequence broken by {:?}", command),
        Progress::Advanced | Progress::Unchanged => {}
    }

    // Completion
    let targets_done = all_required_collected(&state.targets);
    let program_done = state.remaining() == 0;
    if config
        .completion
        .is_met(state.matcher.is_satisfied(), targets_done, program_done)
    {
        let collected = state.collected();
        state.phase = RunPhase::Completed;
        state.push_event(RunEvent::Completed {
            collected: collected.clone(),
        });
        log::info!("Level '{}' completed in {} ticks", config.id, state.ticks);
        return Some(ExecutionResult::Completed {
            pose: next,
            collected,
        });
    }

    if program_done {
        state.phase = RunPhase::Idle;
        state.push_event(RunEvent::Exhausted);
        log::info!("Program exhausted on '{}' without completing", config.id);
        return Some(ExecutionResult::Exhausted { pose: next });
    }

    Some(ExecutionResult::Continue { pose: next })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::CompletionRule;
    use crate::sim::{Constraint, ObjectiveSpec, Span, Target, TiledPath};
    use glam::Vec2;
    use std::f32::consts::PI;
    use Command::*;

    /// Open platform from the first island
    fn open_level() -> LevelConfig {
        LevelConfig {
            id: "open".to_string(),
            title: "Open".to_string(),
            step_distance: 4.5,
            start: Pose::new(1.0, -1.6, 0.0),
            constraint: Constraint::Box {
                x: Span::new(-5.0, 15.0),
                z: Span::new(-8.0, 8.0),
            },
            targets: Vec::new(),
            objective: ObjectiveSpec::new(&[(Forward, 3)]),
            completion: CompletionRule::Objective,
        }
    }

    fn path_level() -> LevelConfig {
        LevelConfig {
            id: "path".to_string(),
            title: "Path".to_string(),
            step_distance: 4.5,
            start: Pose::new(-3.5, -6.0, 0.0),
            constraint: Constraint::Path(TiledPath {
                row_z: -6.0,
                columns: Span::new(-3.5, 10.0),
                turn_column_x: 10.0,
                rows: Span::new(-15.0, -6.0),
                turn_stage: 1,
                epsilon: 0.1,
            }),
            targets: Vec::new(),
            objective: ObjectiveSpec::new(&[(Forward, 3), (TurnRight, 1)]),
            completion: CompletionRule::Objective,
        }
    }

    fn run_to_end(config: &LevelConfig, program: &[Command]) -> (RunState, Vec<ExecutionResult>) {
        let mut state = RunState::new(config);
        start(&mut state, config, program).unwrap();
        let mut results = Vec::new();
        while let Some(result) = tick(&mut state, config) {
            let done = !result.is_continue();
            results.push(result);
            if done {
                break;
            }
        }
        (state, results)
    }

    #[test]
    fn test_three_forwards_complete() {
        let config = open_level();
        let (state, results) = run_to_end(&config, &[Forward, Forward, Forward]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_continue());
        match results.last().unwrap() {
            ExecutionResult::Completed { pose, collected } => {
                assert!((pose.x - 14.5).abs() < 1e-4);
                assert!(collected.is_empty());
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(state.phase, RunPhase::Completed);
        assert_eq!(state.forward_steps, 3);
    }

    #[test]
    fn test_fourth_forward_aborts_before_commit() {
        let config = open_level();
        let (state, results) = run_to_end(&config, &[Forward, Forward, Forward, Forward]);
        assert_eq!(results.len(), 4);
        assert!(results[2].is_continue());
        match results.last().unwrap() {
            ExecutionResult::Aborted { reason, pose } => {
                assert_eq!(*reason, AbortReason::OutOfBounds);
                assert!((pose.x - 14.5).abs() < 1e-4);
            }
            other => panic!("expected abort, got {:?}", other),
        }
        assert_eq!(state.phase, RunPhase::Aborted);
        assert!(state.phase.is_terminal());
        assert_eq!(results.last().unwrap().pose(), state.pose);
        assert!((state.pose.x - 14.5).abs() < 1e-4);
        assert_eq!(state.forward_steps, 3);

        let mut state = state;
        assert!(tick(&mut state, &config).is_none());
    }

    #[test]
    fn test_objective_then_extra_commands() {
        let config = open_level();
        let (state, results) = run_to_end(&config, &[Forward, Forward, Forward, TurnLeft]);
        assert!(results[2].is_continue());
        assert!(matches!(results[3], ExecutionResult::Completed { .. }));
        assert!((state.pose.x - 14.5).abs() < 1e-4);
    }

    #[test]
    fn test_path_turn_completes() {
        let config = path_level();
        let (state, results) = run_to_end(&config, &[Forward, Forward, Forward, TurnRight]);
        assert_eq!(results.len(), 4);
        assert!(results[..3].iter().all(|r| r.is_continue()));
        assert!(matches!(results[3], ExecutionResult::Completed { .. }));
        assert!(state.matcher.is_satisfied());
        assert!(state.events.contains(&RunEvent::ObjectiveSatisfied));
    }

    #[test]
    fn test_leaving_the_path_aborts() {
        let config = path_level();
        let (_, results) = run_to_end(&config, &[Forward, TurnLeft, Forward]);
        assert!(matches!(
            results.last(),
            Some(ExecutionResult::Aborted {
                reason: AbortReason::OffPath,
                ..
            })
        ));
    }

    #[test]
    fn test_start_heading_outside_range_is_normalized() {
        let mut config = open_level();
        config.start.heading = 4.0;
        let mut state = RunState::new(&config);
        assert!(state.pose.heading > -PI && state.pose.heading <= PI);

        start(&mut state, &config, &[Backward]).unwrap();
        let pose = tick(&mut state, &config).unwrap().pose();
        assert!(pose.heading > -PI && pose.heading <= PI);
    }

    #[test]
    fn test_target_captured_on_second_tick() {
        let mut config = open_level();
        config.targets = vec![Target::new("coin", Vec2::new(10.0, -1.6), 2.5)];
        config.completion = CompletionRule::TargetsOnly;

        let mut state = RunState::new(&config);
        start(&mut state, &config, &[Forward, Forward]).unwrap();

        assert!(tick(&mut state, &config).unwrap().is_continue());
        assert!(state.collected().is_empty());

        let result = tick(&mut state, &config).unwrap();
        assert_eq!(state.collected(), vec!["coin".to_string()]);
        assert!(matches!(result, ExecutionResult::Completed { ref collected, .. } if collected == &["coin"]));
        assert!(state.events.contains(&RunEvent::TargetCaptured {
            name: "coin".to_string()
        }));
    }

    #[test]
    fn test_objective_and_targets_waits_for_pickup() {
        let mut config = open_level();
        config.targets = vec![Target::new("key", Vec2::new(1.0, 6.0), 2.5)];
        config.completion = CompletionRule::ObjectiveAndTargets;
        let (state, results) = run_to_end(&config, &[Forward, Forward, Forward]);
        assert!(matches!(results.last(), Some(ExecutionResult::Exhausted { .. })));
        assert!(state.matcher.is_satisfied());
        assert_eq!(state.phase, RunPhase::Idle);
        assert_eq!(state.events.last(), Some(&RunEvent::Exhausted));
    }

    #[test]
    fn test_empty_program_is_noop() {
        let config = open_level();
        let mut state = RunState::new(&config);
        start(&mut state, &config, &[]).unwrap();
        assert_eq!(state.phase, RunPhase::Idle);
        assert!(state.events.is_empty());
        assert!(tick(&mut state, &config).is_none());
    }

    #[test]
    fn test_start_while_running_rejected() {
        let config = open_level();
        let mut state = RunState::new(&config);
        start(&mut state, &config, &[Forward, Forward]).unwrap();
        tick(&mut state, &config);
        assert!(matches!(
            start(&mut state, &config, &[Backward]),
            Err(Error::RunInProgress)
        ));
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_replay_resets_run_state() {
        let mut config = open_level();
        config.targets = vec![Target::new("coin", Vec2::new(5.5, -1.6), 1.0).optional()];
        let (mut state, _) = run_to_end(&config, &[Forward, Forward, Forward]);
        assert_eq!(state.phase, RunPhase::Completed);
        assert_eq!(state.collected().len(), 1);

        start(&mut state, &config, &[Wait]).unwrap();
        assert_eq!(state.pose, config.start);
        assert!(state.collected().is_empty());
        assert_eq!(state.matcher.stage(), 0);
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn test_waits_do_not_block_completion() {
        let config = open_level();
        let (_, results) = run_to_end(&config, &[Wait, Forward, Wait, Forward, Forward, Wait]);
        assert!(matches!(results.last(), Some(ExecutionResult::Completed { .. })));
        assert_eq!(results.len(), 6);
    }
}
