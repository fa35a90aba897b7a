//! Objective sequence matching
//!
//! A level's objective is an ordered list of command groups, e.g.
//! `[(Forward, 3), (TurnRight, 1)]`. The matcher consumes executed commands
//! one at a time and must see the groups back to back. `Wait` is ignored.
//! Any other out-of-order command resets progress and derails the matcher for
//! the rest of the run, so a program only satisfies the objective when the
//! sequence is performed without unrelated interleaving.

use serde::{Deserialize, Serialize};

use super::kinematics::Command;

/// One group: `count` consecutive `command`s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandGroup {
    pub command: Command,
    pub count: u32,
}

impl CommandGroup {
    pub fn new(command: Command, count: u32) -> Self {
        Self { command, count }
    }
}

/// Ordered command groups a level requires
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectiveSpec {
    pub groups: Vec<CommandGroup>,
}

impl ObjectiveSpec {
    pub fn new(groups: &[(Command, u32)]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|&(command, count)| CommandGroup::new(command, count))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.groups.is_empty() {
            return Err("objective must contain at least one command group".to_string());
        }
        if let Some(i) = self.groups.iter().position(|g| g.count == 0) {
            return Err(format!("objective group {} has a zero repeat count", i));
        }
        if self.groups.iter().any(|g| g.command == Command::Wait) {
            return Err("objective groups cannot require wait".to_string());
        }
        Ok(())
    }
}

/// Matcher working memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatcherState {
    pub stage: usize,
    pub count_in_stage: u32,
    /// Set once an unexpected command broke the sequence
    pub derailed: bool,
    /// Furthest stage reached this run; survives a derail
    pub peak_stage: usize,
}

/// Outcome of feeding one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// No state change (wait, or objective already settled)
    Unchanged,
    /// Counted toward the active group
    Advanced,
    /// The final group just completed
    Satisfied,
    /// Unexpected command; progress lost
    Reset,
}

/// Finite-state matcher over an [`ObjectiveSpec`]
#[derive(Debug, Clone)]
pub struct ObjectiveMatcher {
    spec: ObjectiveSpec,
    state: MatcherState,
}

impl ObjectiveMatcher {
    pub fn new(spec: ObjectiveSpec) -> Self {
        Self {
            spec,
            state: MatcherState::default(),
        }
    }

    pub fn state(&self) -> MatcherState {
        self.state
    }

    pub fn stage(&self) -> usize {
        self.state.stage
    }

    /// Highest stage ever reached, for constraints that must not fall back
    pub fn peak_stage(&self) -> usize {
        self.state.peak_stage
    }

    pub fn stage_count(&self) -> usize {
        self.spec.len()
    }

    pub fn is_satisfied(&self) -> bool {
        self.state.stage >= self.spec.len()
    }

    pub fn reset(&mut self) {
        self.state = MatcherState::default();
    }

    /// Consume one executed command
    pub fn feed(&mut self, command: Command) -> Progress {
        if command == Command::Wait || self.is_satisfied() || self.state.derailed {
            return Progress::Unchanged;
        }

        let group = self.spec.groups[self.state.stage];
        if command != group.command {
            self.state = MatcherState {
                derailed: true,
                peak_stage: self.state.peak_stage,
                ..MatcherState::default()
            };
            return Progress::Reset;
        }

        self.state.count_in_stage += 1;
        if self.state.count_in_stage >= group.count {
            self.state.stage += 1;
            self.state.count_in_stage = 0;
            self.state.peak_stage = self.state.peak_stage.max(self.state.stage);
        }

        if self.is_satisfied() {
            Progress::Satisfied
        } else {
            Progress::Advanced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use Command::*;

    fn run(spec: &[(Command, u32)], program: &[Command]) -> ObjectiveMatcher {
        let mut matcher = ObjectiveMatcher::new(ObjectiveSpec::new(spec));
        for &cmd in program {
            matcher.feed(cmd);
        }
        matcher
    }

    #[test]
    fn test_three_forwards() {
        assert!(run(&[(Forward, 3)], &[Forward, Forward, Forward]).is_satisfied());
        assert!(!run(&[(Forward, 3)], &[Forward, Forward]).is_satisfied());
    }

    #[test]
    fn test_interleaved_turn_never_satisfies() {
        let m = run(
            &[(Forward, 3)],
            &[Forward, Forward, TurnLeft, Forward, Forward, Forward],
        );
        assert!(!m.is_satisfied());
        assert_eq!(m.stage(), 0);
        assert!(m.state().derailed);
    }

    #[test]
    fn test_stage_transitions() {
        let mut m = ObjectiveMatcher::new(ObjectiveSpec::new(&[(Forward, 3), (TurnRight, 1)]));
        assert_eq!(m.feed(Forward), Progress::Advanced);
        assert_eq!(m.state().count_in_stage, 1);
        m.feed(Forward);
        assert_eq!(m.feed(Forward), Progress::Advanced);
        assert_eq!(m.stage(), 1);
        assert_eq!(m.state().count_in_stage, 0);
        assert_eq!(m.feed(TurnRight), Progress::Satisfied);
        assert!(m.is_satisfied());
        // latched
        assert_eq!(m.feed(Backward), Progress::Unchanged);
        assert!(m.is_satisfied());
    }

    #[test]
    fn test_reset_mid_group() {
        let mut m = ObjectiveMatcher::new(ObjectiveSpec::new(&[(Forward, 2), (TurnLeft, 1)]));
        m.feed(Forward);
        assert_eq!(m.feed(TurnLeft), Progress::Reset);
        assert_eq!(m.state().stage, 0);
        assert_eq!(m.state().count_in_stage, 0);
        assert_eq!(m.feed(Forward), Progress::Unchanged);
        assert_eq!(m.peak_stage(), 0);

        m.reset();
        assert_eq!(m.state(), MatcherState::default());
        m.feed(Forward);
        m.feed(Forward);
        assert_eq!(m.feed(TurnLeft), Progress::Satisfied);
    }

    #[test]
    fn test_peak_stage_survives_derail() {
        let mut m = ObjectiveMatcher::new(ObjectiveSpec::new(&[(Forward, 1), (TurnRight, 1), (Forward, 2)]));
        m.feed(Forward);
        m.feed(TurnRight);
        assert_eq!(m.peak_stage(), 2);
        assert_eq!(m.feed(TurnLeft), Progress::Reset);
        assert_eq!(m.stage(), 0);
        assert_eq!(m.peak_stage(), 2);
    }

    #[test]
    fn test_five_group_sequence() {
        let spec = [
            (Forward, 2),
            (TurnLeft, 1),
            (TurnRight, 1),
            (Forward, 2),
            (TurnRight, 1),
        ];
        let program = [
            Forward, Forward, TurnLeft, TurnRight, Forward, Forward, TurnRight,
        ];
        assert!(run(&spec, &program).is_satisfied());
        assert!(!run(&spec, &program[..6]).is_satisfied());
        assert!(!run(&spec, &[Forward, Forward, TurnRight, TurnLeft]).is_satisfied());
    }

    #[test]
    fn test_validate() {
        assert!(ObjectiveSpec::default().validate().is_err());
        assert!(ObjectiveSpec::new(&[(Forward, 0)]).validate().is_err());
        assert!(ObjectiveSpec::new(&[(Wait, 1)]).validate().is_err());
        assert!(ObjectiveSpec::new(&[(Forward, 3)]).validate().is_ok());
    }

    #[test]
    fn test_spec_json_is_a_list() {
        let spec: ObjectiveSpec =
            serde_json::from_str(r#"[{"command":"forward","count":3},{"command":"turnRight","count":1}]"#)
                .unwrap();
        assert_eq!(spec, ObjectiveSpec::new(&[(Forward, 3), (TurnRight, 1)]));
    }

    proptest! {
        #[test]
        fn prop_wait_is_transparent(
            waits in prop::collection::vec(0usize..4, 8),
        ) {
            let spec = [(Forward, 3), (TurnRight, 1), (Forward, 2)];
            let base = [Forward, Forward, Forward, TurnRight, Forward, Forward];
            let mut program = Vec::new();
            for (i, cmd) in base.iter().enumerate() {
                program.extend(std::iter::repeat(Wait).take(waits[i]));
                program.push(*cmd);
            }
            program.extend(std::iter::repeat(Wait).take(waits[7]));
            prop_assert!(run(&spec, &program).is_satisfied());
        }
    }
}
