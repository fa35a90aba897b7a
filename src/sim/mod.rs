//! Deterministic run engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One command per tick, advanced only by explicit calls
//! - Levels differ in data, never in code path
//! - No rendering or platform dependencies

pub mod constraint;
pub mod kinematics;
pub mod objective;
pub mod pacing;
pub mod proximity;
pub mod run;
pub mod state;
pub mod tick;

pub use constraint::{AbortReason, Constraint, Span, TiledPath};
pub use kinematics::{Command, Pose, step};
pub use objective::{CommandGroup, MatcherState, ObjectiveMatcher, ObjectiveSpec, Progress};
pub use pacing::Pacer;
pub use proximity::{Target, all_required_collected, check_capture};
pub use run::RunHandle;
pub use state::{RunEvent, RunPhase, RunState};
pub use tick::{ExecutionResult, start, tick};
