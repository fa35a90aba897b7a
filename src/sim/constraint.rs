//! Spatial constraints: where the character is allowed to stand
//!
//! Two shapes exist:
//! - an open platform bounded by an axis-aligned box
//! - a one-tile-wide walkway that runs along a row, turns once, then runs
//!   along a column. Which leg is active depends on objective progress.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PATH_EPSILON;

/// Why a run was stopped by a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    OutOfBounds,
    OffPath,
}

impl AbortReason {
    /// Message shown to the player
    pub fn message(&self) -> &'static str {
        match self {
            AbortReason::OutOfBounds => "The seahorse can't swim off the platform!",
            AbortReason::OffPath => "The seahorse has to stay on the path!",
        }
    }
}

/// Inclusive range on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f32, tolerance: f32) -> bool {
        v >= self.min - tolerance && v <= self.max + tolerance
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Row-then-column walkway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledPath {
    /// z of the first leg
    pub row_z: f32,
    /// x extent of the first leg
    pub columns: Span,
    /// x of the second leg
    pub turn_column_x: f32,
    /// z extent of the second leg
    pub rows: Span,
    /// Objective stage at which the walkway turns; the row leg stays
    /// active up to and including this stage
    pub turn_stage: usize,
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
}

fn default_epsilon() -> f32 {
    PATH_EPSILON
}

impl TiledPath {
    fn on_row(&self, p: Vec2) -> bool {
        (p.y - self.row_z).abs() <= self.epsilon && self.columns.contains(p.x, self.epsilon)
    }

    fn on_column(&self, p: Vec2) -> bool {
        (p.x - self.turn_column_x).abs() <= self.epsilon && self.rows.contains(p.y, self.epsilon)
    }
}

/// Spatial constraint of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Legal iff inside the (closed) box
    Box { x: Span, z: Span },
    /// Legal iff on the active leg of the walkway
    Path(TiledPath),
}

impl Constraint {
    /// Whether `point` (x, z) is a legal position at objective `stage`
    pub fn is_legal(&self, point: Vec2, stage: usize) -> bool {
        match self {
            Constraint::Box { x, z } => x.contains(point.x, 0.0) && z.contains(point.y, 0.0),
            Constraint::Path(path) => {
                if stage <= path.turn_stage {
                    path.on_row(point)
                } else {
                    path.on_column(point)
                }
            }
        }
    }

    /// Reason reported when `is_legal` fails
    pub fn violation(&self) -> AbortReason {
        match self {
            Constraint::Box { .. } => AbortReason::OutOfBounds,
            Constraint::Path(_) => AbortReason::OffPath,
        }
    }

    /// Structural check used by level validation
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Constraint::Box { x, z } => {
                if !x.is_valid() || !z.is_valid() {
                    return Err("box bounds must be finite with min <= max".to_string());
                }
            }
            Constraint::Path(path) => {
                if !path.columns.is_valid() || !path.rows.is_valid() {
                    return Err("path spans must be finite with min <= max".to_string());
                }
                if path.epsilon.is_nan() || path.epsilon < 0.0 {
                    return Err("path epsilon must be non-negative".to_string());
                }
            }
        }
        Ok(())
    }
}
