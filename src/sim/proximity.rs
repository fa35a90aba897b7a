//! Proximity pickups (coins, keys)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A collectible placed in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// (x, z) on the ground plane
    pub position: Vec2,
    /// Capture happens strictly inside this distance
    pub radius: f32,
    /// Whether the level's completion rule waits for this target
    #[serde(default = "default_required")]
    pub required: bool,
    /// Run state; never serialized as part of level data
    #[serde(skip)]
    pub collected: bool,
}

fn default_required() -> bool {
    true
}

impl Target {
    pub fn new(name: impl Into<String>, position: Vec2, radius: f32) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            required: true,
            collected: false,
        }
    }

    /// Mark as optional (does not gate completion)
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn in_range(&self, point: Vec2) -> bool {
        point.distance(self.position) < self.radius
    }
}

/// Flag every uncollected target within range of `point`
///
/// Returns the names captured by this call only. Already collected targets
/// are skipped, so a target is reported at most once per run.
pub fn check_capture(point: Vec2, targets: &mut [Target]) -> Vec<String> {
    let mut captured = Vec::new();
    for target in targets.iter_mut().filter(|t| !t.collected) {
        if target.in_range(point) {
            target.collected = true;
            captured.push(target.name.clone());
        }
    }
    captured
}

/// True when every required target has been collected
pub fn all_required_collected(targets: &[Target]) -> bool {
    targets.iter().filter(|t| t.required).all(|t| t.collected)
}
