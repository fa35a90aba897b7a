//! Syntax Saga - command execution core for a coding adventure game
//!
//! Core modules:
//! - `sim`: Deterministic run engine (kinematics, constraints, pickups, objectives)
//! - `levels`: Data-driven level definitions
//! - `progress`: Level unlock storage (LocalStorage on web)
//! - `settings`: Player preferences (pacing, reduced motion)
//! - `web`: Browser bindings for the JS UI layer

pub mod error;
pub mod levels;
pub mod progress;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Error, Result};
pub use levels::{CompletionRule, LevelConfig};
pub use progress::{MemoryProgress, ProgressStore};
pub use settings::{PacingPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Delay between two executed commands (seconds)
    pub const TICK_INTERVAL: f32 = 1.2;
    /// Delay before the "level complete" popup is shown (seconds)
    pub const COMPLETION_DELAY: f32 = 1.0;
    /// How long an abort message stays on screen (seconds)
    pub const MESSAGE_DURATION: f32 = 3.0;
    /// Maximum ticks released by the pacer in one frame
    pub const MAX_CATCH_UP_TICKS: u32 = 4;

    /// Tile size / step distance shared by the built-in levels
    pub const TILE_SIZE: f32 = 4.5;
    /// Lane tolerance for tiled paths
    pub const PATH_EPSILON: f32 = 0.1;
    /// Default pickup radius
    pub const CAPTURE_RADIUS: f32 = 2.5;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::PI;
    let wrapped = angle.sin().atan2(angle.cos());
    // atan2 may land on (or within rounding of) -π; fold it onto the closed end
    if wrapped <= -PI + 1e-6 { PI } else { wrapped }
}

/// Unit direction for a heading in the x/z plane
#[inline]
pub fn heading_to_dir(heading: f32) -> glam::Vec2 {
    glam::Vec2::new(heading.cos(), heading.sin())
}
