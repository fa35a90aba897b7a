//! Discrete movement rules
//!
//! Heading 0 faces +x. Forward moves along `(cos h, sin h)` in the x/z plane
//! for every level; turns rotate in place and never translate.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::error::{Error, Result};
use crate::{heading_to_dir, normalize_angle};

/// One instruction of the player's program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    TurnAround,
    Wait,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Forward,
        Command::Backward,
        Command::TurnLeft,
        Command::TurnRight,
        Command::TurnAround,
        Command::Wait,
    ];

    /// Identifier used by the block UI
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Forward => "forward",
            Command::Backward => "backward",
            Command::TurnLeft => "turnLeft",
            Command::TurnRight => "turnRight",
            Command::TurnAround => "turnAround",
            Command::Wait => "wait",
        }
    }

    /// Lenient parse: UI ids, snake_case, kebab-case and short aliases
    pub fn parse(value: &str) -> Result<Self> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "forward" | "fwd" | "f" => Ok(Command::Forward),
            "backward" | "back" | "b" => Ok(Command::Backward),
            "turnleft" | "left" | "l" => Ok(Command::TurnLeft),
            "turnright" | "right" | "r" => Ok(Command::TurnRight),
            "turnaround" | "around" | "u" => Ok(Command::TurnAround),
            "wait" | "w" => Ok(Command::Wait),
            _ => Err(Error::UnknownCommand(value.trim().to_string())),
        }
    }

    /// Parse a comma or whitespace separated program
    pub fn parse_program(text: &str) -> Result<Vec<Self>> {
        text.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(Command::parse)
            .collect()
    }

    /// Whether this command changes position (as opposed to heading only)
    pub fn translates(&self) -> bool {
        matches!(self, Command::Forward | Command::Backward)
    }
}

/// Character position on the ground plane plus facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub z: f32,
    /// Radians in (-π, π]
    pub heading: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Pose {
    pub fn new(x: f32, z: f32, heading: f32) -> Self {
        Self {
            x,
            z,
            heading: normalize_angle(heading),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    fn translated(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            z: self.z + offset.y,
            heading: self.heading,
        }
    }

    fn rotated(&self, delta: f32) -> Self {
        Self {
            x: self.x,
            z: self.z,
            heading: normalize_angle(self.heading + delta),
        }
    }
}

/// Apply one command to a pose
pub fn step(pose: Pose, command: Command, step_distance: f32) -> Pose {
    match command {
        Command::Forward => pose.translated(heading_to_dir(pose.heading) * step_distance),
        Command::Backward => pose.translated(-heading_to_dir(pose.heading) * step_distance),
        Command::TurnLeft => pose.rotated(FRAC_PI_2),
        Command::TurnRight => pose.rotated(-FRAC_PI_2),
        Command::TurnAround => pose.rotated(PI),
        Command::Wait => pose,
    }
}
