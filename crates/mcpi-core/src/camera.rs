//! Camera modes

use crate::command::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraMode {
    Normal,
    ThirdPerson,
    Fixed,
}

impl CameraMode {
    /// Accepts `normal`, `thirdPerson` and `fixed`; anything else is `None`.
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "normal" => Some(CameraMode::Normal),
            "thirdPerson" => Some(CameraMode::ThirdPerson),
            "fixed" => Some(CameraMode::Fixed),
            _ => None,
        }
    }

    pub fn command(self) -> Command {
        match self {
            CameraMode::Normal => Command::new("camera.mode.setNormal"),
            CameraMode::ThirdPerson => Command::new("camera.mode.setThirdPerson"),
            CameraMode::Fixed => Command::new("camera.mode.setFixed"),
        }
    }
}
