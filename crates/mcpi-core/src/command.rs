//! Command encoder
//!
//! A command is `namespace.method(arg0,arg1,...)` on a single line. Arguments
//! are decimal numbers or raw strings; there is no quoting, so a string
//! containing `,` or `)` reaches the server unescaped.

use crate::blocks::BlockId;
use crate::vec3::{Pos, TilePos, Vec3};
use std::fmt;

/// A single positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => write!(f, "{}", v),
            Arg::Float(v) => write!(f, "{}", v),
            Arg::Text(v) => f.write_str(v),
        }
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Int(v.into())
    }
}

impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Arg::Int(v.into())
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Int(v.into())
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

/// A remote method call waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    method: String,
    args: Vec<Arg>,
}

impl Command {
    /// `method` is the full dotted name, e.g. `world.getBlock`.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append `x`, `y` and `z` as three arguments.
    pub fn pos<T: Copy + Into<Arg>>(self, pos: Vec3<T>) -> Self {
        self.arg(pos.x).arg(pos.y).arg(pos.z)
    }

    /// Append `arg` only when present.
    pub fn opt_arg(self, arg: Option<impl Into<Arg>>) -> Self {
        match arg {
            Some(a) => self.arg(a),
            None => self,
        }
    }

    /// The wire line without its trailing newline.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

// Catalogue of the remote methods.
impl Command {
    pub fn get_block(pos: TilePos) -> Self {
        Command::new("world.getBlock").pos(pos)
    }

    pub fn set_block(pos: TilePos, id: BlockId, data: Option<u32>) -> Self {
        Command::new("world.setBlock").pos(pos).arg(id).opt_arg(data)
    }

    pub fn set_blocks(from: TilePos, to: TilePos, id: BlockId, data: Option<u32>) -> Self {
        Command::new("world.setBlocks")
            .pos(from)
            .pos(to)
            .arg(id)
            .opt_arg(data)
    }

    pub fn get_height(pos: TilePos) -> Self {
        Command::new("world.getHeight").arg(pos.x).arg(pos.z)
    }

    pub fn save_checkpoint() -> Self {
        Command::new("world.checkpoint.save")
    }

    pub fn restore_checkpoint() -> Self {
        Command::new("world.checkpoint.restore")
    }

    pub fn world_setting(key: &str, value: bool) -> Self {
        Command::new("world.setting").arg(key).arg(value)
    }

    pub fn get_player_ids() -> Self {
        Command::new("world.getPlayerIds")
    }

    pub fn chat(message: &str) -> Self {
        Command::new("chat.post").arg(message)
    }

    pub fn set_camera_position(pos: TilePos) -> Self {
        Command::new("camera.mode.setPos").pos(pos)
    }

    pub fn get_tile() -> Self {
        Command::new("player.getTile")
    }

    pub fn set_tile(pos: TilePos) -> Self {
        Command::new("player.setTile").pos(pos)
    }

    pub fn get_pos() -> Self {
        Command::new("player.getPos")
    }

    pub fn set_pos(pos: Pos) -> Self {
        Command::new("player.setPos").pos(pos)
    }

    pub fn player_setting(key: &str, value: bool) -> Self {
        Command::new("player.setting").arg(key).arg(value)
    }

    pub fn events_block_hits() -> Self {
        Command::new("events.block.hits")
    }

    pub fn events_clear() -> Self {
        Command::new("events.clear")
    }
}
