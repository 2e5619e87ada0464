//! # mcpi-core
//!
//! Core types for the mcpi remote world protocol.
//!
//! This crate provides everything that does not touch the network:
//! - Integer and float coordinates
//! - Direction offsets
//! - Block and color lookup tables
//! - Camera modes and setting keys
//! - The command encoder and response parsers

pub mod blocks;
pub mod camera;
pub mod colors;
pub mod command;
pub mod direction;
pub mod error;
pub mod response;
pub mod settings;
mod table;
pub mod vec3;

pub use blocks::{BlockId, NOT_FOUND};
pub use camera::CameraMode;
pub use colors::ColorId;
pub use command::{Arg, Command};
pub use direction::Direction;
pub use error::{McpiError, Result};
pub use table::NameTable;
pub use vec3::{Pos, TilePos, Vec3};
