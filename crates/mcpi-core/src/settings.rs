//! Known keys for `world.setting` and `player.setting`.
//!
//! Values are booleans, sent as `0` or `1`.

/// World cannot be edited by the player.
pub const WORLD_IMMUTABLE: &str = "world_immutable";

/// Player name tags are shown.
pub const NAMETAGS_VISIBLE: &str = "nametags_visible";

/// Player jumps automatically onto single-block steps.
pub const AUTOJUMP: &str = "autojump";
