//! Named unit directions
//!
//! Sign convention follows the mcpi world: north is +z, west is +x.

use crate::vec3::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg};
use std::str::FromStr;

/// A direction token with its offset function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    North,
    South,
    East,
    West,
    None,
}

impl Direction {
    /// Every direction, in table order.
    pub const ALL: [Direction; 7] = [
        Direction::Up,
        Direction::Down,
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::None => "none",
        }
    }

    /// Translate `origin` by `distance` along this direction.
    ///
    /// `None` returns a copy of `origin`.
    pub fn apply<T>(self, origin: Vec3<T>, distance: T) -> Vec3<T>
    where
        T: Copy + Default + Add<Output = T> + Neg<Output = T>,
    {
        let zero = T::default();
        let offset = match self {
            Direction::Up => Vec3::new(zero, distance, zero),
            Direction::Down => Vec3::new(zero, -distance, zero),
            Direction::North => Vec3::new(zero, zero, distance),
            Direction::South => Vec3::new(zero, zero, -distance),
            Direction::West => Vec3::new(distance, zero, zero),
            Direction::East => Vec3::new(-distance, zero, zero),
            Direction::None => return origin,
        };
        origin + offset
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown direction: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::{Pos, TilePos};

    #[test]
    fn test_offsets_shift_one_axis() {
        let o = TilePos::new(10, 20, 30);
        assert_eq!(Direction::Up.apply(o, 3), TilePos::new(10, 23, 30));
        assert_eq!(Direction::Down.apply(o, 3), TilePos::new(10, 17, 30));
        assert_eq!(Direction::North.apply(o, 3), TilePos::new(10, 20, 33));
        assert_eq!(Direction::South.apply(o, 3), TilePos::new(10, 20, 27));
        assert_eq!(Direction::West.apply(o, 3), TilePos::new(13, 20, 30));
        assert_eq!(Direction::East.apply(o, 3), TilePos::new(7, 20, 30));
    }

    #[test]
    fn test_none_is_a_copy() {
        let mut o = Pos::new(1.5, 2.0, 3.0);
        let copy = Direction::None.apply(o, 100.0);
        assert_eq!(copy, o);
        o.x = 9.0;
        assert_eq!(copy.x, 1.5);
    }

    #[test]
    fn test_exactly_one_axis_moves() {
        let o = TilePos::new(0, 0, 0);
        for dir in Direction::ALL {
            let moved = dir.apply(o, 5);
            let changed = [moved.x != 0, moved.y != 0, moved.z != 0]
                .iter()
                .filter(|c| **c)
                .count();
            let expected = if dir == Direction::None { 0 } else { 1 };
            assert_eq!(changed, expected, "{}", dir);
        }
    }

    #[test]
    fn test_parse_names() {
        for dir in Direction::ALL {
            assert_eq!(dir.name().parse::<Direction>().unwrap(), dir);
        }
        assert!("sideways".parse::<Direction>().is_err());
    }
}
