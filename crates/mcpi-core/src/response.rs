//! Response parsers
//!
//! Responses are ASCII text. Surrounding whitespace (including the line
//! terminator) is trimmed before parsing; any parse failure is an error.

use crate::error::{McpiError, Result};
use crate::vec3::{Pos, TilePos, Vec3};
use std::str::FromStr;

fn parse_number<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    let trimmed = raw.trim();
    trimmed
        .parse()
        .map_err(|_| McpiError::Parse(format!("expected {}, got {:?}", what, trimmed)))
}

/// A bare base-10 integer, e.g. a block id or a height.
pub fn parse_int<T: FromStr>(raw: &str) -> Result<T> {
    parse_number(raw, "integer")
}

fn parse_triple<T: FromStr>(raw: &str, what: &str) -> Result<Vec3<T>> {
    let parts: Vec<&str> = raw.trim().split(',').collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(McpiError::Parse(format!(
            "expected {} triple, got {:?}",
            what,
            raw.trim()
        )));
    };
    Ok(Vec3::new(
        parse_number(x, what)?,
        parse_number(y, what)?,
        parse_number(z, what)?,
    ))
}

/// `"x,y,z"` as integers.
pub fn parse_tile(raw: &str) -> Result<TilePos> {
    parse_triple(raw, "integer")
}

/// `"x,y,z"` as floats.
pub fn parse_pos(raw: &str) -> Result<Pos> {
    parse_triple(raw, "float")
}

/// Entity ids from a `world.getPlayerIds` response.
///
/// The server separates ids with `|`; `,` is accepted too. An empty
/// response means no players.
pub fn parse_player_ids(raw: &str) -> Result<Vec<i64>> {
    raw.trim()
        .split(['|', ','])
        .filter(|s| !s.trim().is_empty())
        .map(parse_int::<i64>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pos() {
        assert_eq!(parse_pos("1.5,2.0,3.25").unwrap(), Pos::new(1.5, 2.0, 3.25));
        assert_eq!(parse_pos(" 1.5, 2.0 ,3.25\n").unwrap(), Pos::new(1.5, 2.0, 3.25));
    }

    #[test]
    fn test_parse_tile() {
        assert_eq!(parse_tile("1,2,3").unwrap(), TilePos::new(1, 2, 3));
        assert_eq!(parse_tile("-4,70,12\n").unwrap(), TilePos::new(-4, 70, 12));
    }

    #[test]
    fn test_parse_failures_are_reported() {
        assert!(matches!(parse_tile("1,2"), Err(McpiError::Parse(_))));
        assert!(matches!(parse_tile("1,2,3,4"), Err(McpiError::Parse(_))));
        assert!(matches!(parse_tile("1.5,2,3"), Err(McpiError::Parse(_))));
        assert!(matches!(parse_int::<u32>("Fail"), Err(McpiError::Parse(_))));
        assert!(matches!(parse_int::<u32>(""), Err(McpiError::Parse(_))));
    }

    #[test]
    fn test_parse_int_trims() {
        assert_eq!(parse_int::<u32>("46\n").unwrap(), 46);
        assert_eq!(parse_int::<i32>(" -3 ").unwrap(), -3);
    }

    #[test]
    fn test_parse_player_ids() {
        assert_eq!(parse_player_ids("1|2|305\n").unwrap(), vec![1, 2, 305]);
        assert_eq!(parse_player_ids("7,8").unwrap(), vec![7, 8]);
        assert!(parse_player_ids("\n").unwrap().is_empty());
        assert!(parse_player_ids("1|x").is_err());
    }
}
