//! Command-line parsing

use anyhow::{Context, Result, anyhow, bail};
use mcpi_client::{ClientConfig, Framing};
use mcpi_core::{BlockId, CameraMode, Direction, McpiError, TilePos, blocks, colors};

pub const USAGE: &str = "\
usage: mcpi [--host HOST] [--port PORT] [--lines] <command> [args]

commands:
  chat <message...>
  get-block <x> <y> <z>
  set-block <x> <y> <z> <id|NAME> [data|COLOR]
  fill <x1> <y1> <z1> <x2> <y2> <z2> <id|NAME> [data|COLOR]
  height <x> <z>
  pos | tile
  tp <x> <y> <z>
  move <up|down|north|south|east|west|none> <distance>
  camera <normal|thirdPerson|fixed>
  checkpoint <save|restore>
  players
  hits
  blocks | colors

environment: MCPI_HOST, MCPI_PORT, MCPI_FRAMING, RUST_LOG";

#[derive(Debug, PartialEq)]
pub enum CliCommand {
    Chat(String),
    GetBlock(TilePos),
    SetBlock(TilePos, BlockId, Option<u32>),
    Fill(TilePos, TilePos, BlockId, Option<u32>),
    Height(TilePos),
    Pos,
    Tile,
    Teleport(TilePos),
    Move(Direction, i32),
    Camera(CameraMode),
    SaveCheckpoint,
    RestoreCheckpoint,
    Players,
    Hits,
    Blocks,
    Colors,
}

impl CliCommand {
    /// Table listings need no connection.
    pub fn is_offline(&self) -> bool {
        matches!(self, CliCommand::Blocks | CliCommand::Colors)
    }
}

#[derive(Debug)]
pub struct Cli {
    pub config: ClientConfig,
    pub command: CliCommand,
}

/// Parse arguments (without the program name) on top of `base`.
pub fn parse_args(args: &[String], base: ClientConfig) -> Result<Cli> {
    let mut config = base;
    let mut rest = args;

    while let Some(flag) = rest.first().filter(|a| a.starts_with("--")) {
        match flag.as_str() {
            "--host" => {
                config.host = rest.get(1).context("--host needs a value")?.clone();
                rest = &rest[2..];
            }
            "--port" => {
                let port = rest.get(1).context("--port needs a value")?;
                config.port = port.parse().with_context(|| format!("invalid port {}", port))?;
                rest = &rest[2..];
            }
            "--lines" => {
                config.framing = Framing::Line;
                rest = &rest[1..];
            }
            other => bail!("unknown flag {}", other),
        }
    }

    let (name, args) = rest.split_first().context("missing command")?;
    let command = parse_command(name, args)?;
    Ok(Cli { config, command })
}

fn parse_command(name: &str, args: &[String]) -> Result<CliCommand> {
    let command = match (name, args) {
        ("chat", [_, ..]) => CliCommand::Chat(args.join(" ")),
        ("get-block", [x, y, z]) => CliCommand::GetBlock(tile(x, y, z)?),
        ("set-block", [x, y, z, block, data @ ..]) if data.len() <= 1 => {
            CliCommand::SetBlock(tile(x, y, z)?, block_id(block)?, block_data(data.first())?)
        }
        ("fill", [x1, y1, z1, x2, y2, z2, block, data @ ..]) if data.len() <= 1 => CliCommand::Fill(
            tile(x1, y1, z1)?,
            tile(x2, y2, z2)?,
            block_id(block)?,
            block_data(data.first())?,
        ),
        ("height", [x, z]) => CliCommand::Height(TilePos::new(number(x)?, 0, number(z)?)),
        ("pos", []) => CliCommand::Pos,
        ("tile", []) => CliCommand::Tile,
        ("tp", [x, y, z]) => CliCommand::Teleport(tile(x, y, z)?),
        ("move", [direction, distance]) => CliCommand::Move(
            direction.parse().map_err(|e: String| anyhow!(e))?,
            number(distance)?,
        ),
        ("camera", [mode]) => CliCommand::Camera(
            CameraMode::parse(mode).ok_or_else(|| anyhow!("unknown camera mode {}", mode))?,
        ),
        ("checkpoint", [action]) if action == "save" => CliCommand::SaveCheckpoint,
        ("checkpoint", [action]) if action == "restore" => CliCommand::RestoreCheckpoint,
        ("players", []) => CliCommand::Players,
        ("hits", []) => CliCommand::Hits,
        ("blocks", []) => CliCommand::Blocks,
        ("colors", []) => CliCommand::Colors,
        _ => bail!("bad command: {} {}", name, args.join(" ")),
    };
    Ok(command)
}

fn number(s: &str) -> Result<i32> {
    s.parse().with_context(|| format!("not a number: {}", s))
}

fn tile(x: &str, y: &str, z: &str) -> Result<TilePos> {
    Ok(TilePos::new(number(x)?, number(y)?, number(z)?))
}

/// Numeric id or a name from the block table.
fn block_id(s: &str) -> Result<BlockId> {
    if let Ok(id) = s.parse() {
        return Ok(id);
    }
    blocks::id(&s.to_ascii_uppercase()).ok_or_else(|| McpiError::UnknownBlock(s.to_string()).into())
}

/// Numeric data value or a color name.
fn block_data(s: Option<&String>) -> Result<Option<u32>> {
    let Some(s) = s else { return Ok(None) };
    if let Ok(data) = s.parse() {
        return Ok(Some(data));
    }
    colors::id(&s.to_ascii_uppercase())
        .map(Some)
        .ok_or_else(|| McpiError::UnknownColor(s.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &str) -> Result<Cli> {
        let args: Vec<String> = args.split_whitespace().map(String::from).collect();
        parse_args(&args, ClientConfig::default())
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse("--host pi.local --port 5000 --lines pos").unwrap();
        assert_eq!(cli.config.address(), "pi.local:5000");
        assert_eq!(cli.config.framing, Framing::Line);
        assert_eq!(cli.command, CliCommand::Pos);
    }

    #[test]
    fn test_block_by_name_and_color() {
        let cli = parse("set-block 1 2 3 wool red").unwrap();
        assert_eq!(
            cli.command,
            CliCommand::SetBlock(TilePos::new(1, 2, 3), 35, Some(14))
        );

        let cli = parse("fill 0 0 0 4 4 4 1").unwrap();
        assert_eq!(
            cli.command,
            CliCommand::Fill(TilePos::new(0, 0, 0), TilePos::new(4, 4, 4), 1, None)
        );
    }

    #[test]
    fn test_chat_joins_words() {
        let cli = parse("chat hello there world").unwrap();
        assert_eq!(cli.command, CliCommand::Chat("hello there world".into()));
    }

    #[test]
    fn test_move_and_camera() {
        assert_eq!(
            parse("move east 3").unwrap().command,
            CliCommand::Move(Direction::East, 3)
        );
        assert_eq!(
            parse("camera thirdPerson").unwrap().command,
            CliCommand::Camera(CameraMode::ThirdPerson)
        );
        assert!(parse("camera sideways").is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse("").is_err());
        assert!(parse("--port abc pos").is_err());
        assert!(parse("get-block 1 2").is_err());
        assert!(parse("set-block 1 2 3 unobtainium").is_err());
        assert!(parse("checkpoint delete").is_err());
        assert!(parse("--verbose pos").is_err());
    }
}
