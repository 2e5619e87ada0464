//! mcpi: drive a running world from the command line
//!
//! Connects to the mcpi API (default 127.0.0.1:4711), runs one command and
//! exits. `hits` keeps streaming block hit events until Ctrl-C.

mod cli;

use anyhow::Result;
use cli::{CliCommand, USAGE, parse_args};
use mcpi_client::{ClientConfig, Minecraft};
use mcpi_core::NameTable;
use mcpi_core::response::parse_player_ids;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let cli = match parse_args(&args, ClientConfig::from_env()?) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if cli.command.is_offline() {
        let table = match cli.command {
            CliCommand::Colors => Minecraft::colors(),
            _ => Minecraft::blocks(),
        };
        print_table(table);
        return Ok(());
    }

    let mc = Minecraft::connect(&cli.config).await?;
    run(&mc, cli.command).await?;
    mc.end();
    Ok(())
}

fn print_table(table: &NameTable) {
    for (name, id) in table.iter() {
        println!("{:>4}  {}", id, name);
    }
}

async fn run(mc: &Minecraft, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Chat(message) => mc.chat(&message).await?,
        CliCommand::GetBlock(pos) => {
            let id = mc.get_block(pos).await?;
            println!("{} {}", id, mc.get_block_name(id));
        }
        CliCommand::SetBlock(pos, id, data) => mc.set_block(pos, id, data).await?,
        CliCommand::Fill(from, to, id, data) => mc.set_blocks(from, to, id, data).await?,
        CliCommand::Height(pos) => println!("{}", mc.get_height(pos).await?),
        CliCommand::Pos => println!("{}", mc.get_pos().await?),
        CliCommand::Tile => println!("{}", mc.get_tile().await?),
        CliCommand::Teleport(pos) => mc.set_tile(pos).await?,
        CliCommand::Move(direction, distance) => {
            let from = mc.get_tile().await?;
            let to = direction.apply(from, distance);
            info!("Moving {} {} from {} to {}", direction, distance, from, to);
            mc.set_tile(to).await?;
        }
        CliCommand::Camera(mode) => mc.set_camera(mode).await?,
        CliCommand::SaveCheckpoint => mc.save_checkpoint().await?,
        CliCommand::RestoreCheckpoint => mc.restore_checkpoint().await?,
        CliCommand::Players => {
            let raw = mc.get_player_ids().await?;
            match parse_player_ids(&raw) {
                Ok(ids) => {
                    for id in ids {
                        println!("{}", id);
                    }
                }
                Err(e) => {
                    warn!("{}", e);
                    println!("{}", raw.trim());
                }
            }
        }
        CliCommand::Hits => {
            let mut hits = mc.subscribe_block_hits().await?;
            loop {
                tokio::select! {
                    hit = hits.recv() => match hit {
                        Some(hit) => println!("{}", hit.trim()),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
        CliCommand::Blocks => print_table(Minecraft::blocks()),
        CliCommand::Colors => print_table(Minecraft::colors()),
    }
    Ok(())
}
