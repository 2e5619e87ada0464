//! Typed world client
//!
//! One async method per remote call. Methods without a reply return as soon
//! as the command is written; methods with a reply wait for the next inbound
//! event, so await each one before issuing the next.

use crate::config::ClientConfig;
use crate::connection::{Connection, ListenerHandle, Subscription};
use crate::correlator::{EventCallback, ReplyCallback};
use mcpi_core::response::{parse_int, parse_pos, parse_tile};
use mcpi_core::{BlockId, CameraMode, Command, NameTable, Pos, Result, TilePos, blocks, colors};
use tracing::debug;

/// Client for a running world
pub struct Minecraft {
    conn: Connection,
}

impl Minecraft {
    /// Connect to the world described by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_connection(Connection::connect(config).await?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Block name → id table.
    pub fn blocks() -> &'static NameTable {
        blocks::table()
    }

    /// Color name → id table, for the `data` argument of wool.
    pub fn colors() -> &'static NameTable {
        colors::table()
    }

    // === Raw access ===

    pub async fn send(&self, line: &str) -> Result<()> {
        self.conn.send(line).await
    }

    pub async fn request(&self, line: &str) -> Result<String> {
        self.conn.request(line).await
    }

    pub async fn send_receive(&self, line: &str, callback: Option<ReplyCallback>) -> Result<()> {
        self.conn.send_receive(line, callback).await
    }

    pub async fn add_listener(
        &self,
        line: &str,
        callback: Option<EventCallback>,
    ) -> Result<ListenerHandle> {
        self.conn.add_listener(line, callback).await
    }

    pub async fn subscribe(&self, line: &str) -> Result<Subscription> {
        self.conn.subscribe(line).await
    }

    /// Close the connection immediately.
    pub fn end(&self) {
        self.conn.close()
    }

    async fn send_command(&self, command: Command) -> Result<()> {
        self.conn.send(&command.encode()).await
    }

    async fn request_command(&self, command: Command) -> Result<String> {
        self.conn.request(&command.encode()).await
    }

    // === World ===

    /// Block id at `pos`.
    pub async fn get_block(&self, pos: TilePos) -> Result<BlockId> {
        let raw = self.request_command(Command::get_block(pos)).await?;
        parse_int(&raw)
    }

    /// Name of a block id, or `"Not Found"`.
    pub fn get_block_name(&self, id: BlockId) -> &'static str {
        blocks::name(id)
    }

    pub async fn set_block(&self, pos: TilePos, id: BlockId, data: Option<u32>) -> Result<()> {
        self.send_command(Command::set_block(pos, id, data)).await
    }

    /// Fill the cuboid between two corners.
    pub async fn set_blocks(
        &self,
        from: TilePos,
        to: TilePos,
        id: BlockId,
        data: Option<u32>,
    ) -> Result<()> {
        self.send_command(Command::set_blocks(from, to, id, data))
            .await
    }

    /// `pos` with y replaced by the height of the highest solid block at (x, z).
    pub async fn get_height(&self, pos: TilePos) -> Result<TilePos> {
        let raw = self.request_command(Command::get_height(pos)).await?;
        Ok(pos.with_y(parse_int(&raw)?))
    }

    pub async fn save_checkpoint(&self) -> Result<()> {
        self.send_command(Command::save_checkpoint()).await
    }

    pub async fn restore_checkpoint(&self) -> Result<()> {
        self.send_command(Command::restore_checkpoint()).await
    }

    /// See [`mcpi_core::settings`] for known keys.
    pub async fn world_setting(&self, key: &str, value: bool) -> Result<()> {
        self.send_command(Command::world_setting(key, value)).await
    }

    /// Raw response; see [`mcpi_core::response::parse_player_ids`].
    pub async fn get_player_ids(&self) -> Result<String> {
        self.request_command(Command::get_player_ids()).await
    }

    pub async fn chat(&self, message: &str) -> Result<()> {
        self.send_command(Command::chat(message)).await
    }

    // === Camera ===

    /// Accepts `normal`, `thirdPerson` or `fixed`; any other mode sends nothing.
    pub async fn set_camera_mode(&self, mode: &str) -> Result<()> {
        match CameraMode::parse(mode) {
            Some(mode) => self.set_camera(mode).await,
            None => {
                debug!("Ignoring unknown camera mode {:?}", mode);
                Ok(())
            }
        }
    }

    pub async fn set_camera(&self, mode: CameraMode) -> Result<()> {
        self.send_command(mode.command()).await
    }

    pub async fn set_camera_position(&self, pos: TilePos) -> Result<()> {
        self.send_command(Command::set_camera_position(pos)).await
    }

    // === Player ===

    pub async fn get_tile(&self) -> Result<TilePos> {
        let raw = self.request_command(Command::get_tile()).await?;
        parse_tile(&raw)
    }

    pub async fn set_tile(&self, pos: TilePos) -> Result<()> {
        self.send_command(Command::set_tile(pos)).await
    }

    pub async fn get_pos(&self) -> Result<Pos> {
        let raw = self.request_command(Command::get_pos()).await?;
        parse_pos(&raw)
    }

    pub async fn set_pos(&self, pos: Pos) -> Result<()> {
        self.send_command(Command::set_pos(pos)).await
    }

    pub async fn player_setting(&self, key: &str, value: bool) -> Result<()> {
        self.send_command(Command::player_setting(key, value)).await
    }

    // === Events ===

    /// Poll block hits and hand every inbound event to `callback`.
    ///
    /// Without a callback the first event is logged and the connection closed.
    pub async fn events_block_hits(
        &self,
        callback: Option<EventCallback>,
    ) -> Result<ListenerHandle> {
        self.add_listener(&Command::events_block_hits().encode(), callback)
            .await
    }

    /// Poll block hits and stream every inbound event.
    pub async fn subscribe_block_hits(&self) -> Result<Subscription> {
        self.subscribe(&Command::events_block_hits().encode()).await
    }

    pub async fn events_clear(&self) -> Result<()> {
        self.send_command(Command::events_clear()).await
    }
}
