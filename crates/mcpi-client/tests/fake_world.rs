//! Client tests against an in-process fake world on loopback TCP

use mcpi_client::{ClientConfig, Connection, Framing, Minecraft};
use mcpi_core::response::parse_player_ids;
use mcpi_core::{McpiError, Pos, TilePos, blocks};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, timeout};
use tokio_test::{assert_err, assert_ok};

const WAIT: Duration = Duration::from_secs(5);

/// A world that remembers blocks and answers the read-only calls.
struct FakeWorld {
    addr: SocketAddr,
    lines: mpsc::UnboundedReceiver<String>,
}

impl FakeWorld {
    async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (line_tx, lines) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut reader = BufReader::new(read).lines();
            let mut world: HashMap<(i32, i32, i32), u32> = HashMap::new();

            while let Ok(Some(line)) = reader.next_line().await {
                let _ = line_tx.send(line.clone());
                for (i, reply) in respond(&line, &mut world).into_iter().enumerate() {
                    if i > 0 {
                        sleep(Duration::from_millis(50)).await;
                    }
                    if write.write_all(reply.as_bytes()).await.is_err() {
                        return;
                    }
                }
            }
        });

        Self { addr, lines }
    }

    fn config(&self, framing: Framing) -> ClientConfig {
        ClientConfig::new(self.addr.ip().to_string(), self.addr.port()).with_framing(framing)
    }

    async fn next_line(&mut self) -> String {
        timeout(WAIT, self.lines.recv()).await.unwrap().unwrap()
    }
}

/// A world that reads every command and never answers.
async fn silent_world() -> ClientConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream).lines();
        while let Ok(Some(_)) = reader.next_line().await {}
    });
    ClientConfig::new(addr.ip().to_string(), addr.port())
}

fn split_call(line: &str) -> (&str, Vec<i32>) {
    let (method, rest) = line.split_once('(').unwrap();
    let args = rest
        .trim_end_matches(')')
        .split(',')
        .filter_map(|a| a.parse().ok())
        .collect();
    (method, args)
}

fn respond(line: &str, world: &mut HashMap<(i32, i32, i32), u32>) -> Vec<String> {
    let (method, args) = split_call(line);
    match method {
        "world.setBlock" => {
            world.insert((args[0], args[1], args[2]), args[3] as u32);
            vec![]
        }
        "world.getBlock" => {
            let id = world.get(&(args[0], args[1], args[2])).copied().unwrap_or(0);
            vec![format!("{}\n", id)]
        }
        "world.getHeight" => vec!["64\n".into()],
        "world.getPlayerIds" => vec!["1|2\n".into()],
        "player.getTile" => vec![" 1,2,3\n".into()],
        "player.getPos" => vec!["1.5,2.0,3.25\n".into()],
        "events.block.hits" => vec!["1,2,3,1,7\n".into(), "4,5,6,0,7\n".into()],
        "test.garbage" => vec!["Fail\n".into()],
        _ => vec![],
    }
}

#[tokio::test]
async fn test_set_then_get_block() {
    let world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Chunk)).await.unwrap();

    let pos = TilePos::new(3, -1, 12);
    let tnt = blocks::id("TNT").unwrap();
    assert_ok!(mc.set_block(pos, tnt, None).await);
    assert_eq!(mc.get_block(pos).await.unwrap(), tnt);
    assert_eq!(mc.get_block_name(tnt), "TNT");
}

#[tokio::test]
async fn test_wire_lines() {
    let mut world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Chunk)).await.unwrap();

    mc.set_blocks(TilePos::new(0, 0, 0), TilePos::new(2, 2, 2), 35, Some(14))
        .await
        .unwrap();
    mc.world_setting("world_immutable", true).await.unwrap();
    mc.set_camera_mode("sideways").await.unwrap();
    mc.set_camera_mode("thirdPerson").await.unwrap();
    mc.set_camera_position(TilePos::new(1, 70, 1)).await.unwrap();
    mc.set_pos(Pos::new(0.5, 64.0, 0.5)).await.unwrap();
    mc.chat("hello").await.unwrap();
    mc.save_checkpoint().await.unwrap();
    mc.events_clear().await.unwrap();

    let expected = [
        "world.setBlocks(0,0,0,2,2,2,35,14)",
        "world.setting(world_immutable,1)",
        "camera.mode.setThirdPerson()",
        "camera.mode.setPos(1,70,1)",
        "player.setPos(0.5,64,0.5)",
        "chat.post(hello)",
        "world.checkpoint.save()",
        "events.clear()",
    ];
    for line in expected {
        assert_eq!(world.next_line().await, line);
    }
}

#[tokio::test]
async fn test_player_queries() {
    let world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Chunk)).await.unwrap();

    assert_eq!(mc.get_tile().await.unwrap(), TilePos::new(1, 2, 3));
    assert_eq!(mc.get_pos().await.unwrap(), Pos::new(1.5, 2.0, 3.25));
    assert_eq!(
        mc.get_height(TilePos::new(9, 0, -4)).await.unwrap(),
        TilePos::new(9, 64, -4)
    );

    let ids = mc.get_player_ids().await.unwrap();
    assert_eq!(parse_player_ids(&ids).unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn test_unparsable_reply_is_an_error() {
    let world = FakeWorld::spawn().await;
    let conn = Connection::connect(&world.config(Framing::Chunk)).await.unwrap();

    let raw = conn.request("test.garbage()").await.unwrap();
    let parsed = mcpi_core::response::parse_int::<u32>(&raw);
    assert!(matches!(parsed, Err(McpiError::Parse(_))));
}

#[tokio::test]
async fn test_send_receive_without_callback_closes() {
    let world = FakeWorld::spawn().await;
    let conn = Connection::connect(&world.config(Framing::Chunk)).await.unwrap();

    conn.send_receive("world.getBlock(0,0,0)", None).await.unwrap();
    timeout(WAIT, conn.closed()).await.unwrap();

    assert!(conn.is_closed());
    assert!(matches!(conn.send("chat.post(late)").await, Err(McpiError::NotConnected)));
}

#[tokio::test]
async fn test_send_receive_with_callback() {
    let world = FakeWorld::spawn().await;
    let conn = Connection::connect(&world.config(Framing::Chunk)).await.unwrap();

    let (tx, rx) = oneshot::channel();
    conn.send_receive(
        "player.getTile()",
        Some(Box::new(move |data: String| {
            let _ = tx.send(data);
        })),
    )
    .await
    .unwrap();

    assert_eq!(timeout(WAIT, rx).await.unwrap().unwrap(), " 1,2,3\n");
    assert!(!conn.is_closed());
}

#[tokio::test]
async fn test_block_hit_subscription() {
    let world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Line)).await.unwrap();

    let mut hits = mc.subscribe_block_hits().await.unwrap();
    assert_eq!(timeout(WAIT, hits.recv()).await.unwrap().unwrap(), "1,2,3,1,7");
    assert_eq!(timeout(WAIT, hits.recv()).await.unwrap().unwrap(), "4,5,6,0,7");
}

#[tokio::test]
async fn test_block_hit_callback_until_cancelled() {
    let world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Line)).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = mc
        .events_block_hits(Some(Box::new(move |data: String| {
            let _ = tx.send(data);
        })))
        .await
        .unwrap();

    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), "1,2,3,1,7");
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), "4,5,6,0,7");

    listener.cancel();
    // Callback dropped once the cancel is processed.
    assert!(timeout(WAIT, rx.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_block_hit_default_listener_closes() {
    let world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Chunk)).await.unwrap();

    mc.events_block_hits(None).await.unwrap();
    timeout(WAIT, mc.connection().closed()).await.unwrap();
    assert_err!(mc.chat("gone").await);
}

#[tokio::test]
async fn test_end_closes_immediately() {
    let world = FakeWorld::spawn().await;
    let mc = Minecraft::connect(&world.config(Framing::Chunk)).await.unwrap();

    mc.end();
    assert!(mc.connection().is_closed());
    assert!(matches!(mc.chat("x").await, Err(McpiError::NotConnected)));
}

#[tokio::test]
async fn test_end_fails_pending_and_stops_listeners() {
    let config = silent_world().await;
    let mc = Minecraft::connect(&config).await.unwrap();
    let mut hits = mc.subscribe_block_hits().await.unwrap();

    let (tile, ()) = timeout(WAIT, async {
        tokio::join!(mc.get_tile(), async {
            sleep(Duration::from_millis(50)).await;
            mc.end();
        })
    })
    .await
    .unwrap();

    assert!(matches!(tile, Err(McpiError::ConnectionClosed)));
    assert!(timeout(WAIT, hits.recv()).await.unwrap().is_none());

    // Second end is a no-op.
    mc.end();
    assert!(mc.connection().is_closed());
    assert!(matches!(mc.chat("x").await, Err(McpiError::NotConnected)));
}

#[tokio::test]
async fn test_chunk_framing_shares_reply_between_outstanding_requests() {
    let world = FakeWorld::spawn().await;
    let conn = Connection::connect(&world.config(Framing::Chunk)).await.unwrap();

    let (height, block) = timeout(WAIT, async {
        tokio::join!(
            conn.request("world.getHeight(0,0)"),
            conn.request("world.getBlock(0,0,0)")
        )
    })
    .await
    .unwrap();

    let height = height.unwrap();
    assert!(height.starts_with("64\n"), "got {:?}", height);
    assert_eq!(block.unwrap(), height);
}

#[tokio::test]
async fn test_line_framing_answers_outstanding_requests_in_order() {
    let world = FakeWorld::spawn().await;
    let conn = Connection::connect(&world.config(Framing::Line)).await.unwrap();

    let (height, block) = timeout(WAIT, async {
        tokio::join!(
            conn.request("world.getHeight(0,0)"),
            conn.request("world.getBlock(0,0,0)")
        )
    })
    .await
    .unwrap();

    assert_eq!(height.unwrap(), "64");
    assert_eq!(block.unwrap(), "0");
}

#[tokio::test]
async fn test_remote_close_fails_pending_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let _ = reader.read_line(&mut line).await;
        // Drop without replying.
    });

    let config = ClientConfig::new(addr.ip().to_string(), addr.port());
    let mc = Minecraft::connect(&config).await.unwrap();

    let result = timeout(WAIT, mc.get_tile()).await.unwrap();
    assert!(matches!(result, Err(McpiError::ConnectionClosed)));
    timeout(WAIT, mc.connection().closed()).await.unwrap();
}

#[tokio::test]
async fn test_connect_refused() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(addr.ip().to_string(), addr.port());
    let result = Minecraft::connect(&config).await;
    assert!(matches!(result, Err(McpiError::Connection(_))));
}
