//! Replays captured datagrams through a coordinator.
//!
//! Reads one command per line from stdin:
//!
//! ```text
//! join 1 alice 1      # register player 1 on team 1
//! start team 5        # GameStart from the config: team play, 5 s delay
//! 08 01 0a 05 00      # a datagram, as hex bytes
//! tick 30             # advance the match timer
//! stop                # end the match early
//! ```
//!
//! Blank lines and `#` comments are skipped. When input ends, the final
//! stats snapshot is printed as wire hex and as JSON. An optional first
//! argument names a JSON `GameConfig` file.
//!
//! Set `RUST_LOG=debug` to see discarded datagrams.

use lasertag::prelude::*;
use lasertag::protocol::JsonCodec;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Input lines
// ---------------------------------------------------------------------------

enum Line {
    Join { id: PlayerId, name: String, team: u8 },
    Start { team_play: bool, delay: u8 },
    Tick(u32),
    Stop,
    Datagram(Vec<u8>),
}

fn parse_line(line: &str) -> Result<Option<Line>, String> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };

    match first {
        "join" => {
            let id = parse_u8(words.next(), "player id")?;
            let name = words.next().unwrap_or_default().to_string();
            let team = match words.next() {
                Some(t) => parse_u8(Some(t), "team id")?,
                None => 0,
            };
            Ok(Some(Line::Join {
                id: PlayerId(id),
                name,
                team,
            }))
        }
        "start" => {
            let mut team_play = false;
            let mut delay = 0;
            for word in words {
                if word == "team" {
                    team_play = true;
                } else {
                    delay = parse_u8(Some(word), "start delay")?;
                }
            }
            Ok(Some(Line::Start { team_play, delay }))
        }
        "stop" => Ok(Some(Line::Stop)),
        "tick" => {
            let seconds = words
                .next()
                .ok_or("tick needs seconds")?
                .parse()
                .map_err(|e| format!("bad tick: {e}"))?;
            Ok(Some(Line::Tick(seconds)))
        }
        _ => {
            let bytes = line
                .split_whitespace()
                .map(|b| u8::from_str_radix(b, 16).map_err(|e| format!("bad hex byte {b:?}: {e}")))
                .collect::<Result<Vec<u8>, String>>()?;
            Ok(Some(Line::Datagram(bytes)))
        }
    }
}

fn parse_u8(word: Option<&str>, what: &str) -> Result<u8, String> {
    word.ok_or_else(|| format!("missing {what}"))?
        .parse()
        .map_err(|e| format!("bad {what}: {e}"))
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

async fn load_config() -> Result<GameConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = tokio::fs::read_to_string(&path).await?;
            let config: GameConfig = serde_json::from_str(&text)?;
            tracing::info!(%path, ?config, "loaded game config");
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config().await?;
    let handle = spawn_coordinator(Coordinator::new(config.clone())?, 64);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let parsed = match parse_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(reason) => {
                tracing::warn!(line_no, %reason, "skipping line");
                continue;
            }
        };

        match parsed {
            Line::Join { id, name, team } => {
                handle.join(id, name, team).await?;
            }
            Line::Start { team_play, delay } => {
                let start = config.game_start(team_play, delay);
                match handle.apply(Message::from(start)).await {
                    Ok(outcomes) => println!("{line_no}: {outcomes:?}"),
                    Err(GameError::Unavailable) => return Err(GameError::Unavailable.into()),
                    Err(e) => println!("{line_no}: rejected: {e}"),
                }
            }
            Line::Stop => match handle.stop().await {
                Ok(outcome) => println!("{line_no}: {outcome:?}"),
                Err(GameError::Unavailable) => return Err(GameError::Unavailable.into()),
                Err(e) => println!("{line_no}: rejected: {e}"),
            },
            Line::Tick(seconds) => {
                if let Some(outcome) = handle.tick(seconds).await? {
                    println!("{line_no}: {outcome:?}");
                }
            }
            Line::Datagram(bytes) => match handle.apply_datagram(bytes).await {
                Ok(outcomes) => println!("{line_no}: {outcomes:?}"),
                Err(GameError::Unavailable) => return Err(GameError::Unavailable.into()),
                Err(e) => println!("{line_no}: rejected: {e}"),
            },
        }
    }

    let snapshot = Message::from(handle.snapshot().await?);
    println!("snapshot: {}", hex(&encode(&snapshot)));
    let json = JsonCodec.encode(&snapshot)?;
    println!("{}", String::from_utf8_lossy(&json));

    handle.shutdown().await?;
    Ok(())
}
