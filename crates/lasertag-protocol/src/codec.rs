//! Codec trait and implementations for turning messages into bytes.
//!
//! The wire format is [`BinaryCodec`]: byte 0 is the discriminator, every
//! field after it is one byte unless the catalog says otherwise, and the
//! only multi-byte field (the stats timer) is little-endian. The free
//! functions [`encode`] and [`decode`] are the binary format itself;
//! the codec types wrap them behind the [`Codec`] trait so tooling can
//! swap in [`JsonCodec`] when a human needs to read the traffic.

use crate::catalog::{self, MessageType, ShapeKind, MAX_NAME_LEN, MAX_PLAYERS};
use crate::{
    EventIn, EventToServer, GameStart, Message, MessageToDevice, PlayerId, PlayerRecord,
    ProtocolError, Signal, StatsSnapshot, TimeMessage,
};

/// Something that can turn a [`Message`] into bytes and back.
///
/// `Send + Sync + 'static` so a codec can live inside a long-running
/// Tokio task alongside the coordinator.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message.
    ///
    /// # Errors
    /// The binary codec never fails. Text codecs may.
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError>;

    /// Parses one datagram.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] describing why the datagram was rejected.
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;
}

// ---------------------------------------------------------------------------
// BinaryCodec
// ---------------------------------------------------------------------------

/// The fixed-layout wire format spoken by the wearables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError> {
        Ok(encode(message))
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        decode(data)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Never sent over the air. It exists so logs, captures and test
/// fixtures can show messages in a readable form. Behind the `json`
/// feature (on by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(message)?)
    }

    /// Rejects a message whose `kind` doesn't fit its variant, so every
    /// decoded message can go straight back through [`encode`].
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        let message: Message = serde_json::from_slice(data)?;
        if !message.is_well_formed() {
            return Err(ProtocolError::MalformedMessage(message.message_type()));
        }
        Ok(message)
    }
}

// ---------------------------------------------------------------------------
// Binary format
// ---------------------------------------------------------------------------

/// Encodes a message into its wire bytes.
///
/// Total: numeric fields are written as-is, range checks belong to the
/// player-state layer. A stats roster longer than [`MAX_PLAYERS`] is cut
/// at that many players, and names longer than 255 bytes are cut at the
/// last char boundary that fits.
///
/// # Panics
/// In debug builds, if the message is not [well formed]; the binary
/// decoder and [`JsonCodec`] never hand out such a message. Release
/// builds write the bytes anyway and the peer reads them as another
/// layout.
///
/// [well formed]: Message::is_well_formed
pub fn encode(message: &Message) -> Vec<u8> {
    debug_assert!(message.is_well_formed(), "encoding malformed {message:?}");

    let mut out = Vec::with_capacity(encoded_len(message));
    out.push(message.message_type().as_byte());

    match message {
        Message::Signal(_) => {}
        Message::Time(t) => out.extend_from_slice(&[t.minutes, t.seconds]),
        Message::EventIn(e) => out.push(e.payload),
        Message::EventToServer(e) => out.extend_from_slice(&[
            e.player_id.0,
            e.other_player_id.0,
            e.health,
            e.score as u8,
            e.bullets_left,
        ]),
        Message::GameStart(g) => out.extend_from_slice(&[
            u8::from(g.team_play),
            g.respawn_seconds,
            g.game_minutes,
            g.start_delay_seconds,
        ]),
        Message::MessageToDevice(m) => out.extend_from_slice(&[
            m.player_id.0,
            m.team_id,
            m.player_state,
            m.bullets_left,
        ]),
        Message::StatsSnapshot(s) => {
            let players = wire_roster(s);
            out.push(u8::from(s.game_running));
            out.push(u8::from(s.team_play));
            out.extend_from_slice(&s.timer_seconds.to_le_bytes());
            // wire_roster caps at MAX_PLAYERS, so this fits a byte.
            out.push(players.len() as u8);
            for player in players {
                write_record(&mut out, player);
            }
        }
    }

    out
}

/// The exact number of bytes [`encode`] produces for `message`.
pub fn encoded_len(message: &Message) -> usize {
    let fixed = message.message_type().shape().fixed_len();
    match message {
        Message::StatsSnapshot(s) => {
            fixed
                + wire_roster(s)
                    .iter()
                    .map(|p| catalog::roster_record_len() + wire_name(&p.name).len())
                    .sum::<usize>()
        }
        _ => fixed,
    }
}

/// Decodes one datagram.
///
/// Bytes past the end of a complete message are ignored; some radios
/// hand over a padded buffer.
///
/// # Errors
/// - [`ProtocolError::EmptyDatagram`] for zero bytes.
/// - [`ProtocolError::UnknownType`] if byte 0 is not in the catalog.
/// - [`ProtocolError::TruncatedMessage`] if the fixed part is short.
/// - [`ProtocolError::TruncatedRoster`] if a stats roster runs out of bytes.
pub fn decode(data: &[u8]) -> Result<Message, ProtocolError> {
    let (&type_byte, _) = data.split_first().ok_or(ProtocolError::EmptyDatagram)?;
    let message_type =
        MessageType::from_byte(type_byte).ok_or(ProtocolError::UnknownType(type_byte))?;

    let shape = message_type.shape();
    let expected = shape.fixed_len();
    if data.len() < expected {
        return Err(ProtocolError::TruncatedMessage {
            message_type,
            expected,
            actual: data.len(),
        });
    }

    // Fixed fields, discriminator stripped. Length checked above.
    let f = &data[1..expected];

    let message: Message = match shape.kind {
        ShapeKind::Signal => Signal { kind: message_type }.into(),
        ShapeKind::Time => TimeMessage {
            minutes: f[0],
            seconds: f[1],
        }
        .into(),
        ShapeKind::Event => EventIn::new(message_type, f[0]).into(),
        ShapeKind::EventReport => EventToServer {
            kind: message_type,
            player_id: PlayerId(f[0]),
            other_player_id: PlayerId(f[1]),
            health: f[2],
            score: f[3] as i8,
            bullets_left: f[4],
        }
        .into(),
        ShapeKind::GameStart => GameStart {
            team_play: f[0] != 0,
            respawn_seconds: f[1],
            game_minutes: f[2],
            start_delay_seconds: f[3],
        }
        .into(),
        ShapeKind::DeviceState => MessageToDevice {
            player_id: PlayerId(f[0]),
            team_id: f[1],
            player_state: f[2],
            bullets_left: f[3],
        }
        .into(),
        ShapeKind::Stats => StatsSnapshot {
            game_running: f[0] != 0,
            team_play: f[1] != 0,
            timer_seconds: u16::from_le_bytes([f[2], f[3]]),
            players: decode_roster(usize::from(f[4]), &data[expected..])?,
        }
        .into(),
    };

    Ok(message)
}

fn wire_roster(stats: &StatsSnapshot) -> &[PlayerRecord] {
    &stats.players[..stats.players.len().min(MAX_PLAYERS)]
}

fn wire_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn write_record(out: &mut Vec<u8>, player: &PlayerRecord) {
    let name = wire_name(&player.name);
    out.extend_from_slice(&[
        player.id.0,
        player.health,
        player.score as u8,
        player.team_id,
        player.damage,
        player.bullets_left,
        name.len() as u8,
    ]);
    out.extend_from_slice(name.as_bytes());
}

fn decode_roster(declared: usize, mut rest: &[u8]) -> Result<Vec<PlayerRecord>, ProtocolError> {
    let record_len = catalog::roster_record_len();
    let mut players = Vec::with_capacity(declared);

    for _ in 0..declared {
        let truncated = |decoded| ProtocolError::TruncatedRoster { declared, decoded };

        if rest.len() < record_len {
            return Err(truncated(players.len()));
        }
        let (fixed, tail) = rest.split_at(record_len);
        let name_len = usize::from(fixed[6]);
        if tail.len() < name_len {
            return Err(truncated(players.len()));
        }
        let (name, tail) = tail.split_at(name_len);

        players.push(PlayerRecord {
            id: PlayerId(fixed[0]),
            health: fixed[1],
            score: fixed[2] as i8,
            team_id: fixed[3],
            damage: fixed[4],
            bullets_left: fixed[5],
            name: String::from_utf8_lossy(name).into_owned(),
        });
        rest = tail;
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    //! The firmware on the gun and vest is written against these exact
    //! byte layouts, so most tests here pin bytes rather than just
    //! checking that decode undoes encode.

    use super::*;

    fn record(id: u8, name: &str) -> PlayerRecord {
        PlayerRecord {
            id: PlayerId(id),
            health: 80,
            score: -3,
            team_id: 2,
            damage: 25,
            bullets_left: 6,
            name: name.to_string(),
        }
    }

    fn stats(players: Vec<PlayerRecord>) -> Message {
        StatsSnapshot {
            game_running: true,
            team_play: true,
            timer_seconds: 0x0102,
            players,
        }
        .into()
    }

    /// One value of every variant, including each event/report family.
    fn every_variant() -> Vec<Message> {
        vec![
            Message::ping(),
            Signal {
                kind: MessageType::ServerDisconnected,
            }
            .into(),
            TimeMessage {
                minutes: 9,
                seconds: 59,
            }
            .into(),
            EventIn::new(MessageType::GotHit, 4).into(),
            EventIn::new(MessageType::YouScored, 0).into(),
            EventToServer {
                kind: MessageType::KillReport,
                player_id: PlayerId(2),
                other_player_id: PlayerId(5),
                health: 0,
                score: -7,
                bullets_left: 3,
            }
            .into(),
            GameStart {
                team_play: true,
                respawn_seconds: 10,
                game_minutes: 15,
                start_delay_seconds: 5,
            }
            .into(),
            MessageToDevice {
                player_id: PlayerId(3),
                team_id: 1,
                player_state: 1,
                bullets_left: 8,
            }
            .into(),
            stats(vec![record(1, "alice"), record(2, ""), record(3, "zoë")]),
        ]
    }

    // =====================================================================
    // encode
    // =====================================================================

    #[test]
    fn test_hit_report_bytes() {
        let msg: Message = EventToServer {
            kind: MessageType::HitReport,
            player_id: PlayerId(3),
            other_player_id: PlayerId(7),
            health: 55,
            score: 120,
            bullets_left: 4,
        }
        .into();

        assert_eq!(encode(&msg), vec![0x10, 3, 7, 55, 120, 4]);
    }

    #[test]
    fn test_negative_score_is_twos_complement() {
        let msg: Message = EventToServer {
            kind: MessageType::ShotReport,
            player_id: PlayerId(1),
            other_player_id: PlayerId(0),
            health: 100,
            score: -1,
            bullets_left: 0,
        }
        .into();

        assert_eq!(encode(&msg)[4], 0xFF);
    }

    #[test]
    fn test_fixed_variant_bytes() {
        assert_eq!(encode(&Message::ping()), vec![0x01]);
        assert_eq!(
            encode(
                &TimeMessage {
                    minutes: 2,
                    seconds: 30
                }
                .into()
            ),
            vec![101, 2, 30]
        );
        assert_eq!(
            encode(&EventIn::new(MessageType::GotHit, 9).into()),
            vec![0x05, 9]
        );
        assert_eq!(
            encode(
                &GameStart {
                    team_play: true,
                    respawn_seconds: 10,
                    game_minutes: 20,
                    start_delay_seconds: 3,
                }
                .into()
            ),
            vec![0x08, 1, 10, 20, 3]
        );
        assert_eq!(
            encode(
                &MessageToDevice {
                    player_id: PlayerId(4),
                    team_id: 2,
                    player_state: 1,
                    bullets_left: 6,
                }
                .into()
            ),
            vec![0x0D, 4, 2, 1, 6]
        );
    }

    #[test]
    fn test_stats_bytes() {
        let msg = stats(vec![record(1, "al")]);
        assert_eq!(
            encode(&msg),
            vec![
                0x0B, 1, 1, 0x02, 0x01, 1, // header, timer little-endian
                1, 80, 0xFD, 2, 25, 6, 2, b'a', b'l',
            ]
        );
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        for msg in every_variant() {
            assert_eq!(encoded_len(&msg), encode(&msg).len(), "{msg:?}");
        }
    }

    #[test]
    fn test_fixed_variants_have_catalog_length() {
        for msg in every_variant() {
            if let Message::StatsSnapshot(_) = msg {
                continue;
            }
            assert_eq!(
                encode(&msg).len(),
                msg.message_type().shape().fixed_len(),
                "{msg:?}"
            );
        }
    }

    #[test]
    fn test_long_name_is_cut_on_char_boundary() {
        // 200 two-byte chars = 400 bytes; 255 is odd so the cut must back off one.
        let name = "é".repeat(200);
        let msg = stats(vec![record(1, &name)]);

        let bytes = encode(&msg);
        assert_eq!(bytes[6 + 6], 254);

        let Message::StatsSnapshot(decoded) = decode(&bytes).unwrap() else {
            panic!("expected stats");
        };
        assert_eq!(decoded.players[0].name, "é".repeat(127));
    }

    #[test]
    fn test_roster_is_capped_at_max_players() {
        let players = (0..40).map(|i| record(i, "p")).collect();
        let bytes = encode(&stats(players));

        assert_eq!(bytes[5] as usize, MAX_PLAYERS);
        let Message::StatsSnapshot(decoded) = decode(&bytes).unwrap() else {
            panic!("expected stats");
        };
        assert_eq!(decoded.players.len(), MAX_PLAYERS);
    }

    // =====================================================================
    // decode
    // =====================================================================

    #[test]
    fn test_round_trip_every_variant() {
        for msg in every_variant() {
            let decoded = decode(&encode(&msg)).expect("should decode");
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_decode_empty_datagram() {
        assert!(matches!(decode(&[]), Err(ProtocolError::EmptyDatagram)));
    }

    #[test]
    fn test_decode_unknown_type() {
        assert!(matches!(
            decode(&[0x42, 1, 2]),
            Err(ProtocolError::UnknownType(0x42))
        ));
    }

    #[test]
    fn test_decode_truncated_fixed_message() {
        let result = decode(&[0x10, 3, 7]);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedMessage {
                message_type: MessageType::HitReport,
                expected: 6,
                actual: 3,
            })
        ));
    }

    #[test]
    fn test_decode_truncated_stats_header() {
        let result = decode(&[0x0B, 1, 0]);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedMessage {
                message_type: MessageType::FullStats,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_roster_claiming_more_players_than_present() {
        // Claims 3 players, carries bytes for exactly one.
        let mut bytes = encode(&stats(vec![record(1, "al")]));
        bytes[5] = 3;

        let result = decode(&bytes);
        assert!(
            matches!(
                result,
                Err(ProtocolError::TruncatedRoster {
                    declared: 3,
                    decoded: 1
                })
            ),
            "got {result:?}"
        );
    }

    #[test]
    fn test_decode_roster_with_short_name() {
        let mut bytes = encode(&stats(vec![record(1, "alice")]));
        bytes.truncate(bytes.len() - 2);

        assert!(matches!(
            decode(&bytes),
            Err(ProtocolError::TruncatedRoster {
                declared: 1,
                decoded: 0
            })
        ));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let decoded = decode(&[0x05, 9, 0, 0, 0]).unwrap();
        assert_eq!(decoded, EventIn::new(MessageType::GotHit, 9).into());
    }

    #[test]
    fn test_decode_nonzero_bool_is_true() {
        let Message::GameStart(g) = decode(&[0x08, 7, 1, 2, 3]).unwrap() else {
            panic!("expected game start");
        };
        assert!(g.team_play);
    }

    #[test]
    fn test_decode_invalid_utf8_name_is_lossy() {
        let bytes = [0x0B, 0, 0, 0, 0, 1, 1, 100, 0, 0, 10, 8, 2, 0xFF, b'x'];
        let Message::StatsSnapshot(s) = decode(&bytes).unwrap() else {
            panic!("expected stats");
        };
        assert_eq!(s.players[0].name, "\u{FFFD}x");
    }

    #[test]
    fn test_decode_empty_roster() {
        let Message::StatsSnapshot(s) = decode(&[0x0B, 0, 1, 0x2C, 0x01, 0]).unwrap() else {
            panic!("expected stats");
        };
        assert!(!s.game_running);
        assert!(s.team_play);
        assert_eq!(s.timer_seconds, 300);
        assert!(s.players.is_empty());
    }

    // =====================================================================
    // Codec trait
    // =====================================================================

    #[test]
    fn test_binary_codec_matches_free_functions() {
        let codec = BinaryCodec;
        for msg in every_variant() {
            let bytes = codec.encode(&msg).unwrap();
            assert_eq!(bytes, encode(&msg));
            assert_eq!(codec.decode(&bytes).unwrap(), msg);
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        for msg in every_variant() {
            let bytes = codec.encode(&msg).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), msg);
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_rejects_garbage() {
        assert!(matches!(
            JsonCodec.decode(b"{not json"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_rejects_kind_from_other_layout() {
        let data = br#"{"type":"Signal","data":{"kind":"FullStats"}}"#;
        assert!(matches!(
            JsonCodec.decode(data),
            Err(ProtocolError::MalformedMessage(MessageType::FullStats))
        ));

        let data = br#"{"type":"EventIn","data":{"kind":"HitReport","payload":3}}"#;
        assert!(matches!(
            JsonCodec.decode(data),
            Err(ProtocolError::MalformedMessage(MessageType::HitReport))
        ));

        let ok = br#"{"type":"Signal","data":{"kind":"Ping"}}"#;
        assert_eq!(JsonCodec.decode(ok).unwrap(), Message::ping());
    }
}
