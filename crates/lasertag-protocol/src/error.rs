//! Error types for the protocol layer.
//!
//! Every decode failure is local to one datagram: the caller discards
//! it (or asks for a resend) and carries on. Nothing here is fatal.

use crate::MessageType;

/// Errors that can occur while decoding a datagram.
///
/// Encoding the binary format never fails; only the JSON debug codec
/// has an encode error.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The datagram had no bytes at all, so not even a discriminator.
    #[error("empty datagram")]
    EmptyDatagram,

    /// The discriminator byte is not in the catalog. Usually a peer on
    /// an incompatible protocol version, or a corrupted datagram.
    #[error("unknown message type 0x{0:02x}")]
    UnknownType(u8),

    /// Fewer bytes than the message's fixed layout needs.
    #[error("truncated {message_type} message: expected {expected} bytes, got {actual}")]
    TruncatedMessage {
        message_type: MessageType,
        expected: usize,
        actual: usize,
    },

    /// A stats message declared more players than its bytes hold.
    #[error("truncated roster: declared {declared} players, only {decoded} fit")]
    TruncatedRoster { declared: usize, decoded: usize },

    /// The message's `kind` belongs to a different layout than the
    /// variant carrying it. Only text codecs can produce one.
    #[error("message kind {0} does not match its layout")]
    MalformedMessage(MessageType),

    /// The JSON debug codec failed.
    #[cfg(feature = "json")]
    #[error("json codec failed: {0}")]
    Json(#[from] serde_json::Error),
}
