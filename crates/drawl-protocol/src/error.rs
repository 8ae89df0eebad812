//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` always means a frame could not be turned into (or out
//! of) a typed message, never that the network failed.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, or a known message kind whose
    /// `data` object is missing required fields.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message is invalid at the protocol level.
    ///
    /// For values that parse as JSON but break a protocol rule, such as
    /// an entry key that is not `"<chain>:<entry>"`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
