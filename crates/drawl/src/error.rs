//! Unified error type for the Drawl client.

use drawl_canvas::CanvasError;
use drawl_protocol::ProtocolError;
use drawl_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DrawlError {
    /// A transport-level error (connect, send, recv).
    ///
    /// Produced when driving a [`drawl_transport::Connection`] directly.
    /// [`ConnectionManager`](crate::ConnectionManager) logs transport
    /// failures and reports them as [`LinkStatus::Closed`](crate::LinkStatus::Closed)
    /// instead.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The drawing could not be turned into an artifact.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Creating or joining a game over HTTP failed.
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    /// The client configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from the create/join HTTP calls.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    /// The request never got a usable response (network, TLS, bad body).
    #[error("onboarding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// `message` is the server's own explanation, suitable for showing
    /// to the player as-is.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors building the client configuration or its URLs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
