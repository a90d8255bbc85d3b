//! Error types for the metadata pipeline.
//!
//! [`Error`] covers the failures a caller can observe. Individual gateway
//! failures are described by [`AttemptFailure`]; they are recovered by moving
//! on to the next gateway and only surface inside
//! [`Error::GatewaysExhausted`] once every gateway has failed.

use std::fmt;

/// Which request of a gateway attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    /// The metadata document request, including JSON parsing and validation.
    Metadata,
    /// The reachability check for the referenced video.
    Video,
}

impl fmt::Display for AttemptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStage::Metadata => write!(f, "metadata"),
            AttemptStage::Video => write!(f, "video"),
        }
    }
}

/// A single failed attempt against one gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// Zero-based index into the gateway list.
    pub gateway: usize,
    /// The request that failed.
    pub stage: AttemptStage,
    /// Human-readable cause (HTTP status, timeout, parse error, ...).
    pub message: String,
}

impl AttemptFailure {
    pub fn new(gateway: usize, stage: AttemptStage, message: impl Into<String>) -> Self {
        Self {
            gateway,
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gateway {} failed ({}): {}",
            self.gateway + 1,
            self.stage,
            self.message
        )
    }
}

/// Common error type for coursenft.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed identifier or token id. Never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A metadata document did not match the expected shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The configuration is unusable (e.g. an empty gateway list).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every configured gateway failed for one logical fetch.
    #[error("Failed to fetch metadata from all {attempted} gateways. Last error: {last_error}")]
    GatewaysExhausted {
        /// Number of gateways that were tried.
        attempted: usize,
        /// Rendering of the most recent attempt failure.
        last_error: String,
        /// Every attempt failure, in gateway order.
        failures: Vec<AttemptFailure>,
    },
}

impl Error {
    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Build the terminal error after `attempted` gateways all failed.
    pub fn exhausted(attempted: usize, failures: Vec<AttemptFailure>) -> Self {
        let last_error = failures
            .last()
            .map(ToString::to_string)
            .unwrap_or_else(|| "Unknown error".to_string());
        Self::GatewaysExhausted {
            attempted,
            last_error,
            failures,
        }
    }

    /// Returns `true` for errors caused by the caller's input rather than
    /// the network.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
