//! Election error types

use std::path::PathBuf;

use crate::message::MessageKind;

/// Result type for election operations
pub type Result<T> = std::result::Result<T, ElectionError>;

/// Election-specific error types
///
/// Configuration errors are detected before any node starts. Protocol and
/// channel errors abort the node that hit them and, through the simulation
/// driver, the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ElectionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("input file doesn't exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{0} is not an int")]
    NotAnInteger(String),

    #[error("{0} is already exists in the network")]
    DuplicateId(u64),

    #[error("invalid number of ids: expected {expected}, found {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("ring must contain at least one node")]
    EmptyRing,

    #[error("cannot sample {count} distinct ids from {min}..={max}")]
    RangeTooSmall { count: usize, min: u64, max: u64 },

    #[error("Protocol violation at node {node}: expected {expected}, received {received}")]
    Protocol {
        node: usize,
        expected: &'static str,
        received: MessageKind,
    },

    #[error("Channel closed at node {node}: {link}")]
    ChannelClosed { node: usize, link: &'static str },

    #[error("Node {0} stopped reporting before finishing")]
    NodeAborted(usize),

    #[error("Invalid election state: {0}")]
    InvalidState(String),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ElectionError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn protocol(node: usize, expected: &'static str, received: MessageKind) -> Self {
        Self::Protocol {
            node,
            expected,
            received,
        }
    }

    pub fn channel_closed(node: usize, link: &'static str) -> Self {
        Self::ChannelClosed { node, link }
    }

    pub fn count_mismatch(expected: usize, found: usize) -> Self {
        Self::CountMismatch { expected, found }
    }

    /// Whether the error was raised before the protocol started.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::FileNotFound(_)
                | Self::NotAnInteger(_)
                | Self::DuplicateId(_)
                | Self::CountMismatch { .. }
                | Self::EmptyRing
                | Self::RangeTooSmall { .. }
                | Self::Toml(_)
        )
    }
}
