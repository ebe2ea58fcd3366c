//! Protocol messages and status events

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message passed from a node to its ring successor.
///
/// The payload is always a candidate id. Messages are never rewritten in
/// transit: a passive node forwards exactly what it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Message {
    /// First message of a round, carries the sender's candidate
    Probe(u64),

    /// Second message of a round, carries the probe value the sender saw
    Challenge(u64),

    /// Definitive election result, travels the ring exactly once
    Announce(u64),
}

impl Message {
    pub fn value(&self) -> u64 {
        match self {
            Self::Probe(v) | Self::Challenge(v) | Self::Announce(v) => *v,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Probe(_) => MessageKind::Probe,
            Self::Challenge(_) => MessageKind::Challenge,
            Self::Announce(_) => MessageKind::Announce,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.value())
    }
}

/// Payload-free tag of a [`Message`], used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Probe,
    Challenge,
    Announce,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe => write!(f, "probe"),
            Self::Challenge => write!(f, "challenge"),
            Self::Announce => write!(f, "announce"),
        }
    }
}

/// Role of a node during and after the election
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Still originates probes
    Active,

    /// Only relays messages
    Passive,

    /// Holds the elected id
    Leader,

    /// Finished without being elected
    Loser,
}

impl Role {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Leader | Self::Loser)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Passive => write!(f, "passive"),
            Self::Leader => write!(f, "leader"),
            Self::Loser => write!(f, "loser"),
        }
    }
}

/// Report a node sends to the monitor after every send or relay, and once
/// more when its role is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Ring position of the reporting node
    pub index: usize,

    /// Id assigned to the reporting node
    pub id: u64,

    pub role: Role,

    pub candidate: u64,

    /// Set on the node's last event
    pub stopped: bool,
}
