//! Ring Leader Election
//!
//! This crate runs a leader election among peers arranged in a directed
//! ring. Every peer is a tokio task that only talks to its successor over a
//! FIFO channel; a separate monitor collects per-node status events and
//! hands snapshots to a renderer until every node knows its final role.

pub mod config;
pub mod error;
pub mod ids;
pub mod message;
pub mod monitor;
pub mod node;
pub mod priority;
pub mod render;
pub mod ring;
pub mod simulation;

pub use config::ElectionConfig;
pub use error::{ElectionError, Result};
pub use ids::IdSource;
pub use message::{Message, MessageKind, Role, StatusEvent};
pub use monitor::{Monitor, MonitorReport};
pub use node::{NodeLinks, NodeOutcome, RingNode};
pub use priority::Priority;
pub use render::{Frame, FrameRecorder, NodeView, NullRenderer, Renderer, RingLayout};
pub use ring::Ring;
pub use simulation::{simulate, wire_ring, ElectionOutcome};
