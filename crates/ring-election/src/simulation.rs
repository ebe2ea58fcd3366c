//! Wires a ring of nodes to a monitor and runs one election

use crate::config::ElectionConfig;
use crate::error::{ElectionError, Result};
use crate::message::{Message, Role, StatusEvent};
use crate::monitor::{Monitor, MonitorReport};
use crate::node::{NodeLinks, NodeOutcome, RingNode};
use crate::priority::Priority;
use crate::render::Renderer;
use crate::ring::Ring;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Result of a completed election
#[derive(Debug, Clone, Serialize)]
pub struct ElectionOutcome {
    pub ids: Vec<u64>,
    pub priority: Priority,
    pub leader_index: usize,
    pub leader_id: u64,
    pub nodes: Vec<NodeOutcome>,
    /// Protocol messages sent or relayed by all nodes together
    pub total_messages: usize,
    pub rounds: usize,
    #[serde(skip)]
    pub report: MonitorReport,
}

impl ElectionOutcome {
    fn new(
        ring: &Ring,
        priority: Priority,
        mut nodes: Vec<NodeOutcome>,
        report: MonitorReport,
    ) -> Result<Self> {
        nodes.sort_by_key(|n| n.index);

        let leaders: Vec<&NodeOutcome> = nodes.iter().filter(|n| n.role == Role::Leader).collect();
        let leader = match leaders.as_slice() {
            [leader] => **leader,
            other => {
                return Err(ElectionError::invalid_state(format!(
                    "expected exactly one leader, found {}",
                    other.len()
                )))
            }
        };

        Ok(Self {
            ids: ring.ids().to_vec(),
            priority,
            leader_index: leader.index,
            leader_id: leader.id,
            total_messages: nodes.iter().map(|n| n.messages_sent).sum(),
            rounds: report.rounds,
            nodes,
            report,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the channels of a ring of `len` nodes.
///
/// Returns the links for each node and, in the same order, the monitor's
/// end of each node's status channel.
pub fn wire_ring(
    len: usize,
    status_buffer: usize,
) -> (Vec<NodeLinks>, Vec<mpsc::Receiver<StatusEvent>>) {
    let (inboxes, inbound): (Vec<mpsc::UnboundedSender<Message>>, Vec<_>) =
        (0..len).map(|_| mpsc::unbounded_channel()).unzip();

    let mut links = Vec::with_capacity(len);
    let mut status = Vec::with_capacity(len);

    for (index, from_predecessor) in inbound.into_iter().enumerate() {
        let (status_tx, status_rx) = mpsc::channel(status_buffer);
        links.push(NodeLinks {
            from_predecessor,
            to_successor: inboxes[(index + 1) % len].clone(),
            status: status_tx,
        });
        status.push(status_rx);
    }

    (links, status)
}

/// Status channel capacity for a ring of `len` nodes.
///
/// A node blocked on a full status channel can stall the monitor's round
/// robin, so the capacity never drops below the most events one node can
/// emit: two messages per elimination phase, two for the final laps, and
/// the stop event.
fn status_capacity(len: usize, configured: usize) -> usize {
    let phases = (len as f64).log2().ceil() as usize;
    configured.max(2 * (phases + 2) + 1)
}

/// Runs one election over `ids`.
///
/// Every node runs as its own task. If any node fails, the remaining ones
/// are aborted and the failure is returned.
pub async fn simulate<R: Renderer + ?Sized>(
    ids: Vec<u64>,
    config: &ElectionConfig,
    renderer: &mut R,
) -> Result<ElectionOutcome> {
    config.validate()?;
    let ring = Arc::new(Ring::new(ids)?);
    tracing::info!(
        "Starting election over {} nodes ({} id wins)",
        ring.len(),
        config.priority
    );

    let (links, status) = wire_ring(ring.len(), status_capacity(ring.len(), config.status_buffer));
    let monitor = Monitor::new(ring.clone(), status, config)?;

    let mut nodes = JoinSet::new();
    for (index, links) in links.into_iter().enumerate() {
        let node = RingNode::new(index, &ring, config.priority, links);
        nodes.spawn(node.run());
    }

    let report = match monitor.run(renderer).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("Election aborted: {}", err);
            return Err(root_cause(&mut nodes).await.unwrap_or(err));
        }
    };

    let mut outcomes = Vec::with_capacity(ring.len());
    while let Some(joined) = nodes.join_next().await {
        match joined? {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                nodes.abort_all();
                return Err(err);
            }
        }
    }

    let outcome = ElectionOutcome::new(&ring, config.priority, outcomes, report)?;
    tracing::info!(
        "Node {} (id {}) elected after {} messages",
        outcome.leader_index,
        outcome.leader_id,
        outcome.total_messages
    );
    Ok(outcome)
}

/// Stops every node and picks the error that started the failure.
///
/// A failed node closes its links, so its neighbours fail with closed
/// channels; any other error is preferred over those.
async fn root_cause(nodes: &mut JoinSet<Result<NodeOutcome>>) -> Option<ElectionError> {
    nodes.abort_all();

    let mut closed = None;
    while let Some(joined) = nodes.join_next().await {
        match joined {
            Ok(Err(err @ ElectionError::ChannelClosed { .. })) => {
                closed.get_or_insert(err);
            }
            Ok(Err(err)) => return Some(err),
            Ok(Ok(_)) => {}
            Err(join) if join.is_cancelled() => {}
            Err(join) => return Some(join.into()),
        }
    }
    closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;

    #[tokio::test]
    async fn test_wire_ring_connects_successors() {
        let (mut links, _status) = wire_ring(3, 4);

        links[0].to_successor.send(Message::Probe(10)).unwrap();
        links[2].to_successor.send(Message::Probe(30)).unwrap();

        assert_eq!(links[1].from_predecessor.recv().await, Some(Message::Probe(10)));
        assert_eq!(links[0].from_predecessor.recv().await, Some(Message::Probe(30)));
    }

    #[test]
    fn test_status_capacity_floor() {
        assert_eq!(status_capacity(1, 1), 5);
        assert_eq!(status_capacity(8, 1), 11);
        assert_eq!(status_capacity(8, 1024), 1024);
    }

    #[tokio::test]
    async fn test_tiny_status_buffer_does_not_stall() {
        let config = ElectionConfig {
            status_buffer: 1,
            ..ElectionConfig::headless()
        };
        let outcome = simulate(vec![6, 2, 8, 4, 9, 1, 7, 3], &config, &mut NullRenderer)
            .await
            .unwrap();
        assert_eq!(outcome.leader_id, 9);
    }

    #[tokio::test]
    async fn test_simulate_scenario_a() {
        let outcome = simulate(vec![5, 3, 9, 1], &ElectionConfig::headless(), &mut NullRenderer)
            .await
            .unwrap();

        assert_eq!(outcome.leader_id, 9);
        assert_eq!(outcome.leader_index, 2);
        assert_eq!(outcome.nodes.len(), 4);
    }

    #[tokio::test]
    async fn test_simulate_rejects_duplicates_before_start() {
        let err = simulate(vec![4, 4], &ElectionConfig::headless(), &mut NullRenderer)
            .await
            .unwrap_err();
        assert!(matches!(err, ElectionError::DuplicateId(4)));
    }

    #[tokio::test]
    async fn test_outcome_json() {
        let outcome = simulate(vec![1, 2], &ElectionConfig::headless(), &mut NullRenderer)
            .await
            .unwrap();
        let json = outcome.to_json().unwrap();
        assert!(json.contains("\"leader_id\": 2"));
        assert!(!json.contains("trace"));
    }
}
