//! Ring node election state machine

use crate::error::{ElectionError, Result};
use crate::message::{Message, Role, StatusEvent};
use crate::priority::Priority;
use crate::ring::Ring;
use serde::Serialize;
use tokio::sync::mpsc;

/// Channels owned by a single node
pub struct NodeLinks {
    /// Messages from the ring predecessor, in send order
    pub from_predecessor: mpsc::UnboundedReceiver<Message>,

    /// Messages to the ring successor, never blocks
    pub to_successor: mpsc::UnboundedSender<Message>,

    /// Status events to the monitor
    pub status: mpsc::Sender<StatusEvent>,
}

/// What a node reports once its role is final
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeOutcome {
    pub index: usize,
    pub id: u64,
    pub role: Role,
    pub candidate: u64,
    /// Protocol messages this node sent or relayed
    pub messages_sent: usize,
}

/// A single participant in the ring election.
///
/// Each round an active node sends its candidate as a probe, reads the
/// predecessor's probe `v`, passes `v` on as a challenge and reads the
/// challenge `w` coming back. It keeps going with `v` as its new candidate
/// only when `v` outranks both its current candidate and `w`; otherwise it
/// becomes passive and relays everything unchanged. A probe that returns
/// equal to the sender's candidate has gone round the whole ring, so the
/// sender announces it.
pub struct RingNode {
    index: usize,
    id: u64,
    ring_len: usize,
    priority: Priority,
    role: Role,
    candidate: u64,
    messages_sent: usize,
    links: NodeLinks,
}

impl RingNode {
    pub fn new(index: usize, ring: &Ring, priority: Priority, links: NodeLinks) -> Self {
        let id = ring.id_at(index);
        Self {
            index,
            id,
            ring_len: ring.len(),
            priority,
            role: Role::Active,
            candidate: id,
            messages_sent: 0,
            links,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn candidate(&self) -> u64 {
        self.candidate
    }

    /// Runs the protocol until this node is leader or loser.
    pub async fn run(mut self) -> Result<NodeOutcome> {
        tracing::debug!("Node {} (id {}) starting election", self.index, self.id);

        // A lone node has nobody to compare against.
        let won = if self.ring_len == 1 {
            self.id
        } else {
            self.elect().await?
        };

        self.finalize(won).await
    }

    async fn elect(&mut self) -> Result<u64> {
        loop {
            let won = match self.role {
                Role::Active => self.active_round().await?,
                Role::Passive => self.relay().await?,
                role => {
                    return Err(ElectionError::invalid_state(format!(
                        "node {} is already {}",
                        self.index, role
                    )))
                }
            };

            if let Some(won) = won {
                return Ok(won);
            }
        }
    }

    async fn active_round(&mut self) -> Result<Option<u64>> {
        self.send(Message::Probe(self.candidate)).await?;

        let v = match self.recv().await? {
            Message::Probe(v) => v,
            other => return Err(ElectionError::protocol(self.index, "probe", other.kind())),
        };

        if v == self.candidate {
            return self.announce(v).await.map(Some);
        }

        self.send(Message::Challenge(v)).await?;

        let w = match self.recv().await? {
            Message::Challenge(w) => w,
            other => {
                return Err(ElectionError::protocol(
                    self.index,
                    "challenge",
                    other.kind(),
                ))
            }
        };

        if self.priority.outranks(v, self.candidate) && self.priority.outranks(v, w) {
            tracing::debug!(
                "Node {} adopts candidate {} (was {})",
                self.index,
                v,
                self.candidate
            );
            self.candidate = v;
        } else {
            tracing::debug!("Node {} turns passive with candidate {}", self.index, self.candidate);
            self.role = Role::Passive;
        }

        Ok(None)
    }

    /// Sends the result round the ring and absorbs it when it comes back.
    async fn announce(&mut self, won: u64) -> Result<u64> {
        tracing::debug!("Node {} announces {}", self.index, won);
        self.send(Message::Announce(won)).await?;

        match self.recv().await? {
            Message::Announce(v) if v == won => Ok(won),
            Message::Announce(v) => Err(ElectionError::invalid_state(format!(
                "node {} announced {} but {} came back",
                self.index, won, v
            ))),
            other => Err(ElectionError::protocol(self.index, "announce", other.kind())),
        }
    }

    async fn relay(&mut self) -> Result<Option<u64>> {
        let message = self.recv().await?;
        self.send(message).await?;

        Ok(match message {
            Message::Announce(won) => Some(won),
            _ => None,
        })
    }

    async fn finalize(mut self, won: u64) -> Result<NodeOutcome> {
        self.role = if won == self.id {
            Role::Leader
        } else {
            Role::Loser
        };
        tracing::info!(
            "Node {} (id {}) finished as {} after {} messages",
            self.index,
            self.id,
            self.role,
            self.messages_sent
        );

        self.report(true).await?;

        Ok(NodeOutcome {
            index: self.index,
            id: self.id,
            role: self.role,
            candidate: self.candidate,
            messages_sent: self.messages_sent,
        })
    }

    async fn send(&mut self, message: Message) -> Result<()> {
        self.links
            .to_successor
            .send(message)
            .map_err(|_| ElectionError::channel_closed(self.index, "successor"))?;
        self.messages_sent += 1;
        tracing::trace!("Node {} sent {}", self.index, message);

        self.report(false).await
    }

    async fn recv(&mut self) -> Result<Message> {
        self.links
            .from_predecessor
            .recv()
            .await
            .ok_or_else(|| ElectionError::channel_closed(self.index, "predecessor"))
    }

    async fn report(&self, stopped: bool) -> Result<()> {
        let event = StatusEvent {
            index: self.index,
            id: self.id,
            role: self.role,
            candidate: self.candidate,
            stopped,
        };

        self.links
            .status
            .send(event)
            .await
            .map_err(|_| ElectionError::channel_closed(self.index, "monitor"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    struct Harness {
        node: RingNode,
        inbound: mpsc::UnboundedSender<Message>,
        outbound: mpsc::UnboundedReceiver<Message>,
        status: mpsc::Receiver<StatusEvent>,
    }

    /// Node at `index` with its neighbours replaced by the test.
    fn harness(ids: Vec<u64>, index: usize, priority: Priority) -> Harness {
        let ring = Ring::new(ids).unwrap();
        let (inbound, from_predecessor) = mpsc::unbounded_channel();
        let (to_successor, outbound) = mpsc::unbounded_channel();
        let (status_tx, status) = mpsc::channel(64);

        let links = NodeLinks {
            from_predecessor,
            to_successor,
            status: status_tx,
        };

        Harness {
            node: RingNode::new(index, &ring, priority, links),
            inbound,
            outbound,
            status,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<Message> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[tokio::test]
    async fn test_single_node_is_leader_without_messages() {
        let Harness {
            node,
            mut outbound,
            mut status,
            ..
        } = harness(vec![7], 0, Priority::Highest);

        let outcome = node.run().await.unwrap();
        assert_eq!(outcome.role, Role::Leader);
        assert_eq!(outcome.messages_sent, 0);
        assert!(drain(&mut outbound).is_empty());

        let event = status.recv().await.unwrap();
        assert!(event.stopped);
        assert_eq!(event.role, Role::Leader);
    }

    #[tokio::test]
    async fn test_passive_node_relays_unchanged() {
        let Harness {
            node,
            inbound,
            mut outbound,
            mut status,
        } = harness(vec![3, 5], 1, Priority::Highest);

        // Predecessor probes 3, challenge 9 outranks it: node 5 turns passive.
        inbound.send(Message::Probe(3)).unwrap();
        inbound.send(Message::Challenge(9)).unwrap();
        inbound.send(Message::Probe(42)).unwrap();
        inbound.send(Message::Challenge(17)).unwrap();
        inbound.send(Message::Announce(42)).unwrap();

        let outcome = node.run().await.unwrap();
        assert_eq!(outcome.role, Role::Loser);
        assert_eq!(outcome.candidate, 5);

        assert_eq!(
            drain(&mut outbound),
            vec![
                Message::Probe(5),
                Message::Challenge(3),
                Message::Probe(42),
                Message::Challenge(17),
                Message::Announce(42),
            ]
        );

        let mut events = Vec::new();
        while let Ok(event) = status.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 6);
        assert_eq!(events[2].role, Role::Passive);
        assert!(events[..5].iter().all(|e| !e.stopped));
        assert!(events[5].stopped);
    }

    #[tokio::test]
    async fn test_active_node_adopts_outranking_candidate() {
        let Harness {
            node,
            inbound,
            mut outbound,
            mut status,
        } = harness(vec![4, 8, 6], 2, Priority::Highest);

        // 8 beats both 6 and the challenge 4, so node keeps going with 8.
        inbound.send(Message::Probe(8)).unwrap();
        inbound.send(Message::Challenge(4)).unwrap();
        // Own probe returns unchanged.
        inbound.send(Message::Probe(8)).unwrap();
        inbound.send(Message::Announce(8)).unwrap();

        let outcome = node.run().await.unwrap();
        assert_eq!(outcome.candidate, 8);
        assert_eq!(outcome.role, Role::Loser);
        assert_eq!(
            drain(&mut outbound),
            vec![
                Message::Probe(6),
                Message::Challenge(8),
                Message::Probe(8),
                Message::Announce(8),
            ]
        );

        let mut events = Vec::new();
        while let Ok(event) = status.try_recv() {
            events.push(event);
        }
        let (last, rest) = events.split_last().unwrap();
        assert!(rest.iter().all(|e| e.role == Role::Active && !e.stopped));
        assert_eq!(rest.last().map(|e| e.candidate), Some(8));
        assert!(last.stopped);
        assert_eq!(last.role, Role::Loser);
    }

    #[tokio::test]
    async fn test_lowest_priority_adoption() {
        let Harness {
            node,
            inbound,
            mut outbound,
            mut status,
        } = harness(vec![1, 5], 1, Priority::Lowest);

        inbound.send(Message::Probe(1)).unwrap();
        inbound.send(Message::Challenge(5)).unwrap();
        inbound.send(Message::Probe(1)).unwrap();
        inbound.send(Message::Announce(1)).unwrap();

        let outcome = node.run().await.unwrap();
        assert_eq!(outcome.candidate, 1);
        assert_eq!(outcome.role, Role::Loser);
        assert_eq!(drain(&mut outbound).last(), Some(&Message::Announce(1)));

        let mut last = None;
        while let Ok(event) = status.try_recv() {
            last = Some(event);
        }
        let last = last.unwrap();
        assert!(last.stopped);
        assert_eq!(last.candidate, 1);
    }

    #[tokio::test]
    async fn test_unexpected_message_is_protocol_violation() {
        let Harness {
            node,
            inbound,
            outbound: _outbound,
            status: _status,
        } = harness(vec![1, 2], 0, Priority::Highest);

        inbound.send(Message::Challenge(2)).unwrap();

        let err = node.run().await.unwrap_err();
        assert!(matches!(
            err,
            ElectionError::Protocol {
                node: 0,
                expected: "probe",
                received: MessageKind::Challenge,
            }
        ));
    }

    #[tokio::test]
    async fn test_closed_predecessor_aborts_node() {
        let Harness {
            node,
            inbound,
            outbound: _outbound,
            status: _status,
        } = harness(vec![1, 2], 0, Priority::Highest);
        drop(inbound);

        let err = node.run().await.unwrap_err();
        assert!(matches!(
            err,
            ElectionError::ChannelClosed {
                node: 0,
                link: "predecessor"
            }
        ));
    }
}
