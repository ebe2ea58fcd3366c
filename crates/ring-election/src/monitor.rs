//! Status aggregation and completion detection

use crate::config::ElectionConfig;
use crate::error::{ElectionError, Result};
use crate::message::StatusEvent;
use crate::render::{Frame, NodeView, Renderer, RingLayout};
use crate::ring::Ring;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// What the monitor saw during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorReport {
    /// Polling rounds until every node stopped
    pub rounds: usize,

    /// Final view per ring position
    pub views: Vec<NodeView>,

    /// Every event per ring position, in arrival order
    pub trace: Vec<Vec<StatusEvent>>,
}

/// Collects status events from every node and drives the renderer.
///
/// Each polling round takes exactly one event from every node that has not
/// stopped yet, in ring order. There is no timeout: a node that never
/// reports stalls the monitor.
pub struct Monitor {
    ring: Arc<Ring>,
    status: Vec<mpsc::Receiver<StatusEvent>>,
    layout: RingLayout,
    frame_delay: Duration,
}

impl Monitor {
    pub fn new(
        ring: Arc<Ring>,
        status: Vec<mpsc::Receiver<StatusEvent>>,
        config: &ElectionConfig,
    ) -> Result<Self> {
        if status.len() != ring.len() {
            return Err(ElectionError::count_mismatch(ring.len(), status.len()));
        }

        let layout = RingLayout::circle(&ring, config.layout_radius);
        Ok(Self {
            ring,
            status,
            layout,
            frame_delay: config.frame_delay(),
        })
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub async fn run<R: Renderer + ?Sized>(mut self, renderer: &mut R) -> Result<MonitorReport> {
        let n = self.ring.len();
        let mut views: Vec<NodeView> = (0..n)
            .map(|i| NodeView::initial(i, self.ring.id_at(i)))
            .collect();
        let mut trace = vec![Vec::new(); n];
        let mut round = 0;

        tracing::info!("Monitoring election over {} nodes", n);
        self.show(renderer, round, &views).await;

        while views.iter().any(|v| !v.stopped) {
            round += 1;

            for index in 0..n {
                if views[index].stopped {
                    continue;
                }

                let event = self.status[index]
                    .recv()
                    .await
                    .ok_or(ElectionError::NodeAborted(index))?;
                if event.index != index {
                    return Err(ElectionError::invalid_state(format!(
                        "node {} reported on the channel of node {}",
                        event.index, index
                    )));
                }

                views[index] = NodeView {
                    index,
                    id: event.id,
                    role: event.role,
                    candidate: event.candidate,
                    stopped: event.stopped,
                };
                trace[index].push(event);
            }

            tracing::debug!(
                "Round {}: {} of {} nodes stopped",
                round,
                views.iter().filter(|v| v.stopped).count(),
                n
            );
            self.show(renderer, round, &views).await;
        }

        tracing::info!("All {} nodes stopped after {} rounds", n, round);
        Ok(MonitorReport {
            rounds: round,
            views,
            trace,
        })
    }

    async fn show<R: Renderer + ?Sized>(&self, renderer: &mut R, round: usize, views: &[NodeView]) {
        let finished = views.iter().all(|v| v.stopped);
        let frame = Frame {
            round,
            nodes: views.to_vec(),
            finished,
        };
        renderer.draw(&self.layout, &frame);

        if !finished && !self.frame_delay.is_zero() {
            tokio::time::sleep(self.frame_delay).await;
        }
    }
}
