//! Rendering boundary
//!
//! The monitor hands every frame to a [`Renderer`]. Nothing here feeds back
//! into the election.

use crate::message::Role;
use crate::ring::Ring;
use serde::Serialize;
use std::f64::consts::PI;

/// Static drawing hints for a ring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingLayout {
    /// Successor edges as `(from, to)` ids
    pub edges: Vec<(u64, u64)>,

    /// `(x, y)` per ring position
    pub positions: Vec<(f64, f64)>,
}

impl RingLayout {
    /// Places the nodes evenly on a circle, position 0 at the top, going
    /// clockwise.
    pub fn circle(ring: &Ring, radius: f64) -> Self {
        let n = ring.len() as f64;
        let positions = (0..ring.len())
            .map(|i| {
                let arc = 2.0 * PI * i as f64 / n;
                (arc.sin() * radius, arc.cos() * radius)
            })
            .collect();

        Self {
            edges: ring.edges(),
            positions,
        }
    }
}

/// Latest known state of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub index: usize,
    pub id: u64,
    pub role: Role,
    /// Label shown for the node
    pub candidate: u64,
    pub stopped: bool,
}

impl NodeView {
    pub fn initial(index: usize, id: u64) -> Self {
        Self {
            index,
            id,
            role: Role::Active,
            candidate: id,
            stopped: false,
        }
    }
}

/// Snapshot of the ring after a polling round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// 0 before any event was collected
    pub round: usize,
    pub nodes: Vec<NodeView>,
    /// Set on the last frame of a run
    pub finished: bool,
}

pub trait Renderer: Send {
    fn draw(&mut self, layout: &RingLayout, frame: &Frame);
}

/// Discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _layout: &RingLayout, _frame: &Frame) {}
}

/// Keeps every frame, useful for replaying a run
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub frames: Vec<Frame>,
}

impl Renderer for FrameRecorder {
    fn draw(&mut self, _layout: &RingLayout, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, layout: &RingLayout, frame: &Frame) {
        (**self).draw(layout, frame)
    }
}
