//! Drag-to-connect gesture.
//!
//! ```text
//! Idle --pointer down on output port--> Dragging
//! Dragging --pointer move--> Dragging
//! Dragging --pointer up / leave / cancel--> Idle
//! ```
//!
//! Releasing over an input port attempts the connection. Every other exit
//! discards the session. Invalid attempts are logged and dropped; they never
//! surface as errors to the caller of the gesture.

use crate::geometry::curve::{CubicBezier, CurveConfig};
use crate::model::{Connection, PortDirection, PortRef, Vec2};
use crate::{Graph, GraphError};
use log::debug;

/// Transient state between pointer-down on an output port and the matching release.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub source: PortRef,
    pub origin: Vec2,
    /// Canvas-local pointer position.
    pub pointer: Vec2,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiscardReason {
    /// Released over empty canvas or something that is not a port.
    NoTarget,
    /// Released over a port, but the model refused the connection.
    Rejected(GraphError),
    /// Pointer left the canvas while dragging.
    LeftCanvas,
    /// Superseded by a new pointer-down or cancelled programmatically.
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    Committed(Connection),
    Discarded(DiscardReason),
}

impl DragOutcome {
    pub fn connection(&self) -> Option<&Connection> {
        match self {
            DragOutcome::Committed(c) => Some(c),
            DragOutcome::Discarded(_) => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, DragOutcome::Committed(_))
    }

    pub fn discard_reason(&self) -> Option<&DiscardReason> {
        match self {
            DragOutcome::Discarded(r) => Some(r),
            DragOutcome::Committed(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Starts a session when `hit` is an output port. Returns `true` when the
    /// event was consumed and must not propagate to the node underneath.
    ///
    /// A pointer-down while already dragging means the previous release was
    /// lost; that session is discarded first.
    pub fn pointer_down(&mut self, g: &Graph, hit: Option<&PortRef>, pos: Vec2) -> bool {
        if self.is_dragging() {
            debug!("drag: stale session discarded by new pointer-down");
            self.state = DragState::Idle;
        }
        let Some(r) = hit else {
            return false;
        };
        match g.port(r) {
            Some(p) if p.direction == PortDirection::Output => {
                debug!("drag: start from {}.{}", r.node_id, r.port_id);
                self.state = DragState::Dragging(DragSession {
                    source: r.clone(),
                    origin: pos,
                    pointer: pos,
                });
                true
            }
            _ => false,
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> bool {
        match &mut self.state {
            DragState::Dragging(s) => {
                s.pointer = pos;
                true
            }
            DragState::Idle => false,
        }
    }

    /// Ends the session. `hit` is the port under the release point, if any.
    /// Returns `None` when no session was active.
    pub fn pointer_up(&mut self, g: &mut Graph, hit: Option<&PortRef>, pos: Vec2) -> Option<DragOutcome> {
        let DragState::Dragging(mut session) = std::mem::take(&mut self.state) else {
            return None;
        };
        session.pointer = pos;
        let Some(target) = hit else {
            debug!("drag: released over empty canvas");
            return Some(DragOutcome::Discarded(DiscardReason::NoTarget));
        };
        match g.add_connection(&session.source, target) {
            Ok(c) => {
                debug!(
                    "drag: connected {}.{} -> {}.{} as '{}'",
                    c.source.node_id, c.source.port_id, c.target.node_id, c.target.port_id, c.id
                );
                Some(DragOutcome::Committed(c))
            }
            Err(e) => {
                debug!("drag: attempt discarded: {}", e);
                Some(DragOutcome::Discarded(DiscardReason::Rejected(e)))
            }
        }
    }

    pub fn pointer_leave(&mut self) -> Option<DragOutcome> {
        self.discard(DiscardReason::LeftCanvas)
    }

    pub fn cancel(&mut self) -> Option<DragOutcome> {
        self.discard(DiscardReason::Cancelled)
    }

    fn discard(&mut self, reason: DiscardReason) -> Option<DragOutcome> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(_) => {
                debug!("drag: discarded ({:?})", reason);
                Some(DragOutcome::Discarded(reason))
            }
            DragState::Idle => None,
        }
    }

    /// Curve from the live source port position to the pointer.
    ///
    /// `None` when idle, or when the source port no longer resolves.
    pub fn preview(&self, g: &Graph, curve: &CurveConfig) -> Option<CubicBezier> {
        let s = self.session()?;
        let start = g.resolve_port_position(&s.source.node_id, &s.source.port_id)?;
        Some(curve.connection_curve(start, s.pointer))
    }
}
