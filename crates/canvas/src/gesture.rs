use node::CanvasPoint;
use scene_graph::SceneNodeId;
use std::collections::VecDeque;

/// Pointer gestures a renderer reports against a scene group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Click,
    DragStart,
    /// The pointer moved the dragged group to a new top-left position.
    DragMove(CanvasPoint),
    DragEnd,
}

/// First-in first-out queue of gestures waiting to run.
///
/// Each gesture runs to completion before the next is taken, so handlers
/// never observe each other half-way.
#[derive(Debug, Default)]
pub struct GestureQueue {
    pending: VecDeque<(SceneNodeId, Gesture)>,
}

impl GestureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SceneNodeId, gesture: Gesture) {
        self.pending.push_back((node, gesture));
    }

    pub fn pop(&mut self) -> Option<(SceneNodeId, Gesture)> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
