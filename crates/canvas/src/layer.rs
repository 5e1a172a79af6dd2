//! The container the elements are drawn into.

use node::{ElementId, RecordPatch};

/// Receives committed positions when the layer is hosted by a board view
/// that persists them itself.
pub trait PositionRouter {
    fn update_task_position(&mut self, id: ElementId, patch: RecordPatch);
    fn update_note_position(&mut self, id: ElementId, patch: RecordPatch);
}

pub trait Layer {
    /// Request a redraw. Requests are cheap and may be coalesced.
    fn draw(&mut self);

    /// The owning board view, if any. Drag commits go here instead of the
    /// store when present.
    fn router(&mut self) -> Option<&mut dyn PositionRouter> {
        None
    }
}

/// A layer with no host. Counts redraw requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedrawCounter {
    draws: usize,
}

impl RedrawCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl Layer for RedrawCounter {
    fn draw(&mut self) {
        self.draws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_counter_has_no_router() {
        let mut layer = RedrawCounter::new();
        layer.draw();
        layer.draw();
        assert_eq!(layer.draws(), 2);
        assert!(layer.router().is_none());
    }
}
