//! The interactive side of a task or note card.
//!
//! A [`VisualElement`] owns one group in the [`SceneGraph`] and reacts to the
//! gestures routed to it: selection, drag start and drag end. It holds no
//! record data of its own; the record lives in the [`ElementStore`] and is
//! addressed by `(kind, id)`.
//!
//! Lifecycle: `Idle` → `Selected` (click or drag start) → `Dragging` (drag
//! start) → `Idle` (drag end, with position and z-index committed).

use crate::{z_order, ElementStore, Layer};
use node::{CanvasPoint, ElementId, ElementKind, ElementRef, RecordPatch};
use scene_graph::{RectShape, SceneGraph, SceneNodeId, TextShape};
use std::fmt;
use theme::{Stroke, Theme};

/// Everything an element handler touches, borrowed for one call.
pub struct ElementCx<'a> {
    pub scene: &'a mut SceneGraph,
    pub store: &'a mut dyn ElementStore,
    pub layer: &'a mut dyn Layer,
    pub theme: &'a Theme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementError {
    /// `create_visual` was called on an element that already has a handle.
    AlreadyCreated(ElementId),
    /// The store has no record for the element.
    MissingRecord(ElementRef),
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCreated(id) => write!(f, "Element {} already has a visual", id),
            Self::MissingRecord(element) => {
                write!(f, "No {} record with id {}", element.kind, element.id)
            }
        }
    }
}

impl std::error::Error for ElementError {}

#[derive(Debug)]
pub struct VisualElement {
    id: ElementId,
    kind: ElementKind,
    handle: Option<SceneNodeId>,
    /// Stroke of the primary shape from before selection styling.
    original_stroke: Option<Stroke>,
}

impl VisualElement {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            handle: None,
            original_stroke: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn element_ref(&self) -> ElementRef {
        ElementRef::new(self.kind, self.id)
    }

    pub fn handle(&self) -> Option<SceneNodeId> {
        self.handle
    }

    /// Whether selection styling is currently applied.
    pub fn is_highlighted(&self) -> bool {
        self.original_stroke.is_some()
    }

    /// Build the draggable group for this element: the card rectangle first,
    /// then the title label.
    pub fn create_visual(&mut self, cx: &mut ElementCx) -> Result<SceneNodeId, ElementError> {
        if self.handle.is_some() {
            return Err(ElementError::AlreadyCreated(self.id));
        }
        let record = cx
            .store
            .find_by_id(self.kind, self.id)
            .ok_or(ElementError::MissingRecord(self.element_ref()))?;

        let style = cx.theme.style(self.kind);
        let position = record.position();
        let size = record.size_or(style.default_size);
        let title = record.display_title().to_string();

        let node = cx.scene.create_group(position, true);
        cx.scene.bind(node, self.id);
        cx.scene.add_shape(
            node,
            RectShape {
                size,
                fill: style.fill,
                stroke: style.stroke,
                corner_radius: style.corner_radius,
            },
        );
        cx.scene.add_shape(
            node,
            TextShape {
                text: title,
                offset: CanvasPoint::new(style.label_inset, style.label_inset),
                font_size: style.font_size,
                color: style.label_color,
                width: style.label_width(size.width()),
            },
        );

        self.handle = Some(node);
        log::debug!("created visual for {} {} as {}", self.kind, self.id, node);
        Ok(node)
    }

    /// Click handler.
    pub fn on_select(&mut self, cx: &mut ElementCx) {
        cx.store.set_selected_element(Some(self.element_ref()));
        self.bring_to_front(cx);
        cx.layer.draw();
    }

    pub fn on_drag_start(&mut self, cx: &mut ElementCx) {
        self.on_select(cx);
    }

    /// Commit the dropped position and a fresh z-index.
    ///
    /// Returns the committed z-index, or `None` when there is no handle to
    /// read a position from.
    pub fn on_drag_end(&mut self, cx: &mut ElementCx) -> Option<i32> {
        let position = cx.scene.position(self.handle?)?;
        if let Some(record) = cx.store.find_by_id_mut(self.kind, self.id) {
            record.x = position.x();
            record.y = position.y();
        }

        let z_index = self.bring_to_front(cx);
        if let Some(record) = cx.store.find_by_id_mut(self.kind, self.id) {
            record.z_index = Some(z_index);
        }

        let patch = RecordPatch::placement(position, z_index);
        match cx.layer.router() {
            Some(router) => match self.kind {
                ElementKind::Task => router.update_task_position(self.id, patch),
                ElementKind::Note => router.update_note_position(self.id, patch),
            },
            None => cx.store.update_record(self.kind, self.id, patch),
        }
        log::debug!(
            "{} {} dropped at ({}, {}) z {}",
            self.kind,
            self.id,
            position.x(),
            position.y(),
            z_index
        );
        Some(z_index)
    }

    /// Apply the theme's selection stroke to the card rectangle.
    pub fn set_selected(&mut self, cx: &mut ElementCx) {
        let Some(rect) = self.handle.and_then(|node| cx.scene.primary_rect_mut(node)) else {
            return;
        };
        if self.original_stroke.is_none() {
            self.original_stroke = Some(rect.stroke);
        }
        rect.stroke = cx.theme.selection;
    }

    /// Restore the stroke captured by [`Self::set_selected`].
    pub fn remove_selection(&mut self, cx: &mut ElementCx) {
        let Some(rect) = self.handle.and_then(|node| cx.scene.primary_rect_mut(node)) else {
            return;
        };
        if let Some(stroke) = self.original_stroke.take() {
            rect.stroke = stroke;
        }
    }

    /// Move the handle to a position received from outside the gesture flow.
    ///
    /// Ignored while the handle is being dragged, or when the record is
    /// already at `(x, y)`.
    pub fn update_position(&mut self, x: f32, y: f32, cx: &mut ElementCx) -> bool {
        let Some(node) = self.handle else {
            return false;
        };
        let position = CanvasPoint::new(x, y);
        if cx.scene.is_dragging(node) {
            return false;
        }
        let current = cx
            .store
            .find_by_id(self.kind, self.id)
            .map(|record| record.position());
        if current == Some(position) {
            return false;
        }

        if let Some(record) = cx.store.find_by_id_mut(self.kind, self.id) {
            record.x = x;
            record.y = y;
        }
        cx.scene.set_position(node, position)
    }

    /// Move the handle to where the record says it is, for records changed
    /// behind the element's back. Ignored while dragging.
    pub fn refresh_position(&mut self, cx: &mut ElementCx) -> bool {
        let Some(node) = self.handle else {
            return false;
        };
        if cx.scene.is_dragging(node) {
            return false;
        }
        let Some(position) = cx
            .store
            .find_by_id(self.kind, self.id)
            .map(|record| record.position())
        else {
            return false;
        };
        if cx.scene.position(node) == Some(position) {
            return false;
        }
        log::trace!("{} {} follows its record", self.kind, self.id);
        cx.scene.set_position(node, position)
    }

    pub fn bring_to_front(&mut self, cx: &mut ElementCx) -> i32 {
        let z_index = z_order::bring_to_front(cx.store, self.id, self.kind);
        if let Some(node) = self.handle {
            cx.scene.move_to_top(node);
        }
        cx.layer.draw();
        z_index
    }

    /// Release the handle. Safe to call more than once.
    pub fn destroy(&mut self, cx: &mut ElementCx) {
        if let Some(node) = self.handle.take() {
            cx.scene.remove_node(node);
            log::debug!("destroyed visual for {} {}", self.kind, self.id);
        }
        self.original_stroke = None;
    }
}
