//! # Scene Graph
//!
//! The scene graph is the boundary between board elements and whatever
//! actually paints pixels. It stores one draggable group per rendered element
//! in an index-addressed arena, together with the group's visible shapes and
//! the back-to-front paint order.
//!
//! ## Key Concepts
//!
//! - **Groups**: positioned containers that own their shapes and can be dragged
//! - **Draw order**: the order groups are painted in; the last group is on top
//! - **Bindings**: each group may be bound to one [`ElementId`], which is how
//!   gestures on a group find the element that handles them
//!
//! Nothing in here is observed or reactive. A renderer reads the graph after
//! each redraw request and paints `draw_order()` front to back.

pub mod shape;

use node::{CanvasPoint, ElementId};
use slotmap::{Key, SlotMap};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::{self, Display};

pub use shape::{RectShape, Shape, TextShape};

slotmap::new_key_type! {
    /// Defines a unique identifier for groups within the scene graph.
    pub struct SceneNodeId;
}

impl SceneNodeId {
    /// Converts this scene node id to a [u64]
    pub fn as_u64(self) -> u64 {
        self.data().as_ffi()
    }
}

impl Display for SceneNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// SceneGraph holds the live, renderable side of the board.
///
/// Records in the store say where an element *should* be; the scene graph says
/// where its handle *is*, including mid-drag positions the store has not seen
/// yet.
#[derive(Debug, Default)]
pub struct SceneGraph {
    /// Storage for all groups, indexed by their IDs
    nodes: SlotMap<SceneNodeId, SceneNode>,

    /// Back-to-front paint order
    draw_order: Vec<SceneNodeId>,

    /// Maps bound elements to their group
    bindings: HashMap<ElementId, SceneNodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group at `position` and places it on top of the draw order.
    pub fn create_group(&mut self, position: CanvasPoint, draggable: bool) -> SceneNodeId {
        let id = self.nodes.insert(SceneNode {
            position,
            draggable,
            dragging: false,
            element: None,
            shapes: SmallVec::new(),
        });
        self.draw_order.push(id);
        log::trace!("scene: created group {id} at ({}, {})", position.x(), position.y());
        id
    }

    /// Binds a group to an element so gestures on it can be routed.
    ///
    /// Rebinding an element moves the binding to the new group.
    pub fn bind(&mut self, node_id: SceneNodeId, element: ElementId) -> bool {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        if let Some(previous) = node.element.replace(element) {
            self.bindings.remove(&previous);
        }
        if let Some(stale) = self.bindings.insert(element, node_id) {
            if stale != node_id {
                if let Some(stale_node) = self.nodes.get_mut(stale) {
                    stale_node.element = None;
                }
            }
        }
        true
    }

    /// The element bound to a group, if any.
    pub fn element_of(&self, node_id: SceneNodeId) -> Option<ElementId> {
        self.nodes.get(node_id).and_then(|node| node.element)
    }

    /// The group bound to an element, if any.
    pub fn node_for(&self, element: ElementId) -> Option<SceneNodeId> {
        self.bindings.get(&element).copied()
    }

    pub fn get_node(&self, node_id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(node_id)
    }

    pub fn contains(&self, node_id: SceneNodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn position(&self, node_id: SceneNodeId) -> Option<CanvasPoint> {
        self.nodes.get(node_id).map(|node| node.position)
    }

    pub fn set_position(&mut self, node_id: SceneNodeId, position: CanvasPoint) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_draggable(&mut self, node_id: SceneNodeId, draggable: bool) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.draggable = draggable;
            if !draggable {
                node.dragging = false;
            }
        }
    }

    /// Marks a draggable group as being dragged. Returns false for groups that
    /// are missing or not draggable.
    pub fn begin_drag(&mut self, node_id: SceneNodeId) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) if node.draggable => {
                node.dragging = true;
                true
            }
            _ => false,
        }
    }

    /// Moves a group that is being dragged.
    pub fn drag_to(&mut self, node_id: SceneNodeId, position: CanvasPoint) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) if node.dragging => {
                node.position = position;
                true
            }
            _ => false,
        }
    }

    pub fn end_drag(&mut self, node_id: SceneNodeId) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) if node.dragging => {
                node.dragging = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_dragging(&self, node_id: SceneNodeId) -> bool {
        self.nodes.get(node_id).is_some_and(|node| node.dragging)
    }

    /// Moves a group to the end of the draw order so it paints above its
    /// siblings.
    pub fn move_to_top(&mut self, node_id: SceneNodeId) -> bool {
        let Some(index) = self.draw_order.iter().position(|&id| id == node_id) else {
            return false;
        };
        let id = self.draw_order.remove(index);
        self.draw_order.push(id);
        true
    }

    /// Reorders the draw order so `order` paints back to front, above any
    /// groups it does not mention. Unknown and repeated ids are skipped.
    /// Returns whether the draw order changed.
    pub fn restack(&mut self, order: &[SceneNodeId]) -> bool {
        let mut stacked: Vec<SceneNodeId> = Vec::with_capacity(self.draw_order.len());
        for &node_id in order {
            if self.contains(node_id) && !stacked.contains(&node_id) {
                stacked.push(node_id);
            }
        }
        let mut next: Vec<SceneNodeId> = self
            .draw_order
            .iter()
            .copied()
            .filter(|node_id| !stacked.contains(node_id))
            .collect();
        next.extend(stacked);

        if next == self.draw_order {
            return false;
        }
        self.draw_order = next;
        log::trace!("scene: restacked {} groups", self.draw_order.len());
        true
    }

    /// Appends a shape to a group. The first shape added is the primary shape.
    pub fn add_shape(&mut self, node_id: SceneNodeId, shape: impl Into<Shape>) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) => {
                node.shapes.push(shape.into());
                true
            }
            None => false,
        }
    }

    /// The group's primary shape when it is a rectangle.
    pub fn primary_rect(&self, node_id: SceneNodeId) -> Option<&RectShape> {
        self.nodes.get(node_id)?.shapes.first()?.as_rect()
    }

    pub fn primary_rect_mut(&mut self, node_id: SceneNodeId) -> Option<&mut RectShape> {
        self.nodes.get_mut(node_id)?.shapes.first_mut()?.as_rect_mut()
    }

    /// Removes a group and its shapes, returning the element it was bound to.
    pub fn remove_node(&mut self, node_id: SceneNodeId) -> Option<ElementId> {
        let node = self.nodes.remove(node_id)?;
        self.draw_order.retain(|&id| id != node_id);
        if let Some(element) = node.element {
            if self.bindings.get(&element) == Some(&node_id) {
                self.bindings.remove(&element);
            }
        }
        log::trace!("scene: removed group {node_id}");
        node.element
    }

    /// Back-to-front paint order.
    pub fn draw_order(&self) -> &[SceneNodeId] {
        &self.draw_order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

}

/// A draggable group on the canvas.
#[derive(Debug)]
pub struct SceneNode {
    /// Top-left corner in canvas space
    position: CanvasPoint,

    /// Whether the renderer may start drag gestures on this group
    draggable: bool,

    /// Set between drag start and drag end
    dragging: bool,

    /// Element this group renders
    element: Option<ElementId>,

    /// Visible children, primary shape first
    shapes: SmallVec<[Shape; 2]>,
}

impl SceneNode {
    pub fn position(&self) -> CanvasPoint {
        self.position
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}
