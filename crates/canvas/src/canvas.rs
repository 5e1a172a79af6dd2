//! # Canvas
//!
//! The board surface: one [`VisualElement`] per task or note record, the
//! [`SceneGraph`] they draw into, and the gesture queue that drives them.
//!
//! The canvas is the registry side of the element model. It creates and
//! destroys elements as records come and go ([`Canvas::sync`]), routes
//! gestures from scene groups to their elements, and keeps selection styling
//! in step with the store's selection slot: after each gesture, the element
//! that was styled as selected is reverted and the newly selected one is
//! styled.

mod element;
mod gesture;
mod layer;
mod store;
pub mod z_order;

pub use element::{ElementCx, ElementError, VisualElement};
pub use gesture::{Gesture, GestureQueue};
pub use layer::{Layer, PositionRouter, RedrawCounter};
pub use store::ElementStore;

use node::{ElementId, ElementKind, ElementRef};
use scene_graph::{SceneGraph, SceneNodeId};
use slotmap::SlotMap;
use std::collections::HashMap;
use theme::Theme;

slotmap::new_key_type! {
    /// Arena key for the elements owned by a [`Canvas`].
    pub struct ElementKey;
}

pub struct Canvas<S: ElementStore, L: Layer> {
    scene: SceneGraph,
    store: S,
    layer: L,
    theme: Theme,

    elements: SlotMap<ElementKey, VisualElement>,
    by_id: HashMap<ElementId, ElementKey>,

    queue: GestureQueue,

    /// Element currently carrying selection styling.
    highlighted: Option<ElementId>,
}

impl<S: ElementStore, L: Layer> Canvas<S, L> {
    pub fn new(store: S, layer: L, theme: Theme) -> Self {
        Self {
            scene: SceneGraph::new(),
            store,
            layer,
            theme,
            elements: SlotMap::with_key(),
            by_id: HashMap::new(),
            queue: GestureQueue::new(),
            highlighted: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct access to the records. Call [`Canvas::sync`] afterwards so the
    /// visuals follow.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn element(&self, id: ElementId) -> Option<&VisualElement> {
        self.by_id.get(&id).and_then(|key| self.elements.get(*key))
    }

    pub fn elements(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.values()
    }

    /// The scene group rendering `id`.
    pub fn handle_of(&self, id: ElementId) -> Option<SceneNodeId> {
        self.element(id).and_then(VisualElement::handle)
    }

    pub fn selected(&self) -> Option<ElementRef> {
        self.store.selected_element()
    }

    /// Elements back to front, as the renderer paints them.
    pub fn paint_order(&self) -> Vec<ElementId> {
        self.scene
            .draw_order()
            .iter()
            .filter_map(|node| self.scene.element_of(*node))
            .collect()
    }

    /// Bring the visuals in line with the store.
    ///
    /// Elements whose record is gone are destroyed, records without an
    /// element get one, and handles of moved records follow them. The draw
    /// order is then restacked to match [`z_order::sorted_elements`].
    pub fn sync(&mut self) {
        let stale: Vec<ElementId> = self
            .elements
            .values()
            .filter(|element| {
                self.store
                    .find_by_id(element.kind(), element.id())
                    .is_none()
            })
            .map(VisualElement::id)
            .collect();
        for id in stale {
            self.remove(id);
        }

        let records: Vec<(ElementKind, ElementId)> = z_order::sorted_elements(&self.store)
            .into_iter()
            .map(|(kind, record)| (kind, record.id))
            .collect();

        for &(kind, id) in &records {
            if self.by_id.contains_key(&id) {
                self.with_element(id, |element, cx| element.refresh_position(cx));
            } else {
                self.insert(kind, id);
            }
        }

        let order: Vec<SceneNodeId> = records
            .iter()
            .filter_map(|(_, id)| self.scene.node_for(*id))
            .collect();
        if self.scene.restack(&order) {
            self.layer.draw();
        }

        self.reconcile_selection();
    }

    fn insert(&mut self, kind: ElementKind, id: ElementId) {
        let mut element = VisualElement::new(id, kind);
        let mut cx = ElementCx {
            scene: &mut self.scene,
            store: &mut self.store,
            layer: &mut self.layer,
            theme: &self.theme,
        };
        match element.create_visual(&mut cx) {
            Ok(_) => {
                let key = self.elements.insert(element);
                self.by_id.insert(id, key);
            }
            Err(err) => log::warn!("skipping {kind} {id}: {err}"),
        }
    }

    /// Destroy the element for `id`. The record is left alone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(key) = self.by_id.remove(&id) else {
            return false;
        };
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        if let Some(mut element) = self.elements.remove(key) {
            let mut cx = ElementCx {
                scene: &mut self.scene,
                store: &mut self.store,
                layer: &mut self.layer,
                theme: &self.theme,
            };
            element.destroy(&mut cx);
            cx.layer.draw();
        }
        true
    }

    /// Position update from outside the gesture flow.
    pub fn update_position(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        self.with_element(id, |element, cx| element.update_position(x, y, cx))
            .unwrap_or(false)
    }

    /// Queue a gesture reported against a scene group.
    pub fn post(&mut self, node: SceneNodeId, gesture: Gesture) {
        self.queue.push(node, gesture);
    }

    /// Run queued gestures in order. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Some((node, gesture)) = self.queue.pop() {
            self.handle_gesture(node, gesture);
            ran += 1;
        }
        ran
    }

    /// Queue a gesture and drain the queue.
    pub fn dispatch(&mut self, node: SceneNodeId, gesture: Gesture) {
        self.post(node, gesture);
        self.run_pending();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn handle_gesture(&mut self, node: SceneNodeId, gesture: Gesture) {
        let Some(id) = self.scene.element_of(node) else {
            log::debug!("dropping {gesture:?} for unbound group {node}");
            return;
        };
        log::debug!("{gesture:?} on {id}");

        self.with_element(id, |element, cx| match gesture {
            Gesture::Click => element.on_select(cx),
            Gesture::DragStart => {
                if cx.scene.begin_drag(node) {
                    element.on_drag_start(cx);
                }
            }
            Gesture::DragMove(position) => {
                cx.scene.drag_to(node, position);
            }
            Gesture::DragEnd => {
                if cx.scene.end_drag(node) {
                    element.on_drag_end(cx);
                }
            }
        });

        self.reconcile_selection();
    }

    /// Move selection styling to the element the store has selected.
    fn reconcile_selection(&mut self) {
        let selected = self
            .store
            .selected_element()
            .map(|element| element.id)
            .filter(|id| self.by_id.contains_key(id));
        if selected == self.highlighted {
            return;
        }

        if let Some(previous) = self.highlighted.take() {
            self.with_element(previous, |element, cx| element.remove_selection(cx));
        }
        if let Some(next) = selected {
            self.with_element(next, |element, cx| element.set_selected(cx));
            self.highlighted = Some(next);
        }
        self.layer.draw();
    }

    fn with_element<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut VisualElement, &mut ElementCx) -> R,
    ) -> Option<R> {
        let key = *self.by_id.get(&id)?;
        let element = self.elements.get_mut(key)?;
        let mut cx = ElementCx {
            scene: &mut self.scene,
            store: &mut self.store,
            layer: &mut self.layer,
            theme: &self.theme,
        };
        Some(f(element, &mut cx))
    }
}
