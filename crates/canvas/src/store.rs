use node::{ElementId, ElementKind, ElementRecord, ElementRef, RecordPatch};

/// The record registry the canvas reads from and writes to.
///
/// Implementors own the records of both families and the single selection
/// slot. Writes through [`ElementStore::update_record`] are fire-and-forget:
/// the caller has already applied the change in memory and does not wait for
/// persistence.
pub trait ElementStore {
    /// All records of one family, in store order.
    fn records(&self, kind: ElementKind) -> &[ElementRecord];

    fn find_by_id(&self, kind: ElementKind, id: ElementId) -> Option<&ElementRecord> {
        self.records(kind).iter().find(|record| record.id == id)
    }

    fn find_by_id_mut(&mut self, kind: ElementKind, id: ElementId) -> Option<&mut ElementRecord>;

    fn selected_element(&self) -> Option<ElementRef>;

    fn set_selected_element(&mut self, element: Option<ElementRef>);

    /// Merge `patch` into a record and schedule it for persistence.
    fn update_record(&mut self, kind: ElementKind, id: ElementId, patch: RecordPatch);
}
