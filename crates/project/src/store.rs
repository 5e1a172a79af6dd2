//! The board's record registry.
//!
//! [`BoardStore`] holds every task, note and link, the single selection slot,
//! and an outbox of writes that have been applied in memory but not yet
//! persisted. Every mutation lands in memory first; [`BoardStore::flush`]
//! writes the whole board and clears the outbox.

use crate::{BoardFile, BoardMetadata, BOARD_FORMAT_VERSION};
use anyhow::Result;
use canvas::{z_order, ElementStore};
use chrono::{DateTime, Utc};
use node::{
    ElementDraft, ElementId, ElementKind, ElementLink, ElementRecord, ElementRef, LinkType,
    RecordPatch,
};
use std::fmt;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    NotFound(ElementRef),
    LinkNotFound(ElementId),
    /// No element id starts with the given prefix.
    UnknownPrefix(String),
    /// More than one element id starts with the given prefix.
    AmbiguousPrefix(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(element) => write!(f, "No {} with id {}", element.kind, element.id),
            Self::LinkNotFound(id) => write!(f, "No link with id {}", id),
            Self::UnknownPrefix(prefix) => write!(f, "No element id starts with `{}`", prefix),
            Self::AmbiguousPrefix(prefix) => {
                write!(f, "More than one element id starts with `{}`", prefix)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// A change applied in memory and waiting to be persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingWrite {
    Created(ElementRef),
    Updated(ElementRef, RecordPatch),
    /// The record's parent was deleted and its `parent` cleared.
    Detached(ElementRef),
    Deleted(ElementRef),
    Linked(ElementId),
    Unlinked(ElementId),
}

#[derive(Debug)]
pub struct BoardStore {
    name: Option<String>,
    created_at: Option<DateTime<Utc>>,
    tasks: Vec<ElementRecord>,
    notes: Vec<ElementRecord>,
    links: Vec<ElementLink>,
    selected: Option<ElementRef>,
    pending: Vec<PendingWrite>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self {
            name: None,
            created_at: Some(Utc::now()),
            tasks: Vec::new(),
            notes: Vec::new(),
            links: Vec::new(),
            selected: None,
            pending: Vec::new(),
        }
    }

    pub fn from_file(file: BoardFile) -> Self {
        Self {
            name: file.metadata.name,
            created_at: file.metadata.created_at,
            tasks: file.tasks,
            notes: file.notes,
            links: file.links,
            selected: None,
            pending: Vec::new(),
        }
    }

    /// Snapshot of the board as written to disk.
    pub fn to_file(&self) -> BoardFile {
        BoardFile {
            version: BOARD_FORMAT_VERSION,
            metadata: BoardMetadata {
                name: self.name.clone(),
                created_at: self.created_at,
                modified_at: Some(Utc::now()),
            },
            tasks: self.tasks.clone(),
            notes: self.notes.clone(),
            links: self.links.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn tasks(&self) -> &[ElementRecord] {
        &self.tasks
    }

    pub fn notes(&self) -> &[ElementRecord] {
        &self.notes
    }

    pub fn links(&self) -> &[ElementLink] {
        &self.links
    }

    pub fn get(&self, element: ElementRef) -> Option<&ElementRecord> {
        self.find_by_id(element.kind, element.id)
    }

    pub fn contains(&self, element: ElementRef) -> bool {
        self.get(element).is_some()
    }

    /// Find an element in either family by id.
    pub fn lookup(&self, id: ElementId) -> Option<ElementRef> {
        [ElementKind::Task, ElementKind::Note]
            .into_iter()
            .map(|kind| ElementRef::new(kind, id))
            .find(|element| self.contains(*element))
    }

    /// Resolve a full or shortened id, as printed in logs and listings.
    pub fn resolve(&self, prefix: &str) -> Result<ElementRef, StoreError> {
        if let Ok(id) = prefix.parse::<ElementId>() {
            return self
                .lookup(id)
                .ok_or_else(|| StoreError::UnknownPrefix(prefix.to_string()));
        }

        let mut matches = self
            .tasks
            .iter()
            .map(|record| ElementRef::task(record.id))
            .chain(self.notes.iter().map(|record| ElementRef::note(record.id)))
            .filter(|element| element.id.matches_prefix(prefix));

        match (matches.next(), matches.next()) {
            (Some(element), None) => Ok(element),
            (None, _) => Err(StoreError::UnknownPrefix(prefix.to_string())),
            (Some(_), Some(_)) => Err(StoreError::AmbiguousPrefix(prefix.to_string())),
        }
    }

    /// Add a record built from `draft`. Without an explicit z-index the
    /// record is placed in front of everything else.
    pub fn create(&mut self, kind: ElementKind, draft: ElementDraft) -> ElementId {
        let id = ElementId::new();
        let z_index = match draft.z_index {
            Some(z_index) => z_index,
            None => z_order::next_z_index(self),
        };
        let now = Utc::now();

        let mut record = draft.into_record(id);
        record.z_index = Some(z_index);
        record.created_at = Some(now);
        record.updated_at = Some(now);

        self.family_mut(kind).push(record);
        self.pending.push(PendingWrite::Created(ElementRef::new(kind, id)));
        log::debug!("created {kind} {id} at z {z_index}");
        id
    }

    /// Merge `patch` into the record.
    pub fn update(
        &mut self,
        kind: ElementKind,
        id: ElementId,
        patch: RecordPatch,
    ) -> Result<(), StoreError> {
        let record = self
            .find_by_id_mut(kind, id)
            .ok_or(StoreError::NotFound(ElementRef::new(kind, id)))?;
        patch.apply(record);
        record.updated_at = Some(Utc::now());

        log::debug!("updated {kind} {id}: {patch:?}");
        self.pending
            .push(PendingWrite::Updated(ElementRef::new(kind, id), patch));
        Ok(())
    }

    /// Remove a record along with its links. Records that had it as parent
    /// are detached, and the selection is cleared if it pointed here.
    pub fn delete(&mut self, kind: ElementKind, id: ElementId) -> Result<ElementRecord, StoreError> {
        let element = ElementRef::new(kind, id);
        let family = self.family_mut(kind);
        let index = family
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(element))?;
        let record = family.remove(index);

        let before = self.links.len();
        self.links.retain(|link| !link.touches(element));
        let dropped_links = before - self.links.len();

        if self.selected == Some(element) {
            self.selected = None;
        }

        let now = Utc::now();
        let mut detached = Vec::new();
        for child_kind in [ElementKind::Task, ElementKind::Note] {
            let children = self
                .family_mut(child_kind)
                .iter_mut()
                .filter(|child| child.parent == Some(id));
            for child in children {
                child.parent = None;
                child.updated_at = Some(now);
                detached.push(PendingWrite::Detached(ElementRef::new(child_kind, child.id)));
            }
        }
        self.pending.extend(detached);

        self.pending.push(PendingWrite::Deleted(element));
        log::debug!("deleted {kind} {id} and {dropped_links} link(s)");
        Ok(record)
    }

    /// Link two existing elements.
    pub fn link(
        &mut self,
        source: ElementRef,
        target: ElementRef,
        link_type: LinkType,
    ) -> Result<ElementId, StoreError> {
        for end in [source, target] {
            if !self.contains(end) {
                return Err(StoreError::NotFound(end));
            }
        }
        let link = ElementLink::new(source, target, link_type);
        let id = link.id;
        self.links.push(link);
        self.pending.push(PendingWrite::Linked(id));
        log::debug!("linked {} -> {} ({link_type})", source.id, target.id);
        Ok(id)
    }

    pub fn unlink(&mut self, id: ElementId) -> Result<ElementLink, StoreError> {
        let index = self
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or(StoreError::LinkNotFound(id))?;
        self.pending.push(PendingWrite::Unlinked(id));
        Ok(self.links.remove(index))
    }

    /// Links with `element` at either end.
    pub fn links_for(&self, element: ElementRef) -> Vec<&ElementLink> {
        self.links.iter().filter(|link| link.touches(element)).collect()
    }

    /// Records whose parent is `id`.
    pub fn children_of(&self, id: ElementId) -> Vec<ElementRef> {
        self.tasks
            .iter()
            .map(|record| (ElementKind::Task, record))
            .chain(self.notes.iter().map(|record| (ElementKind::Note, record)))
            .filter(|(_, record)| record.parent == Some(id))
            .map(|(kind, record)| ElementRef::new(kind, record.id))
            .collect()
    }

    pub fn pending(&self) -> &[PendingWrite] {
        &self.pending
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_pending(&mut self) -> Vec<PendingWrite> {
        std::mem::take(&mut self.pending)
    }

    /// Write the board file and clear the outbox.
    ///
    /// On failure the outbox is kept, so a later flush still sees every
    /// unsaved change.
    pub async fn flush(&mut self, path: &Path) -> Result<()> {
        let written = self.pending.len();
        self.to_file().save_to_file(path).await?;
        self.pending.clear();
        log::info!("flushed {written} change(s) to {}", path.display());
        Ok(())
    }

    fn family_mut(&mut self, kind: ElementKind) -> &mut Vec<ElementRecord> {
        match kind {
            ElementKind::Task => &mut self.tasks,
            ElementKind::Note => &mut self.notes,
        }
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore for BoardStore {
    fn records(&self, kind: ElementKind) -> &[ElementRecord] {
        match kind {
            ElementKind::Task => &self.tasks,
            ElementKind::Note => &self.notes,
        }
    }

    fn find_by_id_mut(&mut self, kind: ElementKind, id: ElementId) -> Option<&mut ElementRecord> {
        self.family_mut(kind).iter_mut().find(|record| record.id == id)
    }

    fn selected_element(&self) -> Option<ElementRef> {
        self.selected
    }

    fn set_selected_element(&mut self, element: Option<ElementRef>) {
        self.selected = element;
    }

    fn update_record(&mut self, kind: ElementKind, id: ElementId, patch: RecordPatch) {
        if let Err(err) = self.update(kind, id, patch) {
            log::warn!("dropping position update: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::CanvasPoint;

    #[test]
    fn test_create_places_in_front() {
        let mut store = BoardStore::new();
        let first = store.create(ElementKind::Task, ElementDraft::at(0.0, 0.0));
        let second = store.create(ElementKind::Note, ElementDraft::at(5.0, 5.0));

        let explicit = store.create(
            ElementKind::Task,
            ElementDraft {
                z_index: Some(-2),
                ..ElementDraft::default()
            },
        );

        assert_eq!(store.get(ElementRef::task(first)).unwrap().z_index, Some(1));
        assert_eq!(store.get(ElementRef::note(second)).unwrap().z_index, Some(2));
        assert_eq!(store.get(ElementRef::task(explicit)).unwrap().z_index, Some(-2));
        assert!(store.get(ElementRef::task(first)).unwrap().created_at.is_some());
        assert_eq!(store.pending().len(), 3);
    }

    #[test]
    fn test_update_missing_record() {
        let mut store = BoardStore::new();
        let id = ElementId::from_u128(9);
        assert_eq!(
            store.update(ElementKind::Note, id, RecordPatch::default()),
            Err(StoreError::NotFound(ElementRef::note(id)))
        );

        // The trait path swallows the miss.
        store.update_record(ElementKind::Note, id, RecordPatch::default());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_update_merges_and_queues() {
        let mut store = BoardStore::new();
        let id = store.create(ElementKind::Task, ElementDraft::at(0.0, 0.0).with_title("Plan"));
        store.take_pending();

        let patch = RecordPatch::placement(CanvasPoint::new(50.0, 80.0), 7);
        store.update(ElementKind::Task, id, patch.clone()).unwrap();

        let record = store.get(ElementRef::task(id)).unwrap();
        assert_eq!(record.position(), CanvasPoint::new(50.0, 80.0));
        assert_eq!(record.z_index, Some(7));
        assert_eq!(record.display_title(), "Plan");
        assert_eq!(
            store.take_pending(),
            vec![PendingWrite::Updated(ElementRef::task(id), patch)]
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_delete_cascades() {
        let mut store = BoardStore::new();
        let task = store.create(ElementKind::Task, ElementDraft::at(0.0, 0.0));
        let other = store.create(ElementKind::Task, ElementDraft::at(0.0, 0.0));
        let mut draft = ElementDraft::at(0.0, 0.0);
        draft.parent = Some(task);
        let note = store.create(ElementKind::Note, draft);

        store
            .link(ElementRef::task(task), ElementRef::note(note), LinkType::RelatedTo)
            .unwrap();
        let kept = store
            .link(ElementRef::task(other), ElementRef::note(note), LinkType::DependsOn)
            .unwrap();
        store.set_selected_element(Some(ElementRef::task(task)));
        assert_eq!(store.children_of(task), vec![ElementRef::note(note)]);

        store.delete(ElementKind::Task, task).unwrap();

        assert!(!store.contains(ElementRef::task(task)));
        assert_eq!(store.links().len(), 1);
        assert_eq!(store.links()[0].id, kept);
        assert_eq!(store.selected_element(), None);
        assert_eq!(store.get(ElementRef::note(note)).unwrap().parent, None);
        assert!(store
            .pending()
            .contains(&PendingWrite::Detached(ElementRef::note(note))));
        assert_eq!(
            store.delete(ElementKind::Task, task),
            Err(StoreError::NotFound(ElementRef::task(task)))
        );
    }

    #[test]
    fn test_delete_keeps_other_selection() {
        let mut store = BoardStore::new();
        let a = store.create(ElementKind::Task, ElementDraft::at(0.0, 0.0));
        let b = store.create(ElementKind::Note, ElementDraft::at(0.0, 0.0));
        store.set_selected_element(Some(ElementRef::note(b)));
        store.delete(ElementKind::Task, a).unwrap();
        assert_eq!(store.selected_element(), Some(ElementRef::note(b)));
    }

    #[test]
    fn test_link_requires_both_ends() {
        let mut store = BoardStore::new();
        let task = store.create(ElementKind::Task, ElementDraft::at(0.0, 0.0));
        let ghost = ElementRef::note(ElementId::from_u128(5));
        assert_eq!(
            store.link(ElementRef::task(task), ghost, LinkType::Blocks),
            Err(StoreError::NotFound(ghost))
        );

        let note = store.create(ElementKind::Note, ElementDraft::at(0.0, 0.0));
        let link = store
            .link(ElementRef::task(task), ElementRef::note(note), LinkType::Blocks)
            .unwrap();
        assert_eq!(store.links_for(ElementRef::note(note)).len(), 1);

        store.unlink(link).unwrap();
        assert!(store.links_for(ElementRef::note(note)).is_empty());
        assert_eq!(store.unlink(link), Err(StoreError::LinkNotFound(link)));
    }

    #[test]
    fn test_resolve_prefix() {
        let mut store = BoardStore::from_file(BoardFile::new());
        let a = ElementId::from_u128(0xaaaa_0000_0000_0000_0000_0000_0000_0001);
        let b = ElementId::from_u128(0xaaab_0000_0000_0000_0000_0000_0000_0002);
        store.tasks.push(ElementRecord::new(a, 0.0, 0.0));
        store.notes.push(ElementRecord::new(b, 0.0, 0.0));

        assert_eq!(store.resolve("aaaa"), Ok(ElementRef::task(a)));
        assert_eq!(store.resolve("AAAB"), Ok(ElementRef::note(b)));
        assert_eq!(store.resolve(&a.to_uuid_string()), Ok(ElementRef::task(a)));
        assert_eq!(
            store.resolve("aaa"),
            Err(StoreError::AmbiguousPrefix("aaa".into()))
        );
        assert_eq!(store.resolve("ff"), Err(StoreError::UnknownPrefix("ff".into())));
    }

    #[test]
    fn test_flush_clears_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        let mut store = BoardStore::new();
        store.set_name("Roadmap");
        store.create(ElementKind::Task, ElementDraft::at(1.0, 2.0));

        smol::block_on(store.flush(&path)).unwrap();
        assert!(!store.is_dirty());

        let loaded = smol::block_on(BoardFile::load_from_file(&path)).unwrap();
        assert_eq!(loaded.metadata.name.as_deref(), Some("Roadmap"));
        assert_eq!(loaded.tasks, store.tasks());
    }

    #[test]
    fn test_failed_flush_keeps_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("board.json");
        let mut store = BoardStore::new();
        store.create(ElementKind::Task, ElementDraft::at(1.0, 2.0));

        assert!(smol::block_on(store.flush(&path)).is_err());
        assert_eq!(store.pending().len(), 1);
    }
}
