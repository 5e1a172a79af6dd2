use crate::coords::{CanvasPoint, CanvasSize};
use crate::ElementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Title shown for records that have none.
pub const UNTITLED: &str = "Untitled";

/// The family an element belongs to.
///
/// Families only differ in default appearance; interaction behavior is shared.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    Task,
    Note,
}

/// A `(kind, id)` pair addressing one record in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: ElementId) -> Self {
        Self { kind, id }
    }

    pub fn task(id: ElementId) -> Self {
        Self::new(ElementKind::Task, id)
    }

    pub fn note(id: ElementId) -> Self {
        Self::new(ElementKind::Note, id)
    }
}

/// The durable fields of a task or note.
///
/// Optional fields are not errors: `width`/`height` fall back to the kind's
/// default size, `title` to [`UNTITLED`], and a missing `z_index` sorts as 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub z_index: Option<i32>,
    /// Owning task of a note, or parent task of a sub-task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ElementRecord {
    pub fn new(id: ElementId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            width: None,
            height: None,
            title: None,
            z_index: None,
            parent: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn position(&self) -> CanvasPoint {
        CanvasPoint::new(self.x, self.y)
    }

    /// The z-index used for ordering; absent counts as 0.
    pub fn z_order(&self) -> i32 {
        self.z_index.unwrap_or(0)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Resolve width/height against a kind default, per axis.
    pub fn size_or(&self, default: CanvasSize) -> CanvasSize {
        CanvasSize::new(
            self.width.unwrap_or(default.width()),
            self.height.unwrap_or(default.height()),
        )
    }
}

/// Fields supplied when creating a record. The store assigns id and
/// timestamps, and a front z-index when `z_index` is `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
}

impl ElementDraft {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn into_record(self, id: ElementId) -> ElementRecord {
        ElementRecord {
            id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            title: self.title,
            z_index: self.z_index,
            parent: self.parent,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A partial update. Only the fields that are `Some` are written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
}

impl RecordPatch {
    /// The `{x, y, z_index}` commit written at the end of a drag.
    pub fn placement(position: CanvasPoint, z_index: i32) -> Self {
        Self {
            x: Some(position.x()),
            y: Some(position.y()),
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, record: &mut ElementRecord) {
        if let Some(x) = self.x {
            record.x = x;
        }
        if let Some(y) = self.y {
            record.y = y;
        }
        if let Some(z_index) = self.z_index {
            record.z_index = Some(z_index);
        }
        if let Some(width) = self.width {
            record.width = Some(width);
        }
        if let Some(height) = self.height {
            record.height = Some(height);
        }
        if let Some(title) = &self.title {
            record.title = Some(title.clone());
        }
        if let Some(parent) = self.parent {
            record.parent = Some(parent);
        }
    }
}
