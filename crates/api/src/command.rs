//! Board commands - all operations that modify board state.
//!
//! Commands are intent-based: they describe what the user wants, not how to
//! achieve it. Gesture-like commands (`click`, `drag`) are replayed through
//! the canvas gesture queue, so selection and stacking follow the same rules
//! as pointer input.

use crate::Target;
use node::{CanvasPoint, CanvasSize, ElementId, LinkType, RecordPatch};
use serde::{Deserialize, Serialize};

/// A command that modifies board state.
///
/// Commands are serializable for scripting and recording.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Creation ===
    /// Create a task card.
    CreateTask {
        position: CanvasPoint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<CanvasSize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<ElementId>,
    },

    /// Create a note card.
    CreateNote {
        position: CanvasPoint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<CanvasSize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<ElementId>,
    },

    // === Gestures ===
    /// Click an element: selects it and brings it to the front.
    Click { target: Target },

    /// Drag an element so its top-left corner ends at `to`.
    Drag {
        #[serde(default)]
        target: Target,
        to: CanvasPoint,
    },

    // === Records ===
    /// Apply a position that arrived from outside the gesture flow.
    SetPosition {
        #[serde(default)]
        target: Target,
        position: CanvasPoint,
    },

    /// Merge fields into an element's record.
    Update {
        #[serde(default)]
        target: Target,
        patch: RecordPatch,
    },

    /// Delete an element with its links.
    Delete {
        #[serde(default)]
        target: Target,
    },

    /// Link two elements.
    Link {
        source: Target,
        target: Target,
        #[serde(default = "default_link_type")]
        link_type: LinkType,
    },

    // === Batch ===
    /// Run commands in order, stopping at the first error.
    Batch { commands: Vec<Command> },
}

fn default_link_type() -> LinkType {
    LinkType::DependsOn
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        /// IDs of elements or links created, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<ElementId>,
        /// IDs of elements modified, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ElementId>,
        /// IDs of elements deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ElementId>,
    },
    /// Command failed.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn created(ids: Vec<ElementId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<ElementId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<ElementId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Fold another result into this one. An error wins.
    pub fn merge(self, other: CommandResult) -> CommandResult {
        match (self, other) {
            (
                Self::Success {
                    mut created,
                    mut modified,
                    mut deleted,
                },
                Self::Success {
                    created: c,
                    modified: m,
                    deleted: d,
                },
            ) => {
                created.extend(c);
                modified.extend(m);
                deleted.extend(d);
                Self::Success {
                    created,
                    modified,
                    deleted,
                }
            }
            (error @ Self::Error { .. }, _) | (_, error @ Self::Error { .. }) => error,
        }
    }
}
