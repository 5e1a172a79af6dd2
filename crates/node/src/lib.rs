//! Record model for board elements.
//!
//! Tasks and notes share one record shape ([`ElementRecord`]) and are told
//! apart by [`ElementKind`]. Records are the durable side of an element; the
//! interactive side lives in the `canvas` crate.

pub mod coords;
mod element_id;
mod link;
mod record;

pub use coords::{CanvasDelta, CanvasPoint, CanvasSize};
pub use element_id::ElementId;
pub use link::{ElementLink, LinkType};
pub use record::{ElementDraft, ElementKind, ElementRecord, ElementRef, RecordPatch};
