//! Board API - command and query interface for board operations.
//!
//! Commands describe what should happen to the board (create a card, click
//! it, drag it somewhere) and run through the same gesture path a renderer
//! uses, so scripted and interactive edits behave identically. Queries read
//! state without changing it.
//!
//! # Example
//! ```ignore
//! use api::{execute_command, Command, Target};
//!
//! let cmd: Command = serde_json::from_str(
//!     r#"{ "type": "drag", "target": { "element": "3f2a" }, "to": [50, 80] }"#,
//! )?;
//! let result = execute_command(&mut canvas, cmd);
//! ```

mod command;
mod executor;
mod query;
mod target;

pub use command::*;
pub use executor::{execute_command, execute_query};
pub use query::*;
pub use target::*;
