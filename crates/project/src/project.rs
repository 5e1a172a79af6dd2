//! Board persistence.
//!
//! A board is one JSON file holding every task, note and link. [`BoardStore`]
//! is the in-memory registry the canvas works against; [`BoardFile`] is its
//! on-disk form.

mod board_file;
mod store;

pub use board_file::{BoardFile, BoardMetadata, BOARD_FORMAT_VERSION};
pub use store::{BoardStore, PendingWrite, StoreError};

use anyhow::Result;
use std::path::Path;

/// Load the board at `path`, or start an empty one if the file does not
/// exist yet.
pub async fn open_board(path: &Path) -> Result<BoardStore> {
    if smol::fs::metadata(path).await.is_err() {
        log::info!("starting new board at {}", path.display());
        return Ok(BoardStore::new());
    }
    let file = BoardFile::load_from_file(path).await?;
    log::info!(
        "loaded {} task(s) and {} note(s) from {}",
        file.tasks.len(),
        file.notes.len(),
        path.display()
    );
    Ok(BoardStore::from_file(file))
}
