use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use node::{ElementLink, ElementRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version of the board file format
pub const BOARD_FORMAT_VERSION: u32 = 1;

/// A board that can be saved to and loaded from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardFile {
    /// Version of the file format for future compatibility
    pub version: u32,

    pub metadata: BoardMetadata,

    #[serde(default)]
    pub tasks: Vec<ElementRecord>,

    #[serde(default)]
    pub notes: Vec<ElementRecord>,

    #[serde(default)]
    pub links: Vec<ElementLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardMetadata {
    /// Optional board name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// When the board was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the board was last written
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl BoardFile {
    /// Creates an empty board
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: BOARD_FORMAT_VERSION,
            metadata: BoardMetadata {
                name: None,
                created_at: Some(now),
                modified_at: Some(now),
            },
            tasks: Vec::new(),
            notes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Saves the board to a file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        smol::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write board file: {}", path.display()))?;
        Ok(())
    }

    /// Loads a board from a file
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        let contents = smol::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read board file: {}", path.display()))?;
        let board: BoardFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse board file: {}", path.display()))?;

        if board.version > BOARD_FORMAT_VERSION {
            return Err(anyhow!(
                "Board file version {} is newer than supported version {}",
                board.version,
                BOARD_FORMAT_VERSION
            ));
        }

        Ok(board)
    }
}

impl Default for BoardFile {
    fn default() -> Self {
        Self::new()
    }
}
