//! Board CLI - inspect and edit a board file from the command line.
//!
//! Every subcommand loads the board, replays its edit through the same
//! canvas gesture path the interactive board uses, and writes the file back
//! when anything changed.

mod logger;

use anyhow::{bail, Context, Result};
use api::{
    execute_command, execute_query, Command, CommandResult, ElementInfo, Query, QueryResult, Target,
};
use canvas::{Canvas, RedrawCounter};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use logger::{log_section, BoardLogger};
use node::{CanvasPoint, ElementKind};
use project::{open_board, BoardStore};
use std::path::{Path, PathBuf};
use theme::Theme;

/// Board CLI - work with task and note boards
#[derive(Parser)]
#[command(name = "board")]
#[command(about = "Command-line interface for task boards")]
struct Cli {
    /// Board file to open; created on first write
    #[arg(short, long, default_value = "board.json")]
    file: PathBuf,

    /// Theme file overriding the built-in card styles
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List elements back to front
    List,

    /// Create a task or note
    Create {
        /// `task` or `note`
        kind: ElementKind,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        y: f32,
        #[arg(long)]
        title: Option<String>,
    },

    /// Drag an element to a new position
    Drag {
        /// Element id or unique id prefix
        id: String,
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
    },

    /// Click an element, selecting it and bringing it to the front
    Click {
        /// Element id or unique id prefix
        id: String,
    },

    /// Delete an element and its links
    Delete {
        /// Element id or unique id prefix
        id: String,
    },

    /// Run a JSON array of commands from a file
    Run { script: PathBuf },

    /// Run a single JSON query
    Query { json: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(err) = BoardLogger::init(level) {
        eprintln!("Logging to file disabled: {err:#}");
    }

    let theme = match &cli.theme {
        Some(path) => Theme::load(path)?,
        None => Theme::default(),
    };
    let store = smol::block_on(open_board(&cli.file))?;
    let mut canvas = Canvas::new(store, RedrawCounter::new(), theme);
    canvas.sync();

    match cli.command {
        Commands::List => print_elements(&canvas),
        Commands::Query { json } => {
            let query: Query = serde_json::from_str(&json).context("Invalid query JSON")?;
            let result = execute_query(&canvas, query);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Create { kind, x, y, title } => {
            let position = CanvasPoint::new(x, y);
            let command = match kind {
                ElementKind::Task => Command::CreateTask {
                    position,
                    title,
                    size: None,
                    parent: None,
                },
                ElementKind::Note => Command::CreateNote {
                    position,
                    title,
                    size: None,
                    parent: None,
                },
            };
            apply(&mut canvas, command)?;
        }
        Commands::Drag { id, x, y } => apply(
            &mut canvas,
            Command::Drag {
                target: Target::element(id),
                to: CanvasPoint::new(x, y),
            },
        )?,
        Commands::Click { id } => apply(
            &mut canvas,
            Command::Click {
                target: Target::element(id),
            },
        )?,
        Commands::Delete { id } => apply(
            &mut canvas,
            Command::Delete {
                target: Target::element(id),
            },
        )?,
        Commands::Run { script } => {
            log_section(&format!("script {}", script.display()));
            let commands = load_script(&script)?;
            apply(&mut canvas, Command::Batch { commands })?;
        }
    }

    if canvas.store().is_dirty() {
        smol::block_on(canvas.store_mut().flush(&cli.file))?;
    }
    Ok(())
}

/// Execute a command and print its result.
fn apply(canvas: &mut Canvas<BoardStore, RedrawCounter>, command: Command) -> Result<()> {
    match execute_command(canvas, command) {
        CommandResult::Error { message } => bail!(message),
        result => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

/// Read a script file: a JSON array of commands.
fn load_script(path: &Path) -> Result<Vec<Command>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse_script(&contents).with_context(|| format!("Invalid script: {}", path.display()))
}

fn parse_script(json: &str) -> Result<Vec<Command>> {
    Ok(serde_json::from_str(json)?)
}

fn print_elements(canvas: &Canvas<BoardStore, RedrawCounter>) {
    let QueryResult::Elements { elements } = execute_query(canvas, Query::Sorted) else {
        return;
    };
    if elements.is_empty() {
        println!("Board is empty.");
        return;
    }
    for element in &elements {
        println!("{}", format_element(element));
    }
}

fn format_element(element: &ElementInfo) -> String {
    format!(
        "{}  {:<4}  z={:<3} ({}, {})  {}x{}  {}",
        element.id,
        element.kind.to_string(),
        element.z_index,
        element.position.x(),
        element.position.y(),
        element.size.width(),
        element.size.height(),
        element.title
    )
}
