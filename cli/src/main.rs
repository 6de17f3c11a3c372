// SPDX-License-Identifier: MIT OR Apache-2.0

//! sgfed CLI - inspect and rewrite SGF Go records
//!
//! This binary drives the editing core headlessly: it loads a record,
//! walks or lays out its game tree, and prints or writes the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sgfed_cli::config::{load_config, load_config_from, EditorConfig};
use sgfed_cli::flipped_path;
use sgfed_cli::render::{render_board, render_tree, Summary};
use sgfed_core::{empty_path, Game, PathStep, TreeRef, BOARD_SIZE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sgfed", about = "Inspect and rewrite SGF Go records", version)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a record and print its players, komi and tree shape
    Check {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a new record with the usual handicap stones
    New {
        file: PathBuf,
        /// Handicap stones, 2 to 9; 0 for an even game
        #[arg(long, default_value_t = 0)]
        handicap: u8,
        /// Komi; defaults to the configured komi, or 0.5 with a handicap
        #[arg(long)]
        komi: Option<String>,
        /// Black player's name
        #[arg(long)]
        black: Option<String>,
        /// White player's name
        #[arg(long)]
        white: Option<String>,
        /// Replace the file if it exists
        #[arg(long)]
        force: bool,
    },
    /// Rewrite a record in normalized form
    Fmt {
        file: PathBuf,
        /// Output file; standard output if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the record as seen from the other side of the board
    Flip {
        file: PathBuf,
        /// Output file; defaults to the input name plus the configured suffix
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the board at the end of the main line or along a move path
    Board {
        file: PathBuf,
        /// Move path as JSON, e.g. '[{"number":1,"branch":1},{"number":5,"branch":null}]'
        #[arg(long)]
        path: Option<String>,
    },
    /// Print the laid-out game tree
    Tree {
        file: PathBuf,
        /// Print the occupied cells as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON path to a main-line move
    Path {
        file: PathBuf,
        /// Move number; 0 is the initial position
        #[arg(long)]
        number: u32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    init_tracing(args.debug, &config);
    tracing::debug!("Using config: {:?}", config);

    match args.command {
        Command::Check { file, json } => {
            let game = load_game(&file)?;
            let summary = Summary::of(&game);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }
        Command::New {
            file,
            handicap,
            komi,
            black,
            white,
            force,
        } => {
            if file.exists() && !force {
                bail!("{} already exists; pass --force to replace it", file.display());
            }
            let komi = komi.unwrap_or_else(|| config.komi_for(handicap));
            let mut game = Game::new(BOARD_SIZE, handicap, komi)
                .context("Failed to create game")?;
            if black.is_some() || white.is_some() {
                game.set_players(black.unwrap_or_default(), white.unwrap_or_default());
            }
            write_record(&file, &game.write_sgf(false))?;
            println!("Wrote {}", file.display());
        }
        Command::Fmt { file, output } => {
            let game = load_game(&file)?;
            let text = game.write_sgf(false);
            match output {
                Some(path) => write_record(&path, &text)?,
                None => println!("{}", text),
            }
        }
        Command::Flip { file, output } => {
            let game = load_game(&file)?;
            let path = output.unwrap_or_else(|| flipped_path(&file, &config.flipped_suffix));
            write_record(&path, &game.write_sgf(true))?;
            println!("Wrote {}", path.display());
        }
        Command::Board { file, path } => {
            let mut game = load_game(&file)?;
            let walk = match path {
                Some(json) => {
                    let steps: Vec<PathStep> =
                        serde_json::from_str(&json).context("Failed to parse move path")?;
                    game.advance_to_move_path(&steps).map(|_| ())
                }
                None => game.goto_last_move().map(|_| ()),
            };
            // A failed walk leaves the last position that could be reached
            if let Err(e) = walk {
                tracing::warn!("Stopped at move {}: {}", game.move_count(), e);
            }
            print!("{}", render_board(&game));
        }
        Command::Tree { file, json } => {
            let game = load_game(&file)?;
            let layout = game.tree_layout(config.layout);
            if json {
                println!("{}", serde_json::to_string_pretty(&layout.cells())?);
            } else {
                print!("{}", render_tree(&layout, game.current().map(TreeRef::Move)));
            }
        }
        Command::Path { file, number } => {
            let mut game = load_game(&file)?;
            let path = main_line_path(&mut game, number)?;
            println!("{}", serde_json::to_string(&path)?);
        }
    }

    Ok(())
}

/// Install the fmt subscriber: --debug, then RUST_LOG, then the config file
fn init_tracing(debug: bool, config: &EditorConfig) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_game(file: &Path) -> Result<Game> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let game =
        Game::from_sgf(&text).with_context(|| format!("Failed to load {}", file.display()))?;
    tracing::info!("Loaded {}", file.display());
    Ok(game)
}

fn write_record(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Follow the first branch everywhere up to move `number`
fn main_line_path(game: &mut Game, number: u32) -> Result<Vec<PathStep>> {
    if number == 0 {
        return Ok(empty_path());
    }
    while game.move_count() < number {
        if !game.can_replay() {
            bail!("The main line has only {} moves", game.move_count());
        }
        game.set_current_branch(0)?;
        game.replay_move()
            .with_context(|| format!("Failed to replay move {}", game.move_count() + 1))?;
    }
    match game.current() {
        Some(id) => Ok(game.path_to_move(id)),
        None => Ok(empty_path()),
    }
}
