// SPDX-License-Identifier: MIT OR Apache-2.0

//! sgfed core - SGF records, board rules and the editable game tree
//!
//! This crate provides the editing engine behind sgfed:
//! - SGF lexing, parsing and serialization
//! - Go board representation with liberty search and capture detection
//! - A branching move tree with navigation, cut/paste and renumbering
//! - Deterministic layout of the move tree onto a display grid

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod coords;
pub mod game;
pub mod layout;
pub mod lexer;
pub mod rules;
pub mod sgf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use board::Board;
pub use game::{
    empty_path, Adornment, AdornmentKind, Game, GameState, MoveId, MoveInfo, PathStep, TreeRef,
};
pub use layout::{LayoutCell, LayoutKind, LayoutOptions, TreeLayout};
pub use sgf::{parse_file, NodeId, ParsedGame, ParsedNode};

/// The only board size the editor supports
pub const BOARD_SIZE: u8 = 19;

/// Player color in a Go game (Black or White)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Black player (traditionally goes first)
    Black,
    /// White player
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The SGF move property for this color
    pub fn move_property(&self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }
}

/// Board intersection, 1-based in both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Row, counted from the top edge
    pub row: u8,
    /// Column, counted from the left edge
    pub col: u8,
}

impl Point {
    /// Create a new point
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if the point lies on a board of the given size
    pub fn is_valid(&self, board_size: u8) -> bool {
        (1..=board_size).contains(&self.row) && (1..=board_size).contains(&self.col)
    }
}

/// Errors raised while reading SGF text
///
/// Every variant carries the character offset where parsing stopped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text does not start with a game tree
    #[error("Malformed SGF file: expected '(' at offset {position}")]
    MalformedFile { position: usize },

    /// Input ran out in the middle of a construct
    #[error("Unexpected end of SGF input at offset {position}")]
    UnexpectedEndOfInput { position: usize },

    /// A node names the same property twice
    #[error("Duplicate property {id} in node at offset {position}")]
    DuplicateProperty { id: String, position: usize },

    /// A node follows the branches of a sequence
    #[error("Found node after branching started at offset {position}")]
    NodeAfterBranches { position: usize },

    /// A specific delimiter was required
    #[error("Expected one of \"{expected}\" at offset {position}")]
    Expected { expected: String, position: usize },
}

/// Advisory failures from game-tree operations
///
/// The `Display` text is the message shown to the user. Operations that
/// return one of these leave the board and the tree untouched, or, for
/// walks, at the last consistent position reached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The target intersection already holds a stone
    #[error("Can't play where there already is a stone.")]
    Occupied,

    /// The move would remove its own group's last liberty without capturing
    #[error("You cannot make a move that removes a group's last liberty")]
    Suicide,

    /// A move in the tree collides with a stone already on the board
    #[error("Tree conflict: a stone is already at row {}, column {}.", .point.row, .point.col)]
    TreeConflict { point: Point },

    /// A node read from the file cannot become a move
    #[error("{0}")]
    BadNode(String),

    /// The cut move is the wrong color for this position
    #[error("Cannot paste cut move that is same color as current move.")]
    PasteWrongColor,

    /// The cut move's intersection is occupied here
    #[error("Cannot paste cut move that is at same location as another stone.")]
    PasteOccupied,

    /// No moves exist yet
    #[error("Game not started, no branches to modify.")]
    NotStarted,

    /// Branch reordering needs the first move of a branch
    #[error("Must be on the first move of a branch to move it.")]
    NotBranchStart,

    /// The branch is already first
    #[error("This branch is the main branch.")]
    AlreadyMainBranch,

    /// The branch is already last
    #[error("This branch is the last branch.")]
    AlreadyLastBranch,

    /// A branch index is out of range
    #[error("There is no branch {0} here.")]
    NoSuchBranch(usize),

    /// A move path names a move beyond the end of its line
    #[error("No move {0} along this path.")]
    NoSuchMove(u32),

    /// Every letter adornment is in use on this move
    #[error("All 26 letter adornments are already used on this move.")]
    AllLettersUsed,

    /// The caller broke an operation's precondition
    #[error("Internal error: {0}")]
    InvariantViolation(&'static str),
}

/// Errors raised while building a [`Game`] from a parsed record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Only 19x19 records are supported
    #[error("Only work with size 19 boards currently, found {0}.")]
    UnsupportedBoardSize(String),

    /// Only handicaps of 2 to 9 stones are placed automatically
    #[error("Unsupported handicap {0}.")]
    UnsupportedHandicap(String),

    /// HA disagrees with the AB stones
    #[error("Handicap {handicap} does not match {stones} AB stones.")]
    HandicapMismatch { handicap: String, stones: usize },

    /// The game-info node holds a move
    #[error("Unexpected move in root parsed node.")]
    MoveInRoot,

    /// PL is not modeled
    #[error("Do not support player-to-play for changing start color.")]
    PlayerToPlayUnsupported,

    /// A coordinate value could not be read
    #[error("Bad coordinate \"{0}\" in {1}.")]
    BadCoordinate(String, String),

    /// The first move node is not a move
    #[error("{0}")]
    BadNode(String),
}
