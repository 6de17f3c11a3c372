// SPDX-License-Identifier: MIT OR Apache-2.0

//! The editable game tree
//!
//! A [`Game`] owns the board, a move arena and the parsed tree the record
//! was read from. Moves after the rendered frontier stay as
//! `Slot::Unrendered` entries pointing at their file node until replay
//! reaches them, at which point they are readied into full moves.

mod adornments;
mod edit;
mod generate;
mod moves;
mod navigate;
mod path;
mod tree;

pub use adornments::{Adornment, AdornmentKind};
pub use moves::{MoveId, MoveInfo};
pub use path::{empty_path, PathStep};
pub use tree::TreeRef;

use crate::board::Board;
use crate::coords::parse_point;
use crate::sgf::{ParsedGame, Properties};
use crate::{Color, GameError, LoadError, Point, BOARD_SIZE};
use moves::{decode_adornments, decode_node, Branches, Move, Pending, Slot};

/// Whether any moves exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Started,
}

/// Root properties the game models itself; everything else passes through
const MODELED_ROOT_PROPERTIES: [&str; 13] = [
    "AP", "SZ", "HA", "AB", "AW", "KM", "PB", "PW", "C", "GC", "TR", "SQ", "LB",
];

/// Default handicap stone placements, in the order they are added
fn handicap_points(handicap: u8) -> Vec<Point> {
    let mut points = Vec::new();
    if handicap >= 2 {
        points.push(Point::new(4, 16));
        points.push(Point::new(16, 4));
    }
    if handicap >= 3 {
        points.push(Point::new(16, 16));
    }
    if handicap >= 4 {
        points.push(Point::new(4, 4));
    }
    if matches!(handicap, 5 | 7 | 9) {
        points.push(Point::new(10, 10));
    }
    if handicap >= 6 {
        points.push(Point::new(10, 4));
        points.push(Point::new(10, 16));
    }
    if handicap >= 8 {
        points.push(Point::new(4, 10));
        points.push(Point::new(16, 10));
    }
    points
}

/// Komi used when a record does not state one
pub fn default_komi(handicap: bool) -> &'static str {
    if handicap {
        "0.5"
    } else {
        "6.5"
    }
}

/// A Go game record being viewed and edited
#[derive(Debug, Clone)]
pub struct Game {
    size: u8,
    board: Board,
    state: GameState,
    handicap: u8,
    /// Handicap or AB stones
    setup_black: Vec<Point>,
    /// AW stones
    setup_white: Vec<Point>,
    setup_adornments: Vec<Adornment>,
    komi: String,
    player_black: String,
    player_white: String,
    /// Game comment shown at the initial position
    comments: String,
    /// Unmodeled root properties written back unchanged
    root_properties: Properties,
    /// The tree the record was read from; empty for new games
    parsed: ParsedGame,
    slots: Vec<Slot>,
    roots: Branches,
    current: Option<MoveId>,
    next_color: Color,
    move_count: u32,
    black_prisoners: u32,
    white_prisoners: u32,
    cut_buffer: Option<MoveId>,
    current_marker: Option<Adornment>,
    dirty: bool,
}

impl Game {
    /// Create an empty game
    ///
    /// A handicap of 2 to 9 places the usual stones; 0 means an even game.
    pub fn new(size: u8, handicap: u8, komi: impl Into<String>) -> Result<Self, LoadError> {
        if size != BOARD_SIZE {
            return Err(LoadError::UnsupportedBoardSize(size.to_string()));
        }
        if handicap == 1 || handicap > 9 {
            return Err(LoadError::UnsupportedHandicap(handicap.to_string()));
        }
        let mut game = Self::empty(size);
        game.handicap = handicap;
        game.setup_black = handicap_points(handicap);
        game.komi = komi.into();
        game.goto_start();
        Ok(game)
    }

    fn empty(size: u8) -> Self {
        Self {
            size,
            board: Board::new(size),
            state: GameState::NotStarted,
            handicap: 0,
            setup_black: Vec::new(),
            setup_white: Vec::new(),
            setup_adornments: Vec::new(),
            komi: default_komi(false).to_string(),
            player_black: String::new(),
            player_white: String::new(),
            comments: String::new(),
            root_properties: Properties::new(),
            parsed: ParsedGame::new(),
            slots: Vec::new(),
            roots: Branches::default(),
            current: None,
            next_color: Color::Black,
            move_count: 0,
            black_prisoners: 0,
            white_prisoners: 0,
            cut_buffer: None,
            current_marker: None,
            dirty: false,
        }
    }

    /// Build a game from a parsed record
    ///
    /// The root node supplies game information and setup stones. Its
    /// children become the first moves, readied lazily as play reaches them.
    pub fn from_parsed(parsed: ParsedGame) -> Result<Self, LoadError> {
        let mut game = Self::empty(BOARD_SIZE);
        let Some(root) = parsed.root() else {
            game.goto_start();
            return Ok(game);
        };
        let props = parsed.node(root).properties.clone();
        if props.contains("B") || props.contains("W") {
            return Err(LoadError::MoveInRoot);
        }
        if props.contains("PL") {
            return Err(LoadError::PlayerToPlayUnsupported);
        }
        if let Some(size) = props.first("SZ") {
            if size.trim() != BOARD_SIZE.to_string() {
                return Err(LoadError::UnsupportedBoardSize(size.to_string()));
            }
        }
        game.setup_black = setup_points(&props, "AB")?;
        game.setup_white = setup_points(&props, "AW")?;
        if let Some(ha) = props.first("HA") {
            let handicap = ha.trim().parse::<usize>().ok();
            let stones = game.setup_black.len();
            if handicap != Some(stones) {
                return Err(LoadError::HandicapMismatch {
                    handicap: ha.to_string(),
                    stones,
                });
            }
            game.handicap = stones as u8;
        }
        game.komi = props
            .first("KM")
            .map(str::to_string)
            .unwrap_or_else(|| default_komi(!game.setup_black.is_empty()).to_string());
        game.player_black = props.first("PB").unwrap_or_default().to_string();
        game.player_white = props.first("PW").unwrap_or_default().to_string();
        // GC then C, run together
        game.comments = [props.first("GC"), props.first("C")]
            .into_iter()
            .flatten()
            .collect::<String>();
        game.setup_adornments = decode_adornments(&props);
        let mut root_properties = props;
        for id in MODELED_ROOT_PROPERTIES {
            root_properties.remove(id);
        }
        game.root_properties = root_properties;

        for &child in parsed.node(root).children() {
            decode_node(&parsed.node(child).properties).map_err(LoadError::BadNode)?;
            let id = game.alloc(Slot::Unrendered(Pending {
                node: child,
                previous: None,
                number: 1,
            }));
            game.roots.push(id);
        }
        if !game.roots.is_empty() {
            game.state = GameState::Started;
        }
        game.parsed = parsed;
        game.goto_start();
        tracing::debug!(
            "Loaded game with {} first moves, handicap {}",
            game.roots.len(),
            game.handicap
        );
        Ok(game)
    }

    /// Parse SGF text and build a game from it
    pub fn from_sgf(text: &str) -> Result<Self, LoadError> {
        Self::from_parsed(crate::sgf::parse_file(text)?)
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The move whose stone is at `point`; setup stones give `None`
    pub fn move_at(&self, point: Point) -> Option<MoveId> {
        self.board.move_at(point)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn handicap(&self) -> u8 {
        self.handicap
    }

    /// Black stones present before the first move
    pub fn setup_black(&self) -> &[Point] {
        &self.setup_black
    }

    /// White stones present before the first move
    pub fn setup_white(&self) -> &[Point] {
        &self.setup_white
    }

    pub fn komi(&self) -> &str {
        &self.komi
    }

    pub fn set_komi(&mut self, komi: impl Into<String>) {
        self.komi = komi.into();
        self.dirty = true;
    }

    pub fn player_black(&self) -> &str {
        &self.player_black
    }

    pub fn player_white(&self) -> &str {
        &self.player_white
    }

    pub fn set_players(&mut self, black: impl Into<String>, white: impl Into<String>) {
        self.player_black = black.into();
        self.player_white = white.into();
        self.dirty = true;
    }

    /// The displayed move, `None` at the initial position
    pub fn current(&self) -> Option<MoveId> {
        self.current
    }

    pub fn next_color(&self) -> Color {
        self.next_color
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Stones captured so far by `color`
    pub fn prisoners(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_prisoners,
            Color::White => self.white_prisoners,
        }
    }

    /// First moves, main line first
    pub fn first_moves(&self) -> &[MoveId] {
        self.roots.as_slice()
    }

    /// The parsed tree the game was loaded from
    pub fn parsed(&self) -> &ParsedGame {
        &self.parsed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Comment at the current position
    pub fn comment(&self) -> &str {
        match self.current.and_then(|id| self.rendered(id)) {
            Some(mv) => &mv.comments,
            None => &self.comments,
        }
    }

    /// Replace the comment at the current position
    pub fn set_comment(&mut self, text: impl Into<String>) -> Result<(), GameError> {
        let text = text.into();
        let slot = match self.current {
            Some(id) => &mut self.rendered_mut(id)?.comments,
            None => &mut self.comments,
        };
        if *slot != text {
            *slot = text;
            self.dirty = true;
        }
        Ok(())
    }

    /// Read-only view of a move
    ///
    /// Moves not yet readied are decoded from their file node; a node
    /// that is not a move yields [`GameError::BadNode`].
    pub fn move_info(&self, id: MoveId) -> Result<MoveInfo, GameError> {
        let slot = self
            .slots
            .get(id.0)
            .ok_or(GameError::InvariantViolation("unknown move id"))?;
        match slot {
            Slot::Rendered(mv) => Ok(MoveInfo {
                id,
                point: mv.point,
                color: mv.color,
                number: mv.number,
                comments: mv.comments.clone(),
                adornments: mv.adornments.clone(),
                captured: mv.captured.clone(),
                previous: mv.previous,
                children: mv.children.as_slice().to_vec(),
                selected_branch: mv.children.selected_index(),
                rendered: true,
            }),
            Slot::Unrendered(pending) => {
                let decoded = decode_node(&self.parsed.node(pending.node).properties)
                    .map_err(GameError::BadNode)?;
                Ok(MoveInfo {
                    id,
                    point: decoded.point,
                    color: decoded.color,
                    number: pending.number,
                    comments: decoded.comments,
                    adornments: decoded.adornments,
                    captured: Vec::new(),
                    previous: pending.previous,
                    children: Vec::new(),
                    selected_branch: 0,
                    rendered: false,
                })
            }
        }
    }

    /// True once the move has been readied
    pub fn is_rendered(&self, id: MoveId) -> bool {
        matches!(self.slots.get(id.0), Some(Slot::Rendered(_)))
    }

    /// The held cut subtree
    pub fn cut_buffer(&self) -> Option<MoveId> {
        self.cut_buffer
    }

    fn alloc(&mut self, slot: Slot) -> MoveId {
        self.slots.push(slot);
        MoveId(self.slots.len() - 1)
    }

    pub(crate) fn slot(&self, id: MoveId) -> &Slot {
        &self.slots[id.0]
    }

    pub(crate) fn rendered(&self, id: MoveId) -> Option<&Move> {
        match self.slots.get(id.0) {
            Some(Slot::Rendered(mv)) => Some(mv),
            _ => None,
        }
    }

    pub(crate) fn rendered_mut(&mut self, id: MoveId) -> Result<&mut Move, GameError> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Rendered(mv)) => Ok(mv),
            _ => Self::invariant("expected a readied move"),
        }
    }

    pub(crate) fn mv(&self, id: MoveId) -> Result<&Move, GameError> {
        match self.rendered(id) {
            Some(mv) => Ok(mv),
            None => Self::invariant("expected a readied move"),
        }
    }

    /// Children of a position: a move's, or the first moves for `None`
    pub(crate) fn children_of(&self, parent: Option<MoveId>) -> Result<&Branches, GameError> {
        match parent {
            Some(id) => Ok(&self.mv(id)?.children),
            None => Ok(&self.roots),
        }
    }

    pub(crate) fn children_of_mut(
        &mut self,
        parent: Option<MoveId>,
    ) -> Result<&mut Branches, GameError> {
        match parent {
            Some(id) => Ok(&mut self.rendered_mut(id)?.children),
            None => Ok(&mut self.roots),
        }
    }

    /// Report a broken precondition
    ///
    /// Debug builds panic so the caller bug is found; release builds
    /// return [`GameError::InvariantViolation`].
    pub(crate) fn invariant<T>(what: &'static str) -> Result<T, GameError> {
        if cfg!(debug_assertions) {
            panic!("invariant violation: {}", what);
        }
        Err(GameError::InvariantViolation(what))
    }

    /// Color to play first from the initial position
    fn initial_color(&self) -> Color {
        if self.setup_black.is_empty() {
            Color::Black
        } else {
            Color::White
        }
    }
}

/// Read every coordinate of a setup property, dropping repeats
fn setup_points(props: &Properties, id: &str) -> Result<Vec<Point>, LoadError> {
    let mut points = Vec::new();
    for value in props.get(id).unwrap_or_default() {
        match parse_point(value) {
            Some(Some(point)) => {
                if points.contains(&point) {
                    tracing::warn!("Ignoring repeated {} stone at {}", id, value);
                } else {
                    points.push(point);
                }
            }
            _ => return Err(LoadError::BadCoordinate(value.clone(), id.to_string())),
        }
    }
    Ok(points)
}
