// SPDX-License-Identifier: MIT OR Apache-2.0

//! Liberty search, capture detection and the suicide rule

use crate::board::{Board, Direction};
use crate::{Color, GameError, Point};

/// One flag per board point
struct Visited {
    size: usize,
    cells: Vec<bool>,
}

impl Visited {
    fn new(size: u8) -> Self {
        let size = size as usize;
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    fn index(&self, point: Point) -> usize {
        (point.row as usize - 1) * self.size + (point.col as usize - 1)
    }

    fn contains(&self, point: Point) -> bool {
        self.cells[self.index(point)]
    }

    fn insert(&mut self, point: Point) {
        let idx = self.index(point);
        self.cells[idx] = true;
    }
}

/// Read-only rule queries over a board
pub struct RuleValidator<'a> {
    /// The board being checked
    board: &'a Board,
}

impl<'a> RuleValidator<'a> {
    /// Create a new rules validator
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// True if the group of `color` containing `point` has a liberty
    pub fn find_liberty(&self, point: Point, color: Color) -> bool {
        let mut visited = Visited::new(self.board.size());
        self.find_liberty_from(point, color, &mut visited)
    }

    fn find_liberty_from(&self, point: Point, color: Color, visited: &mut Visited) -> bool {
        if visited.contains(point) {
            return false;
        }
        let neighbors = Direction::ALL.map(|d| self.board.neighbor(point, d));
        if neighbors
            .iter()
            .flatten()
            .any(|n| !self.board.has_stone(*n))
        {
            return true;
        }
        visited.insert(point);
        neighbors.iter().flatten().any(|n| {
            self.board.color_at(*n) == Some(color) && self.find_liberty_from(*n, color, visited)
        })
    }

    /// Stones a `color` stone at `point` captures
    ///
    /// The stone must already be on the board. The board is not changed.
    /// A group touching the point from several sides is listed once.
    pub fn check_for_kill(&self, point: Point, color: Color) -> Vec<Point> {
        let opponent = color.opposite();
        let mut visited = Visited::new(self.board.size());
        let mut dead = Vec::new();
        for direction in Direction::ALL {
            if !self
                .board
                .has_stone_color_in_direction(point, opponent, direction)
            {
                continue;
            }
            let Some(neighbor) = self.board.neighbor(point, direction) else {
                continue;
            };
            if !visited.contains(neighbor) && !self.find_liberty(neighbor, opponent) {
                self.collect_stones(neighbor, opponent, &mut dead, &mut visited);
            }
        }
        if !dead.is_empty() {
            tracing::debug!("Stone at {:?} captures {} stones", point, dead.len());
        }
        dead
    }

    /// Flood-fill the group at `point` into `dead`
    fn collect_stones(
        &self,
        point: Point,
        color: Color,
        dead: &mut Vec<Point>,
        visited: &mut Visited,
    ) {
        if visited.contains(point) {
            return;
        }
        visited.insert(point);
        dead.push(point);
        for direction in Direction::ALL {
            if let Some(neighbor) = self.board.neighbor(point, direction) {
                if self.board.color_at(neighbor) == Some(color) {
                    self.collect_stones(neighbor, color, dead, visited);
                }
            }
        }
    }
}

/// Check that a stone at an empty `point` is not suicide
///
/// The stone is placed temporarily and removed again. Returns the stones
/// the move would capture, or [`GameError::Suicide`] when its own group
/// would have no liberty and nothing is captured.
pub fn check_self_capture_no_kill(
    board: &mut Board,
    point: Point,
    color: Color,
) -> Result<Vec<Point>, GameError> {
    board.add_stone(point, color);
    let validator = RuleValidator::new(board);
    let dead = validator.check_for_kill(point, color);
    let has_liberty = validator.find_liberty(point, color);
    board.remove_stone(point);
    if !has_liberty && dead.is_empty() {
        tracing::debug!("Rejecting suicide at {:?} for {:?}", point, color);
        return Err(GameError::Suicide);
    }
    Ok(dead)
}
