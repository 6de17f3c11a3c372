// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation and manipulation

use crate::game::MoveId;
use crate::{Color, Point};

/// Cardinal directions, in the order neighbors are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// All directions in visiting order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];
}

/// Represents the Go board with stones and empty positions
///
/// Points are 1-based. Adding onto an occupied point or removing from an
/// empty one is a caller bug and trips a debug assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Size of the board
    size: u8,
    /// Positions on the board, row-major
    positions: Vec<Option<Color>>,
    /// The move that placed each stone; setup stones have none
    moves: Vec<Option<MoveId>>,
}

impl Board {
    /// Create a new empty board with the specified size
    pub fn new(size: u8) -> Self {
        let cells = (size as usize) * (size as usize);
        Self {
            size,
            positions: vec![None; cells],
            moves: vec![None; cells],
        }
    }

    /// Get the size of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Place a stone on an empty point
    pub fn add_stone(&mut self, point: Point, color: Color) {
        self.place(point, color, None);
    }

    /// Place a stone on an empty point, remembering the move that played it
    pub fn place(&mut self, point: Point, color: Color, mv: Option<MoveId>) {
        let idx = self.point_to_index(point);
        debug_assert!(
            self.positions[idx].is_none(),
            "adding a stone onto occupied point {:?}",
            point
        );
        self.positions[idx] = Some(color);
        self.moves[idx] = mv;
    }

    /// Remove the stone at an occupied point
    pub fn remove_stone(&mut self, point: Point) {
        let idx = self.point_to_index(point);
        debug_assert!(
            self.positions[idx].is_some(),
            "removing a stone from empty point {:?}",
            point
        );
        self.positions[idx] = None;
        self.moves[idx] = None;
    }

    pub fn has_stone(&self, point: Point) -> bool {
        self.color_at(point).is_some()
    }

    /// The stone at a point, if any; off-board points are empty
    pub fn color_at(&self, point: Point) -> Option<Color> {
        if !point.is_valid(self.size) {
            return None;
        }
        self.positions[self.point_to_index(point)]
    }

    /// The on-board neighbor in a direction
    pub fn neighbor(&self, point: Point, direction: Direction) -> Option<Point> {
        let (row, col) = (point.row, point.col);
        let next = match direction {
            Direction::Left if col > 1 => Point::new(row, col - 1),
            Direction::Up if row > 1 => Point::new(row - 1, col),
            Direction::Right if col < self.size => Point::new(row, col + 1),
            Direction::Down if row < self.size => Point::new(row + 1, col),
            _ => return None,
        };
        Some(next)
    }

    /// True if the neighbor in `direction` holds a stone of `color`
    pub fn has_stone_color_in_direction(
        &self,
        point: Point,
        color: Color,
        direction: Direction,
    ) -> bool {
        self.neighbor(point, direction)
            .is_some_and(|n| self.color_at(n) == Some(color))
    }

    /// Remove every stone
    pub fn clear(&mut self) {
        self.positions.iter_mut().for_each(|p| *p = None);
        self.moves.iter_mut().for_each(|m| *m = None);
    }

    /// The move whose stone sits at `point`
    pub fn move_at(&self, point: Point) -> Option<MoveId> {
        if !point.is_valid(self.size) {
            return None;
        }
        self.moves[self.point_to_index(point)]
    }

    /// Iterate stones as (point, color)
    pub fn stones(&self) -> impl Iterator<Item = (Point, Color)> + '_ {
        let size = self.size as usize;
        self.positions.iter().enumerate().filter_map(move |(idx, stone)| {
            stone.map(|color| {
                let row = (idx / size) as u8 + 1;
                let col = (idx % size) as u8 + 1;
                (Point::new(row, col), color)
            })
        })
    }

    /// Count stones of specified color on the board
    pub fn count_stones_for(&self, color: Color) -> usize {
        self.positions.iter().filter(|s| **s == Some(color)).count()
    }

    fn point_to_index(&self, point: Point) -> usize {
        debug_assert!(point.is_valid(self.size), "point {:?} off board", point);
        (point.row as usize - 1) * (self.size as usize) + (point.col as usize - 1)
    }
}
