// SPDX-License-Identifier: MIT OR Apache-2.0

//! Playing new moves and walking the tree

use super::moves::{decode_node, Branches, Decoded, Move, Pending, Slot};
use super::{Game, GameState, MoveId};
use crate::rules::{check_self_capture_no_kill, RuleValidator};
use crate::{Color, GameError, Point};

impl Game {
    /// Play the color to move at `point`
    ///
    /// If the current position already has a child at the same point and
    /// of the same color, that child is selected and replayed instead of
    /// adding a duplicate. The board is untouched when this fails.
    pub fn make_move(&mut self, point: Point) -> Result<MoveId, GameError> {
        if !point.is_valid(self.size) {
            return Self::invariant("move point is off the board");
        }
        if self.board.has_stone(point) {
            return Err(GameError::Occupied);
        }
        check_self_capture_no_kill(&mut self.board, point, self.next_color)?;
        self.play(Some(point))
    }

    /// Pass for the color to move
    pub fn make_pass(&mut self) -> Result<MoveId, GameError> {
        self.play(None)
    }

    fn play(&mut self, point: Option<Point>) -> Result<MoveId, GameError> {
        let color = self.next_color;
        if let Some(index) = self.find_existing_child(point, color)? {
            let children = self.children_of_mut(self.current)?;
            let previous_selection = children.selected_index();
            children.select(index);
            return match self.replay_move() {
                Ok(id) => Ok(id),
                Err(e) => {
                    self.children_of_mut(self.current)?.select(previous_selection);
                    Err(e)
                }
            };
        }
        let number = self.move_count + 1;
        let id = self.alloc(Slot::Rendered(Move {
            point,
            color,
            number,
            comments: String::new(),
            adornments: Vec::new(),
            captured: Vec::new(),
            captured_moves: Vec::new(),
            previous: self.current,
            children: Branches::default(),
            parsed: None,
        }));
        self.children_of_mut(self.current)?.push_selected(id);
        self.state = GameState::Started;
        self.dirty = true;
        self.apply_move(id)?;
        Ok(id)
    }

    /// Index of a child of the current position matching point and color
    fn find_existing_child(
        &self,
        point: Option<Point>,
        color: Color,
    ) -> Result<Option<usize>, GameError> {
        let children = self.children_of(self.current)?;
        Ok(children.as_slice().iter().position(|&id| {
            self.point_and_color(id)
                .is_some_and(|found| found == (point, color))
        }))
    }

    /// Point and color of any move; `None` for a node that is not a move
    pub(crate) fn point_and_color(&self, id: MoveId) -> Option<(Option<Point>, Color)> {
        match self.slot(id) {
            Slot::Rendered(mv) => Some((mv.point, mv.color)),
            Slot::Unrendered(pending) => decode_node(&self.parsed.node(pending.node).properties)
                .ok()
                .map(|d| (d.point, d.color)),
        }
    }

    /// Take back the current move
    ///
    /// Returns the move that was unwound.
    pub fn unwind_move(&mut self) -> Result<MoveId, GameError> {
        let Some(id) = self.current else {
            return Self::invariant("unwind_move needs a current move");
        };
        let mv = self.mv(id)?;
        let (point, color, previous) = (mv.point, mv.color, mv.previous);
        let captured = mv.captured.clone();
        let captured_moves = mv.captured_moves.clone();
        if let Some(point) = point {
            self.board.remove_stone(point);
        }
        for (&stone, &owner) in captured.iter().zip(&captured_moves) {
            self.board.place(stone, color.opposite(), owner);
        }
        self.add_prisoners(color, -(captured.len() as i64));
        self.next_color = color;
        self.move_count -= 1;
        self.current = previous;
        self.update_current_marker();
        Ok(id)
    }

    pub fn can_unwind(&self) -> bool {
        self.current.is_some()
    }

    /// True if the current position has a move to replay into
    pub fn can_replay(&self) -> bool {
        self.children_of(self.current)
            .map(|c| c.selected().is_some())
            .unwrap_or(false)
    }

    /// Play the selected next move from the tree
    ///
    /// A move still in its file form is readied first. Fails with
    /// [`GameError::TreeConflict`] when its point is already occupied and
    /// with [`GameError::BadNode`] when its node is not a move; the game
    /// does not change in either case.
    pub fn replay_move(&mut self) -> Result<MoveId, GameError> {
        let Some(id) = self.children_of(self.current)?.selected() else {
            return Self::invariant("replay_move needs a next move");
        };
        self.replay_update_model(id)?;
        Ok(id)
    }

    fn replay_update_model(&mut self, id: MoveId) -> Result<(), GameError> {
        let pending = match self.slot(id) {
            Slot::Rendered(mv) => {
                if let Some(point) = mv.point {
                    self.check_conflict(point)?;
                }
                return self.apply_move(id);
            }
            Slot::Unrendered(pending) => *pending,
        };
        let decoded = decode_node(&self.parsed.node(pending.node).properties).map_err(|msg| {
            tracing::warn!("Cannot replay node: {}", msg);
            GameError::BadNode(msg)
        })?;
        if let Some(point) = decoded.point {
            self.check_conflict(point)?;
        }
        self.ready(id, pending, decoded);
        self.apply_move(id)
    }

    fn check_conflict(&self, point: Point) -> Result<(), GameError> {
        if self.board.has_stone(point) {
            tracing::warn!("Tree conflict replaying onto occupied {:?}", point);
            return Err(GameError::TreeConflict { point });
        }
        Ok(())
    }

    /// Turn a file node into a move with unreadied children
    fn ready(&mut self, id: MoveId, pending: Pending, decoded: Decoded) {
        let mut children = Branches::default();
        let child_nodes = self.parsed.node(pending.node).children().to_vec();
        for node in child_nodes {
            let child = self.alloc(Slot::Unrendered(Pending {
                node,
                previous: Some(id),
                number: pending.number + 1,
            }));
            children.push(child);
        }
        tracing::debug!(
            "Readied move {} with {} children",
            pending.number,
            children.len()
        );
        self.slots[id.0] = Slot::Rendered(Move {
            point: decoded.point,
            color: decoded.color,
            number: pending.number,
            comments: decoded.comments,
            adornments: decoded.adornments,
            captured: Vec::new(),
            captured_moves: Vec::new(),
            previous: pending.previous,
            children,
            parsed: Some(pending.node),
        });
    }

    /// Put a readied move on the board and make it current
    ///
    /// Captures are computed against the board as it is now.
    fn apply_move(&mut self, id: MoveId) -> Result<(), GameError> {
        let mv = self.mv(id)?;
        let (point, color) = (mv.point, mv.color);
        let captured = match point {
            Some(point) => {
                self.board.place(point, color, Some(id));
                RuleValidator::new(&self.board).check_for_kill(point, color)
            }
            None => Vec::new(),
        };
        let mut captured_moves = Vec::with_capacity(captured.len());
        for &stone in &captured {
            captured_moves.push(self.board.move_at(stone));
            self.board.remove_stone(stone);
        }
        self.add_prisoners(color, captured.len() as i64);
        let mv = self.rendered_mut(id)?;
        mv.captured = captured;
        mv.captured_moves = captured_moves;
        self.move_count += 1;
        self.next_color = color.opposite();
        self.current = Some(id);
        self.update_current_marker();
        Ok(())
    }

    fn add_prisoners(&mut self, color: Color, delta: i64) {
        let count = match color {
            Color::Black => &mut self.black_prisoners,
            Color::White => &mut self.white_prisoners,
        };
        *count = (*count as i64 + delta).max(0) as u32;
    }

    /// Return to the initial position
    ///
    /// Setup stones stay on the board.
    pub fn goto_start(&mut self) {
        self.board.clear();
        for &point in &self.setup_black {
            if !self.board.has_stone(point) {
                self.board.add_stone(point, Color::Black);
            }
        }
        for &point in &self.setup_white {
            if !self.board.has_stone(point) {
                self.board.add_stone(point, Color::White);
            }
        }
        self.next_color = self.initial_color();
        self.current = None;
        self.move_count = 0;
        self.black_prisoners = 0;
        self.white_prisoners = 0;
        self.update_current_marker();
    }

    /// Replay along the selected branches to the end of the line
    ///
    /// On a conflict the walk stops at the last move that applied and the
    /// error is returned.
    pub fn goto_last_move(&mut self) -> Result<Option<MoveId>, GameError> {
        while self.can_replay() {
            self.replay_move()?;
        }
        Ok(self.current)
    }

    /// Choose which child replay follows from the current position
    pub fn set_current_branch(&mut self, index: usize) -> Result<(), GameError> {
        if !self.children_of_mut(self.current)?.select(index) {
            return Err(GameError::NoSuchBranch(index));
        }
        Ok(())
    }

    /// Index of the child replay follows from the current position
    pub fn current_branch(&self) -> usize {
        self.children_of(self.current)
            .map(|c| c.selected_index())
            .unwrap_or(0)
    }

    /// Children of the current position, main line first
    pub fn next_moves(&self) -> Vec<MoveId> {
        self.children_of(self.current)
            .map(|c| c.as_slice().to_vec())
            .unwrap_or_default()
    }
}
