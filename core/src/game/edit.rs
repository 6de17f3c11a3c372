// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural edits: cut, paste and branch order

use super::moves::Slot;
use super::{Game, GameState, MoveId};
use crate::rules::check_self_capture_no_kill;
use crate::sgf::NodeId;
use crate::GameError;

impl Game {
    /// Detach the current move and its subtree into the cut buffer
    ///
    /// The position steps back to the cut move's parent. A subtree already
    /// in the buffer is dropped.
    pub fn cut_move(&mut self) -> Result<MoveId, GameError> {
        let Some(cut) = self.current else {
            return Self::invariant("cut_move needs a current move");
        };
        self.unwind_move()?;
        let parent = self.current;
        self.children_of_mut(parent)?.remove(cut);
        if let (Some(parent_node), Some(cut_node)) = (self.parsed_parent(parent), self.mv(cut)?.parsed)
        {
            self.parsed.detach_child(parent_node, cut_node);
        }
        let mv = self.rendered_mut(cut)?;
        mv.previous = None;
        mv.captured.clear();
        mv.captured_moves.clear();
        if self.roots.is_empty() {
            self.state = GameState::NotStarted;
        }
        if let Some(dropped) = self.cut_buffer.replace(cut) {
            tracing::debug!("Dropping previously cut move {:?}", dropped);
        }
        self.dirty = true;
        tracing::info!("Cut move {:?} and its subtree", cut);
        Ok(cut)
    }

    /// True if a cut subtree is waiting to be pasted
    pub fn can_paste(&self) -> bool {
        self.cut_buffer.is_some()
    }

    /// Attach the cut subtree after the current position and replay into it
    ///
    /// The cut move must be the color to play and its point must be free
    /// and legal here. The subtree is renumbered from its new position.
    pub fn paste_move(&mut self) -> Result<MoveId, GameError> {
        let Some(cut) = self.cut_buffer else {
            return Self::invariant("paste_move needs a cut move");
        };
        let mv = self.mv(cut)?;
        let (point, color, cut_node) = (mv.point, mv.color, mv.parsed);
        if color != self.next_color {
            return Err(GameError::PasteWrongColor);
        }
        if let Some(point) = point {
            if self.board.has_stone(point) {
                return Err(GameError::PasteOccupied);
            }
            check_self_capture_no_kill(&mut self.board, point, color)?;
        }
        let parent = self.current;
        let number = match parent {
            Some(id) => self.mv(id)?.number + 1,
            None => 1,
        };
        self.children_of_mut(parent)?.push_selected(cut);
        let mv = self.rendered_mut(cut)?;
        mv.previous = parent;
        mv.number = number;
        if let (Some(parent_node), Some(cut_node)) = (self.parsed_parent(parent), cut_node) {
            self.parsed.attach_child(parent_node, cut_node);
        }
        self.state = GameState::Started;
        self.renumber_moves(cut);
        self.cut_buffer = None;
        self.dirty = true;
        tracing::info!("Pasted move {:?} as move {}", cut, number);
        self.replay_move()
    }

    /// Renumber the subtree below `id` to follow on from `id`'s number
    pub fn renumber_moves(&mut self, id: MoveId) {
        let mut stack = vec![id];
        while let Some(parent) = stack.pop() {
            let Slot::Rendered(mv) = &self.slots[parent.0] else {
                continue;
            };
            let number = mv.number + 1;
            let children = mv.children.as_slice().to_vec();
            for child in children {
                self.slots[child.0].set_number(number);
                stack.push(child);
            }
        }
    }

    /// Swap the current branch with the one above it
    pub fn move_branch_up(&mut self) -> Result<(), GameError> {
        let (parent, index) = self.branch_for_moving()?;
        if index == 0 {
            return Err(GameError::AlreadyMainBranch);
        }
        self.swap_branches(parent, index, index - 1)?;
        tracing::info!("Branch moved up.");
        Ok(())
    }

    /// Swap the current branch with the one below it
    pub fn move_branch_down(&mut self) -> Result<(), GameError> {
        let (parent, index) = self.branch_for_moving()?;
        if index + 1 >= self.children_of(parent)?.len() {
            return Err(GameError::AlreadyLastBranch);
        }
        self.swap_branches(parent, index, index + 1)?;
        tracing::info!("Branch moved down.");
        Ok(())
    }

    /// Parent of the current move and the move's index among its siblings
    fn branch_for_moving(&self) -> Result<(Option<MoveId>, usize), GameError> {
        if self.state == GameState::NotStarted {
            return Err(GameError::NotStarted);
        }
        let current = self.current.ok_or(GameError::NotBranchStart)?;
        let parent = self.mv(current)?.previous;
        let siblings = self.children_of(parent)?;
        if siblings.len() < 2 {
            return Err(GameError::NotBranchStart);
        }
        let index = siblings
            .position(current)
            .ok_or(GameError::InvariantViolation("current move missing from its parent"))?;
        Ok((parent, index))
    }

    fn swap_branches(&mut self, parent: Option<MoveId>, a: usize, b: usize) -> Result<(), GameError> {
        let children = self.children_of_mut(parent)?;
        children.swap(a, b);
        let (first, second) = (children.as_slice()[a], children.as_slice()[b]);
        if let (Some(parent_node), Some(x), Some(y)) = (
            self.parsed_parent(parent),
            self.node_of(first),
            self.node_of(second),
        ) {
            let kids = self.parsed.node(parent_node).children();
            let i = kids.iter().position(|n| *n == x);
            let j = kids.iter().position(|n| *n == y);
            if let (Some(i), Some(j)) = (i, j) {
                self.parsed.swap_children(parent_node, i, j);
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// File node mirroring a position's children: the move's node, or the root
    fn parsed_parent(&self, parent: Option<MoveId>) -> Option<NodeId> {
        match parent {
            Some(id) => self.rendered(id).and_then(|mv| mv.parsed),
            None => self.parsed.root(),
        }
    }

    /// File node behind any move
    fn node_of(&self, id: MoveId) -> Option<NodeId> {
        match self.slot(id) {
            Slot::Rendered(mv) => mv.parsed,
            Slot::Unrendered(pending) => Some(pending.node),
        }
    }
}
