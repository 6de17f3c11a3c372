// SPDX-License-Identifier: MIT OR Apache-2.0

//! Addressing tree positions by move number and branch choice
//!
//! A path lists every branch point between the start and a move that
//! leaves the main line, as (move number, branch index). Number 0 is the
//! initial position. The last step names the target and has no branch.
//! Paths hold no handles, so they survive a reset of the game.

use super::moves::Slot;
use super::{Game, MoveId};
use crate::sgf::NodeId;
use crate::GameError;
use serde::{Deserialize, Serialize};

/// One entry of a move path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub number: u32,
    /// Branch to take after move `number`; `None` on the final step
    pub branch: Option<usize>,
}

impl PathStep {
    pub fn branch(number: u32, branch: usize) -> Self {
        Self {
            number,
            branch: Some(branch),
        }
    }

    pub fn target(number: u32) -> Self {
        Self {
            number,
            branch: None,
        }
    }
}

/// The path to the initial position
pub fn empty_path() -> Vec<PathStep> {
    vec![PathStep::target(0)]
}

impl Game {
    /// Path from the start to `id`
    pub fn path_to_move(&self, id: MoveId) -> Vec<PathStep> {
        let mut path = vec![PathStep::target(self.slot(id).number())];
        let mut node = id;
        let mut parent = self.slot(id).previous();
        while let Some(p) = parent {
            if let Some(mv) = self.rendered(p) {
                match mv.children.position(node) {
                    Some(index) if index > 0 => path.push(PathStep::branch(mv.number, index)),
                    _ => {}
                }
            }
            node = p;
            parent = self.slot(p).previous();
        }
        if let Some(index) = self.roots.position(node).filter(|i| *i > 0) {
            path.push(PathStep::branch(0, index));
        }
        path.reverse();
        path
    }

    /// Path from the start to a node of the loaded file
    ///
    /// Covers nodes beyond the readied part of the tree. The part above
    /// the nearest move in the arena follows the live branch order, so
    /// reordered and editor-made branches are accounted for. The root
    /// node, and nodes cut out of the tree, map to the empty path.
    pub fn path_to_parsed_node(&self, node: NodeId) -> Vec<PathStep> {
        // Branch index taken into each file-only node, from the target upward
        let mut below = Vec::new();
        let mut current = node;
        let anchor = loop {
            if let Some(id) = self.move_of_node(current) {
                break id;
            }
            let Some(parent) = self.parsed.node(current).previous() else {
                return empty_path();
            };
            let index = self
                .parsed
                .node(parent)
                .children()
                .iter()
                .position(|n| *n == current)
                .unwrap_or(0);
            below.push(index);
            current = parent;
        };
        if !self.is_attached(anchor) {
            return empty_path();
        }

        let mut path = self.path_to_move(anchor);
        path.pop();
        let mut number = self.slot(anchor).number();
        for index in below.into_iter().rev() {
            if index > 0 {
                path.push(PathStep::branch(number, index));
            }
            number += 1;
        }
        path.push(PathStep::target(number));
        path
    }

    /// The arena entry for a file node, readied or not
    fn move_of_node(&self, node: NodeId) -> Option<MoveId> {
        self.slots
            .iter()
            .position(|slot| match slot {
                Slot::Unrendered(pending) => pending.node == node,
                Slot::Rendered(mv) => mv.parsed == Some(node),
            })
            .map(MoveId)
    }

    /// Replay from the initial position along `path`
    ///
    /// Branches not named in the path follow the main line. Returns the
    /// move reached. If a move along the way cannot be replayed, or the
    /// path outruns the tree, the walk stops at the last good move and the
    /// error is returned.
    pub fn advance_to_move_path(&mut self, path: &[PathStep]) -> Result<Option<MoveId>, GameError> {
        if self.current.is_some() {
            return Self::invariant("advance_to_move_path must start at the initial position");
        }
        let mut steps = path;
        match steps.first() {
            Some(step) if step.number == 0 => {
                match step.branch {
                    None => return Ok(None),
                    Some(index) => self.set_current_branch(index)?,
                }
                steps = &steps[1..];
            }
            _ => {
                if !self.roots.is_empty() {
                    self.roots.select(0);
                }
            }
        }
        if self.roots.is_empty() {
            return Ok(None);
        }
        let mut current = self.replay_move()?;
        for step in steps {
            while self.slot(current).number() < step.number {
                if self.children_of(Some(current))?.is_empty() {
                    return Err(GameError::NoSuchMove(step.number));
                }
                self.set_current_branch(0)?;
                current = self.replay_move()?;
            }
            let Some(index) = step.branch else {
                break;
            };
            self.set_current_branch(index)?;
            current = self.replay_move()?;
        }
        Ok(Some(current))
    }

    /// True if `id` was readied and sits in the live tree
    pub(crate) fn is_attached(&self, id: MoveId) -> bool {
        let mut node = id;
        loop {
            match self.slot(node).previous() {
                Some(p) => node = p,
                None => return self.roots.position(node).is_some(),
            }
        }
    }

    /// Replay from the start to a move anywhere in the live tree
    pub fn goto_move(&mut self, id: MoveId) -> Result<(), GameError> {
        if !self.is_attached(id) {
            return Self::invariant("goto_move target is not in the tree");
        }
        let path = self.path_to_move(id);
        self.goto_start();
        if self.advance_to_move_path(&path)? != Some(id) {
            return Self::invariant("goto_move did not reach its target");
        }
        Ok(())
    }
}
