// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board markup attached to moves and to the setup position

use super::Game;
use crate::{GameError, Point};
use serde::{Deserialize, Serialize};

/// Kinds of board markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdornmentKind {
    Square,
    Triangle,
    Letter,
    /// Marks the displayed move; never stored on a move
    CurrentMove,
}

/// A mark drawn on one intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adornment {
    pub kind: AdornmentKind,
    pub point: Point,
    /// Letter shown by [`AdornmentKind::Letter`]
    pub letter: Option<char>,
}

impl Adornment {
    pub fn new(kind: AdornmentKind, point: Point) -> Self {
        Self {
            kind,
            point,
            letter: None,
        }
    }

    pub fn letter(point: Point, letter: char) -> Self {
        Self {
            kind: AdornmentKind::Letter,
            point,
            letter: Some(letter),
        }
    }
}

/// First letter A-Z not yet used among `adornments`
fn next_free_letter(adornments: &[Adornment]) -> Option<char> {
    ('A'..='Z').find(|c| !adornments.iter().any(|a| a.letter == Some(*c)))
}

impl Game {
    /// Markup at the current position, the setup position before any move
    pub fn adornments(&self) -> &[Adornment] {
        match self.current.and_then(|id| self.rendered(id)) {
            Some(mv) => &mv.adornments,
            None => &self.setup_adornments,
        }
    }

    /// Adornments at a point at the current position, current-move marker included
    pub fn adornments_at(&self, point: Point) -> Vec<Adornment> {
        let mut found: Vec<Adornment> = self
            .adornments()
            .iter()
            .filter(|a| a.point == point)
            .copied()
            .collect();
        if let Some(marker) = self.current_marker.filter(|m| m.point == point) {
            found.push(marker);
        }
        found
    }

    pub fn adornment_at(&self, point: Point, kind: AdornmentKind) -> Option<Adornment> {
        self.adornments_at(point).into_iter().find(|a| a.kind == kind)
    }

    /// Add markup at the current position
    ///
    /// Letters are assigned in order, skipping ones already in use. Adding
    /// a kind that is already at the point returns the existing mark.
    pub fn add_adornment(
        &mut self,
        point: Point,
        kind: AdornmentKind,
    ) -> Result<Adornment, GameError> {
        if kind == AdornmentKind::CurrentMove {
            return Self::invariant("the current-move marker is managed by the game");
        }
        if !point.is_valid(self.size) {
            return Self::invariant("adornment point is off the board");
        }
        let list = self.adornments_mut()?;
        if let Some(existing) = list.iter().find(|a| a.point == point && a.kind == kind) {
            return Ok(*existing);
        }
        let adornment = match kind {
            AdornmentKind::Letter => {
                let letter = next_free_letter(list).ok_or(GameError::AllLettersUsed)?;
                Adornment::letter(point, letter)
            }
            _ => Adornment::new(kind, point),
        };
        list.push(adornment);
        self.dirty = true;
        Ok(adornment)
    }

    /// Remove markup of `kind` at a point, returning it
    pub fn remove_adornment(&mut self, point: Point, kind: AdornmentKind) -> Option<Adornment> {
        let list = self.adornments_mut().ok()?;
        let pos = list.iter().position(|a| a.point == point && a.kind == kind)?;
        let removed = list.remove(pos);
        self.dirty = true;
        Some(removed)
    }

    /// The marker on the displayed move, if it is not a pass
    pub fn current_marker(&self) -> Option<Adornment> {
        self.current_marker
    }

    fn adornments_mut(&mut self) -> Result<&mut Vec<Adornment>, GameError> {
        match self.current {
            Some(id) => Ok(&mut self.rendered_mut(id)?.adornments),
            None => Ok(&mut self.setup_adornments),
        }
    }

    /// Recompute the marker after the current position changed
    pub(crate) fn update_current_marker(&mut self) {
        self.current_marker = self
            .current
            .and_then(|id| self.rendered(id))
            .and_then(|mv| mv.point)
            .map(|point| Adornment::new(AdornmentKind::CurrentMove, point));
    }
}
