// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move arena entries and the decoding of file nodes into moves

use super::adornments::{Adornment, AdornmentKind};
use crate::coords::{parse_label, parse_point};
use crate::sgf::{NodeId, Properties};
use crate::{Color, Point};
use serde::{Deserialize, Serialize};

/// Handle of a move in its game's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub(crate) usize);

/// Ordered children plus the one replay follows
#[derive(Debug, Clone, Default)]
pub(crate) struct Branches {
    ids: Vec<MoveId>,
    selected: usize,
}

impl Branches {
    pub fn as_slice(&self) -> &[MoveId] {
        &self.ids
    }

    pub fn first(&self) -> Option<MoveId> {
        self.ids.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// The child replay walks into
    pub fn selected(&self) -> Option<MoveId> {
        self.ids.get(self.selected).copied()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn position(&self, id: MoveId) -> Option<usize> {
        self.ids.iter().position(|m| *m == id)
    }

    /// Append a child and make it the selected one
    pub fn push_selected(&mut self, id: MoveId) {
        self.ids.push(id);
        self.selected = self.ids.len() - 1;
    }

    /// Append a child without changing the selection
    pub fn push(&mut self, id: MoveId) {
        self.ids.push(id);
    }

    /// Remove a child; the selection falls back to the main line
    pub fn remove(&mut self, id: MoveId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.ids.remove(pos);
        self.selected = 0;
        true
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.ids.len() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Swap two children; the selection stays on the same move
    pub fn swap(&mut self, a: usize, b: usize) {
        self.ids.swap(a, b);
        if self.selected == a {
            self.selected = b;
        } else if self.selected == b {
            self.selected = a;
        }
    }
}

/// A move that has been readied
#[derive(Debug, Clone)]
pub(crate) struct Move {
    /// `None` for a pass
    pub point: Option<Point>,
    pub color: Color,
    pub number: u32,
    pub comments: String,
    pub adornments: Vec<Adornment>,
    /// Stones removed when this move was last applied
    pub captured: Vec<Point>,
    /// The moves that had played the captured stones, in the same order
    pub captured_moves: Vec<Option<MoveId>>,
    pub previous: Option<MoveId>,
    pub children: Branches,
    /// The file node this move came from
    pub parsed: Option<NodeId>,
}

/// A move still living in the parsed tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pending {
    pub node: NodeId,
    pub previous: Option<MoveId>,
    pub number: u32,
}

/// One position in the move tree
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Unrendered(Pending),
    Rendered(Move),
}

impl Slot {
    pub fn number(&self) -> u32 {
        match self {
            Slot::Unrendered(p) => p.number,
            Slot::Rendered(m) => m.number,
        }
    }

    pub fn set_number(&mut self, number: u32) {
        match self {
            Slot::Unrendered(p) => p.number = number,
            Slot::Rendered(m) => m.number = number,
        }
    }

    pub fn previous(&self) -> Option<MoveId> {
        match self {
            Slot::Unrendered(p) => p.previous,
            Slot::Rendered(m) => m.previous,
        }
    }
}

/// The move-related content of a file node
#[derive(Debug, Clone)]
pub(crate) struct Decoded {
    pub point: Option<Point>,
    pub color: Color,
    pub comments: String,
    pub adornments: Vec<Adornment>,
}

/// Read a node as a move
///
/// Fails with the message shown to the user when the node is not a move.
pub(crate) fn decode_node(props: &Properties) -> Result<Decoded, String> {
    let (color, value) = match (props.first("B"), props.first("W")) {
        (Some(v), _) => (Color::Black, v),
        (None, Some(v)) => (Color::White, v),
        (None, None) => {
            return Err(format!(
                "Next nodes must be moves; Node contains: {}",
                props.describe()
            ))
        }
    };
    let point = parse_point(value)
        .ok_or_else(|| format!("Node has bad move coordinate \"{}\".", value))?;
    Ok(Decoded {
        point,
        color,
        comments: props.first("C").unwrap_or_default().to_string(),
        adornments: decode_adornments(props),
    })
}

/// TR, SQ and LB values as adornments; unreadable values are dropped
pub(crate) fn decode_adornments(props: &Properties) -> Vec<Adornment> {
    let mut adornments = Vec::new();
    for (id, kind) in [("TR", AdornmentKind::Triangle), ("SQ", AdornmentKind::Square)] {
        for value in props.get(id).unwrap_or_default() {
            match parse_point(value) {
                Some(Some(point)) => adornments.push(Adornment::new(kind, point)),
                _ => tracing::warn!("Ignoring bad {} value \"{}\"", id, value),
            }
        }
    }
    for value in props.get("LB").unwrap_or_default() {
        match parse_label(value) {
            Some((point, letter)) => adornments.push(Adornment::letter(point, letter)),
            None => tracing::warn!("Ignoring bad LB value \"{}\"", value),
        }
    }
    adornments
}

/// Read-only view of a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInfo {
    pub id: MoveId,
    /// `None` for a pass
    pub point: Option<Point>,
    pub color: Color,
    pub number: u32,
    pub comments: String,
    pub adornments: Vec<Adornment>,
    pub captured: Vec<Point>,
    pub previous: Option<MoveId>,
    /// Children, main line first; empty until the move is readied
    pub children: Vec<MoveId>,
    pub selected_branch: usize,
    pub rendered: bool,
}

impl MoveInfo {
    pub fn is_pass(&self) -> bool {
        self.point.is_none()
    }

    /// Children when the move branches
    pub fn branches(&self) -> Option<&[MoveId]> {
        (self.children.len() > 1).then_some(self.children.as_slice())
    }

    /// The main-line child
    pub fn next(&self) -> Option<MoveId> {
        self.children.first().copied()
    }
}
