// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning the live game back into an SGF property tree

use super::adornments::{Adornment, AdornmentKind};
use super::moves::{Move, Slot};
use super::{Game, MoveId};
use crate::coords::{flip_coordinate_text, flip_label_text, point_to_sgf};
use crate::sgf::{NodeId, ParsedGame, Properties};
use crate::Point;

/// Properties a readied move rebuilds from its own fields
const MOVE_PROPERTIES: [&str; 6] = ["B", "W", "C", "TR", "SQ", "LB"];

/// Properties holding plain coordinates
const COORDINATE_PROPERTIES: [&str; 6] = ["B", "W", "AB", "AW", "TR", "SQ"];

/// Copy `props` with every coordinate seen from the other side of the board
pub fn flip_properties(props: &Properties, size: u8) -> Properties {
    let mut flipped = Properties::new();
    for (id, values) in props.iter() {
        let values = if COORDINATE_PROPERTIES.contains(&id) {
            values.iter().map(|v| flip_coordinate_text(v, size)).collect()
        } else if id == "LB" {
            values.iter().map(|v| flip_label_text(v, size)).collect()
        } else {
            values.to_vec()
        };
        flipped.insert(id, values);
    }
    flipped
}

fn point_values(points: &[Point]) -> Vec<String> {
    points.iter().map(|p| point_to_sgf(Some(*p))).collect()
}

/// Write TR, SQ and LB for `adornments`, replacing any already present
fn write_adornments(props: &mut Properties, adornments: &[Adornment]) {
    let mut triangles = Vec::new();
    let mut squares = Vec::new();
    let mut labels = Vec::new();
    for a in adornments {
        let coord = point_to_sgf(Some(a.point));
        match (a.kind, a.letter) {
            (AdornmentKind::Triangle, _) => triangles.push(coord),
            (AdornmentKind::Square, _) => squares.push(coord),
            (AdornmentKind::Letter, Some(letter)) => labels.push(format!("{}:{}", coord, letter)),
            _ => {}
        }
    }
    for (id, values) in [("TR", triangles), ("SQ", squares), ("LB", labels)] {
        props.remove(id);
        if !values.is_empty() {
            props.insert(id, values);
        }
    }
}

impl Game {
    /// Build a fresh property tree for the whole game
    ///
    /// Readied moves are written from their current state; parts of the
    /// tree never visited are copied from the loaded file. With `flipped`
    /// every coordinate is mirrored through the board's center.
    pub fn to_parsed_game(&self, flipped: bool) -> ParsedGame {
        let size = self.size;
        let map = |props: &Properties| {
            if flipped {
                flip_properties(props, size)
            } else {
                props.clone()
            }
        };
        let mut out = ParsedGame::new();
        let root = out.add_node(map(&self.root_node_properties()));
        out.set_root(root);
        self.generate_children(&mut out, root, self.roots.as_slice(), &map);
        out
    }

    /// Serialize the game as SGF text
    pub fn write_sgf(&self, flipped: bool) -> String {
        self.to_parsed_game(flipped).to_string()
    }

    fn root_node_properties(&self) -> Properties {
        let mut props = self.root_properties.clone();
        props.set("AP", format!("sgfed:{}", env!("CARGO_PKG_VERSION")));
        props.set("SZ", self.size.to_string());
        if !self.comments.is_empty() {
            props.set("GC", self.comments.clone());
        }
        props.set("KM", self.komi.clone());
        if self.handicap > 0 {
            props.set("HA", self.handicap.to_string());
        }
        if !self.setup_black.is_empty() {
            props.insert("AB", point_values(&self.setup_black));
        }
        if !self.setup_white.is_empty() {
            props.insert("AW", point_values(&self.setup_white));
        }
        props.set("PB", non_empty_or(&self.player_black, "Black"));
        props.set("PW", non_empty_or(&self.player_white, "White"));
        write_adornments(&mut props, &self.setup_adornments);
        props
    }

    fn generate_children<F>(&self, out: &mut ParsedGame, parent: NodeId, children: &[MoveId], map: &F)
    where
        F: Fn(&Properties) -> Properties,
    {
        let branched = children.len() > 1;
        for &child in children {
            let node = self.generate_move(out, child, map);
            if branched {
                out.push_branch(parent, node);
            } else {
                out.set_next(parent, node);
            }
        }
    }

    fn generate_move<F>(&self, out: &mut ParsedGame, id: MoveId, map: &F) -> NodeId
    where
        F: Fn(&Properties) -> Properties,
    {
        match self.slot(id) {
            Slot::Unrendered(pending) => out.copy_subtree(&self.parsed, pending.node, map),
            Slot::Rendered(mv) => {
                let node = out.add_node(map(&self.move_properties(mv)));
                self.generate_children(out, node, mv.children.as_slice(), map);
                node
            }
        }
    }

    fn move_properties(&self, mv: &Move) -> Properties {
        let mut props = Properties::new();
        props.set(mv.color.move_property(), point_to_sgf(mv.point));
        if let Some(source) = mv.parsed {
            for (id, values) in self.parsed.node(source).properties.iter() {
                if !MOVE_PROPERTIES.contains(&id) {
                    props.insert(id, values.to_vec());
                }
            }
        }
        if !mv.comments.is_empty() {
            props.set("C", mv.comments.clone());
        }
        write_adornments(&mut props, &mv.adornments);
        props
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
