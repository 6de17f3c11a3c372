// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree walking over readied moves and file nodes alike

use super::moves::Slot;
use super::{Game, MoveId};
use crate::layout::{LayoutOptions, TreeLayout, TreeNodes};
use crate::sgf::{NodeId, ParsedGame, Properties};
use crate::Color;

/// A position in the game tree as seen by tree walks
///
/// Moves beyond an unreadied move have no arena entry yet and are
/// addressed by their file node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeRef {
    /// The initial position
    Start,
    Move(MoveId),
    Node(NodeId),
}

fn node_color(props: &Properties) -> Option<Color> {
    if props.contains("B") {
        Some(Color::Black)
    } else if props.contains("W") {
        Some(Color::White)
    } else {
        None
    }
}

impl Game {
    fn tree_children(&self, node: TreeRef) -> Vec<TreeRef> {
        match node {
            TreeRef::Start => self.roots.as_slice().iter().map(|&id| TreeRef::Move(id)).collect(),
            TreeRef::Move(id) => match self.slot(id) {
                Slot::Rendered(mv) => mv.children.as_slice().iter().map(|&c| TreeRef::Move(c)).collect(),
                Slot::Unrendered(pending) => self.parsed_children(pending.node),
            },
            TreeRef::Node(node) => self.parsed_children(node),
        }
    }

    fn parsed_children(&self, node: NodeId) -> Vec<TreeRef> {
        self.parsed
            .node(node)
            .children()
            .iter()
            .map(|&c| TreeRef::Node(c))
            .collect()
    }

    /// The tree position that owns a file node
    fn owner_of_node(&self, node: NodeId) -> TreeRef {
        if self.parsed.root() == Some(node) {
            return TreeRef::Start;
        }
        let pending = self.slots.iter().position(|slot| match slot {
            Slot::Unrendered(p) => p.node == node,
            Slot::Rendered(_) => false,
        });
        match pending {
            Some(index) => TreeRef::Move(MoveId(index)),
            None => TreeRef::Node(node),
        }
    }

    /// Lay out the whole tree, unvisited parts included
    pub fn tree_layout(&self, options: LayoutOptions) -> TreeLayout<TreeRef> {
        TreeLayout::build(self, TreeRef::Start, options)
    }
}

impl TreeNodes for Game {
    type Node = TreeRef;

    fn next(&self, node: TreeRef) -> Option<TreeRef> {
        self.tree_children(node).first().copied()
    }

    fn branches(&self, node: TreeRef) -> Option<Vec<TreeRef>> {
        let children = self.tree_children(node);
        (children.len() > 1).then_some(children)
    }

    fn previous(&self, node: TreeRef) -> Option<TreeRef> {
        match node {
            TreeRef::Start => None,
            TreeRef::Move(id) => Some(self.slot(id).previous().map_or(TreeRef::Start, TreeRef::Move)),
            TreeRef::Node(node) => self.parsed.node(node).previous().map(|p| self.owner_of_node(p)),
        }
    }

    fn color(&self, node: TreeRef) -> Option<Color> {
        match node {
            TreeRef::Start => None,
            TreeRef::Move(id) => self.point_and_color(id).map(|(_, color)| color),
            TreeRef::Node(node) => node_color(&self.parsed.node(node).properties),
        }
    }
}

impl TreeNodes for ParsedGame {
    type Node = NodeId;

    fn next(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).next()
    }

    fn branches(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.node(node).branches().map(<[NodeId]>::to_vec)
    }

    fn previous(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).previous()
    }

    fn color(&self, node: NodeId) -> Option<Color> {
        node_color(&self.node(node).properties)
    }
}
