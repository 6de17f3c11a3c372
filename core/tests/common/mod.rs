// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared checks for sgfed-core integration tests

use sgfed_core::{Game, MoveId};

/// Check parent links, numbering and branch heads of every readied move
pub fn assert_tree_consistent(game: &Game) {
    let mut stack: Vec<(MoveId, Option<MoveId>, u32)> = game
        .first_moves()
        .iter()
        .map(|&id| (id, None, 1))
        .collect();
    while let Some((id, parent, number)) = stack.pop() {
        let info = game.move_info(id).unwrap();
        assert_eq!(info.previous, parent, "parent link of {:?}", id);
        assert_eq!(info.number, number, "number of {:?}", id);
        if let Some(branches) = info.branches() {
            assert!(branches.len() > 1);
            assert_eq!(info.next(), Some(branches[0]));
        }
        for &child in &info.children {
            stack.push((child, Some(id), number + 1));
        }
    }
}
