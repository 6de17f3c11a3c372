// SPDX-License-Identifier: MIT OR Apache-2.0

use sgfed_core::layout::TreeNodes;
use sgfed_core::{
    parse_file, Color, Game, LayoutKind, LayoutOptions, NodeId, ParsedGame, Point, TreeLayout,
    TreeRef, BOARD_SIZE,
};

fn layout_of(text: &str) -> (ParsedGame, TreeLayout<NodeId>) {
    let parsed = parse_file(text).unwrap();
    let root = parsed.root().unwrap();
    let layout = TreeLayout::build(&parsed, root, LayoutOptions::default());
    (parsed, layout)
}

/// Grid cell of the node reached by following `next()` `steps` times from `from`
fn cell_after(parsed: &ParsedGame, layout: &TreeLayout<NodeId>, from: NodeId, steps: usize) -> (usize, usize) {
    let mut node = from;
    for _ in 0..steps {
        node = parsed.next(node).unwrap();
    }
    let placed = layout.find(node).unwrap();
    (placed.row, placed.column)
}

#[test]
fn straight_line() {
    let (parsed, layout) = layout_of("(;SZ[19];B[aa];W[bb];B[cc])");
    let root = parsed.root().unwrap();
    assert_eq!(layout.node(layout.start()).kind, LayoutKind::StartBoard);
    for depth in 0..=3 {
        assert_eq!(cell_after(&parsed, &layout, root, depth), (0, depth));
    }
    assert_eq!(layout.extent(), (1, 4));
    let colors: Vec<Option<Color>> = layout.cells().iter().map(|c| c.color).collect();
    assert_eq!(
        colors,
        vec![None, Some(Color::Black), Some(Color::White), Some(Color::Black)]
    );
}

#[test]
fn two_first_moves() {
    let (parsed, layout) = layout_of("(;SZ[19](;B[aa];W[bb])(;B[cc];W[dd]))");
    let root = parsed.root().unwrap();
    let branches = parsed.branches(root).unwrap();
    assert_eq!(cell_after(&parsed, &layout, branches[0], 0), (0, 1));
    assert_eq!(cell_after(&parsed, &layout, branches[0], 1), (0, 2));
    assert_eq!(cell_after(&parsed, &layout, branches[1], 0), (1, 1));
    assert_eq!(cell_after(&parsed, &layout, branches[1], 1), (1, 2));

    let start = layout.node(layout.start());
    assert_eq!(start.branches.len(), 2);
    assert!(layout.cells().iter().all(|c| c.kind != LayoutKind::LineBend));
}

#[test]
fn third_branch_bends() {
    let (parsed, layout) =
        layout_of("(;SZ[19];B[aa](;W[bb];B[cc])(;W[dd];B[ee])(;W[ff];B[gg]))");
    let root = parsed.root().unwrap();
    let first = parsed.next(root).unwrap();
    let branches = parsed.branches(first).unwrap();

    assert_eq!(cell_after(&parsed, &layout, first, 0), (0, 1));
    assert_eq!(cell_after(&parsed, &layout, branches[0], 1), (0, 3));
    assert_eq!(cell_after(&parsed, &layout, branches[1], 0), (1, 2));
    assert_eq!(cell_after(&parsed, &layout, branches[1], 1), (1, 3));
    assert_eq!(cell_after(&parsed, &layout, branches[2], 0), (2, 2));
    assert_eq!(cell_after(&parsed, &layout, branches[2], 1), (2, 3));

    let bend = layout.at(1, 1).unwrap();
    assert_eq!(bend.kind, LayoutKind::LineBend);
    assert!(bend.node.is_none());
    let bend_target = layout.node(bend.next.unwrap());
    assert_eq!(bend_target.node, Some(branches[2]));

    // The branch point links to the bend rather than the third branch
    let branch_point = layout.find(first).unwrap();
    assert_eq!(branch_point.branches.len(), 3);
    assert_eq!(layout.node(branch_point.branches[2]).kind, LayoutKind::LineBend);
}

#[test]
fn cells_are_unique() {
    let (_, layout) = layout_of(
        "(;SZ[19];B[aa](;W[bb](;B[cc])(;B[dd];W[ee])(;B[ff]))(;W[gg];B[hh](;W[ii])(;W[jj]))(;W[kk]))",
    );
    let cells = layout.cells();
    for pair in cells.windows(2) {
        assert!((pair[0].row, pair[0].column) < (pair[1].row, pair[1].column));
    }
    for cell in &cells {
        let placed = layout.at(cell.row, cell.column).unwrap();
        assert_eq!((placed.row, placed.column), (cell.row, cell.column));
        if placed.kind == LayoutKind::Move {
            assert!(cell.column > 0);
        }
    }
}

#[test]
fn small_grid_grows() {
    let options = LayoutOptions {
        initial_rows: 2,
        initial_cols: 2,
    };
    let parsed = parse_file("(;SZ[19](;B[aa];W[bb];B[cc])(;B[dd])(;B[ee])(;B[ff]))").unwrap();
    let layout = TreeLayout::build(&parsed, parsed.root().unwrap(), options);
    let (rows, cols) = layout.grid_size();
    assert!(rows >= 4 && cols >= 4);
    assert_eq!(layout.extent(), (4, 4));
}

#[test]
fn game_layout_covers_unvisited_moves() {
    let mut game = Game::from_sgf("(;SZ[19];B[dd](;W[pp];B[dp])(;W[pd]))").unwrap();
    game.replay_move().unwrap();
    let played = game.make_move(Point::new(10, 10)).unwrap();

    let layout = game.tree_layout(LayoutOptions::default());
    let first = game.first_moves()[0];
    let placed = layout.find(TreeRef::Move(first)).unwrap();
    assert_eq!((placed.row, placed.column), (0, 1));
    assert_eq!(placed.branches.len(), 3);

    let new_move = layout.find(TreeRef::Move(played)).unwrap();
    assert_eq!(new_move.column, 2);
    assert_eq!(new_move.color, Some(Color::White));

    // The move after W[pp] was never readied and shows up by file node
    let unvisited = layout
        .nodes()
        .iter()
        .filter(|n| matches!(n.node, Some(TreeRef::Node(_))))
        .count();
    assert_eq!(unvisited, 1);
    assert_eq!(layout.extent().1, 4);
}

#[test]
fn game_tree_links() {
    let mut game = Game::new(BOARD_SIZE, 0, "6.5").unwrap();
    let first = game.make_move(Point::new(4, 4)).unwrap();
    let second = game.make_move(Point::new(16, 16)).unwrap();
    assert_eq!(game.next(TreeRef::Start), Some(TreeRef::Move(first)));
    assert_eq!(game.previous(TreeRef::Move(first)), Some(TreeRef::Start));
    assert_eq!(game.previous(TreeRef::Move(second)), Some(TreeRef::Move(first)));
    assert_eq!(game.branches(TreeRef::Move(first)), None);
    assert_eq!(game.color(TreeRef::Move(second)), Some(Color::White));
    assert_eq!(game.color(TreeRef::Start), None);
}
