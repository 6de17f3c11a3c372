// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placement of a game tree onto a display grid
//!
//! Every node lands in the column equal to its depth, so columns track
//! move numbers. Rows are handed out per column from a high-water mark.
//! Branch tails are pulled back up toward their branch point one row at a
//! time to draw straight diagonals, and a [`LayoutKind::LineBend`] marks
//! where such a diagonal cannot reach the branch point's row.

use crate::Color;
use serde::{Deserialize, Serialize};

/// Read access to a branching tree of moves
///
/// Implemented by the parsed property tree and by the live move tree so
/// that layout code walks either one the same way.
pub trait TreeNodes {
    /// Handle of one node
    type Node: Copy;

    /// The main-line child
    fn next(&self, node: Self::Node) -> Option<Self::Node>;

    /// All children, main line first, when the node branches
    fn branches(&self, node: Self::Node) -> Option<Vec<Self::Node>>;

    /// The parent
    fn previous(&self, node: Self::Node) -> Option<Self::Node>;

    /// Color of the move at a node, if it is one
    fn color(&self, node: Self::Node) -> Option<Color>;

    /// The child layout follows first: the top branch when branching
    fn layout_next(&self, node: Self::Node) -> Option<Self::Node> {
        match self.branches(node) {
            Some(branches) => branches.first().copied(),
            None => self.next(node),
        }
    }
}

/// What a grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    /// A move
    Move,
    /// Where a branch line bends toward its diagonal
    LineBend,
    /// The empty board before the first move
    StartBoard,
}

fn default_initial_rows() -> usize {
    50
}

fn default_initial_cols() -> usize {
    200
}

/// Starting grid dimensions; the grid grows by half when exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    #[serde(default = "default_initial_rows")]
    pub initial_rows: usize,
    #[serde(default = "default_initial_cols")]
    pub initial_cols: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            initial_rows: default_initial_rows(),
            initial_cols: default_initial_cols(),
        }
    }
}

/// One placed node
#[derive(Debug, Clone)]
pub struct LayoutNode<N> {
    pub kind: LayoutKind,
    pub row: usize,
    pub column: usize,
    pub color: Option<Color>,
    /// The tree node shown here; bends have none
    pub node: Option<N>,
    /// Index of the next placed node along the line
    pub next: Option<usize>,
    /// Indexes of placed branch heads, main line first
    pub branches: Vec<usize>,
}

/// Serializable snapshot of one occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCell {
    pub row: usize,
    pub column: usize,
    pub kind: LayoutKind,
    pub color: Option<Color>,
}

/// A laid-out tree
#[derive(Debug, Clone)]
pub struct TreeLayout<N> {
    nodes: Vec<LayoutNode<N>>,
    /// `grid[row][column]` indexes into `nodes`
    grid: Vec<Vec<Option<usize>>>,
    /// Next free row per column
    max_rows: Vec<usize>,
    rows: usize,
    cols: usize,
    start: usize,
}

impl<N: Copy> TreeLayout<N> {
    /// Lay out the tree below `root`, which is drawn as the start board
    pub fn build<T>(tree: &T, root: N, options: LayoutOptions) -> Self
    where
        T: TreeNodes<Node = N>,
    {
        let rows = options.initial_rows.max(2);
        let cols = options.initial_cols.max(2);
        let mut layout = Self {
            nodes: Vec::new(),
            grid: vec![vec![None; cols]; rows],
            max_rows: vec![0; cols],
            rows,
            cols,
            start: 0,
        };
        let start = layout.push(LayoutNode {
            kind: LayoutKind::StartBoard,
            row: 0,
            column: 0,
            color: None,
            node: Some(root),
            next: None,
            branches: Vec::new(),
        });
        layout.max_rows[0] = 1;
        layout.start = start;
        if let Some(next) = tree.layout_next(root) {
            let next_model = layout.layout_tree(tree, next, 0, 1, 0, 0);
            layout.nodes[start].next = Some(next_model);
            layout.grid[0][0] = Some(start);
            layout.layout_branches(tree, root, 0, start, next_model);
        } else {
            layout.grid[0][0] = Some(start);
        }
        tracing::debug!("Laid out {} tree nodes", layout.nodes.len());
        layout
    }

    /// Index of the start board node
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn node(&self, index: usize) -> &LayoutNode<N> {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[LayoutNode<N>] {
        &self.nodes
    }

    /// The node at a grid cell
    pub fn at(&self, row: usize, column: usize) -> Option<&LayoutNode<N>> {
        self.cell(row, column).map(|idx| &self.nodes[idx])
    }

    /// Allocated grid dimensions as (rows, columns)
    pub fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Rows and columns actually occupied
    pub fn extent(&self) -> (usize, usize) {
        self.nodes.iter().fold((0, 0), |(rows, cols), n| {
            (rows.max(n.row + 1), cols.max(n.column + 1))
        })
    }

    /// Occupied cells in row-major order
    pub fn cells(&self) -> Vec<LayoutCell> {
        let mut cells: Vec<LayoutCell> = self
            .nodes
            .iter()
            .map(|n| LayoutCell {
                row: n.row,
                column: n.column,
                kind: n.kind,
                color: n.color,
            })
            .collect();
        cells.sort_by_key(|c| (c.row, c.column));
        cells
    }

    /// The placed node showing `node`
    pub fn find(&self, node: N) -> Option<&LayoutNode<N>>
    where
        N: PartialEq,
    {
        self.nodes.iter().find(|n| n.node == Some(node))
    }

    fn push(&mut self, node: LayoutNode<N>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn cell(&self, row: usize, column: usize) -> Option<usize> {
        self.grid.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    /// Place `node` and its descendants, returning the index the parent
    /// links to: a bend in front of the node, or the node itself
    fn layout_tree<T>(
        &mut self,
        tree: &T,
        node: N,
        cum_max_row: usize,
        depth: usize,
        branch_depth: usize,
        branch_root_row: usize,
    ) -> usize
    where
        T: TreeNodes<Node = N>,
    {
        let model = self.setup_model(tree, node, cum_max_row, depth);
        let Some(next) = tree.layout_next(node) else {
            self.store(depth, model);
            return self.maybe_add_bend(depth, branch_depth, branch_root_row, model);
        };
        let next_branch_depth = if branch_depth == 0 { 0 } else { branch_depth + 1 };
        let next_model = self.layout_tree(
            tree,
            next,
            self.nodes[model].row,
            depth + 1,
            next_branch_depth,
            branch_root_row,
        );
        self.nodes[model].next = Some(next_model);
        let next_row = self.nodes[next_model].row;
        self.adjust_row(model, next_row, depth, branch_depth, branch_root_row);
        self.store(depth, model);
        let bend = self.maybe_add_bend(depth, branch_depth, branch_root_row, model);
        self.layout_branches(tree, node, depth, model, next_model);
        bend
    }

    fn layout_branches<T>(&mut self, tree: &T, node: N, depth: usize, model: usize, next_model: usize)
    where
        T: TreeNodes<Node = N>,
    {
        let Some(branches) = tree.branches(node) else {
            return;
        };
        self.nodes[model].branches = vec![next_model];
        let row = self.nodes[model].row;
        for &branch in branches.iter().skip(1) {
            let branch_model = self.layout_tree(tree, branch, row, depth + 1, 1, row);
            self.nodes[model].branches.push(branch_model);
        }
    }

    fn setup_model<T>(&mut self, tree: &T, node: N, cum_max_row: usize, depth: usize) -> usize
    where
        T: TreeNodes<Node = N>,
    {
        self.ensure(0, depth);
        let row = cum_max_row.max(self.max_rows[depth]);
        self.max_rows[depth] = row + 1;
        self.push(LayoutNode {
            kind: LayoutKind::Move,
            row,
            column: depth,
            color: tree.color(node),
            node: Some(node),
            next: None,
            branches: Vec::new(),
        })
    }

    /// Follow a lower tail down, then start the diagonal back up
    fn adjust_row(
        &mut self,
        model: usize,
        next_row: usize,
        depth: usize,
        branch_depth: usize,
        branch_root_row: usize,
    ) {
        if next_row > self.nodes[model].row {
            self.nodes[model].row = next_row;
            self.max_rows[depth] = next_row + 1;
        }
        let row = self.nodes[model].row;
        if row > branch_root_row
            && branch_depth < row - branch_root_row
            && self.cell(row - 1, depth).is_none()
        {
            self.max_rows[depth] = row;
            self.nodes[model].row = row - 1;
        }
    }

    fn maybe_add_bend(
        &mut self,
        depth: usize,
        branch_depth: usize,
        branch_root_row: usize,
        model: usize,
    ) -> usize {
        let row = self.nodes[model].row;
        if branch_depth == 1
            && depth > 0
            && row > branch_root_row + 1
            && self.cell(row - 1, depth - 1).is_none()
        {
            let bend = self.push(LayoutNode {
                kind: LayoutKind::LineBend,
                row: row - 1,
                column: depth - 1,
                color: None,
                node: None,
                next: Some(model),
                branches: Vec::new(),
            });
            self.max_rows[depth - 1] = row;
            self.grid[row - 1][depth - 1] = Some(bend);
            return bend;
        }
        model
    }

    fn store(&mut self, depth: usize, model: usize) {
        let row = self.nodes[model].row;
        self.ensure(row, depth);
        debug_assert!(
            self.grid[row][depth].is_none(),
            "layout cell ({}, {}) already used",
            row,
            depth
        );
        self.grid[row][depth] = Some(model);
    }

    /// Grow the grid by half in both dimensions until `(row, column)` fits
    fn ensure(&mut self, row: usize, column: usize) {
        if row < self.rows && column < self.cols {
            return;
        }
        while row >= self.rows || column >= self.cols {
            self.rows += self.rows / 2;
            self.cols += self.cols / 2;
        }
        for r in self.grid.iter_mut() {
            r.resize(self.cols, None);
        }
        self.grid.resize(self.rows, vec![None; self.cols]);
        self.max_rows.resize(self.cols, 0);
    }
}
