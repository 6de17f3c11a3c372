// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering of boards, tree layouts and record summaries for the CLI.

use serde::Serialize;
use sgfed_core::layout::TreeNodes;
use sgfed_core::{Color, Game, LayoutKind, Point, TreeLayout, TreeRef};
use std::fmt;

/// Render the current position as ASCII art
///
/// Rows are numbered from the bottom edge, as in [`sgfed_core::coords::display_label`].
pub fn render_board(game: &Game) -> String {
    let board = game.board();
    let size = board.size();
    let mut output = String::new();

    push_column_labels(&mut output, size);
    for row in 1..=size {
        let label = size + 1 - row;
        output.push_str(&format!("{:2} ", label));
        for col in 1..=size {
            let point = Point::new(row, col);
            let symbol = match board.color_at(point) {
                Some(Color::Black) => "●",
                Some(Color::White) => "○",
                None if is_star_point(point, size) => "*",
                None => "+",
            };
            output.push_str(&format!(" {}", symbol));
        }
        output.push_str(&format!(" {}", label));
        output.push('\n');
    }
    push_column_labels(&mut output, size);

    output.push_str(&format!(
        "Move {}, {} to play. Prisoners: black {}, white {}\n",
        game.move_count(),
        color_name(game.next_color()),
        game.prisoners(Color::Black),
        game.prisoners(Color::White)
    ));
    output
}

fn push_column_labels(output: &mut String, size: u8) {
    output.push_str("   ");
    for col in 1..=size {
        output.push_str(&format!(" {}", column_char(col)));
    }
    output.push('\n');
}

/// Column letter for a 1-based column (A-T, skipping I)
fn column_char(col: u8) -> char {
    if col < 9 {
        (b'A' + col - 1) as char
    } else {
        (b'A' + col) as char
    }
}

/// Check if a point is a star point on the board
fn is_star_point(point: Point, board_size: u8) -> bool {
    let lines: &[u8] = match board_size {
        // Four corner points and the center only
        9 => return matches!((point.row, point.col), (3 | 7, 3 | 7) | (5, 5)),
        13 => &[4, 7, 10],
        19 => &[4, 10, 16],
        _ => return false,
    };
    lines.contains(&point.row) && lines.contains(&point.col)
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::Black => "Black",
        Color::White => "White",
    }
}

/// Render a tree layout as a character grid
///
/// `S` is the start, `B`/`W` are moves and `\` marks a bend. The current
/// move, if given, is drawn in lower case.
pub fn render_tree(layout: &TreeLayout<TreeRef>, current: Option<TreeRef>) -> String {
    let (rows, cols) = layout.extent();
    let mut output = String::new();
    for row in 0..rows {
        let mut line = String::with_capacity(cols);
        for column in 0..cols {
            let c = match layout.at(row, column) {
                None => ' ',
                Some(node) => match node.kind {
                    LayoutKind::StartBoard => 'S',
                    LayoutKind::LineBend => '\\',
                    LayoutKind::Move => {
                        let c = match node.color {
                            Some(Color::Black) => 'B',
                            Some(Color::White) => 'W',
                            None => '?',
                        };
                        if current.is_some() && node.node == current {
                            c.to_ascii_lowercase()
                        } else {
                            c
                        }
                    }
                },
            };
            line.push(c);
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// Headline facts about a loaded record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub player_black: String,
    pub player_white: String,
    pub komi: String,
    pub handicap: u8,
    /// Moves along the first branch everywhere
    pub main_line: usize,
    /// Positions with more than one next move
    pub branch_points: usize,
}

impl Summary {
    pub fn of(game: &Game) -> Self {
        let mut main_line = 0;
        let mut node = game.next(TreeRef::Start);
        while let Some(n) = node {
            main_line += 1;
            node = game.next(n);
        }

        let mut branch_points = 0;
        let mut stack = vec![TreeRef::Start];
        while let Some(n) = stack.pop() {
            match game.branches(n) {
                Some(children) => {
                    branch_points += 1;
                    stack.extend(children);
                }
                None => stack.extend(game.next(n)),
            }
        }

        Self {
            player_black: game.player_black().to_string(),
            player_white: game.player_white().to_string(),
            komi: game.komi().to_string(),
            handicap: game.handicap(),
            main_line,
            branch_points,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |s: &str, default: &'static str| {
            if s.is_empty() {
                default.to_string()
            } else {
                s.to_string()
            }
        };
        writeln!(
            f,
            "{} (Black) vs {} (White)",
            name(&self.player_black, "?"),
            name(&self.player_white, "?")
        )?;
        writeln!(f, "Komi {}, handicap {}", self.komi, self.handicap)?;
        write!(
            f,
            "{} moves in the main line, {} branch points",
            self.main_line, self.branch_points
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgfed_core::{LayoutOptions, BOARD_SIZE};

    #[test]
    fn test_render_empty_board() {
        let game = Game::new(BOARD_SIZE, 0, "6.5").unwrap();
        let output = render_board(&game);

        assert!(output.contains("A B C D E F G H J K L M N O P Q R S T"));
        assert!(output.contains("19 "));
        assert!(output.contains(" 1 "));

        // 2 label rows + 19 board rows + status line
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 22);
        assert!(lines[22 - 1].starts_with("Move 0, Black to play"));
    }

    #[test]
    fn test_render_board_with_stones() {
        let mut game = Game::new(BOARD_SIZE, 0, "6.5").unwrap();
        game.make_move(Point::new(4, 16)).unwrap();
        game.make_move(Point::new(1, 1)).unwrap();

        let output = render_board(&game);
        let lines: Vec<&str> = output.lines().collect();
        // Row 4 from the top is labelled 16
        assert!(lines[4].starts_with("16 "));
        assert!(lines[4].contains("●"));
        assert!(lines[1].starts_with("19  ○"));
    }

    #[test]
    fn test_column_char() {
        assert_eq!(column_char(1), 'A');
        assert_eq!(column_char(8), 'H');
        assert_eq!(column_char(9), 'J'); // Skip 'I'
        assert_eq!(column_char(19), 'T');
    }

    #[test]
    fn test_star_points() {
        assert!(is_star_point(Point::new(10, 10), 19));
        assert!(is_star_point(Point::new(4, 16), 19));
        assert!(!is_star_point(Point::new(1, 1), 19));
        assert!(is_star_point(Point::new(5, 5), 9));
        assert!(is_star_point(Point::new(7, 3), 9));
        assert!(!is_star_point(Point::new(3, 5), 9));
        assert!(!is_star_point(Point::new(5, 7), 9));
        let nine = (1..=9)
            .flat_map(|row| (1..=9).map(move |col| Point::new(row, col)))
            .filter(|p| is_star_point(*p, 9))
            .count();
        assert_eq!(nine, 5);
    }

    #[test]
    fn test_render_tree() {
        let mut game = Game::from_sgf("(;SZ[19];B[dd](;W[pp];B[dp])(;W[pd]))").unwrap();
        game.replay_move().unwrap();
        let layout = game.tree_layout(LayoutOptions::default());
        let output = render_tree(&layout, game.current().map(TreeRef::Move));
        assert_eq!(output, "SbWB\n  W\n");
    }

    #[test]
    fn test_summary() {
        let game = Game::from_sgf("(;SZ[19]PB[Shusaku]KM[0];B[dd](;W[pp];B[dp])(;W[pd]))").unwrap();
        let summary = Summary::of(&game);
        assert_eq!(summary.main_line, 3);
        assert_eq!(summary.branch_points, 1);
        assert_eq!(summary.komi, "0");
        let text = summary.to_string();
        assert!(text.starts_with("Shusaku (Black) vs ? (White)"));
        assert!(text.ends_with("3 moves in the main line, 1 branch points"));
    }
}
