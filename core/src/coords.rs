// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between SGF coordinate text and board points
//!
//! SGF writes a point as two letters, column first, counting from the
//! top-left corner: `a` is 1 and `s` is 19. An empty value is a pass, and
//! so is the older `tt` convention when reading.

use crate::Point;

/// Parse a coordinate value
///
/// Returns `Some(None)` for a pass, `Some(Some(point))` for a point, and
/// `None` when the text is not a coordinate.
pub fn parse_point(text: &str) -> Option<Option<Point>> {
    let lower = text.to_ascii_lowercase();
    if lower.is_empty() || lower == "tt" {
        return Some(None);
    }
    let bytes = lower.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let col = letter_index(bytes[0])?;
    let row = letter_index(bytes[1])?;
    Some(Some(Point::new(row, col)))
}

fn letter_index(b: u8) -> Option<u8> {
    (b'a'..=b's').contains(&b).then(|| b - b'a' + 1)
}

fn index_letter(i: u8) -> char {
    (b'a' + i - 1) as char
}

/// Encode a point, or a pass as the empty string
pub fn point_to_sgf(point: Option<Point>) -> String {
    match point {
        Some(p) => format!("{}{}", index_letter(p.col), index_letter(p.row)),
        None => String::new(),
    }
}

/// The point as seen from the opposite side of the board
pub fn flip_point(point: Point, size: u8) -> Point {
    Point::new(size + 1 - point.row, size + 1 - point.col)
}

/// Flip coordinate text, leaving anything unreadable as it was
pub fn flip_coordinate_text(text: &str, size: u8) -> String {
    match parse_point(text) {
        Some(Some(p)) => point_to_sgf(Some(flip_point(p, size))),
        Some(None) => String::new(),
        None => text.to_string(),
    }
}

/// Flip the point half of an `LB` value such as `"dd:A"`
pub fn flip_label_text(text: &str, size: u8) -> String {
    match text.split_once(':') {
        Some((coord, label)) => format!("{}:{}", flip_coordinate_text(coord, size), label),
        None => flip_coordinate_text(text, size),
    }
}

/// Split an `LB` value into its point and letter
pub fn parse_label(text: &str) -> Option<(Point, char)> {
    let (coord, label) = text.split_once(':')?;
    let point = parse_point(coord)??;
    let letter = label.chars().next()?;
    Some((point, letter))
}

/// Human-readable label such as "Q16"
///
/// Columns skip the letter I; rows count up from the bottom edge.
pub fn display_label(point: Point, size: u8) -> String {
    let col = if point.col < 9 {
        (b'A' + point.col - 1) as char
    } else {
        (b'A' + point.col) as char
    };
    format!("{}{}", col, size + 1 - point.row)
}
