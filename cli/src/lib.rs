// SPDX-License-Identifier: MIT OR Apache-2.0

//! sgfed command-line support: configuration and text rendering

pub mod config;
pub mod render;

use std::path::{Path, PathBuf};

/// Where `flip` writes when no output is given: `game.sgf` becomes `game<suffix>.sgf`
pub fn flipped_path(file: &Path, suffix: &str) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    file.with_file_name(format!("{}{}.sgf", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped_path() {
        assert_eq!(
            flipped_path(Path::new("records/honinbo.sgf"), "-flipped"),
            PathBuf::from("records/honinbo-flipped.sgf")
        );
        assert_eq!(
            flipped_path(Path::new("game"), "-b"),
            PathBuf::from("game-b.sgf")
        );
    }
}
