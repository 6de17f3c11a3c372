// SPDX-License-Identifier: MIT OR Apache-2.0

// End-to-end runs of the sgfed binary against records on disk
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const RECORD: &str = "(;GM[1]FF[4]SZ[19]PB[Shusaku]PW[Gennan]KM[0];B[dd](;W[pp];B[dp])(;W[pd]))";

fn setup() -> anyhow::Result<(TempDir, std::path::PathBuf)> {
    let dir = tempdir()?;
    let file = dir.path().join("game.sgf");
    fs::write(&file, RECORD)?;
    Ok((dir, file))
}

fn sgfed(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sgfed"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sgfed")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_check_json() -> anyhow::Result<()> {
    let (dir, file) = setup()?;
    let output = sgfed(dir.path(), &["check", "--json", file.to_str().unwrap()]);
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(summary["player_black"], "Shusaku");
    assert_eq!(summary["player_white"], "Gennan");
    assert_eq!(summary["main_line"], 3);
    assert_eq!(summary["branch_points"], 1);
    // The missing config was written with defaults
    assert!(dir.path().join("config.toml").exists());
    Ok(())
}

#[test]
fn test_fmt_output_reloads() -> anyhow::Result<()> {
    let (dir, file) = setup()?;
    let out = dir.path().join("out.sgf");
    let output = sgfed(
        dir.path(),
        &["fmt", file.to_str().unwrap(), "-o", out.to_str().unwrap()],
    );
    assert!(output.status.success());

    let written = fs::read_to_string(&out)?;
    let game = sgfed_core::Game::from_sgf(&written)?;
    assert_eq!(game.player_black(), "Shusaku");
    assert_eq!(game.write_sgf(false), written);
    Ok(())
}

#[test]
fn test_flip_default_name() -> anyhow::Result<()> {
    let (dir, file) = setup()?;
    let output = sgfed(dir.path(), &["flip", file.to_str().unwrap()]);
    assert!(output.status.success());

    let flipped = fs::read_to_string(dir.path().join("game-flipped.sgf"))?;
    assert!(flipped.contains("B[pp]"));
    assert!(flipped.contains("W[dd]"));
    Ok(())
}

#[test]
fn test_path_and_board() -> anyhow::Result<()> {
    let (dir, file) = setup()?;
    let output = sgfed(dir.path(), &["path", file.to_str().unwrap(), "--number", "3"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), r#"[{"number":3,"branch":null}]"#);

    let output = sgfed(
        dir.path(),
        &[
            "board",
            file.to_str().unwrap(),
            "--path",
            r#"[{"number":1,"branch":1},{"number":2,"branch":null}]"#,
        ],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Move 2, Black to play"));
    assert_eq!(text.matches('○').count(), 1);
    Ok(())
}

#[test]
fn test_path_past_main_line_fails() -> anyhow::Result<()> {
    let (dir, file) = setup()?;
    let output = sgfed(dir.path(), &["path", file.to_str().unwrap(), "--number", "7"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("only 3 moves"));
    Ok(())
}

#[test]
fn test_missing_file_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("nope.sgf");
    let output = sgfed(dir.path(), &["check", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
    Ok(())
}

#[test]
fn test_new_uses_configured_komi() -> anyhow::Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.toml"), "default_komi = \"7.5\"\n")?;
    let file = dir.path().join("new.sgf");
    let name = file.to_str().unwrap();

    let output = sgfed(dir.path(), &["new", name, "--black", "Honinbo"]);
    assert!(output.status.success());
    let game = sgfed_core::Game::from_sgf(&fs::read_to_string(&file)?)?;
    assert_eq!(game.komi(), "7.5");
    assert_eq!(game.player_black(), "Honinbo");

    // An existing record is kept unless --force is given
    let output = sgfed(dir.path(), &["new", name, "--handicap", "4"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    let output = sgfed(dir.path(), &["new", name, "--handicap", "4", "--force"]);
    assert!(output.status.success());
    let game = sgfed_core::Game::from_sgf(&fs::read_to_string(&file)?)?;
    assert_eq!(game.komi(), "0.5");
    assert_eq!(game.handicap(), 4);
    assert_eq!(game.board().stones().count(), 4);
    Ok(())
}
