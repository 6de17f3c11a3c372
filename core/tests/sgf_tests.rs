// SPDX-License-Identifier: MIT OR Apache-2.0

use sgfed_core::sgf::parse_file;
use sgfed_core::ParseError;

#[test]
fn parse_linear_game() {
    let game = parse_file("(;GM[1]FF[4]SZ[19];B[pd];W[dp];B[pp])").unwrap();
    let root = game.root().unwrap();
    assert_eq!(game.node(root).properties.first("SZ"), Some("19"));
    assert_eq!(game.node(root).properties.first("FF"), Some("4"));

    let mut moves = Vec::new();
    let mut node = game.node(root).next();
    while let Some(id) = node {
        assert!(game.node(id).branches().is_none());
        moves.push(id);
        node = game.node(id).next();
    }
    assert_eq!(moves.len(), 3);
    assert_eq!(game.node(moves[1]).properties.first("W"), Some("dp"));
    assert_eq!(game.node(moves[2]).previous(), Some(moves[1]));
}

#[test]
fn parse_branches() {
    let text = "(;SZ[19];B[pd](;W[dp];B[pp])(;W[dd]))";
    let game = parse_file(text).unwrap();
    let root = game.root().unwrap();
    let first = game.node(root).next().unwrap();
    let branches = game.node(first).branches().unwrap();
    assert_eq!(branches.len(), 2);
    // The first branch is also the main-line continuation
    assert_eq!(game.node(first).next(), Some(branches[0]));
    assert_eq!(game.node(branches[1]).properties.first("W"), Some("dd"));
    assert_eq!(game.node(branches[1]).previous(), Some(first));
    assert!(game.node(branches[1]).next().is_none());
}

#[test]
fn serialize_layout() {
    let game = parse_file("(;SZ[19];B[pd](;W[dp];B[pp])(;W[dd]))").unwrap();
    assert_eq!(
        game.to_string(),
        "(;SZ[19]\n;B[pd]\n(;W[dp]\n;B[pp])\n(;W[dd]))"
    );
}

#[test]
fn serialize_moves_first() {
    let game = parse_file("(;SZ[19];C[note]TR[aa]W[dd])").unwrap();
    assert_eq!(game.to_string(), "(;SZ[19]\n;W[dd]C[note]TR[aa])");
}

#[test]
fn multiple_values() {
    let game = parse_file("(;AB[aa][bb]\n  [cc]AW[dd])").unwrap();
    let root = game.root().unwrap();
    let props = &game.node(root).properties;
    assert_eq!(props.get("AB").unwrap(), ["aa", "bb", "cc"]);
    assert_eq!(props.get("AW").unwrap(), ["dd"]);
    assert_eq!(game.to_string(), "(;AB[aa][bb][cc]AW[dd])");
}

#[test]
fn whitespace_between_tokens() {
    let game = parse_file("  (\n ;SZ[19]\n ;B[aa] \n ( ;W[bb] ) ( ;W[cc] ) ) trailing").unwrap();
    let root = game.root().unwrap();
    let first = game.node(root).next().unwrap();
    assert_eq!(game.node(first).branches().map(|b| b.len()), Some(2));
}

#[test]
fn escaping_survives_round_trip() {
    let comment = "a ] bracket\r\na \\ backslash";
    let mut game = parse_file("(;SZ[19])").unwrap();
    let root = game.root().unwrap();
    game.node_mut(root).properties.set("C", comment);
    let text = game.to_string();
    assert!(text.contains(r"C[a \] bracket"));

    let reparsed = parse_file(&text).unwrap();
    let root = reparsed.root().unwrap();
    assert_eq!(reparsed.node(root).properties.first("C"), Some(comment));
    assert_eq!(reparsed.to_string(), text);
}

#[test]
fn newlines_in_values() {
    let game = parse_file("(;C[one\ntwo\n\rthree]GN[a\r\nb];GC[x\ry])").unwrap();
    let root = game.root().unwrap();
    let props = &game.node(root).properties;
    assert_eq!(props.first("C"), Some("one\r\ntwo\r\nthree"));
    assert_eq!(props.first("GN"), Some("a b"));
    let next = game.node(root).next().unwrap();
    assert_eq!(game.node(next).properties.first("GC"), Some("x\r\ny"));
}

#[test]
fn empty_value_is_kept() {
    let game = parse_file("(;SZ[19];B[];W[])").unwrap();
    let first = game.node(game.root().unwrap()).next().unwrap();
    assert_eq!(game.node(first).properties.first("B"), Some(""));
}

#[test]
fn round_trip_is_stable() {
    let text = "(;FF[4]SZ[19]PB[Honinbo]PW[Genan]\n;B[qd]C[first]\n(;W[dc]\n;B[pq])\n(;W[dp]\n(;B[pp])\n(;B[dd]LB[dd:A][pp:B])))";
    let game = parse_file(text).unwrap();
    assert_eq!(game.to_string(), text);
    assert_eq!(parse_file(&game.to_string()).unwrap().to_string(), text);
}

#[test]
fn malformed_file() {
    assert_eq!(
        parse_file("SZ[19]").unwrap_err(),
        ParseError::MalformedFile { position: 0 }
    );
    assert!(matches!(
        parse_file(""),
        Err(ParseError::MalformedFile { .. })
    ));
}

#[test]
fn unexpected_end_of_input() {
    for text in ["(;B[aa]", "(;B[aa];W[bb]  ", "(;C[open", "(;SZ[19](;B[aa])", "(;C[a\\"] {
        assert!(
            matches!(parse_file(text), Err(ParseError::UnexpectedEndOfInput { .. })),
            "{:?} should end early",
            text
        );
    }
}

#[test]
fn duplicate_property() {
    match parse_file("(;SZ[19];B[aa]B[bb])") {
        Err(ParseError::DuplicateProperty { id, .. }) => assert_eq!(id, "B"),
        other => panic!("expected duplicate property, got {:?}", other),
    }
}

#[test]
fn node_after_branches() {
    let err = parse_file("(;SZ[19];B[aa](;W[bb])(;W[cc]);B[dd])").unwrap_err();
    assert!(matches!(err, ParseError::NodeAfterBranches { .. }));
    assert!(err.to_string().contains("after branching"));
}

#[test]
fn missing_delimiters() {
    assert!(matches!(
        parse_file("(B[aa])"),
        Err(ParseError::Expected { .. })
    ));
    match parse_file("(;SZ 19)") {
        Err(ParseError::Expected { expected, .. }) => assert_eq!(expected, "["),
        other => panic!("expected a missing '[', got {:?}", other),
    }
}
