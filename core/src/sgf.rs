// SPDX-License-Identifier: MIT OR Apache-2.0

//! SGF (Smart Game Format) parsing and generation
//!
//! A [`ParsedGame`] is an arena of [`ParsedNode`]s. Each node owns its
//! children by index; `previous` is a plain back-index.

use crate::lexer::Lexer;
use crate::ParseError;
use std::fmt;

/// Index of a node inside its [`ParsedGame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Properties whose values keep their newlines
fn keeps_newlines(id: &str) -> bool {
    id == "C" || id == "GC"
}

/// Ordered property map of one node
///
/// Distinct ids keep insertion order; replacing an id keeps its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, Vec<String>)>,
}

impl Properties {
    /// Create an empty property map
    pub fn new() -> Self {
        Self::default()
    }

    /// All values of a property
    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, values)| values.as_slice())
    }

    /// First value of a property
    pub fn first(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Set a property, replacing any previous values
    pub fn insert(&mut self, id: impl Into<String>, values: Vec<String>) {
        let id = id.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = values,
            None => self.entries.push((id, values)),
        }
    }

    /// Set a single-valued property
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.insert(id, vec![value.into()]);
    }

    /// Remove a property, returning its values
    pub fn remove(&mut self, id: &str) -> Option<Vec<String>> {
        let pos = self.entries.iter().position(|(key, _)| key == id)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterate properties in stored order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Comma-separated property ids, for diagnostics
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One SGF node
///
/// `next()` is the main-line child. `branches()` is present only when the
/// node ends its sequence with parenthesized variations, and then its
/// first entry is `next()`.
#[derive(Debug, Clone, Default)]
pub struct ParsedNode {
    /// Node properties
    pub properties: Properties,
    /// Back-index to the parent
    previous: Option<NodeId>,
    /// Children, main line first
    children: Vec<NodeId>,
    /// Whether the children were written as variations
    branched: bool,
}

impl ParsedNode {
    /// Create a detached node
    pub fn new(properties: Properties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn next(&self) -> Option<NodeId> {
        self.children.first().copied()
    }

    pub fn previous(&self) -> Option<NodeId> {
        self.previous
    }

    pub fn branches(&self) -> Option<&[NodeId]> {
        self.branched.then_some(self.children.as_slice())
    }

    /// Children in order, whether or not they are variations
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Write this node's text, `;` first
    fn write_node(&self, out: &mut String) {
        out.push(';');
        for id in ["B", "W"] {
            if let Some(values) = self.properties.get(id) {
                write_property(out, id, values);
            }
        }
        for (id, values) in self.properties.iter() {
            if id != "B" && id != "W" {
                write_property(out, id, values);
            }
        }
    }
}

fn write_property(out: &mut String, id: &str, values: &[String]) {
    out.push_str(id);
    for value in values {
        out.push('[');
        out.push_str(&escape_value(value));
        out.push(']');
    }
}

/// Backslash-escape `]` and `\`
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ']' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A parsed SGF game tree
///
/// The root holds the game-info properties; moves follow it.
#[derive(Debug, Clone, Default)]
pub struct ParsedGame {
    nodes: Vec<ParsedNode>,
    root: Option<NodeId>,
}

impl ParsedGame {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Allocate a detached node
    pub fn add_node(&mut self, properties: Properties) -> NodeId {
        self.nodes.push(ParsedNode::new(properties));
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &ParsedNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ParsedNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes allocated, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Make `child` the plain continuation of a childless `parent`
    pub fn set_next(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[parent.0].children.is_empty());
        self.nodes[parent.0].children = vec![child];
        self.nodes[parent.0].branched = false;
        self.nodes[child.0].previous = Some(parent);
    }

    /// Add `child` as a variation of `parent`
    ///
    /// The first variation also becomes `next()`.
    pub fn push_branch(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.nodes[parent.0];
        node.children.push(child);
        node.branched = true;
        self.nodes[child.0].previous = Some(parent);
    }

    /// Attach `child` after `parent`, becoming a variation if needed
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes[parent.0].children.is_empty() {
            self.set_next(parent, child);
        } else {
            self.push_branch(parent, child);
        }
    }

    /// Detach `child` from `parent`
    ///
    /// A single remaining variation collapses into a plain `next()`.
    /// Returns false when `child` was not a child of `parent`.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let node = &mut self.nodes[parent.0];
        let Some(pos) = node.children.iter().position(|c| *c == child) else {
            return false;
        };
        node.children.remove(pos);
        if node.children.len() < 2 {
            node.branched = false;
        }
        self.nodes[child.0].previous = None;
        true
    }

    /// Swap two children of `parent`
    pub fn swap_children(&mut self, parent: NodeId, a: usize, b: usize) {
        self.nodes[parent.0].children.swap(a, b);
    }

    /// Copy the subtree at `id` of `source` into this tree
    ///
    /// `map` transforms each node's properties as it is copied. Returns the
    /// id of the new subtree root, which is left detached.
    pub fn copy_subtree<F>(&mut self, source: &ParsedGame, id: NodeId, map: &F) -> NodeId
    where
        F: Fn(&Properties) -> Properties,
    {
        let src = source.node(id);
        let copy = self.add_node(map(&src.properties));
        let branched = src.branched;
        for &child in src.children() {
            let child_copy = self.copy_subtree(source, child, map);
            if branched {
                self.push_branch(copy, child_copy);
            } else {
                self.set_next(copy, child_copy);
            }
        }
        copy
    }

    /// Write a node sequence, stopping at the first variations
    fn write_sequence(&self, mut id: NodeId, out: &mut String) {
        let mut first = true;
        loop {
            if !first {
                out.push('\n');
            }
            first = false;
            let node = self.node(id);
            node.write_node(out);
            if let Some(branches) = node.branches() {
                for &branch in branches {
                    out.push_str("\n(");
                    self.write_sequence(branch, out);
                    out.push(')');
                }
                return;
            }
            match node.next() {
                Some(next) => id = next,
                None => return,
            }
        }
    }
}

impl fmt::Display for ParsedGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut out = String::from("(");
        self.write_sequence(root, &mut out);
        out.push(')');
        f.write_str(&out)
    }
}

/// Parse SGF text into a [`ParsedGame`]
///
/// Only the first game tree in the text is read.
pub fn parse_file(text: &str) -> Result<ParsedGame, ParseError> {
    let mut lexer = Lexer::new(text);
    if lexer.scan_for("(").is_err() {
        return Err(ParseError::MalformedFile {
            position: lexer.location(),
        });
    }
    let mut game = ParsedGame::new();
    let root = parse_nodes(&mut lexer, &mut game)?;
    game.set_root(root);
    tracing::debug!("Parsed SGF game with {} nodes", game.node_count());
    Ok(game)
}

/// Parse a sequence after its `(`, through the matching `)`
fn parse_nodes(lexer: &mut Lexer, game: &mut ParsedGame) -> Result<NodeId, ParseError> {
    lexer.scan_for(";")?;
    let first = parse_node(lexer, game)?;
    let mut current = first;
    let mut branching = false;
    while lexer.has_data() {
        let position = lexer.location();
        match lexer.scan_for(";()")? {
            ';' => {
                if branching {
                    return Err(ParseError::NodeAfterBranches { position });
                }
                let node = parse_node(lexer, game)?;
                game.set_next(current, node);
                current = node;
            }
            '(' => {
                let branch = parse_nodes(lexer, game)?;
                game.push_branch(current, branch);
                branching = true;
            }
            _ => return Ok(first),
        }
    }
    Err(ParseError::UnexpectedEndOfInput {
        position: lexer.location(),
    })
}

/// Parse the properties of one node after its `;`
fn parse_node(lexer: &mut Lexer, game: &mut ParsedGame) -> Result<NodeId, ParseError> {
    let mut properties = Properties::new();
    while lexer.has_data() {
        let position = lexer.location();
        let Some(id) = lexer.get_property_id() else {
            return Ok(game.add_node(properties));
        };
        if properties.contains(&id) {
            return Err(ParseError::DuplicateProperty { id, position });
        }
        lexer.scan_for("[")?;
        let keep_newlines = keeps_newlines(&id);
        let mut values = vec![lexer.get_property_value(keep_newlines)?];
        while let Some((next, _)) = lexer.peek_for("[") {
            lexer.set_location(next);
            values.push(lexer.get_property_value(keep_newlines)?);
        }
        properties.insert(id, values);
    }
    Err(ParseError::UnexpectedEndOfInput {
        position: lexer.location(),
    })
}
