#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Typed-prefix matching system.
//!
//! A [`PrefixTrie`] is built once from the enemy roster; every change of the
//! typing input is walked through it by [`Matching`], which emits strike,
//! reset, and destroy commands for the world to execute. Mistyped input is
//! not an error: the walk keeps the deepest matched node so partially correct
//! prefixes still show strike progress, colored as mistyped.

use std::collections::BTreeMap;

use type_siege_core::{Command, EnemyId};

/// Prefix tree mapping case-normalized typed sequences to enemies.
///
/// Each node holds every enemy whose full text passes through it (`matched`)
/// and the enemies whose full text ends exactly there (`completed`). Built
/// once at game start; read-only afterwards.
#[derive(Debug)]
pub struct PrefixTrie {
    nodes: Vec<Node>,
}

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<char, usize>,
    matched: Vec<EnemyId>,
    completed: Vec<EnemyId>,
}

const ROOT: usize = 0;

/// Result of walking the trie with the current input text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrieWalk {
    node: usize,
    /// Whether the input diverged from every enemy text before its end.
    pub mistyped: bool,
}

impl PrefixTrie {
    /// Builds the trie from the full enemy roster.
    #[must_use]
    pub fn build<'a, I>(roster: I) -> Self
    where
        I: IntoIterator<Item = (EnemyId, &'a str)>,
    {
        let mut trie = Self {
            nodes: vec![Node::default()],
        };

        for (enemy, text) in roster {
            let characters: Vec<char> = normalize(text).collect();
            let mut cursor = ROOT;
            let last = characters.len().saturating_sub(1);
            for (position, character) in characters.iter().enumerate() {
                cursor = trie.child_or_insert(cursor, *character);
                trie.nodes[cursor].matched.push(enemy);
                if position == last {
                    trie.nodes[cursor].completed.push(enemy);
                }
            }
        }

        trie
    }

    fn child_or_insert(&mut self, parent: usize, character: char) -> usize {
        if let Some(&child) = self.nodes[parent].children.get(&character) {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(Node::default());
        let _ = self.nodes[parent].children.insert(character, child);
        child
    }

    /// Walks the trie with the current input, consuming characters until one
    /// has no child. The deepest matched node is kept either way.
    #[must_use]
    pub fn walk(&self, input: &str) -> TrieWalk {
        let mut cursor = ROOT;
        let mut mistyped = false;

        for character in normalize(input) {
            match self.nodes[cursor].children.get(&character) {
                Some(&child) => cursor = child,
                None => {
                    mistyped = true;
                    break;
                }
            }
        }

        TrieWalk {
            node: cursor,
            mistyped,
        }
    }

    /// Enemies whose full text is consistent with the walked prefix.
    #[must_use]
    pub fn matched(&self, walk: TrieWalk) -> &[EnemyId] {
        &self.nodes[walk.node].matched
    }

    /// Enemies whose full text equals the walked prefix exactly.
    #[must_use]
    pub fn completed(&self, walk: TrieWalk) -> &[EnemyId] {
        &self.nodes[walk.node].completed
    }
}

/// Case normalization applied to both roster texts and typed input.
fn normalize(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// What the adapter owning the input box should do after a match pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDisposition {
    /// Leave the typed text in place.
    Keep,
    /// Clear the input box; at least one enemy was completed.
    Clear,
}

/// Pure system that turns input changes into strike/destroy commands.
#[derive(Debug)]
pub struct Matching {
    trie: PrefixTrie,
    struck: Vec<EnemyId>,
}

impl Matching {
    /// Creates the match controller over a prebuilt trie.
    #[must_use]
    pub fn new(trie: PrefixTrie) -> Self {
        Self {
            trie,
            struck: Vec::new(),
        }
    }

    /// Consumes the full current input text (already whitespace-trimmed by
    /// the input channel) and emits the resulting commands.
    pub fn handle(&mut self, input: &str, out: &mut Vec<Command>) -> InputDisposition {
        let walk = self.trie.walk(input);
        let matched = self.trie.matched(walk);
        let completed = self.trie.completed(walk);
        let length = input.chars().count();

        for &enemy in self
            .struck
            .iter()
            .filter(|enemy| !matched.contains(enemy))
        {
            out.push(Command::ResetStrike { enemy });
        }

        for &enemy in matched {
            out.push(Command::Strike {
                enemy,
                length,
                mistyped: walk.mistyped,
            });
        }

        for &enemy in completed {
            out.push(Command::DestroyEnemy { enemy });
        }

        self.struck.clear();
        self.struck.extend_from_slice(matched);

        if completed.is_empty() {
            InputDisposition::Keep
        } else {
            InputDisposition::Clear
        }
    }
}
