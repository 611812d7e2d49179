//! Dictionary oracle for word validation
//!
//! The scanner asks one question: is this lowercase string a word? Loading
//! the list is the caller's job; the engine only ever sees an immutable set.
//! An empty list is valid and simply rejects everything.

use std::collections::HashSet;
use std::path::Path;

/// Answers whether a lowercase string is a word.
pub trait Dictionary {
    fn has_word(&self, word: &str) -> bool;
}

/// Hash set of lowercase words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// A dictionary that knows no words.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from any list of words. Entries are lowercased; anything that is
    /// not purely alphabetic is skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();
        Self { words }
    }

    /// Parse one word per line.
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    /// Read a word list file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Number of words known.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn has_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}
