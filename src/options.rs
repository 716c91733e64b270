//! The words currently offered to the player, plus the armed one.

use crate::error::GameError;

/// Ordered set of distinct words. The armed word, when set, is always a member.
#[derive(Debug, Default, Clone)]
pub struct OptionSet {
    words: Vec<String>,
    armed: Option<String>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `words`, keeping the first occurrence of duplicates.
    pub fn add_all<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.clear();
        self.armed = None;
        for w in words {
            let w = w.into();
            if !self.contains(&w) {
                self.words.push(w);
            }
        }
    }

    /// Remove `word` if present. Clears the armed word when it was the one removed.
    pub fn remove(&mut self, word: &str) -> bool {
        let Some(idx) = self.words.iter().position(|w| w == word) else {
            return false;
        };
        self.words.remove(idx);
        if self.armed.as_deref() == Some(word) {
            self.armed = None;
        }
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Arm `word`, replacing any previous selection.
    pub fn arm(&mut self, word: &str) -> Result<(), GameError> {
        if !self.contains(word) {
            return Err(GameError::NotAnOption(word.to_string()));
        }
        self.armed = Some(word.to_string());
        Ok(())
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }
}
