//! Most-recently-used list of searched cities.

use std::collections::VecDeque;

pub const MAX_HISTORY: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryList {
    entries: VecDeque<String>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title-cases `city`, moves it to the front and trims to [`MAX_HISTORY`].
    pub fn record(&mut self, city: &str) {
        let city = title_case(city.trim());
        if city.is_empty() {
            return;
        }
        self.entries.retain(|e| *e != city);
        self.entries.push_front(city);
        self.entries.truncate(MAX_HISTORY);
    }

    /// Most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Uppercases the first letter of every word and lowercases the rest. A word
/// starts after any non-alphabetic character, so "new york" becomes "New York"
/// and "saint-étienne" becomes "Saint-Étienne".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
