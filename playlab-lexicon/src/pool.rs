use crate::interner::{Atom, WordId, intern_word, resolve};
use std::collections::HashSet;

pub const DEFAULT_WORDS: &[&str] = &[
    "apple", "banana", "cherry", "dragon", "elephant", "forest", "garden", "horizon",
    "island", "jungle", "kingdom", "library", "mountain", "nature", "ocean", "planet",
    "quantum", "river", "sunset", "thunder", "universe", "volcano", "whisper", "yellow",
    "zebra", "ancient", "balance", "cascade", "destiny", "eclipse", "fantasy", "gravity",
    "harmony", "illusion", "journey", "kindness", "lantern", "mystery", "nebula", "oracle",
    "paradise", "radiance", "serenity", "twilight", "umbrella", "velocity", "waterfall",
    "crystal", "diamond", "emerald", "fountain", "glacier", "harvest", "infinity", "jasmine",
    "maple", "northstar", "obsidian", "phoenix", "quartz", "rainbow", "sapphire", "tempest",
];

/// Words split into those not yet issued and those already shown.
///
/// Ids index into the global interner; the pool itself keeps order so that
/// an index drawn from a random source maps to a stable word.
#[derive(Debug, Clone)]
pub struct WordPool {
    fresh: Vec<WordId>,
    seen: Vec<WordId>,
    seen_set: HashSet<WordId>,
}

impl WordPool {
    pub fn new<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fresh = Vec::new();
        let mut unique = HashSet::new();
        for w in words {
            let w = w.trim();
            if w.is_empty() {
                continue;
            }
            let id = intern_word(w);
            if unique.insert(id) {
                fresh.push(id);
            }
        }
        Self {
            fresh,
            seen: Vec::new(),
            seen_set: HashSet::new(),
        }
    }

    pub fn fresh_len(&self) -> usize {
        self.fresh.len()
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_seen(&self, id: WordId) -> bool {
        self.seen_set.contains(&id)
    }

    /// Removes and returns the fresh word at `index`, marking it seen.
    pub fn take_fresh(&mut self, index: usize) -> Option<WordId> {
        if index >= self.fresh.len() {
            return None;
        }
        let id = self.fresh.remove(index);
        self.seen.push(id);
        self.seen_set.insert(id);
        Some(id)
    }

    /// Returns a previously issued word without changing the pool.
    pub fn seen_at(&self, index: usize) -> Option<WordId> {
        self.seen.get(index).copied()
    }

    pub fn text(&self, id: WordId) -> Option<Atom> {
        resolve(id)
    }
}

impl Default for WordPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}
