use lazy_static::lazy_static;
use std::sync::RwLock;
pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    static ref WORD_INTERNER: RwLock<Vec<Atom>> = RwLock::new(Vec::new());
}

/// Stable handle for an interned word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(usize);

impl WordId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Intern a word and return its id. Interning the same text twice yields
/// the same id.
pub fn intern_word(s: &str) -> WordId {
    let atom = Atom::from(s);
    let mut v = WORD_INTERNER.write().unwrap_or_else(|e| e.into_inner());
    match v.iter().position(|a| *a == atom) {
        Some(idx) => WordId(idx),
        None => {
            v.push(atom);
            WordId(v.len() - 1)
        }
    }
}

/// Current count of unique words.
pub fn word_count() -> usize {
    WORD_INTERNER.read().unwrap_or_else(|e| e.into_inner()).len()
}

pub fn resolve(id: WordId) -> Option<Atom> {
    WORD_INTERNER
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(id.0)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = intern_word("lantern");
        let b = intern_word("lantern");
        let c = intern_word("obsidian");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(resolve(c).as_deref(), Some("obsidian"));
        assert!(word_count() >= 2);
    }
}
