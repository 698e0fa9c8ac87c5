pub mod interner;
pub mod pool;

pub use interner::{Atom, WordId, intern_word, resolve, word_count};
pub use pool::{DEFAULT_WORDS, WordPool};
