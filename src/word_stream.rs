use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Words generated when a timed session starts.
pub const INITIAL_WORDS: usize = 100;
/// The stream is topped up once the cursor is this close to its end.
pub const REFILL_THRESHOLD: usize = 20;
/// Words appended per top-up.
pub const REFILL_BATCH: usize = 50;

/// Draw `n` words uniformly, with replacement, from `corpus`.
pub fn sample<R: Rng + ?Sized>(
    corpus: &'static [&'static str],
    rng: &mut R,
    n: usize,
) -> Vec<&'static str> {
    (0..n).filter_map(|_| corpus.choose(rng).copied()).collect()
}

/// The words a session asks the user to type.
///
/// Alongside the words it keeps the absolute start position of each one
/// (every earlier word plus one separator per boundary), so lookups and
/// writes into the typed buffer share a single addressing scheme.
#[derive(Debug, Clone, Default)]
pub struct WordStream {
    words: Vec<&'static str>,
    starts: Vec<usize>,
}

impl WordStream {
    pub fn new(words: Vec<&'static str>) -> Self {
        let mut stream = Self::default();
        stream.extend(words);
        stream
    }

    pub fn generate<R: Rng + ?Sized>(
        corpus: &'static [&'static str],
        rng: &mut R,
        n: usize,
    ) -> Self {
        Self::new(sample(corpus, rng, n))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[&'static str] {
        &self.words
    }

    pub fn word(&self, word_index: usize) -> Option<&'static str> {
        self.words.get(word_index).copied()
    }

    /// Length of a word in characters, 0 past the end of the stream.
    pub fn word_len(&self, word_index: usize) -> usize {
        self.word(word_index).map_or(0, |w| w.chars().count())
    }

    pub fn expected_char(&self, word_index: usize, char_index: usize) -> Option<char> {
        self.word(word_index)?.chars().nth(char_index)
    }

    /// Flattened position of `(word_index, char_index)`.
    pub fn absolute_index(&self, word_index: usize, char_index: usize) -> usize {
        self.word_start(word_index) + char_index
    }

    /// Absolute position of the first character of `word_index`.
    ///
    /// Indices past the end are addressed as if the stream continued with
    /// separators only, which keeps the cursor one word past the last word
    /// addressable.
    pub fn word_start(&self, word_index: usize) -> usize {
        match self.starts.get(word_index) {
            Some(&start) => start,
            None => self.end() + (word_index - self.words.len()),
        }
    }

    fn end(&self) -> usize {
        match (self.starts.last(), self.words.last()) {
            (Some(&start), Some(word)) => start + word.chars().count() + 1,
            _ => 0,
        }
    }

    pub fn extend<I: IntoIterator<Item = &'static str>>(&mut self, words: I) {
        for word in words {
            let start = self.end();
            self.starts.push(start);
            self.words.push(word);
        }
    }

    /// Append batches until `word_index` is at least [`REFILL_THRESHOLD`]
    /// words away from the end. Returns how many words were added.
    pub fn ensure_ahead<R: Rng + ?Sized>(
        &mut self,
        word_index: usize,
        corpus: &'static [&'static str],
        rng: &mut R,
    ) -> usize {
        let before = self.len();
        while word_index + REFILL_THRESHOLD > self.len() {
            let batch = sample(corpus, rng, REFILL_BATCH);
            if batch.is_empty() {
                break;
            }
            self.extend(batch);
        }
        let added = self.len() - before;
        if added > 0 {
            debug!(word_index, added, len = self.len(), "word stream refilled");
        }
        added
    }
}
