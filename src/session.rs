use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{Config, TestDuration, TestType, Theme, WordCount};
use crate::corpus::WORDS;
use crate::scoring::{live_wpm, TestResults};
use crate::time_series::WpmSample;
use crate::typed_buffer::TypedBuffer;
use crate::word_stream::{WordStream, INITIAL_WORDS};

/// A keystroke as the session sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Space,
    Backspace,
    Other,
}

/// What a keystroke did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEffect {
    /// Nothing changed.
    Ignored,
    /// The current word changed, or the cursor moved back across a boundary.
    Moved,
    /// The cursor moved on to a new word, which should be scrolled into view.
    Advanced { word_index: usize },
    /// The keystroke finished the last word of a words-mode run.
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Active,
    Completed(TestResults),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub word_index: usize,
    pub char_index: usize,
}

/// The bound a run is measured against, fixed when the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Time(TestDuration),
    Words(WordCount),
}

impl Limit {
    fn from_config(test_type: TestType, duration: TestDuration, word_count: WordCount) -> Self {
        match test_type {
            TestType::Time => Limit::Time(duration),
            TestType::Words => Limit::Words(word_count),
        }
    }

    fn initial_words(self) -> usize {
        match self {
            Limit::Time(_) => INITIAL_WORDS,
            Limit::Words(count) => count.count(),
        }
    }
}

/// One typing test: word stream, typed characters, cursor, clock and score.
///
/// Every event is applied through a single method (`on_key`, `on_tick`,
/// `restart`) so no observer ever sees a half-updated session.
#[derive(Debug)]
pub struct Session {
    corpus: &'static [&'static str],
    rng: StdRng,
    test_type: TestType,
    limit: Limit,
    pending_duration: TestDuration,
    word_count: WordCount,
    theme: Theme,
    phase: Phase,
    stream: WordStream,
    typed: TypedBuffer,
    cursor: Cursor,
    mistakes: u32,
    elapsed: u32,
    samples: Vec<WpmSample>,
    epoch: u64,
    scroll_target: usize,
    started_at: Option<Instant>,
}

impl Session {
    pub fn with_seed(config: &Config, seed: u64) -> Self {
        Self::with_rng(config, WORDS, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: &Config, corpus: &'static [&'static str], mut rng: StdRng) -> Self {
        let limit = Limit::from_config(config.test_type, config.duration, config.word_count);
        let stream = WordStream::generate(corpus, &mut rng, limit.initial_words());
        Self {
            corpus,
            rng,
            test_type: config.test_type,
            limit,
            pending_duration: config.duration,
            word_count: config.word_count,
            theme: config.theme,
            phase: Phase::Idle,
            stream,
            typed: TypedBuffer::new(),
            cursor: Cursor::default(),
            mistakes: 0,
            elapsed: 0,
            samples: Vec::new(),
            epoch: 0,
            scroll_target: 0,
            started_at: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active)
    }

    pub fn results(&self) -> Option<&TestResults> {
        match &self.phase {
            Phase::Completed(results) => Some(results),
            _ => None,
        }
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn stream(&self) -> &WordStream {
        &self.stream
    }

    pub fn typed(&self) -> &TypedBuffer {
        &self.typed
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The word the view should keep in sight.
    pub fn scroll_target(&self) -> usize {
        self.scroll_target
    }

    /// Duration applied by the next restart.
    pub fn pending_duration(&self) -> TestDuration {
        self.pending_duration
    }

    /// Seconds left on the clock, for timed runs.
    pub fn time_left(&self) -> Option<u32> {
        match self.limit {
            Limit::Time(duration) => Some(duration.secs().saturating_sub(self.elapsed)),
            Limit::Words(_) => None,
        }
    }

    /// Epoch of the run whose clock should be ticking, if any.
    pub fn ticking_epoch(&self) -> Option<u64> {
        self.is_active().then_some(self.epoch)
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }

    /// Pick a different duration; the running clock is left alone.
    pub fn cycle_duration(&mut self) {
        self.pending_duration = self.pending_duration.next();
    }

    /// Absolute index of the cursor.
    pub fn absolute_index(&self) -> usize {
        self.stream
            .absolute_index(self.cursor.word_index, self.cursor.char_index)
    }

    /// Begin a fresh run: new words, cleared metrics, clock reset to the
    /// pending duration.
    pub fn restart(&mut self) {
        self.limit = Limit::from_config(self.test_type, self.pending_duration, self.word_count);
        self.stream =
            WordStream::generate(self.corpus, &mut self.rng, self.limit.initial_words());
        self.begin();
        info!(epoch = self.epoch, limit = ?self.limit, "session restarted");
    }

    fn begin(&mut self) {
        self.typed = TypedBuffer::new();
        self.cursor = Cursor::default();
        self.mistakes = 0;
        self.elapsed = 0;
        self.samples.clear();
        self.scroll_target = 0;
        self.epoch += 1;
        self.started_at = Some(Instant::now());
        self.phase = Phase::Active;
    }

    pub fn on_key(&mut self, key: KeyInput) -> KeyEffect {
        match self.phase {
            Phase::Completed(_) => return KeyEffect::Ignored,
            Phase::Idle => {
                self.begin();
                info!(epoch = self.epoch, limit = ?self.limit, "session started");
            }
            Phase::Active => {}
        }

        let effect = match key {
            KeyInput::Space => self.on_space(),
            KeyInput::Backspace => self.on_backspace(),
            KeyInput::Char(c) => self.on_char(c),
            KeyInput::Other => KeyEffect::Ignored,
        };

        if let KeyEffect::Advanced { word_index } = effect {
            self.scroll_target = word_index;
            if let Limit::Time(_) = self.limit {
                self.stream
                    .ensure_ahead(word_index, self.corpus, &mut self.rng);
            }
        }
        effect
    }

    fn on_space(&mut self) -> KeyEffect {
        if self.cursor.char_index == self.stream.word_len(self.cursor.word_index) {
            self.advance_word()
        } else {
            KeyEffect::Ignored
        }
    }

    fn on_backspace(&mut self) -> KeyEffect {
        let idx = self.absolute_index();
        if self.cursor.char_index == self.stream.word_len(self.cursor.word_index)
            && self.typed.get(idx).is_some()
        {
            // a stray char on the separator goes first, the cursor stays
            self.typed.clear(idx);
            return KeyEffect::Moved;
        }

        if self.cursor.char_index > 0 {
            self.typed.clear(idx - 1);
            self.cursor.char_index -= 1;
            KeyEffect::Moved
        } else if self.cursor.word_index > 0 {
            self.cursor.word_index -= 1;
            self.cursor.char_index = self.stream.word_len(self.cursor.word_index);
            self.scroll_target = self.cursor.word_index;
            KeyEffect::Moved
        } else {
            KeyEffect::Ignored
        }
    }

    fn on_char(&mut self, c: char) -> KeyEffect {
        let Cursor {
            word_index,
            char_index,
        } = self.cursor;
        let word_len = self.stream.word_len(word_index);
        let idx = self.absolute_index();
        self.typed.set(idx, c);

        let Some(expected) = self.stream.expected_char(word_index, char_index) else {
            // The cursor sits on a separator; only space advances from here.
            self.mistakes += 1;
            self.push_sample();
            return KeyEffect::Moved;
        };

        if c != expected {
            self.mistakes += 1;
        }
        self.push_sample();

        if char_index + 1 == word_len {
            self.advance_word()
        } else {
            self.cursor.char_index += 1;
            KeyEffect::Moved
        }
    }

    fn push_sample(&mut self) {
        let wpm = live_wpm(self.typed.filled(), self.elapsed);
        self.samples.push(WpmSample::new(self.elapsed, wpm));
    }

    fn advance_word(&mut self) -> KeyEffect {
        self.cursor.word_index += 1;
        self.cursor.char_index = 0;

        if let Limit::Words(count) = self.limit {
            if self.cursor.word_index >= count.count() {
                self.complete();
                return KeyEffect::Finished;
            }
        }
        KeyEffect::Advanced {
            word_index: self.cursor.word_index,
        }
    }

    /// Advance the clock by one second. Ticks from another run are dropped.
    pub fn on_tick(&mut self, epoch: u64) {
        if !self.is_active() || epoch != self.epoch {
            debug!(epoch, current = self.epoch, "ignoring tick");
            return;
        }

        self.elapsed += 1;
        if let Limit::Time(duration) = self.limit {
            if self.elapsed >= duration.secs() {
                self.complete();
            }
        }
    }

    fn complete(&mut self) {
        let basis = match self.limit {
            Limit::Time(duration) => f64::from(duration.secs()),
            // ticks only count whole seconds
            Limit::Words(_) => {
                let wall = self.started_at.map_or(0.0, |t| t.elapsed().as_secs_f64());
                wall.max(f64::from(self.elapsed))
            }
        };
        let results = TestResults::compute(
            self.typed.filled(),
            self.mistakes,
            basis,
            self.elapsed,
            self.samples.clone(),
        );
        info!(
            epoch = self.epoch,
            wpm = results.wpm,
            accuracy = results.accuracy,
            chars = results.total_chars,
            mistakes = results.mistakes,
            "session completed"
        );
        self.phase = Phase::Completed(results);
    }
}
