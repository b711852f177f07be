use crate::time_series::WpmSample;

/// Characters that make up one "word" for WPM purposes.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Instantaneous WPM after `typed_chars` characters in `elapsed_secs`.
///
/// Zero before the first second has elapsed.
pub fn live_wpm(typed_chars: usize, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    let words = typed_chars as f64 / CHARS_PER_WORD;
    (words / f64::from(elapsed_secs) * 60.0).round() as u32
}

/// WPM over a run measured against `basis_secs`.
pub fn final_wpm(total_chars: usize, basis_secs: f64) -> u32 {
    if basis_secs <= 0.0 {
        return 0;
    }
    let minutes = basis_secs / 60.0;
    (total_chars as f64 / CHARS_PER_WORD / minutes).round() as u32
}

/// Share of typed characters that were not mistakes, in percent.
///
/// Mistakes are counted when a key is pressed and survive corrections, so
/// they can outnumber the characters left in the buffer; the result is
/// clamped to 0 in that case.
pub fn accuracy(total_chars: usize, mistakes: u32) -> u32 {
    if total_chars == 0 {
        return 100;
    }
    let correct = total_chars.saturating_sub(mistakes as usize);
    ((correct as f64 / total_chars as f64) * 100.0).round() as u32
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResults {
    pub wpm: u32,
    pub accuracy: u32,
    pub total_chars: usize,
    pub mistakes: u32,
    pub elapsed_secs: u32,
    pub samples: Vec<WpmSample>,
}

impl TestResults {
    pub fn compute(
        total_chars: usize,
        mistakes: u32,
        basis_secs: f64,
        elapsed_secs: u32,
        samples: Vec<WpmSample>,
    ) -> Self {
        Self {
            wpm: final_wpm(total_chars, basis_secs),
            accuracy: accuracy(total_chars, mistakes),
            total_chars,
            mistakes,
            elapsed_secs,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_wpm_uses_configured_duration() {
        assert_eq!(final_wpm(150, 30.0), 60);
        assert_eq!(final_wpm(0, 15.0), 0);
        assert_eq!(final_wpm(250, 60.0), 50);
    }

    #[test]
    fn final_wpm_counts_partial_seconds() {
        // 50 chars = 10 words in 9.9 seconds
        assert_eq!(final_wpm(50, 9.9), 61);
        assert_eq!(final_wpm(50, 9.0), 67);
    }

    #[test]
    fn final_wpm_without_basis_is_zero() {
        assert_eq!(final_wpm(40, 0.0), 0);
        assert_eq!(final_wpm(40, -1.0), 0);
    }

    #[test]
    fn accuracy_rounds_share_of_correct_chars() {
        assert_eq!(accuracy(150, 15), 90);
        assert_eq!(accuracy(3, 1), 67);
        assert_eq!(accuracy(10, 0), 100);
    }

    #[test]
    fn accuracy_of_empty_session_is_full() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(0, 4), 100);
    }

    #[test]
    fn accuracy_never_goes_negative() {
        assert_eq!(accuracy(2, 9), 0);
    }

    #[test]
    fn live_wpm_guards_the_first_second() {
        assert_eq!(live_wpm(1, 0), 0);
        assert_eq!(live_wpm(25, 5), 60);
        assert_eq!(live_wpm(7, 3), 28);
    }

    #[test]
    fn compute_collects_everything() {
        let samples = vec![WpmSample::new(1, 48), WpmSample::new(2, 60)];
        let results = TestResults::compute(150, 15, 30.0, 30, samples.clone());

        assert_eq!(results.wpm, 60);
        assert_eq!(results.accuracy, 90);
        assert_eq!(results.total_chars, 150);
        assert_eq!(results.mistakes, 15);
        assert_eq!(results.samples, samples);
    }
}
