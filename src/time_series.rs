/// One point of the WPM-over-time series, taken on every typed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WpmSample {
    /// Whole seconds since the run started.
    pub elapsed: u32,
    pub wpm: u32,
}

impl WpmSample {
    pub fn new(elapsed: u32, wpm: u32) -> Self {
        Self { elapsed, wpm }
    }
}

impl From<WpmSample> for (f64, f64) {
    fn from(s: WpmSample) -> Self {
        (f64::from(s.elapsed), f64::from(s.wpm))
    }
}
