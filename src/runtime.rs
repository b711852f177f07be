use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::{debug, trace};

/// Length of one countdown step.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait for input when no countdown is running.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// One second of the run identified by the epoch has passed.
    Tick(u64),
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    debug!(error = %e, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

#[derive(Clone, Copy, Debug)]
struct Armed {
    epoch: u64,
    next: Instant,
}

/// Repeating timer bound to one session run.
///
/// Arming for a new epoch replaces the previous schedule, so at most one
/// countdown exists at a time.
#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    interval: Duration,
    armed: Option<Armed>,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
        }
    }

    pub fn arm(&mut self, epoch: u64, now: Instant) {
        debug!(epoch, "countdown armed");
        self.armed = Some(Armed {
            epoch,
            next: now + self.interval,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            debug!(epoch = armed.epoch, "countdown cancelled");
        }
    }

    pub fn armed_epoch(&self) -> Option<u64> {
        self.armed.map(|a| a.epoch)
    }

    /// Make the countdown follow the run that should be ticking.
    pub fn sync(&mut self, active_epoch: Option<u64>, now: Instant) {
        match (active_epoch, self.armed_epoch()) {
            (Some(want), Some(have)) if want == have => {}
            (Some(want), _) => self.arm(want, now),
            (None, _) => self.cancel(),
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.armed
            .map(|a| a.next.saturating_duration_since(now))
    }

    /// Returns the epoch to tick if the deadline has passed, scheduling the
    /// next one a full interval after the missed deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<u64> {
        let interval = self.interval;
        let armed = self.armed.as_mut()?;
        if now < armed.next {
            return None;
        }
        armed.next += interval;
        trace!(epoch = armed.epoch, "countdown tick");
        Some(armed.epoch)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    countdown: Countdown,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick_interval: Duration) -> Self {
        Self {
            event_source,
            countdown: Countdown::new(tick_interval),
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Arm, re-arm or cancel the countdown for the run that should be ticking.
    pub fn sync(&mut self, active_epoch: Option<u64>) {
        self.countdown.sync(active_epoch, Instant::now());
    }

    /// Blocks until the next event or countdown tick.
    ///
    /// Returns `None` once the event source is gone.
    pub fn step(&mut self) -> Option<AppEvent> {
        loop {
            if let Some(epoch) = self.countdown.fire_if_due(Instant::now()) {
                return Some(AppEvent::Tick(epoch));
            }
            let timeout = self
                .countdown
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);

            match self.event_source.recv_timeout(timeout) {
                Ok(ev) => return Some(ev),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_when_armed() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(1));
        runner.sync(Some(3));

        assert_matches!(runner.step(), Some(AppEvent::Tick(3)));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_secs(10));
        runner.sync(Some(1));

        assert_matches!(runner.step(), Some(AppEvent::Resize));
    }

    #[test]
    fn step_ends_when_source_disconnects() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));

        assert!(runner.step().is_none());
    }

    #[test]
    fn sync_rearms_for_new_epoch_and_cancels_when_inactive() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(TestEventSource::new(rx), TICK_INTERVAL);

        runner.sync(Some(1));
        assert_eq!(runner.countdown().armed_epoch(), Some(1));

        runner.sync(Some(2));
        assert_eq!(runner.countdown().armed_epoch(), Some(2));

        runner.sync(None);
        assert_eq!(runner.countdown().armed_epoch(), None);
    }

    #[test]
    fn countdown_keeps_a_fixed_cadence() {
        let start = Instant::now();
        let mut countdown = Countdown::new(Duration::from_secs(1));
        countdown.arm(7, start);

        assert_eq!(countdown.fire_if_due(start), None);
        assert_eq!(
            countdown.time_until_due(start + Duration::from_millis(400)),
            Some(Duration::from_millis(600))
        );
        assert_eq!(countdown.fire_if_due(start + Duration::from_millis(1100)), Some(7));
        // next deadline is 2s after arming, not 1s after the late tick
        assert_eq!(
            countdown.time_until_due(start + Duration::from_millis(1100)),
            Some(Duration::from_millis(900))
        );
    }

    #[test]
    fn sync_keeps_schedule_for_same_epoch() {
        let start = Instant::now();
        let mut countdown = Countdown::new(Duration::from_secs(1));
        countdown.sync(Some(1), start);
        countdown.sync(Some(1), start + Duration::from_millis(500));

        assert_eq!(
            countdown.time_until_due(start + Duration::from_millis(500)),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn cancelled_countdown_never_fires() {
        let start = Instant::now();
        let mut countdown = Countdown::new(Duration::from_millis(1));
        countdown.arm(1, start);
        countdown.cancel();

        assert_eq!(countdown.fire_if_due(start + Duration::from_secs(5)), None);
        assert_eq!(countdown.time_until_due(start), None);
    }
}
