use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::{Config, TestType};
use crate::session::{KeyInput, Session};

/// What the app shows: the start screen or a running session.
#[derive(Debug)]
pub enum View {
    Start,
    Session(Session),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Map a terminal key to a session keystroke.
pub fn classify(key: &KeyEvent) -> KeyInput {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return KeyInput::Other;
    }
    match key.code {
        KeyCode::Char(' ') => KeyInput::Space,
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Backspace => KeyInput::Backspace,
        _ => KeyInput::Other,
    }
}

/// The session shell: owns the test configuration and theme, and hands them
/// to a new [`Session`] when a test starts.
#[derive(Debug)]
pub struct App {
    config: Config,
    view: View,
    rng: StdRng,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            view: View::Start,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.view {
            View::Session(session) => Some(session),
            View::Start => None,
        }
    }

    /// Epoch of the run whose countdown should be running.
    pub fn ticking_epoch(&self) -> Option<u64> {
        self.session().and_then(Session::ticking_epoch)
    }

    pub fn start_test(&mut self) {
        let seed = self.rng.gen();
        info!(
            test_type = %self.config.test_type,
            duration = %self.config.duration,
            words = %self.config.word_count,
            theme = %self.config.theme,
            "opening typing session"
        );
        self.view = View::Session(Session::with_seed(&self.config, seed));
    }

    pub fn back_to_start(&mut self) {
        debug!("back to start view");
        self.view = View::Start;
    }

    pub fn on_tick(&mut self, epoch: u64) {
        if let View::Session(session) = &mut self.view {
            session.on_tick(epoch);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.view {
            View::Start => self.on_start_key(key),
            View::Session(_) => self.on_session_key(key),
        }
    }

    fn on_start_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.start_test();
                return Control::Continue;
            }
            _ => {}
        }

        let cfg = &mut self.config;
        match key.code {
            KeyCode::Char('m') => cfg.test_type = cfg.test_type.next(),
            KeyCode::Char('t') => cfg.theme = cfg.theme.toggle(),
            KeyCode::Char('d') | KeyCode::Right => match cfg.test_type {
                TestType::Time => cfg.duration = cfg.duration.next(),
                TestType::Words => cfg.word_count = cfg.word_count.next(),
            },
            KeyCode::Left => match cfg.test_type {
                TestType::Time => cfg.duration = cfg.duration.prev(),
                TestType::Words => cfg.word_count = cfg.word_count.prev(),
            },
            _ => {}
        }
        Control::Continue
    }

    fn on_session_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc {
            self.back_to_start();
            return Control::Continue;
        }
        let View::Session(session) = &mut self.view else {
            return Control::Continue;
        };

        if session.results().is_some() {
            match key.code {
                KeyCode::Char('q') => return Control::Quit,
                KeyCode::Char('r') | KeyCode::Enter | KeyCode::Tab => session.restart(),
                KeyCode::Char('t') => session.cycle_theme(),
                KeyCode::Char('d') => session.cycle_duration(),
                _ => {}
            }
            return Control::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => session.restart(),
            KeyCode::Char('t') if ctrl => session.cycle_theme(),
            KeyCode::Char('d') if ctrl => session.cycle_duration(),
            _ => {
                let effect = session.on_key(classify(&key));
                trace!(code = ?key.code, ?effect, "keystroke");
            }
        }
        Control::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TestDuration, Theme};
    use crate::session::Phase;
    use assert_matches::assert_matches;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn classify_maps_keys() {
        assert_eq!(classify(&press(KeyCode::Char(' '))), KeyInput::Space);
        assert_eq!(classify(&press(KeyCode::Char('x'))), KeyInput::Char('x'));
        assert_eq!(
            classify(&KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            KeyInput::Char('X')
        );
        assert_eq!(classify(&press(KeyCode::Backspace)), KeyInput::Backspace);
        assert_eq!(classify(&press(KeyCode::Left)), KeyInput::Other);
        assert_eq!(classify(&ctrl('w')), KeyInput::Other);
    }

    #[test]
    fn start_view_edits_config() {
        let mut app = App::new(Config::default(), Some(1));

        app.on_key(press(KeyCode::Char('d')));
        assert_eq!(app.config().duration, TestDuration::Sixty);
        app.on_key(press(KeyCode::Left));
        app.on_key(press(KeyCode::Left));
        assert_eq!(app.config().duration, TestDuration::Fifteen);

        app.on_key(press(KeyCode::Char('t')));
        assert_eq!(app.config().theme, Theme::Light);

        app.on_key(press(KeyCode::Char('m')));
        assert_eq!(app.config().test_type, TestType::Words);
        assert_matches!(app.view(), View::Start);
    }

    #[test]
    fn enter_opens_an_idle_session_with_shell_config() {
        let mut app = App::new(Config::default(), Some(1));
        app.on_key(press(KeyCode::Char('d')));
        app.on_key(press(KeyCode::Enter));

        let session = app.session().unwrap();
        assert!(session.is_idle());
        assert_eq!(session.time_left(), Some(60));
        assert_eq!(app.ticking_epoch(), None);
    }

    #[test]
    fn typing_starts_the_countdown() {
        let mut app = App::new(Config::default(), Some(1));
        app.start_test();

        app.on_key(press(KeyCode::Char('z')));
        assert_eq!(app.ticking_epoch(), Some(1));

        app.on_tick(1);
        assert_eq!(app.session().unwrap().elapsed(), 1);
    }

    #[test]
    fn session_changes_do_not_leak_into_shell() {
        let mut app = App::new(Config::default(), Some(1));
        app.start_test();
        app.on_key(ctrl('t'));
        app.on_key(ctrl('d'));

        let session = app.session().unwrap();
        assert_eq!(session.theme(), Theme::Sepia);
        assert_eq!(session.pending_duration(), TestDuration::Sixty);
        assert!(session.is_idle());
        assert_eq!(app.config().theme, Theme::Dark);
        assert_eq!(app.config().duration, TestDuration::Thirty);
    }

    #[test]
    fn escape_leaves_session_and_stops_the_clock() {
        let mut app = App::new(Config::default(), Some(1));
        app.start_test();
        app.on_key(press(KeyCode::Char('a')));
        assert!(app.ticking_epoch().is_some());

        assert_eq!(app.on_key(press(KeyCode::Esc)), Control::Continue);
        assert_matches!(app.view(), View::Start);
        assert_eq!(app.ticking_epoch(), None);

        assert_eq!(app.on_key(press(KeyCode::Esc)), Control::Quit);
    }

    #[test]
    fn results_keys_restart_or_quit() {
        let config = Config {
            duration: TestDuration::Fifteen,
            ..Config::default()
        };
        let mut app = App::new(config, Some(1));
        app.start_test();
        app.on_key(press(KeyCode::Char('a')));
        for _ in 0..15 {
            app.on_tick(1);
        }
        assert_matches!(app.session().unwrap().phase(), Phase::Completed(_));

        // plain letters no longer reach the session
        app.on_key(press(KeyCode::Char('x')));
        assert!(app.session().unwrap().results().is_some());

        app.on_key(press(KeyCode::Char('r')));
        let session = app.session().unwrap();
        assert!(session.is_active());
        assert_eq!(session.epoch(), 2);
        assert_eq!(session.stream().len(), 100);

        app.on_tick(1);
        assert_eq!(app.session().unwrap().elapsed(), 0);
    }

    #[test]
    fn results_quit() {
        let config = Config {
            duration: TestDuration::Fifteen,
            ..Config::default()
        };
        let mut app = App::new(config, Some(1));
        app.start_test();
        app.on_key(press(KeyCode::Char('a')));
        for _ in 0..15 {
            app.on_tick(1);
        }
        assert_eq!(app.on_key(press(KeyCode::Char('q'))), Control::Quit);
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let mut app = App::new(Config::default(), Some(1));
        assert_eq!(app.on_key(ctrl('c')), Control::Quit);
        app.start_test();
        assert_eq!(app.on_key(ctrl('c')), Control::Quit);
    }

    #[test]
    fn same_seed_same_words() {
        let mut a = App::new(Config::default(), Some(9));
        let mut b = App::new(Config::default(), Some(9));
        a.start_test();
        b.start_test();

        assert_eq!(
            a.session().unwrap().stream().words(),
            b.session().unwrap().stream().words()
        );
    }
}
