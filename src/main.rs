use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keysprint::{
    app::{App, Control},
    config::{Config, ConfigStore, FileConfigStore, TestDuration, TestType, Theme, WordCount},
    error::Result,
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, Runner, TICK_INTERVAL},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// timed typing test for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing test for the terminal: type a stream of common words against the clock, then see your wpm, accuracy and a wpm-over-time chart."
)]
pub struct Cli {
    /// end the test after a fixed time or after a fixed number of words
    #[clap(short = 'm', long, value_enum)]
    mode: Option<TestType>,

    /// number of seconds a timed test lasts
    #[clap(short = 's', long, value_enum)]
    seconds: Option<TestDuration>,

    /// number of words in a words test
    #[clap(short = 'w', long, value_enum)]
    words: Option<WordCount>,

    /// color theme
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// seed the word sampler for a reproducible word stream
    #[clap(long)]
    seed: Option<u64>,

    /// read and write settings at this path instead of the default config dir
    #[clap(long)]
    config: Option<PathBuf>,

    /// do not write settings back on exit
    #[clap(long)]
    no_save: bool,

    /// write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log level used when RUST_LOG is not set
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Layer command line choices over stored settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.test_type = mode;
        }
        if let Some(seconds) = self.seconds {
            config.duration = seconds;
        }
        if let Some(words) = self.words {
            config.word_count = words;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Stored settings with command line choices on top.
    ///
    /// A broken file at the default location falls back to defaults; one
    /// named with `--config` is an error.
    fn load_config(&self, store: &FileConfigStore) -> Result<Config> {
        match store.load() {
            Ok(stored) => Ok(self.apply(stored)),
            Err(e) if self.config.is_some() => Err(e.into()),
            Err(e) => {
                warn!(error = %e, path = %store.path().display(), "ignoring unreadable config");
                Ok(self.apply(Config::default()))
            }
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = &cli.log_file {
        logging::init_logging(path, &cli.log_level)?;
    }

    let store = cli.config_store();
    let mut app = App::new(cli.load_config(&store)?, cli.seed);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), TICK_INTERVAL);
    let outcome = run_app(&mut terminal, &mut app, runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome?;

    if !cli.no_save {
        if let Err(e) = store.save(app.config()) {
            warn!(error = %e, path = %store.path().display(), "failed to save config");
        }
    }
    info!("exiting");
    Ok(())
}

fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E>,
) -> Result<()> {
    loop {
        runner.sync(app.ticking_epoch());
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let Some(event) = runner.step() else {
            warn!("event source closed");
            break;
        };

        match event {
            AppEvent::Tick(epoch) => app.on_tick(epoch),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use assert_matches::assert_matches;
    use keysprint::config::ConfigError;
    use keysprint::error::AppError;
    use keysprint::runtime::TestEventSource;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["keysprint"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.seconds, None);
        assert_eq!(cli.words, None);
        assert_eq!(cli.theme, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.no_save);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_seconds() {
        let cli = Cli::parse_from(["keysprint", "-s", "60"]);
        assert_eq!(cli.seconds, Some(TestDuration::Sixty));

        let cli = Cli::parse_from(["keysprint", "--seconds", "120"]);
        assert_eq!(cli.seconds, Some(TestDuration::OneTwenty));

        assert!(Cli::try_parse_from(["keysprint", "-s", "45"]).is_err());
    }

    #[test]
    fn test_cli_mode_words_and_theme() {
        let cli = Cli::parse_from([
            "keysprint", "-m", "words", "-w", "50", "--theme", "sepia", "--seed", "7",
        ]);

        assert_eq!(cli.mode, Some(TestType::Words));
        assert_eq!(cli.words, Some(WordCount::Fifty));
        assert_eq!(cli.theme, Some(Theme::Sepia));
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_cli_overrides_stored_config() {
        let stored = Config {
            test_type: TestType::Words,
            duration: TestDuration::Fifteen,
            word_count: WordCount::Hundred,
            theme: Theme::Light,
        };
        let cli = Cli::parse_from(["keysprint", "-m", "time", "-s", "60"]);
        let config = cli.apply(stored);

        assert_eq!(config.test_type, TestType::Time);
        assert_eq!(config.duration, TestDuration::Sixty);
        assert_eq!(config.word_count, WordCount::Hundred);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["keysprint", "--config", "/tmp/ks.json"]);
        assert_eq!(
            cli.config_store().path(),
            std::path::Path::new("/tmp/ks.json")
        );
    }

    #[test]
    fn test_explicit_config_path_must_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = Cli::parse_from(["keysprint", "--config", path_arg]);
        let err = cli.load_config(&cli.config_store()).unwrap_err();
        assert_matches!(err, AppError::Config(ConfigError::Parse(_)));
    }

    #[test]
    fn test_explicit_config_path_may_be_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let path_arg = path.to_str().unwrap();

        let cli = Cli::parse_from(["keysprint", "--config", path_arg, "-s", "15"]);
        let config = cli.load_config(&cli.config_store()).unwrap();
        assert_eq!(config.duration, TestDuration::Fifteen);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn test_run_app_quits_on_q() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )))
        .unwrap();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(Config::default(), Some(1));

        run_app(&mut terminal, &mut app, runner).unwrap();
    }

    #[test]
    fn test_run_app_stops_when_events_end() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        tx.send(AppEvent::Resize).unwrap();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(Config::default(), Some(1));

        run_app(&mut terminal, &mut app, runner).unwrap();
        assert!(app.session().is_some());
    }
}
