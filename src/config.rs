use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported {field}: {value}")]
    UnsupportedValue { field: &'static str, value: u32 },
}

/// How a test ends: after a fixed time or after a fixed number of words.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TestType {
    #[default]
    Time,
    Words,
}

impl TestType {
    pub fn next(self) -> Self {
        match self {
            TestType::Time => TestType::Words,
            TestType::Words => TestType::Time,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum TestDuration {
    #[value(name = "15")]
    #[strum(to_string = "15")]
    Fifteen,
    #[default]
    #[value(name = "30")]
    #[strum(to_string = "30")]
    Thirty,
    #[value(name = "60")]
    #[strum(to_string = "60")]
    Sixty,
    #[value(name = "120")]
    #[strum(to_string = "120")]
    OneTwenty,
}

impl TestDuration {
    pub const ALL: [TestDuration; 4] = [
        TestDuration::Fifteen,
        TestDuration::Thirty,
        TestDuration::Sixty,
        TestDuration::OneTwenty,
    ];

    pub fn secs(self) -> u32 {
        match self {
            TestDuration::Fifteen => 15,
            TestDuration::Thirty => 30,
            TestDuration::Sixty => 60,
            TestDuration::OneTwenty => 120,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TestDuration::Fifteen => TestDuration::Thirty,
            TestDuration::Thirty => TestDuration::Sixty,
            TestDuration::Sixty => TestDuration::OneTwenty,
            TestDuration::OneTwenty => TestDuration::Fifteen,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TestDuration::Fifteen => TestDuration::OneTwenty,
            TestDuration::Thirty => TestDuration::Fifteen,
            TestDuration::Sixty => TestDuration::Thirty,
            TestDuration::OneTwenty => TestDuration::Sixty,
        }
    }
}

impl From<TestDuration> for u32 {
    fn from(d: TestDuration) -> Self {
        d.secs()
    }
}

impl TryFrom<u32> for TestDuration {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.secs() == value)
            .ok_or(ConfigError::UnsupportedValue {
                field: "duration",
                value,
            })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum WordCount {
    #[value(name = "10")]
    #[strum(to_string = "10")]
    Ten,
    #[default]
    #[value(name = "25")]
    #[strum(to_string = "25")]
    TwentyFive,
    #[value(name = "50")]
    #[strum(to_string = "50")]
    Fifty,
    #[value(name = "100")]
    #[strum(to_string = "100")]
    Hundred,
}

impl WordCount {
    pub const ALL: [WordCount; 4] = [
        WordCount::Ten,
        WordCount::TwentyFive,
        WordCount::Fifty,
        WordCount::Hundred,
    ];

    pub fn count(self) -> usize {
        match self {
            WordCount::Ten => 10,
            WordCount::TwentyFive => 25,
            WordCount::Fifty => 50,
            WordCount::Hundred => 100,
        }
    }

    pub fn next(self) -> Self {
        match self {
            WordCount::Ten => WordCount::TwentyFive,
            WordCount::TwentyFive => WordCount::Fifty,
            WordCount::Fifty => WordCount::Hundred,
            WordCount::Hundred => WordCount::Ten,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            WordCount::Ten => WordCount::Hundred,
            WordCount::TwentyFive => WordCount::Ten,
            WordCount::Fifty => WordCount::TwentyFive,
            WordCount::Hundred => WordCount::Fifty,
        }
    }
}

impl From<WordCount> for u32 {
    fn from(c: WordCount) -> Self {
        c.count() as u32
    }
}

impl TryFrom<u32> for WordCount {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.count() as u32 == value)
            .ok_or(ConfigError::UnsupportedValue {
                field: "word count",
                value,
            })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Sepia,
}

impl Theme {
    /// Cycle through every theme; used inside a session.
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Sepia,
            Theme::Sepia => Theme::Light,
        }
    }

    /// The start view only offers light and dark.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark | Theme::Sepia => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub test_type: TestType,
    pub duration: TestDuration,
    pub word_count: WordCount,
    pub theme: Theme,
}

pub trait ConfigStore {
    fn load(&self) -> Result<Config, ConfigError>;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keysprint") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("keysprint_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// A missing file yields the defaults.
    fn load(&self) -> Result<Config, ConfigError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice::<Config>(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
