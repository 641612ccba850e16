use crate::defaults;
use crate::error::{ReadaloudError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub narration: NarrationConfig,
    pub speech: SpeechConfig,
    pub render: RenderConfig,
}

/// Narration controller configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NarrationConfig {
    /// Pause between cancel and restart on replay.
    pub replay_yield_ms: u64,
}

/// Speech engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpeechConfig {
    pub backend: SpeechBackend,
    /// Synthesizer program for the command backend.
    pub command: String,
    /// Extra arguments placed before the text.
    pub args: Vec<String>,
    pub words_per_minute: u32,
}

/// Speech backend enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    /// Silent, fixed-interval word timing.
    Estimated,
    /// An external synthesizer process.
    Command,
}

/// Render configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub read_also_after: Vec<usize>,
    pub read_also_path: String,
    /// Blocks shown on each side of the active block in the terminal.
    pub context_blocks: usize,
    pub format: OutputFormat,
}

/// How a render tree is printed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Ansi,
    Html,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            replay_yield_ms: defaults::REPLAY_YIELD_MS,
        }
    }
}

impl NarrationConfig {
    pub fn replay_yield(&self) -> Duration {
        Duration::from_millis(self.replay_yield_ms)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackend::Estimated,
            command: defaults::SPEECH_COMMAND.to_string(),
            args: Vec::new(),
            words_per_minute: defaults::WORDS_PER_MINUTE,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            read_also_after: defaults::READ_ALSO_AFTER.to_vec(),
            read_also_path: defaults::READ_ALSO_PATH.to_string(),
            context_blocks: defaults::CONTEXT_BLOCKS,
            format: OutputFormat::Ansi,
        }
    }
}

impl SpeechBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechBackend::Estimated => "estimated",
            SpeechBackend::Command => "command",
        }
    }
}

impl fmt::Display for SpeechBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeechBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "estimated" => Ok(SpeechBackend::Estimated),
            "command" => Ok(SpeechBackend::Command),
            other => Err(format!(
                "unknown speech backend '{other}' (expected 'estimated' or 'command')"
            )),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" => Ok(OutputFormat::Ansi),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!(
                "unknown output format '{other}' (expected 'ansi' or 'html')"
            )),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values. The result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReadaloudError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ReadaloudError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Invalid TOML and invalid values are still errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(ReadaloudError::ConfigFileNotFound { .. }) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - READALOUD_SPEECH_BACKEND → speech.backend
    /// - READALOUD_SPEECH_COMMAND → speech.command
    /// - READALOUD_WPM → speech.words_per_minute
    ///
    /// Empty or unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(backend) = std::env::var("READALOUD_SPEECH_BACKEND")
            && !backend.is_empty()
        {
            match backend.parse() {
                Ok(backend) => self.speech.backend = backend,
                Err(e) => tracing::warn!("ignoring READALOUD_SPEECH_BACKEND: {e}"),
            }
        }

        if let Ok(command) = std::env::var("READALOUD_SPEECH_COMMAND")
            && !command.is_empty()
        {
            self.speech.command = command;
        }

        if let Ok(wpm) = std::env::var("READALOUD_WPM")
            && !wpm.is_empty()
        {
            match wpm.trim().parse::<u32>() {
                Ok(wpm) if wpm > 0 => self.speech.words_per_minute = wpm,
                _ => tracing::warn!(value = %wpm, "ignoring READALOUD_WPM"),
            }
        }

        self
    }

    /// Check values serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        if self.speech.words_per_minute == 0 {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "speech.words_per_minute".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.speech.backend == SpeechBackend::Command && self.speech.command.trim().is_empty() {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "speech.command".to_string(),
                message: "required for the command backend".to_string(),
            });
        }

        if self
            .render
            .read_also_after
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "render.read_also_after".to_string(),
                message: format!(
                    "positions must be strictly increasing, got {:?}",
                    self.render.read_also_after
                ),
            });
        }

        Ok(())
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ReadaloudError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/readaloud/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("readaloud").join("config.toml"))
            .ok_or_else(|| ReadaloudError::Other("could not determine config directory".to_string()))
    }
}
