//! Error types for readaloud.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadaloudError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Article input errors
    #[error("Article not found at {path}")]
    ArticleNotFound { path: String },

    #[error("Invalid related articles: {message}")]
    RelatedArticles { message: String },

    // Speech engine errors
    #[error("Speech engine unavailable ({engine}): {message}")]
    SpeechUnavailable { engine: String, message: String },

    #[error("Speech tool not found: {tool}")]
    SpeechToolNotFound { tool: String },

    #[error("Speech synthesis failed: {message}")]
    SpeechFailed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ReadaloudError>;
