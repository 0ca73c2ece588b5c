//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::services::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "focus-timer")]
#[command(about = "A state-managed HTTP server for a subject-tagged focus timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding timer mode, custom duration and subject filter
    #[arg(long, default_value = "focus-timer-prefs.json")]
    pub prefs: PathBuf,

    /// Keep preferences in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Refuse to start the timer until a subject is selected
    #[arg(long)]
    pub require_subject: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Preference backend selected by the flags
    pub fn preference_store(&self) -> Box<dyn PreferenceStore> {
        if self.no_persist {
            Box::new(MemoryPreferenceStore::new())
        } else {
            Box::new(JsonFilePreferenceStore::new(self.prefs.clone()))
        }
    }
}
