//! Registry configuration from code or the environment.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the initial enable/skip patterns.
pub const FILTER_ENV: &str = "DEBUG";

/// Environment variable forcing colors on or off.
pub const COLORS_ENV: &str = "DEBUG_COLORS";

/// When to emit colored output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorChoice {
    /// Decide whether colors are in use.
    pub fn resolve(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl std::fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorChoice::Auto => write!(f, "auto"),
            ColorChoice::Always => write!(f, "always"),
            ColorChoice::Never => write!(f, "never"),
        }
    }
}

/// Error returned for an unrecognized color setting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color setting '{0}' (expected a boolean-like value, auto, always or never)")]
pub struct ParseColorChoiceError(pub String);

impl FromStr for ColorChoice {
    type Err = ParseColorChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(ColorChoice::Auto),
            "1" | "true" | "yes" | "on" | "always" => Ok(ColorChoice::Always),
            "0" | "false" | "no" | "off" | "never" => Ok(ColorChoice::Never),
            _ => Err(ParseColorChoiceError(s.to_string())),
        }
    }
}

/// Settings a [`ChannelRegistry`](crate::ChannelRegistry) is built from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Initial enable/skip patterns.
    pub filter: Option<String>,
    pub colors: ColorChoice,
}

impl RegistryConfig {
    /// Read `DEBUG` and `DEBUG_COLORS` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = lookup(FILTER_ENV).filter(|f| !f.trim().is_empty());
        let colors = match lookup(COLORS_ENV) {
            Some(value) => value
                .parse()
                .with_context(|| format!("Failed to parse {}", COLORS_ENV))?,
            None => ColorChoice::Auto,
        };
        Ok(Self { filter, colors })
    }
}
