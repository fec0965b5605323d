//! Log levels and their fixed channel colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five leveled channels every logger exposes.
///
/// The channel name of a level is `<namespace>:<suffix>`, so the debug
/// level keeps its historical `debugLogger` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Trace,
    DebugLogger,
    Info,
    Warn,
    Error,
}

impl Level {
    /// All levels in channel construction order.
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::DebugLogger,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// Trailing channel-name segment for this level.
    pub fn suffix(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::DebugLogger => "debugLogger",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Fixed display color assigned to the level's channel.
    pub fn color(self) -> ChannelColor {
        match self {
            Level::Trace => ChannelColor::Cyan,
            Level::DebugLogger => ChannelColor::Blue,
            Level::Info => ChannelColor::Green,
            Level::Warn => ChannelColor::Orange,
            Level::Error => ChannelColor::Red,
        }
    }

    /// Resolve a level from the last segment of a channel name.
    pub fn from_channel_name(name: &str) -> Option<Level> {
        let suffix = name.rsplit(':').next()?;
        Level::ALL.into_iter().find(|level| level.suffix() == suffix)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Error returned when a string does not name a level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level '{0}' (expected trace, debug, info, warn or error)")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" | "debuglogger" => Ok(Level::DebugLogger),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Display color attached to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelColor {
    Cyan,
    Blue,
    Green,
    Orange,
    Red,
}

impl ChannelColor {
    /// Palette used when a channel is created without an explicit color.
    pub const PALETTE: [ChannelColor; 5] = [
        ChannelColor::Cyan,
        ChannelColor::Blue,
        ChannelColor::Green,
        ChannelColor::Orange,
        ChannelColor::Red,
    ];

    /// CSS color name, as used in `color: <name>` style arguments.
    pub fn css_name(self) -> &'static str {
        match self {
            ChannelColor::Cyan => "cyan",
            ChannelColor::Blue => "blue",
            ChannelColor::Green => "green",
            ChannelColor::Orange => "orange",
            ChannelColor::Red => "red",
        }
    }

    /// Terminal color for ANSI output. Orange has no basic ANSI slot.
    pub fn to_terminal(self) -> colored::Color {
        match self {
            ChannelColor::Cyan => colored::Color::Cyan,
            ChannelColor::Blue => colored::Color::Blue,
            ChannelColor::Green => colored::Color::Green,
            ChannelColor::Orange => colored::Color::TrueColor {
                r: 255,
                g: 165,
                b: 0,
            },
            ChannelColor::Red => colored::Color::Red,
        }
    }

    /// Stable palette pick for a channel name.
    ///
    /// Uses the 32-bit `(hash << 5) - hash + c` string hash so the same name
    /// always lands on the same color.
    pub fn for_name(name: &str) -> ChannelColor {
        let hash = name.chars().fold(0i32, |hash, c| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(c as i32)
        });
        let index = (hash.unsigned_abs() as usize) % Self::PALETTE.len();
        Self::PALETTE[index]
    }
}

impl fmt::Display for ChannelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}
