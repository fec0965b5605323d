//! # chanlog
//!
//! Namespaced, color-coded channel logging with call-entry/exit tracing and
//! elapsed-time measurement.
//!
//! Every logger owns five leveled channels named `<namespace>:<level>`
//! (`trace`, `debugLogger`, `info`, `warn`, `error`), each with a fixed color,
//! and a map of named timers. Lines are rendered as
//!
//! ```text
//! 2024-03-01 12:00:00 INFO[sub] connected to db (+12ms)
//! ```
//!
//! ## Architecture Overview
//!
//! - `registry`: the channel provider; enable/skip patterns, the shared
//!   formatting hook, the sink and the clock
//! - `channel`: named, enable-able output streams
//! - `logger`: the five-channel logger and its timing/tracing helpers
//! - `format`: line layout and placeholder substitution
//! - `value`: loggable values and their structural rendering
//! - `sink`: console, `tracing` and in-memory destinations
//!
//! ## Usage Example
//!
//! ```rust
//! use chanlog::{ChannelRegistry, Level, LogValue};
//! use chanlog::sink::MemorySink;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let registry = ChannelRegistry::builder().sink(sink.clone()).build();
//! let mut logger = registry.logger("app:net");
//!
//! logger.time("connect");
//! logger.info().log("dialing %s", vec![LogValue::from("10.0.0.1")]);
//! let elapsed = logger.time_end("connect", Some(Level::Info));
//!
//! assert!(elapsed.as_millis_f64() >= 0.0);
//! assert_eq!(sink.len(), 2);
//! ```
//!
//! ## Enablement
//!
//! Enablement belongs to a [`ChannelRegistry`] value, not to the process.
//! Creating a logger enables its own five channels in its registry; other
//! channels follow the registry's patterns (see [`registry`]).

/// Channel provider
///
/// Creates channels, decides which names are enabled, and holds the
/// formatter, sink and clock shared by everything built on it.
pub mod registry;

pub mod channel;

/// Five-channel loggers with named timers and call tracing
pub mod logger;

/// Line layout and placeholder substitution
pub mod format;

pub mod value;

pub mod sink;

pub mod level;

pub mod humanize;

pub mod clock;

/// Configuration from code or the `DEBUG`/`DEBUG_COLORS` environment
pub mod config;

/// Command-line interface of the demo binary
pub mod cli;

/// Colorized `tracing` output for the demo binary
pub mod logging;

pub use channel::Channel;
pub use config::{ColorChoice, RegistryConfig};
pub use format::{ChannelMeta, FormattedLine, Formatter};
pub use level::{ChannelColor, Level};
pub use logger::{create_logger, Elapsed, Logger};
pub use registry::ChannelRegistry;
pub use sink::{ConsoleSink, MemorySink, Sink, TracingSink};
pub use value::{serialize, LogValue};

/// The current version of chanlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// `strftime` layout of the line timestamp (`YYYY-MM-DD HH:mm:ss`).
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Nesting depth shown by structural (`%O`) rendering.
    pub const INSPECT_DEPTH: usize = 2;

    /// Nesting depth shown by [`serialize`](crate::value::serialize).
    pub const SERIALIZE_DEPTH: usize = 1;

    /// Array elements shown by structural rendering before eliding.
    pub const INSPECT_MAX_ARRAY_LENGTH: usize = 100;

    /// Width at which structural rendering breaks onto multiple lines.
    pub const INSPECT_BREAK_LENGTH: usize = 80;

    /// Namespace used by the demo binary.
    pub const DEMO_NAMESPACE: &str = "chanlog:demo";

    /// Iterations of the demo workload.
    pub const DEMO_ITERATIONS: usize = 3;
}
