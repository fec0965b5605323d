//! # Namespaced Logger
//!
//! A [`Logger`] bundles the five leveled channels of one namespace with a
//! map of named timers and the call-tracing helpers built on them.
//!
//! ```rust
//! use chanlog::{ChannelRegistry, LogValue};
//! use chanlog::sink::MemorySink;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let registry = ChannelRegistry::builder().sink(sink.clone()).build();
//! let mut logger = registry.logger("svc");
//!
//! logger.enter("load", &[("id", LogValue::from(7i64))]);
//! let elapsed = logger.exit("load");
//! assert!(!elapsed.is_missing());
//! assert!(sink.texts()[0].contains("ENTER: load(id: 7)"));
//! ```
//!
//! ## Timers
//!
//! `time`/`enter` start a timer under a label; `time_end`/`exit`/
//! `return_value` stop it, log the elapsed milliseconds and remove the
//! label. Stopping a label that was never started logs a warning and yields
//! [`Elapsed::missing`], whose value is `NaN`.
//!
//! Timer methods take `&mut self`: one writer per label at a time.

use crate::channel::Channel;
use crate::humanize::format_millis;
use crate::level::Level;
use crate::registry::ChannelRegistry;
use crate::value::LogValue;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Elapsed time reported when a timer is stopped.
///
/// Displays as milliseconds with three decimals, or `NaN` when the timer
/// label did not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(Option<Duration>);

impl Elapsed {
    pub fn new(duration: Duration) -> Self {
        Self(Some(duration))
    }

    /// Sentinel for a label that was never started.
    pub fn missing() -> Self {
        Self(None)
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_none()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.0
    }

    /// Milliseconds as a float; `NaN` when missing.
    pub fn as_millis_f64(&self) -> f64 {
        self.0
            .map_or(f64::NAN, |duration| duration.as_secs_f64() * 1_000.0)
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(duration) => f.write_str(&format_millis(duration)),
            None => f.write_str("NaN"),
        }
    }
}

/// Five leveled channels for one namespace, plus named timers.
#[derive(Debug)]
pub struct Logger {
    name: String,
    timers: HashMap<String, Duration>,
    trace: Channel,
    debug_logger: Channel,
    info: Channel,
    warn: Channel,
    error: Channel,
    registry: ChannelRegistry,
}

/// Build the logger for `namespace` on `registry`.
pub fn create_logger(registry: &ChannelRegistry, namespace: &str) -> Logger {
    Logger::new(registry, namespace)
}

impl Logger {
    /// Create channels `<namespace>:<level>` for every level, color them,
    /// enable them in the registry and install the composed line layout,
    /// unless the registry already has an explicitly chosen formatter.
    ///
    /// The namespace is used as given; an empty one yields channels such as
    /// `:info`.
    pub fn new(registry: &ChannelRegistry, namespace: &str) -> Self {
        registry.install_logger_formatter();

        let make = |level: Level| {
            let name = format!("{}:{}", namespace, level.suffix());
            let channel = registry.channel(&name).with_color(level.color());
            registry.enable_name(&name);
            channel
        };

        Self {
            name: namespace.to_string(),
            timers: HashMap::new(),
            trace: make(Level::Trace),
            debug_logger: make(Level::DebugLogger),
            info: make(Level::Info),
            warn: make(Level::Warn),
            error: make(Level::Error),
            registry: registry.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn channel(&self, level: Level) -> &Channel {
        match level {
            Level::Trace => &self.trace,
            Level::DebugLogger => &self.debug_logger,
            Level::Info => &self.info,
            Level::Warn => &self.warn,
            Level::Error => &self.error,
        }
    }

    pub fn trace(&self) -> &Channel {
        &self.trace
    }

    pub fn debug_logger(&self) -> &Channel {
        &self.debug_logger
    }

    pub fn info(&self) -> &Channel {
        &self.info
    }

    pub fn warn(&self) -> &Channel {
        &self.warn
    }

    pub fn error(&self) -> &Channel {
        &self.error
    }

    /// Names of the five channels, in level order.
    pub fn channel_names(&self) -> Vec<&str> {
        Level::ALL.iter().map(|&l| self.channel(l).name()).collect()
    }

    pub fn log(&self, level: Level, message: &str, args: Vec<LogValue>) {
        self.channel(level).log(message, args);
    }

    /// Child logger for `<namespace>:<suffix>` on the same registry.
    pub fn extend(&self, suffix: &str) -> Logger {
        Logger::new(&self.registry, &format!("{}:{}", self.name, suffix))
    }

    pub fn has_timer(&self, label: &str) -> bool {
        self.timers.contains_key(label)
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Start (or restart) the timer `label`.
    pub fn time(&mut self, label: &str) {
        let now = self.registry.clock().monotonic();
        self.timers.insert(label.to_string(), now);
    }

    /// Stop `label`, logging `(<elapsed>ms) <label>` at `level` (trace by
    /// default).
    pub fn time_end(&mut self, label: &str, level: Option<Level>) -> Elapsed {
        let Some(elapsed) = self.stop(label, "time_end") else {
            return Elapsed::missing();
        };
        self.log(
            level.unwrap_or(Level::Trace),
            &format!("(%sms) {}", label),
            vec![elapsed.to_string().into()],
        );
        elapsed
    }

    /// Start a timer for `name` and log the call with its arguments.
    pub fn enter(&mut self, name: &str, args: &[(&str, LogValue)]) {
        self.time(name);

        if args.is_empty() {
            self.trace.message(&format!("ENTER: {}", name));
            return;
        }

        let params: Vec<String> = args
            .iter()
            .map(|(key, value)| format!("{}: {}", key, placeholder(value)))
            .collect();
        let values = args.iter().map(|(_, value)| value.clone()).collect();
        self.trace
            .log(&format!("ENTER: {}({})", name, params.join(", ")), values);
    }

    /// Stop the timer started by [`enter`](Self::enter) and log the exit.
    pub fn exit(&mut self, name: &str) -> Elapsed {
        let Some(elapsed) = self.stop(name, "exit") else {
            return Elapsed::missing();
        };
        self.trace.log(
            &format!("EXIT: (%sms) {}", name),
            vec![elapsed.to_string().into()],
        );
        elapsed
    }

    /// Stop the timer started by [`enter`](Self::enter) and log the returned
    /// value.
    pub fn return_value(&mut self, name: &str, value: impl Into<LogValue>) -> Elapsed {
        let value = value.into();
        let Some(elapsed) = self.stop(name, "return_value") else {
            return Elapsed::missing();
        };
        self.trace.log(
            &format!("RETURN: (%sms) {} > {}", name, placeholder(&value)),
            vec![elapsed.to_string().into(), value],
        );
        elapsed
    }

    /// Log `name: <value>` at `level` (trace by default).
    pub fn arg(&self, name: &str, value: impl Into<LogValue>, level: Option<Level>) {
        let value = value.into();
        self.log(
            level.unwrap_or(Level::Trace),
            &format!("{}: {}", name, placeholder(&value)),
            vec![value],
        );
    }

    fn stop(&mut self, label: &str, operation: &str) -> Option<Elapsed> {
        match self.timers.remove(label) {
            Some(start) => {
                let now = self.registry.clock().monotonic();
                Some(Elapsed::new(now.saturating_sub(start)))
            }
            None => {
                self.warn.log(
                    "No such label '%s' for %s",
                    vec![label.into(), operation.into()],
                );
                None
            }
        }
    }
}

fn placeholder(value: &LogValue) -> &'static str {
    if value.is_structured() {
        "%O"
    } else {
        "%s"
    }
}
