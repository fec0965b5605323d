//! # Channel Registry
//!
//! The registry is the provider behind every channel: it decides which
//! channel names are enabled, holds the formatting hook shared by all of its
//! loggers, and owns the sink and clock.
//!
//! Enablement is scoped to a registry value rather than to the process, so
//! independent logging setups (for example one per test) never see each
//! other's patterns. Clones of a registry share the same state.
//!
//! ## Patterns
//!
//! [`ChannelRegistry::enable`] accepts a list of patterns separated by commas
//! or whitespace:
//!
//! - `svc:info` enables exactly that channel
//! - `svc:*` enables every channel starting with `svc:`
//! - `-svc:trace` skips a channel even if another pattern enables it
//!
//! Loggers enable their own channels with [`ChannelRegistry::enable_name`],
//! which matches the name literally: a namespace such as `-svc` or `a*` is a
//! name there, not a pattern. Skip patterns still apply to those names.
//!
//! ```rust
//! use chanlog::ChannelRegistry;
//!
//! let registry = ChannelRegistry::new();
//! registry.enable("svc:*,-svc:trace");
//! assert!(registry.enabled("svc:info"));
//! assert!(!registry.enabled("svc:trace"));
//! assert!(!registry.enabled("other:info"));
//! ```

use crate::channel::Channel;
use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::format::{self, Formatter};
use crate::logger::Logger;
use crate::sink::{ConsoleSink, Sink};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared channel provider. Cheap to clone.
#[derive(Clone)]
pub struct ChannelRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    filter: RwLock<Filter>,
    formatter: RwLock<FormatterSlot>,
    sink: Arc<dyn Sink>,
    clock: Arc<dyn Clock>,
    use_colors: bool,
}

#[derive(Debug, Default, Clone)]
struct Filter {
    names: Vec<String>,
    skips: Vec<String>,
    /// Literal channel names, compared with `==`.
    exact: Vec<String>,
}

#[derive(Clone, Copy)]
struct FormatterSlot {
    formatter: Formatter,
    /// Set once a formatter is chosen explicitly; loggers then keep it.
    explicit: bool,
}

impl Filter {
    fn add(&mut self, pattern: &str) {
        let (list, pattern) = match pattern.strip_prefix('-') {
            Some(skip) => (&mut self.skips, skip),
            None => (&mut self.names, pattern),
        };
        if !pattern.is_empty() && !list.iter().any(|p| p == pattern) {
            list.push(pattern.to_string());
        }
    }

    fn add_exact(&mut self, name: &str) {
        if !self.exact.iter().any(|n| n == name) {
            self.exact.push(name.to_string());
        }
    }

    fn add_all(&mut self, patterns: &str) {
        for pattern in split_patterns(patterns) {
            self.add(pattern);
        }
    }

    fn enabled(&self, name: &str) -> bool {
        if name.ends_with('*') {
            return true;
        }
        if self.skips.iter().any(|p| wildcard_match(p, name)) {
            return false;
        }
        self.exact.iter().any(|n| n == name)
            || self.names.iter().any(|p| wildcard_match(p, name))
    }

    fn source(&self) -> String {
        self.names
            .iter()
            .cloned()
            .chain(self.skips.iter().map(|s| format!("-{}", s)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn split_patterns(patterns: &str) -> impl Iterator<Item = &str> {
    patterns
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
}

/// Match `text` against `pattern`, where `*` matches any run of characters.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

impl ChannelRegistry {
    /// Registry configured from defaults: console sink, system clock,
    /// automatic color detection, nothing enabled.
    pub fn new() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// Registry with a console sink and system clock configured from
    /// `config`.
    pub fn from_config(config: &RegistryConfig) -> Self {
        let use_colors = config.colors.resolve();
        let mut builder = Self::builder()
            .use_colors(use_colors)
            .sink(Arc::new(ConsoleSink::new(use_colors)));
        if let Some(filter) = &config.filter {
            builder = builder.filter(filter);
        }
        builder.build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Create a channel handle for `name`.
    pub fn channel(&self, name: &str) -> Channel {
        Channel::new(self.clone(), name)
    }

    /// Build the five-channel logger for `namespace` on this registry.
    pub fn logger(&self, namespace: &str) -> Logger {
        Logger::new(self, namespace)
    }

    /// Add enable/skip patterns to the current set.
    pub fn enable(&self, patterns: &str) {
        debug!("Enabling channel patterns: {}", patterns);
        self.inner.filter.write().add_all(patterns);
    }

    /// Enable exactly one channel name. The name is never split or read as
    /// a pattern, so `-` and `*` in it are literal.
    pub fn enable_name(&self, name: &str) {
        self.inner.filter.write().add_exact(name);
    }

    /// Replace all patterns.
    pub fn set_filter(&self, patterns: &str) {
        debug!("Replacing channel filter with: {}", patterns);
        let mut filter = Filter::default();
        filter.add_all(patterns);
        *self.inner.filter.write() = filter;
    }

    /// Clear all patterns and exact names, returning the previous patterns
    /// in `enable` syntax. Names added by [`enable_name`](Self::enable_name)
    /// are not part of the returned string.
    pub fn disable(&self) -> String {
        let previous = std::mem::take(&mut *self.inner.filter.write());
        let source = previous.source();
        debug!("Disabled channel patterns: {}", source);
        source
    }

    /// Current patterns in `enable` syntax, without exact names.
    pub fn filter(&self) -> String {
        self.inner.filter.read().source()
    }

    pub fn enabled(&self, name: &str) -> bool {
        self.inner.filter.read().enabled(name)
    }

    /// Install the formatting hook used by every channel of this registry.
    ///
    /// Installing the same hook again has no further effect. A hook installed
    /// here is kept when loggers are created afterwards.
    pub fn install_formatter(&self, formatter: Formatter) {
        *self.inner.formatter.write() = FormatterSlot {
            formatter,
            explicit: true,
        };
    }

    /// Install [`format::compose`] unless a formatter was chosen explicitly.
    pub(crate) fn install_logger_formatter(&self) {
        let mut slot = self.inner.formatter.write();
        if !slot.explicit {
            slot.formatter = format::compose;
        }
    }

    pub fn formatter(&self) -> Formatter {
        self.inner.formatter.read().formatter
    }

    pub fn use_colors(&self) -> bool {
        self.inner.use_colors
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.inner.sink
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("filter", &self.filter())
            .field("use_colors", &self.inner.use_colors)
            .field("sink", &self.inner.sink)
            .finish()
    }
}

/// Builder for [`ChannelRegistry`].
pub struct RegistryBuilder {
    filter: Filter,
    formatter: FormatterSlot,
    sink: Option<Arc<dyn Sink>>,
    clock: Option<Arc<dyn Clock>>,
    use_colors: bool,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            formatter: FormatterSlot {
                formatter: format::bare,
                explicit: false,
            },
            sink: None,
            clock: None,
            use_colors: false,
        }
    }
}

impl RegistryBuilder {
    /// Initial enable/skip patterns.
    pub fn filter(mut self, patterns: &str) -> Self {
        self.filter.add_all(patterns);
        self
    }

    /// Line formatter for every channel. Loggers built on the registry keep
    /// it instead of installing their composed layout.
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = FormatterSlot {
            formatter,
            explicit: true,
        };
        self
    }

    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn use_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn build(self) -> ChannelRegistry {
        let use_colors = self.use_colors;
        ChannelRegistry {
            inner: Arc::new(RegistryInner {
                filter: RwLock::new(self.filter),
                formatter: RwLock::new(self.formatter),
                sink: self
                    .sink
                    .unwrap_or_else(|| Arc::new(ConsoleSink::new(use_colors))),
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
                use_colors,
            }),
        }
    }
}
