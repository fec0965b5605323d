//! Named, enable-able output channels.

use crate::format::ChannelMeta;
use crate::level::ChannelColor;
use crate::registry::ChannelRegistry;
use crate::value::LogValue;
use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;

/// A named output stream created by a [`ChannelRegistry`].
///
/// Whether a channel writes is decided by the registry's current patterns at
/// every call, so enabling a name later also enables channels created
/// earlier. Each channel remembers when it last wrote to compute the
/// `+diff` shown on its lines.
pub struct Channel {
    name: String,
    color: ChannelColor,
    last_write: Mutex<Option<Duration>>,
    registry: ChannelRegistry,
}

impl Channel {
    pub(crate) fn new(registry: ChannelRegistry, name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: ChannelColor::for_name(name),
            last_write: Mutex::new(None),
            registry,
        }
    }

    /// Replace the palette color picked at creation.
    pub fn with_color(mut self, color: ChannelColor) -> Self {
        self.color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> ChannelColor {
        self.color
    }

    pub fn enabled(&self) -> bool {
        self.registry.enabled(&self.name)
    }

    /// Write `message` with positional `args` through the registry's
    /// formatter and sink. Does nothing when the channel is disabled.
    pub fn log(&self, message: &str, args: Vec<LogValue>) {
        if !self.enabled() {
            return;
        }

        let clock = self.registry.clock();
        let now = clock.monotonic();
        let diff = {
            let mut last = self.last_write.lock();
            let diff = last.map_or(Duration::ZERO, |prev| now.saturating_sub(prev));
            *last = Some(now);
            diff
        };

        let meta = ChannelMeta {
            namespace: &self.name,
            color: self.color,
            diff,
            use_colors: self.registry.use_colors(),
        };
        let formatter = self.registry.formatter();
        let line = formatter(&meta, clock.wall(), message, args);
        self.registry.sink().write(&self.name, &line);
    }

    /// Write a message that has no arguments.
    pub fn message(&self, message: &str) {
        self.log(message, Vec::new());
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("color", &self.color)
            .field("enabled", &self.enabled())
            .finish()
    }
}
