//! Output sinks for formatted lines.

use crate::format::FormattedLine;
use crate::level::Level;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;

/// Destination of formatted lines.
///
/// Implementations must not panic; a failed write is dropped.
pub trait Sink: Send + Sync + fmt::Debug {
    fn write(&self, channel: &str, line: &FormattedLine);
}

/// Prints one line per call on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    ansi: bool,
}

impl ConsoleSink {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, _channel: &str, line: &FormattedLine) {
        let text = line.render(self.ansi);
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", text);
    }
}

/// Forwards lines to `tracing`, at the level named by the channel suffix.
///
/// Channels whose suffix is not a level are emitted at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn write(&self, channel: &str, line: &FormattedLine) {
        let text = line.render(false);
        match Level::from_channel_name(channel) {
            Some(Level::Trace) => tracing::trace!(channel, "{}", text),
            Some(Level::DebugLogger) => tracing::debug!(channel, "{}", text),
            Some(Level::Warn) => tracing::warn!(channel, "{}", text),
            Some(Level::Error) => tracing::error!(channel, "{}", text),
            Some(Level::Info) | None => tracing::info!(channel, "{}", text),
        }
    }
}

/// A line captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub channel: String,
    pub text: String,
}

/// Keeps plain renderings in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<CapturedLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().clone()
    }

    /// Captured texts, in write order.
    pub fn texts(&self) -> Vec<String> {
        self.lines.lock().iter().map(|l| l.text.clone()).collect()
    }

    /// Captured texts written to `channel`.
    pub fn texts_for(&self, channel: &str) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.channel == channel)
            .map(|l| l.text.clone())
            .collect()
    }

    /// Drain everything captured so far.
    pub fn take(&self) -> Vec<CapturedLine> {
        std::mem::take(&mut *self.lines.lock())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Sink for MemorySink {
    fn write(&self, channel: &str, line: &FormattedLine) {
        self.lines.lock().push(CapturedLine {
            channel: channel.to_string(),
            text: line.render(false),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Arg;
    use crate::value::LogValue;

    fn line(template: &str) -> FormattedLine {
        FormattedLine {
            template: template.to_string(),
            args: vec![Arg::Value(LogValue::from("x"))],
        }
    }

    #[test]
    fn test_sinks_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConsoleSink>();
        assert_send_sync::<TracingSink>();
        assert_send_sync::<MemorySink>();
    }

    #[test]
    fn test_memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.write("svc:info", &line("first %s"));
        sink.write("svc:warn", &line("second %s"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.texts(), vec!["first x", "second x"]);
        assert_eq!(sink.texts_for("svc:warn"), vec!["second x"]);
    }

    #[test]
    fn test_memory_sink_take_drains() {
        let sink = MemorySink::new();
        sink.write("svc:info", &line("%s"));
        let taken = sink.take();
        assert_eq!(
            taken,
            vec![CapturedLine {
                channel: "svc:info".to_string(),
                text: "x".to_string(),
            }]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_console_and_tracing_sinks_do_not_panic() {
        ConsoleSink::new(false).write("svc:info", &line("console %s"));
        TracingSink::new().write("svc:debugLogger", &line("tracing %s"));
        TracingSink::new().write("svc:custom", &line("tracing %s"));
    }
}
