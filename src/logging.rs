use crate::level::Level as ChannelLevel;
use colored::*;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// A tracing event formatter that colors each line with its channel color.
///
/// Lines arriving through [`TracingSink`](crate::sink::TracingSink) already
/// carry a timestamp, level label and namespace, so nothing else is printed
/// around the message fields.
pub struct ColorizedFormatter;

impl<S, N> FormatEvent<S, N> for ColorizedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        // Buffer the fields so the whole line can be colored at once.
        let mut buffer = String::new();
        let mut buf_writer = Writer::new(&mut buffer);
        ctx.format_fields(buf_writer.by_ref(), event)?;

        let color = level_color(*event.metadata().level());
        writeln!(writer, "{}", buffer.color(color.to_terminal()))
    }
}

/// Channel color used for events of a tracing level.
pub fn level_color(level: Level) -> crate::level::ChannelColor {
    let channel = match level {
        Level::TRACE => ChannelLevel::Trace,
        Level::DEBUG => ChannelLevel::DebugLogger,
        Level::INFO => ChannelLevel::Info,
        Level::WARN => ChannelLevel::Warn,
        Level::ERROR => ChannelLevel::Error,
    };
    channel.color()
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` applies. With
/// `colorize`, lines go through [`ColorizedFormatter`].
pub fn init_subscriber(colorize: bool, default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if colorize {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .event_format(ColorizedFormatter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::ChannelColor;

    #[test]
    fn test_level_colors_match_channels() {
        assert_eq!(level_color(Level::TRACE), ChannelColor::Cyan);
        assert_eq!(level_color(Level::DEBUG), ChannelColor::Blue);
        assert_eq!(level_color(Level::INFO), ChannelColor::Green);
        assert_eq!(level_color(Level::WARN), ChannelColor::Orange);
        assert_eq!(level_color(Level::ERROR), ChannelColor::Red);
    }
}
