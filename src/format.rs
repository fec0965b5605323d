//! # Line Formatting
//!
//! A formatter turns one log call into a [`FormattedLine`]: a template with
//! console-style placeholders plus its positional arguments. Sinks then
//! render the line as plain text or with ANSI colors.
//!
//! ## Placeholders
//!
//! | Placeholder | Renders |
//! |---|---|
//! | `%s` | plain text |
//! | `%d`, `%i`, `%f` | number (integer for `%i`) |
//! | `%j` | JSON |
//! | `%o` | single-line structural dump |
//! | `%O` | structural dump |
//! | `%c` | consumes a style argument; switches the color of what follows |
//! | `%%` | a literal `%`, consumes nothing |
//!
//! Placeholders with no argument left are printed literally; arguments left
//! over after the template are appended, space separated.
//!
//! ## Composed layout
//!
//! [`compose`] renders every line as
//!
//! ```text
//! 2024-03-01 12:00:00 INFO[sub] message text (+12ms)
//! ```
//!
//! with the level label and the `(+diff)` suffix in the channel color.

use crate::humanize::humanize;
use crate::level::ChannelColor;
use crate::value::{InspectOptions, LogValue};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::time::Duration;

/// Style carried by a `%c` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Reset to the default color.
    Inherit,
    Color(ChannelColor),
}

impl Style {
    /// CSS form of the style, e.g. `color: inherit` or `color: red`.
    pub fn css(&self) -> String {
        match self {
            Style::Inherit => "color: inherit".to_string(),
            Style::Color(color) => format!("color: {}", color.css_name()),
        }
    }
}

/// Positional argument of a formatted line.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(LogValue),
    Style(Style),
}

/// Metadata of the channel a line is written to.
#[derive(Debug, Clone, Copy)]
pub struct ChannelMeta<'a> {
    /// Full channel name, e.g. `svc:sub:info`.
    pub namespace: &'a str,
    pub color: ChannelColor,
    /// Time since the previous write on the same channel.
    pub diff: Duration,
    pub use_colors: bool,
}

/// A template and its positional arguments, ready for a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedLine {
    pub template: String,
    pub args: Vec<Arg>,
}

/// Formatting hook installed into a registry.
pub type Formatter =
    fn(meta: &ChannelMeta<'_>, now: DateTime<Local>, message: &str, args: Vec<LogValue>) -> FormattedLine;

/// One lexical piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Literal(&'a str),
    /// `%%`
    Percent,
    Placeholder(char),
}

fn tokenize(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '%' {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            break;
        };
        if next != '%' && !next.is_ascii_alphabetic() {
            continue;
        }
        chars.next();
        if literal_start < i {
            tokens.push(Token::Literal(&template[literal_start..i]));
        }
        tokens.push(if next == '%' {
            Token::Percent
        } else {
            Token::Placeholder(next)
        });
        literal_start = i + 2;
    }
    if literal_start < template.len() {
        tokens.push(Token::Literal(&template[literal_start..]));
    }
    tokens
}

/// 1-based position of the last `%c` among the template's placeholders, or 0
/// when there is none. `%%` does not count as a placeholder.
pub fn last_style_position(template: &str) -> usize {
    let mut position = 0;
    let mut last = 0;
    for token in tokenize(template) {
        if let Token::Placeholder(c) = token {
            position += 1;
            if c == 'c' {
                last = position;
            }
        }
    }
    last
}

/// Channel name without its first and last segments.
///
/// `svc:info` has nothing in between and renders empty; `svc:sub:info`
/// renders `sub`.
pub fn namespace_display(channel: &str) -> String {
    let segments: Vec<&str> = channel.split(':').collect();
    if segments.len() <= 2 {
        return String::new();
    }
    segments[1..segments.len() - 1].join(":")
}

/// Last segment of the channel name, uppercased.
pub fn level_label(channel: &str) -> String {
    channel
        .rsplit(':')
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

/// Timestamped, level-labelled layout installed by the logger factory.
///
/// When colors are in use, four `%c` markers split the line into timestamp,
/// level, message and diff segments, and style arguments are inserted so
/// that each marker, including any `%c` inside `message`, still lines up
/// with its argument.
pub fn compose(
    meta: &ChannelMeta<'_>,
    now: DateTime<Local>,
    message: &str,
    args: Vec<LogValue>,
) -> FormattedLine {
    let marker = if meta.use_colors { "%c" } else { "" };
    let template = format!(
        "{m}{ts} {m}{level}[{ns}] {m}{msg} {m}(+{diff})",
        m = marker,
        ts = now.format(crate::defaults::TIMESTAMP_FORMAT),
        level = level_label(meta.namespace),
        ns = namespace_display(meta.namespace),
        msg = message,
        diff = humanize(meta.diff),
    );

    let mut args: Vec<Arg> = args.into_iter().map(Arg::Value).collect();
    if meta.use_colors {
        let color = Style::Color(meta.color);
        let mut styled = vec![
            Arg::Style(Style::Inherit),
            Arg::Style(color),
            Arg::Style(Style::Inherit),
        ];
        styled.append(&mut args);
        args = styled;
        let at = last_style_position(&template).saturating_sub(1).min(args.len());
        args.insert(at, Arg::Style(color));
    }

    FormattedLine { template, args }
}

/// Layout of a channel before any logger installs [`compose`]: the channel
/// name, the message and the diff.
pub fn bare(
    meta: &ChannelMeta<'_>,
    _now: DateTime<Local>,
    message: &str,
    args: Vec<LogValue>,
) -> FormattedLine {
    FormattedLine {
        template: format!("{} {} +{}", meta.namespace, message, humanize(meta.diff)),
        args: args.into_iter().map(Arg::Value).collect(),
    }
}

impl FormattedLine {
    /// Substitute placeholders, optionally coloring `%c` segments with ANSI
    /// escapes.
    pub fn render(&self, ansi: bool) -> String {
        let mut out = String::new();
        let mut segment = String::new();
        let mut style = Style::Inherit;
        let mut next = 0;

        for token in tokenize(&self.template) {
            match token {
                Token::Literal(text) => segment.push_str(text),
                Token::Percent => segment.push('%'),
                Token::Placeholder(c) => {
                    let Some(arg) = self.args.get(next) else {
                        segment.push('%');
                        segment.push(c);
                        continue;
                    };
                    if c == 'c' {
                        flush(&mut out, &mut segment, style, ansi);
                        style = match arg {
                            Arg::Style(s) => *s,
                            Arg::Value(_) => Style::Inherit,
                        };
                        next += 1;
                        continue;
                    }
                    match substitute(c, arg) {
                        Some(text) => {
                            segment.push_str(&text);
                            next += 1;
                        }
                        None => {
                            segment.push('%');
                            segment.push(c);
                        }
                    }
                }
            }
        }
        flush(&mut out, &mut segment, style, ansi);

        for arg in &self.args[next.min(self.args.len())..] {
            if let Arg::Value(value) = arg {
                out.push(' ');
                if value.is_structured() {
                    out.push_str(&value.structural());
                } else {
                    out.push_str(&value.plain());
                }
            }
        }
        out
    }
}

fn substitute(placeholder: char, arg: &Arg) -> Option<String> {
    if !matches!(placeholder, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O') {
        return None;
    }
    let value = match arg {
        Arg::Value(value) => value,
        Arg::Style(style) => return Some(style.css()),
    };
    let text = match placeholder {
        's' => value.plain(),
        'd' => format_number(value.as_number()),
        'i' => format_number(value.as_number().trunc()),
        'f' => format_number(value.as_number()),
        'j' => value.json(),
        'o' => value.inspect(InspectOptions::compact()),
        _ => value.structural(),
    };
    Some(text)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn flush(out: &mut String, segment: &mut String, style: Style, ansi: bool) {
    if segment.is_empty() {
        return;
    }
    match style {
        Style::Color(color) if ansi => {
            out.push_str(&segment.as_str().color(color.to_terminal()).to_string())
        }
        _ => out.push_str(segment),
    }
    segment.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn meta(namespace: &str, use_colors: bool) -> ChannelMeta<'_> {
        ChannelMeta {
            namespace,
            color: ChannelColor::Red,
            diff: Duration::from_millis(12),
            use_colors,
        }
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(namespace_display("svc:info"), "");
        assert_eq!(namespace_display("svc:sub:info"), "sub");
        assert_eq!(namespace_display("svc:a:b:warn"), "a:b");
        assert_eq!(namespace_display("info"), "");
    }

    #[test]
    fn test_level_label() {
        assert_eq!(level_label("svc:info"), "INFO");
        assert_eq!(level_label("svc:debugLogger"), "DEBUGLOGGER");
    }

    #[test]
    fn test_compose_without_colors() {
        let line = compose(&meta("svc:info", false), at_noon(), "hello", vec![]);
        assert_eq!(line.template, "2024-03-01 12:00:00 INFO[] hello (+12ms)");
        assert!(line.args.is_empty());
        assert_eq!(line.render(false), "2024-03-01 12:00:00 INFO[] hello (+12ms)");
    }

    #[test]
    fn test_compose_with_nested_namespace() {
        let line = compose(&meta("svc:sub:info", false), at_noon(), "hello", vec![]);
        assert!(line.render(false).contains("INFO[sub] hello"));
    }

    #[test]
    fn test_compose_style_arguments_follow_markers() {
        let line = compose(
            &meta("svc:info", true),
            at_noon(),
            "value %s",
            vec![LogValue::from(7i64)],
        );
        assert_eq!(
            line.template,
            "%c2024-03-01 12:00:00 %cINFO[] %cvalue %s %c(+12ms)"
        );
        assert_eq!(
            line.args,
            vec![
                Arg::Style(Style::Inherit),
                Arg::Style(Style::Color(ChannelColor::Red)),
                Arg::Style(Style::Inherit),
                Arg::Value(LogValue::from(7i64)),
                Arg::Style(Style::Color(ChannelColor::Red)),
            ]
        );
        assert_eq!(line.render(false), "2024-03-01 12:00:00 INFO[] value 7 (+12ms)");
    }

    #[test]
    fn test_compose_keeps_mapping_with_message_markers() {
        let line = compose(
            &meta("svc:info", true),
            at_noon(),
            "%cbold%c %s",
            vec![
                LogValue::from("font-weight: bold"),
                LogValue::from(""),
                LogValue::from("tail"),
            ],
        );
        assert_eq!(last_style_position(&line.template), 7);
        assert_eq!(line.args.len(), 7);
        assert_eq!(line.args[6], Arg::Style(Style::Color(ChannelColor::Red)));
        assert_eq!(line.render(false), "2024-03-01 12:00:00 INFO[] bold tail (+12ms)");
    }

    #[test]
    fn test_percent_escape_is_not_a_placeholder() {
        assert_eq!(last_style_position("100%% %c"), 1);
        let line = FormattedLine {
            template: "100%% done %s".to_string(),
            args: vec![Arg::Value(LogValue::from("ok"))],
        };
        assert_eq!(line.render(false), "100% done ok");
    }

    #[test]
    fn test_render_placeholders() {
        let line = FormattedLine {
            template: "%s|%d|%i|%j|%o|%O".to_string(),
            args: vec![
                Arg::Value(LogValue::from("a")),
                Arg::Value(LogValue::from(2.5)),
                Arg::Value(LogValue::from(2.5)),
                Arg::Value(LogValue::from("j")),
                Arg::Value(LogValue::from(json!([1]))),
                Arg::Value(LogValue::from(json!({"k": true}))),
            ],
        };
        assert_eq!(line.render(false), "a|2.5|2|\"j\"|[ 1 ]|{ k: true }");
    }

    #[test]
    fn test_render_missing_and_surplus_arguments() {
        let missing = FormattedLine {
            template: "%s and %s".to_string(),
            args: vec![Arg::Value(LogValue::from("one"))],
        };
        assert_eq!(missing.render(false), "one and %s");

        let surplus = FormattedLine {
            template: "start".to_string(),
            args: vec![
                Arg::Value(LogValue::from(1i64)),
                Arg::Value(LogValue::from(json!({"a": 1}))),
            ],
        };
        assert_eq!(surplus.render(false), "start 1 { a: 1 }");
    }

    #[test]
    fn test_unknown_placeholder_consumes_nothing() {
        let line = FormattedLine {
            template: "%x %s".to_string(),
            args: vec![Arg::Value(LogValue::from("v"))],
        };
        assert_eq!(line.render(false), "%x v");
    }

    #[test]
    fn test_render_ansi_keeps_text() {
        let line = compose(&meta("svc:error", true), at_noon(), "boom", vec![]);
        let rendered = line.render(true);
        assert!(rendered.contains("ERROR"));
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("(+12ms)"));
    }

    #[test]
    fn test_bare_layout() {
        let line = bare(&meta("svc:info", false), at_noon(), "hi %s", vec!["there".into()]);
        assert_eq!(line.render(false), "svc:info hi there +12ms");
    }

    #[test]
    fn test_trailing_percent_is_literal() {
        let line = FormattedLine {
            template: "50%".to_string(),
            args: vec![],
        };
        assert_eq!(line.render(false), "50%");
    }
}
