//! # Loggable Values
//!
//! Arguments to a log call are a closed set of variants, classified at the
//! call site instead of by inspecting runtime type tags:
//!
//! - [`LogValue::Text`]: strings, rendered as-is
//! - [`LogValue::Structured`]: JSON-shaped data; maps and sequences take the
//!   structural (`%O`) path while numbers, booleans and null stay plain text
//! - [`LogValue::Event`]: UI-style event objects, which get a compact
//!   `{type, target}` form instead of a full dump
//!
//! Structural rendering is a depth-limited, single-line-when-it-fits dump in
//! the familiar `{ key: value }` shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single argument to a log call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Text(String),
    Structured(Value),
    Event(EventValue),
}

/// An event-like value: its type tag (e.g. `MouseEvent`), the event type
/// (e.g. `click`) and the markup of its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventValue {
    pub tag: String,
    pub kind: String,
    pub target: String,
}

/// Options for [`inspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Nesting levels rendered before collapsing to `[Object]`/`[Array]`.
    pub depth: usize,
    /// Maximum array elements shown; `None` shows all.
    pub max_array_length: Option<usize>,
    /// Width after which a composite breaks onto multiple lines; `None`
    /// always stays on one line.
    pub break_length: Option<usize>,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            depth: crate::defaults::INSPECT_DEPTH,
            max_array_length: Some(crate::defaults::INSPECT_MAX_ARRAY_LENGTH),
            break_length: Some(crate::defaults::INSPECT_BREAK_LENGTH),
        }
    }
}

impl InspectOptions {
    /// Single-line variant of the defaults, used by `%o`.
    pub fn compact() -> Self {
        Self {
            break_length: None,
            ..Self::default()
        }
    }
}

impl LogValue {
    /// Serialize any `Serialize` value into a structured argument.
    ///
    /// Serialization failures degrade to a text value describing the error;
    /// a log call never fails because of its arguments.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => LogValue::Structured(value),
            Err(e) => LogValue::Text(format!("<unserializable: {}>", e)),
        }
    }

    pub fn event(
        tag: impl Into<String>,
        kind: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        LogValue::Event(EventValue {
            tag: tag.into(),
            kind: kind.into(),
            target: target.into(),
        })
    }

    /// Whether this value needs structural serialization rather than plain
    /// interpolation.
    pub fn is_structured(&self) -> bool {
        match self {
            LogValue::Text(_) => false,
            LogValue::Structured(value) => matches!(value, Value::Object(_) | Value::Array(_)),
            LogValue::Event(_) => true,
        }
    }

    /// Plain-text rendering (`%s`).
    pub fn plain(&self) -> String {
        match self {
            LogValue::Text(text) => text.clone(),
            LogValue::Structured(Value::String(text)) => text.clone(),
            LogValue::Structured(value) if !self.is_structured() => value.to_string(),
            _ => self.inspect(InspectOptions::compact()),
        }
    }

    /// Structural rendering (`%O`).
    pub fn structural(&self) -> String {
        self.inspect(InspectOptions::default())
    }

    pub fn inspect(&self, options: InspectOptions) -> String {
        match self {
            LogValue::Text(text) => text.clone(),
            LogValue::Structured(value) => inspect(value, options),
            LogValue::Event(event) => inspect(&event.to_value(), options),
        }
    }

    /// Numeric reading used by `%d`, `%i` and `%f`; `NaN` when the value is
    /// not a number.
    pub fn as_number(&self) -> f64 {
        match self {
            LogValue::Text(text) => text.trim().parse().unwrap_or(f64::NAN),
            LogValue::Structured(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            LogValue::Structured(Value::String(text)) => text.trim().parse().unwrap_or(f64::NAN),
            LogValue::Structured(Value::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            LogValue::Structured(Value::Null) => 0.0,
            _ => f64::NAN,
        }
    }

    /// JSON rendering (`%j`).
    pub fn json(&self) -> String {
        match self {
            LogValue::Text(text) => Value::String(text.clone()).to_string(),
            LogValue::Structured(value) => value.to_string(),
            LogValue::Event(event) => event.to_value().to_string(),
        }
    }
}

impl EventValue {
    fn to_value(&self) -> Value {
        serde_json::json!({
            "type": format!("{}:{}", self.tag, self.kind),
            "target": self.target,
        })
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}

impl From<&String> for LogValue {
    fn from(value: &String) -> Self {
        LogValue::Text(value.clone())
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        LogValue::Structured(Value::Bool(value))
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => LogValue::Structured(Value::Number(n)),
            None => LogValue::Text(value.to_string()),
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(value: $ty) -> Self {
                    LogValue::Structured(Value::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<Value> for LogValue {
    fn from(value: Value) -> Self {
        LogValue::Structured(value)
    }
}

impl From<EventValue> for LogValue {
    fn from(value: EventValue) -> Self {
        LogValue::Event(value)
    }
}

/// Serialize a value for embedding in a message.
///
/// Events become `{"type":"<Tag>:<type>","target":"<markup>"}`, composites a
/// depth-1 structural dump with array contents elided, and primitives their
/// structural form: strings single-quoted, numbers, booleans and null bare.
pub fn serialize(value: &LogValue) -> String {
    match value {
        LogValue::Event(event) => event.to_value().to_string(),
        LogValue::Structured(inner) if value.is_structured() => inspect(
            inner,
            InspectOptions {
                depth: crate::defaults::SERIALIZE_DEPTH,
                max_array_length: Some(0),
                break_length: Some(crate::defaults::INSPECT_BREAK_LENGTH),
            },
        ),
        LogValue::Text(text) | LogValue::Structured(Value::String(text)) => quote(text),
        LogValue::Structured(other) => other.to_string(),
    }
}

/// Depth-limited structural dump of a JSON value.
pub fn inspect(value: &Value, options: InspectOptions) -> String {
    inspect_at(value, &options, 0, 0)
}

fn inspect_at(value: &Value, options: &InspectOptions, level: usize, indent: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if level == 0 {
                s.clone()
            } else {
                quote(s)
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                return "[]".to_string();
            }
            if level > options.depth {
                return "[Array]".to_string();
            }
            let shown = options
                .max_array_length
                .map_or(items.len(), |max| max.min(items.len()));
            let mut entries: Vec<String> = items[..shown]
                .iter()
                .map(|item| inspect_at(item, options, level + 1, indent + 2))
                .collect();
            let hidden = items.len() - shown;
            if hidden > 0 {
                entries.push(format!(
                    "... {} more item{}",
                    hidden,
                    if hidden == 1 { "" } else { "s" }
                ));
            }
            wrap('[', ']', entries, options, indent)
        }
        Value::Object(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            if level > options.depth {
                return "[Object]".to_string();
            }
            wrap('{', '}', object_entries(map, options, level, indent), options, indent)
        }
    }
}

fn object_entries(
    map: &Map<String, Value>,
    options: &InspectOptions,
    level: usize,
    indent: usize,
) -> Vec<String> {
    map.iter()
        .map(|(key, value)| {
            format!(
                "{}: {}",
                display_key(key),
                inspect_at(value, options, level + 1, indent + 2)
            )
        })
        .collect()
}

fn wrap(
    open: char,
    close: char,
    entries: Vec<String>,
    options: &InspectOptions,
    indent: usize,
) -> String {
    let single = format!("{} {} {}", open, entries.join(", "), close);
    let fits = match options.break_length {
        None => true,
        Some(limit) => single.len() + indent <= limit && !single.contains('\n'),
    };
    if fits {
        return single;
    }

    let pad = " ".repeat(indent + 2);
    let mut out = String::new();
    out.push(open);
    out.push('\n');
    out.push_str(&pad);
    out.push_str(&entries.join(&format!(",\n{}", pad)));
    out.push('\n');
    out.push_str(&" ".repeat(indent));
    out.push(close);
    out
}

fn display_key(key: &str) -> String {
    let mut chars = key.chars();
    let identifier = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if identifier {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
