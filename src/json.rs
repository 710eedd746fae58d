//! The JSON output contract: a small event-sink trait the scanner writes through, and a
//! `serde_json`-backed implementation of it.
//!
//! Keeping the scanner's emission code behind a trait (rather than calling into
//! `serde_json` directly) means a caller embedding this crate can swap in any backend —
//! a streaming writer, a different JSON library, a test double that records the event
//! sequence — without touching the parser.
use serde_json::{Map, Value};

/// A sink for the structural events a JSON document emitter needs.
///
/// Calls must nest correctly (`start_object`/`end_object` and `start_array`/`end_array`
/// balanced) and a `key` call must always be followed, within an object, by exactly one
/// value-shaped call (`string`, `bool`, `uint`, `int`, `double`, `null`, or a nested
/// `start_object`/`start_array`).
pub trait JsonSink {
    fn start_object(&mut self);
    fn end_object(&mut self);
    fn start_array(&mut self);
    fn end_array(&mut self);
    fn key(&mut self, name: &str);
    fn string(&mut self, value: &str);
    fn bool(&mut self, value: bool);
    fn uint(&mut self, value: u64);
    fn int(&mut self, value: i64);
    fn double(&mut self, value: f64);
    fn null(&mut self);
}

enum Frame {
    Object(Map<String, Value>, Option<String>),
    Array(Vec<Value>),
}

/// A [JsonSink] that builds a `serde_json::Value` tree in memory.
///
/// This is the scanner's default, production backend: the whole document fits in memory
/// (headers are not large enough to warrant a streaming writer), and callers downstream of
/// this crate get a `Value` they can serialize, query, or re-emit however they like.
#[derive(Default)]
pub struct ValueSink {
    stack: Vec<Frame>,
    finished: Option<Value>,
}

impl ValueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the sink and return the completed document.
    ///
    /// Returns `None` if no top-level value was ever closed out (an unbalanced or empty
    /// sequence of calls).
    pub fn into_value(self) -> Option<Value> {
        self.finished
    }

    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Object(map, pending_key)) => {
                let key = pending_key.take().expect("value pushed without a preceding key");
                map.insert(key, value);
            }
            Some(Frame::Array(items)) => items.push(value),
            None => self.finished = Some(value),
        }
    }
}

impl JsonSink for ValueSink {
    fn start_object(&mut self) {
        self.stack.push(Frame::Object(Map::new(), None));
    }

    fn end_object(&mut self) {
        match self.stack.pop() {
            Some(Frame::Object(map, _)) => self.push_value(Value::Object(map)),
            _ => panic!("end_object without a matching start_object"),
        }
    }

    fn start_array(&mut self) {
        self.stack.push(Frame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push_value(Value::Array(items)),
            _ => panic!("end_array without a matching start_array"),
        }
    }

    fn key(&mut self, name: &str) {
        match self.stack.last_mut() {
            Some(Frame::Object(_, pending_key)) => *pending_key = Some(name.to_string()),
            _ => panic!("key called outside of an object"),
        }
    }

    fn string(&mut self, value: &str) {
        self.push_value(Value::String(value.to_string()));
    }

    fn bool(&mut self, value: bool) {
        self.push_value(Value::Bool(value));
    }

    fn uint(&mut self, value: u64) {
        self.push_value(Value::Number(value.into()));
    }

    fn int(&mut self, value: i64) {
        self.push_value(Value::Number(value.into()));
    }

    fn double(&mut self, value: f64) {
        match serde_json::Number::from_f64(value) {
            Some(n) => self.push_value(Value::Number(n)),
            None => self.push_value(Value::Null),
        }
    }

    fn null(&mut self) {
        self.push_value(Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_object_with_array() {
        let mut sink = ValueSink::new();
        sink.start_object();
        sink.key("name");
        sink.string("Widget");
        sink.key("fields");
        sink.start_array();
        sink.uint(1);
        sink.uint(2);
        sink.end_array();
        sink.end_object();

        let value = sink.into_value().unwrap();
        assert_eq!(value["name"], "Widget");
        assert_eq!(value["fields"], serde_json::json!([1, 2]));
    }

    #[test]
    fn empty_sink_has_no_value() {
        let sink = ValueSink::new();
        assert!(sink.into_value().is_none());
    }
}
