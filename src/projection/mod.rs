//! Response normalization: envelope extraction and field projection.
//!
//! Upstream payloads are loosely shaped. Everything here is total: a missing
//! key or a container of the wrong kind yields an empty result, never a
//! panic or an error.

pub mod access;
pub mod price;

use serde_json::{Map, Value};

pub use access::{api_access_endpoint, is_running, test_command, web_url};
pub use price::format_price;

/// A projected output record.
pub type Record = Map<String, Value>;

/// Payload key used by most endpoints.
pub const DATA_KEY: &str = "data";

/// Raw upstream JSON body plus the key its payload lives under.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    body: Value,
    key: &'static str,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

impl Envelope {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            key: DATA_KEY,
        }
    }

    /// Envelope for responses without a body (e.g. 204).
    pub fn empty() -> Self {
        Self::new(Value::Null)
    }

    /// Read the payload from `key` instead of `data`.
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Upstream `msg` field, if any.
    pub fn message(&self) -> Option<&str> {
        self.body.get("msg").and_then(Value::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Walk a key path from the root.
    pub fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.body, |value, key| value.get(key))
    }

    /// `body[path...]` as a list; empty when absent or not a list.
    pub fn items_at(&self, path: &[&str]) -> &[Value] {
        self.at(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `body[path...]` as an object; `None` when absent or not an object.
    pub fn object_at(&self, path: &[&str]) -> Option<&Record> {
        self.at(path).and_then(Value::as_object)
    }

    /// The payload as a list.
    pub fn items(&self) -> &[Value] {
        self.items_at(&[self.key])
    }

    /// The payload as an object.
    pub fn object(&self) -> Option<&Record> {
        self.object_at(&[self.key])
    }
}

type DeriveFn = Box<dyn Fn(&Record) -> Option<Value> + Send + Sync>;
type KeepFn = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// Declarative mapping from an upstream item to an output record.
///
/// Fields are copied in declaration order, then derived fields are appended.
/// A derive closure returning `None` leaves its key out of the record
/// entirely; this is how status-gated fields disappear.
#[derive(Default)]
pub struct Projection {
    fields: Vec<(String, String)>,
    derived: Vec<(String, DeriveFn)>,
    keep: Option<KeepFn>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy an upstream field under the same name.
    pub fn field(self, name: &str) -> Self {
        self.rename(name, name)
    }

    /// Copy an upstream field under a different output name.
    pub fn rename(mut self, upstream: &str, output: &str) -> Self {
        self.fields.push((upstream.to_string(), output.to_string()));
        self
    }

    /// Flatten an upstream list of repo references into one comma-separated
    /// string of ids. Items may be bare strings or objects carrying
    /// `repo_id` or `path`.
    pub fn id_list(self, upstream: &str, output: &str) -> Self {
        let upstream = upstream.to_string();
        self.derive(output, move |item| {
            let items = item.get(&upstream)?.as_array()?;
            let ids: Vec<&str> = items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(o) => str_field(o, "repo_id").or_else(|| str_field(o, "path")),
                    _ => None,
                })
                .collect();
            Some(Value::String(ids.join(",")))
        })
    }

    /// Add a field computed from the upstream item.
    pub fn derive<F>(mut self, output: &str, f: F) -> Self
    where
        F: Fn(&Record) -> Option<Value> + Send + Sync + 'static,
    {
        self.derived.push((output.to_string(), Box::new(f)));
        self
    }

    /// Drop items for which the predicate is false.
    pub fn keep_if<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.keep = Some(Box::new(f));
        self
    }

    /// Project one upstream object, ignoring the keep predicate.
    pub fn record(&self, item: &Record) -> Record {
        let mut out = Record::new();
        for (upstream, output) in &self.fields {
            if let Some(value) = item.get(upstream) {
                out.insert(output.clone(), value.clone());
            }
        }
        for (output, derive) in &self.derived {
            if let Some(value) = derive(item) {
                out.insert(output.clone(), value);
            }
        }
        out
    }

    /// Project one upstream value; `None` for non-objects or filtered items.
    pub fn one(&self, item: &Value) -> Option<Record> {
        let item = item.as_object()?;
        if let Some(keep) = &self.keep {
            if !keep(item) {
                return None;
            }
        }
        Some(self.record(item))
    }

    /// Project a list of upstream items.
    pub fn list(&self, items: &[Value]) -> Vec<Record> {
        items.iter().filter_map(|item| self.one(item)).collect()
    }

    /// Project a detail payload; an empty record when absent or malformed.
    pub fn detail(&self, item: Option<&Record>) -> Record {
        item.map(|item| self.record(item)).unwrap_or_default()
    }
}

impl std::fmt::Debug for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field("fields", &self.fields)
            .field(
                "derived",
                &self.derived.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("filtered", &self.keep.is_some())
            .finish()
    }
}

/// String value of a field.
pub fn str_field<'a>(item: &'a Record, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Loose truthiness for upstream flags that arrive as `true` or `1`.
pub fn flag(item: &Record, key: &str) -> bool {
    match item.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}
