//! Dynamic data values rendered by templates

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

type VariableFn = dyn Fn() -> String + Send + Sync;
type SectionFn = dyn Fn(&str) -> String + Send + Sync;
type SectionWithRenderFn = dyn Fn(&str, &dyn Fn(&str) -> String) -> String + Send + Sync;

/// A callable value. The variant fixes how the renderer invokes it.
#[derive(Clone)]
pub enum Lambda {
    /// Called with no arguments in variable position
    Variable(Arc<VariableFn>),
    /// Called with the section's raw source; the result is rendered
    Section(Arc<SectionFn>),
    /// Called with the section's raw source and a render callback; the
    /// result is written as is
    SectionWithRender(Arc<SectionWithRenderFn>),
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lambda::Variable(_) => f.write_str("Lambda::Variable(..)"),
            Lambda::Section(_) => f.write_str("Lambda::Section(..)"),
            Lambda::SectionWithRender(_) => f.write_str("Lambda::SectionWithRender(..)"),
        }
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Lambda::Variable(a), Lambda::Variable(b)) => same(a, b),
            (Lambda::Section(a), Lambda::Section(b)) => same(a, b),
            (Lambda::SectionWithRender(a), Lambda::SectionWithRender(b)) => same(a, b),
            _ => false,
        }
    }
}

fn same<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Numeric value, kept integral when the source was integral
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A template data value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Mapping(HashMap<String, Value>),
    Lambda(Lambda),
}

impl Value {
    /// Zero-argument lambda for variable tags
    pub fn lambda<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Value::Lambda(Lambda::Variable(Arc::new(f)))
    }

    /// Section lambda receiving the raw section source
    pub fn section_lambda<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Value::Lambda(Lambda::Section(Arc::new(f)))
    }

    /// Section lambda receiving the raw section source and a render callback
    pub fn section_lambda_with_render<F>(f: F) -> Self
    where
        F: Fn(&str, &dyn Fn(&str) -> String) -> String + Send + Sync + 'static,
    {
        Value::Lambda(Lambda::SectionWithRender(Arc::new(f)))
    }

    /// Resolve one segment of a dotted name against this value
    ///
    /// Mappings resolve by key, lists by a zero-based decimal index.
    pub fn get(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(segment),
            Value::List(items) => {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                segment.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    /// Null, `false`, the empty string and the empty list are falsey.
    /// An empty mapping is not.
    pub fn is_falsey(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Number(_) | Value::Mapping(_) | Value::Lambda(_) => false,
        }
    }

    /// Short name of the value's shape, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Mapping(_) => "mapping",
            Value::Lambda(_) => "lambda",
        }
    }
}

/// Text form used for interpolation
///
/// Lists join their elements with commas; mappings and lambdas have no text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Mapping(_) | Value::Lambda(_) => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::Int(i64::from(n)))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Number(Number::Float(f64::from(x)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(Number::Float(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Int(i)),
                None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.into(),
            serde_json::Value::Object(map) => map.into_iter().collect(),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(Number::Int(i)),
            toml::Value::Float(x) => Value::Number(Number::Float(x)),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => items.into(),
            toml::Value::Table(table) => table.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsey() {
        assert!(Value::Null.is_falsey());
        assert!(Value::Bool(false).is_falsey());
        assert!(Value::from("").is_falsey());
        assert!(Value::List(vec![]).is_falsey());
        assert!(!Value::Mapping(HashMap::new()).is_falsey());
        assert!(!Value::from(0).is_falsey());
        assert!(!Value::lambda(String::new).is_falsey());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(85).to_string(), "85");
        assert_eq!(Value::from(1.21).to_string(), "1.21");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
    }

    #[test]
    fn test_get_index() {
        let list = Value::from(vec!["zero", "one"]);
        assert_eq!(list.get("1"), Some(&Value::from("one")));
        assert_eq!(list.get("2"), None);
        assert_eq!(list.get("-1"), None);
        assert_eq!(list.get("+1"), None);
        assert_eq!(list.get(""), None);
    }

    #[test]
    fn test_get_key() {
        let map: Value = [("a", 1)].into_iter().collect();
        assert_eq!(map.get("a"), Some(&Value::from(1)));
        assert_eq!(map.get("b"), None);
        assert_eq!(Value::from("text").get("a"), None);
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "name": "Chris",
            "age": 42,
            "ratio": 0.5,
            "tags": ["a", null],
        });
        let value = Value::from(json);
        assert_eq!(value.get("name"), Some(&Value::from("Chris")));
        assert_eq!(value.get("age"), Some(&Value::Number(Number::Int(42))));
        assert_eq!(value.get("ratio"), Some(&Value::from(0.5)));
        assert_eq!(
            value.get("tags"),
            Some(&Value::List(vec![Value::from("a"), Value::Null]))
        );
    }

    #[test]
    fn test_from_toml() {
        let source = "title = \"x\"\ncount = 3\n[owner]\nname = \"Tom\"\n";
        let table: toml::Value = toml::from_str(source).expect("Should parse");
        let value = Value::from(table);
        assert_eq!(value.get("count"), Some(&Value::from(3)));
        assert_eq!(
            value.get("owner").and_then(|o| o.get("name")),
            Some(&Value::from("Tom"))
        );
    }

    #[test]
    fn test_lambda_equality_by_identity() {
        let a = Value::lambda(|| "x".to_string());
        let b = a.clone();
        let c = Value::lambda(|| "x".to_string());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(format!("{:?}", a), "Lambda(Lambda::Variable(..))");
    }
}
