use std::fmt;

use serde_json::{Map, Number, Value};

/// A single query value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// JSON form used in request bodies and in list parameters.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Int(n) => Value::Number((*n).into()),
            Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }
}

/// Query-string form of a scalar.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// The value of a query field: a scalar or a flat list of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl QueryValue {
    pub fn to_json(&self) -> Value {
        match self {
            QueryValue::Scalar(s) => s.to_json(),
            QueryValue::List(items) => Value::Array(items.iter().map(Scalar::to_json).collect()),
        }
    }
}

macro_rules! impl_scalar_from {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<$ty> for QueryValue {
                fn from(v: $ty) -> Self {
                    QueryValue::Scalar(v.into())
                }
            }
        )*
    };
}

impl_scalar_from! {
    String => |v| Scalar::Text(v),
    &str => |v| Scalar::Text(v.to_string()),
    &String => |v| Scalar::Text(v.clone()),
    i64 => |v| Scalar::Int(v),
    i32 => |v| Scalar::Int(v.into()),
    u32 => |v| Scalar::Int(v.into()),
    f64 => |v| Scalar::Float(v),
    bool => |v| Scalar::Bool(v),
}

impl From<Scalar> for QueryValue {
    fn from(v: Scalar) -> Self {
        QueryValue::Scalar(v)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// An ordered mapping from field names to values.
///
/// Fields keep the order in which they were first inserted; inserting an
/// existing name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder form of [`Query::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The query as a JSON object, lists kept as native arrays.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (name, value) in iter {
            query.insert(name, value);
        }
        query
    }
}
