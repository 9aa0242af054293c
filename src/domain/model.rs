use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// 單一欄位的值（已依 schema 驗證過）
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    /// Wide enough for both i64 and u64 payload values.
    Integer(i128),
    Float(f64),
    String(String),
    Model(ModelInstance),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Model(_) => "model",
            FieldValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Integer(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelInstance> {
        match self {
            FieldValue::Model(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn to_wire(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Integer(n) => integer_to_wire(*n),
            // construct/from_wire reject non-finite floats
            FieldValue::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Model(m) => m.to_wire(),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_wire).collect()),
        }
    }
}

fn integer_to_wire(n: i128) -> Value {
    if let Ok(v) = i64::try_from(n) {
        Value::from(v)
    } else if let Ok(v) = u64::try_from(n) {
        Value::from(v)
    } else {
        // 超出 i64/u64 範圍的整數在驗證階段就會被拒絕
        Value::Null
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<ModelInstance> for FieldValue {
    fn from(value: ModelInstance) -> Self {
        FieldValue::Model(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ModelBody {
    Object(Vec<(&'static str, FieldValue)>),
    List(Vec<FieldValue>),
}

/// An immutable, validated instance of one registered schema.
///
/// Instances only come out of the codec (`construct`, `construct_list`,
/// `from_wire`), so every value inside has already passed the schema's checks.
/// Object fields keep declaration order, which makes `to_wire` deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    schema: &'static str,
    body: ModelBody,
}

impl ModelInstance {
    pub(crate) fn object(schema: &'static str, fields: Vec<(&'static str, FieldValue)>) -> Self {
        Self {
            schema,
            body: ModelBody::Object(fields),
        }
    }

    pub(crate) fn list(schema: &'static str, items: Vec<FieldValue>) -> Self {
        Self {
            schema,
            body: ModelBody::List(items),
        }
    }

    pub fn schema(&self) -> &'static str {
        self.schema
    }

    pub fn is_list(&self) -> bool {
        matches!(self.body, ModelBody::List(_))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match &self.body {
            ModelBody::Object(fields) => fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v),
            ModelBody::List(_) => None,
        }
    }

    /// Set fields in declaration order; empty for list schemas.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        let fields: &[(&'static str, FieldValue)] = match &self.body {
            ModelBody::Object(fields) => fields,
            ModelBody::List(_) => &[],
        };
        fields.iter().map(|(n, v)| (*n, v))
    }

    pub fn items(&self) -> Option<&[FieldValue]> {
        match &self.body {
            ModelBody::List(items) => Some(items),
            ModelBody::Object(_) => None,
        }
    }

    pub fn to_wire(&self) -> Value {
        match &self.body {
            ModelBody::Object(fields) => {
                let mut map = Map::new();
                for (name, value) in fields {
                    map.insert((*name).to_string(), value.to_wire());
                }
                Value::Object(map)
            }
            ModelBody::List(items) => Value::Array(items.iter().map(FieldValue::to_wire).collect()),
        }
    }
}

impl Serialize for ModelInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl fmt::Display for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string_pretty(&self.to_wire()).map_err(|_| fmt::Error)?;
        write!(f, "{} {}", self.schema, body)
    }
}
