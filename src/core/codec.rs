use crate::core::registry::{registry, Registry};
use crate::core::union::{self, UnionPolicy};
use crate::domain::model::{FieldValue, ModelInstance};
use crate::domain::schema::{Discriminator, FieldSpec, FieldType, SchemaDescriptor, SchemaKind};
use crate::utils::error::{ModelError, Result, ValidationError, ViolationKind};
use serde_json::{Map, Value};

/// Where a value sits: the owning schema, the field, and its constraints.
#[derive(Clone, Copy)]
struct Slot<'a> {
    owner: &'a str,
    field: &'a str,
    allowed: Option<&'static [&'static str]>,
    minimum: Option<i128>,
}

impl<'a> Slot<'a> {
    fn of(owner: &'a str, spec: &'a FieldSpec) -> Self {
        Self {
            owner,
            field: spec.name,
            allowed: spec.allowed,
            minimum: spec.minimum,
        }
    }

    /// The payload itself, when it has the wrong shape for its schema.
    fn root(owner: &'a str) -> Self {
        Self {
            owner,
            field: "$",
            allowed: None,
            minimum: None,
        }
    }

    fn items(owner: &'a str, minimum: Option<i128>) -> Self {
        Self {
            owner,
            field: "items",
            allowed: None,
            minimum,
        }
    }

    fn violation(&self, path: &str, kind: ViolationKind, expected: impl Into<String>) -> ModelError {
        ModelError::Validation(ValidationError {
            model: self.owner.to_string(),
            field: self.field.to_string(),
            path: path.to_string(),
            kind,
            expected: expected.into(),
        })
    }
}

/// Schema-driven encoder/decoder over a registry.
///
/// Stateless: every call reads the registry and returns a fresh value, so one
/// `Codec` can be shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r Registry,
    policy: UnionPolicy,
}

impl Default for Codec<'static> {
    fn default() -> Self {
        Self::new(registry(), UnionPolicy::default())
    }
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r Registry, policy: UnionPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn with_policy(self, policy: UnionPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn policy(&self) -> UnionPolicy {
        self.policy
    }

    pub fn lookup(&self, schema: &str) -> Result<&'r SchemaDescriptor> {
        self.registry.lookup(schema)
    }

    /// Decode a raw payload as `schema`.
    ///
    /// Keys the schema does not declare are ignored. Decoding a union yields
    /// the instance of whichever candidate matched; decoding a discriminated
    /// base yields the subtype named by its discriminator.
    pub fn from_wire(&self, schema: &str, raw: &Value) -> Result<ModelInstance> {
        let desc = self.lookup(schema)?;
        self.decode(desc, raw, "$")
    }

    pub fn to_wire(&self, instance: &ModelInstance) -> Value {
        instance.to_wire()
    }

    /// Build an object instance from caller-supplied values.
    ///
    /// Unlike `from_wire`, undeclared names are rejected. Integers given for
    /// float fields are widened.
    pub fn construct<I, K>(&self, schema: &str, fields: I) -> Result<ModelInstance>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let desc = self.lookup(schema)?;
        let mut supplied: Vec<(String, FieldValue)> = Vec::new();
        for (name, value) in fields {
            let name = name.as_ref();
            match supplied.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value,
                None => supplied.push((name.to_string(), value)),
            }
        }
        self.construct_object(desc, supplied)
    }

    /// Build an instance of a list schema such as `Pow` or `TxObjects`.
    pub fn construct_list(&self, schema: &str, items: Vec<FieldValue>) -> Result<ModelInstance> {
        let desc = self.lookup(schema)?;
        let (item_type, minimum) = match &desc.kind {
            SchemaKind::Array { items, minimum } => (items, *minimum),
            _ => {
                return Err(Slot::root(desc.name).violation("$", ViolationKind::TypeMismatch, "object fields"))
            }
        };

        let slot = Slot::items(desc.name, minimum);
        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| self.coerce(slot, item_type, item, &format!("$[{}]", i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(ModelInstance::list(desc.name, items))
    }

    fn construct_object(
        &self,
        desc: &'r SchemaDescriptor,
        mut supplied: Vec<(String, FieldValue)>,
    ) -> Result<ModelInstance> {
        let fields = match &desc.kind {
            SchemaKind::Object { fields, discriminator } => {
                let subtype = discriminator
                    .as_ref()
                    .and_then(|d| subtype_named(desc, d, supplied_tag(&supplied, d.field)));
                if let Some(subtype) = subtype {
                    tracing::debug!("Constructing {} as subtype {}", desc.name, subtype);
                    let subtype = self.lookup(subtype)?;
                    return self.construct_object(subtype, supplied);
                }
                fields
            }
            SchemaKind::Union { candidates } => {
                return union::resolve(desc.name, candidates, self.policy, |candidate| {
                    let candidate = self.lookup(candidate)?;
                    self.construct_object(candidate, supplied.clone())
                });
            }
            SchemaKind::Array { .. } => {
                return Err(Slot::root(desc.name).violation("$", ViolationKind::TypeMismatch, "list items"))
            }
        };

        if let Some((name, _)) = supplied.iter().find(|(n, _)| desc.field(n).is_none()) {
            return Err(ModelError::Validation(ValidationError {
                model: desc.name.to_string(),
                field: name.clone(),
                path: format!("$.{}", name),
                kind: ViolationKind::UnknownField,
                expected: "a declared field".to_string(),
            }));
        }

        let mut out = Vec::with_capacity(fields.len());
        for spec in fields {
            let slot = Slot::of(desc.name, spec);
            let path = format!("$.{}", spec.name);
            let value = supplied
                .iter()
                .position(|(n, _)| n == spec.name)
                .map(|i| supplied.swap_remove(i).1);

            match value {
                None if spec.required => {
                    return Err(slot.violation(&path, ViolationKind::MissingRequired, spec.ty.to_string()))
                }
                None => {}
                Some(FieldValue::Null) if spec.nullable => out.push((spec.name, FieldValue::Null)),
                Some(FieldValue::Null) if spec.required => {
                    return Err(slot.violation(&path, ViolationKind::NullNotAllowed, spec.ty.to_string()))
                }
                // 非必填且不可為 null：視為未設定
                Some(FieldValue::Null) => {}
                Some(value) => out.push((spec.name, self.coerce(slot, &spec.ty, value, &path)?)),
            }
        }

        Ok(ModelInstance::object(desc.name, out))
    }

    /// Type-check a caller-supplied value, widening integers for float fields.
    fn coerce(&self, slot: Slot<'_>, ty: &FieldType, value: FieldValue, path: &str) -> Result<FieldValue> {
        match (ty, value) {
            (FieldType::String, FieldValue::String(s)) => {
                check_allowed(slot, &s, path)?;
                Ok(FieldValue::String(s))
            }
            (FieldType::Integer, FieldValue::Integer(n)) => {
                check_integer(slot, n, path)?;
                Ok(FieldValue::Integer(n))
            }
            (FieldType::Float, FieldValue::Float(f)) if f.is_finite() => Ok(FieldValue::Float(f)),
            (FieldType::Float, FieldValue::Integer(n)) => Ok(FieldValue::Float(n as f64)),
            (FieldType::Boolean, FieldValue::Bool(b)) => Ok(FieldValue::Bool(b)),
            (FieldType::Model(name), FieldValue::Model(instance)) => {
                let target = self.lookup(name)?;
                if target.accepts(instance.schema()) && !self.mistagged(&instance)? {
                    Ok(FieldValue::Model(instance))
                } else {
                    Err(slot.violation(path, ViolationKind::TypeMismatch, *name))
                }
            }
            (FieldType::List(inner), FieldValue::List(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.coerce(slot, inner, item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>>>()
                .map(FieldValue::List),
            (ty, _) => Err(slot.violation(path, ViolationKind::TypeMismatch, ty.to_string())),
        }
    }

    /// A discriminated base instance whose tag names one of its subtypes.
    fn mistagged(&self, instance: &ModelInstance) -> Result<bool> {
        let desc = self.lookup(instance.schema())?;
        Ok(match desc.discriminator() {
            Some(d) => {
                let tag = instance.get(d.field).and_then(FieldValue::as_str);
                subtype_named(desc, d, tag).is_some()
            }
            None => false,
        })
    }

    fn decode(&self, desc: &'r SchemaDescriptor, raw: &Value, path: &str) -> Result<ModelInstance> {
        match &desc.kind {
            SchemaKind::Object {
                fields,
                discriminator,
            } => {
                let map = raw.as_object().ok_or_else(|| {
                    Slot::root(desc.name).violation(path, ViolationKind::TypeMismatch, "object")
                })?;

                if let Some(d) = discriminator {
                    let tag = map.get(d.field).and_then(Value::as_str);
                    if let Some(subtype) = subtype_named(desc, d, tag) {
                        tracing::debug!("Decoding {} at {} as subtype {}", desc.name, path, subtype);
                        let subtype = self.lookup(subtype)?;
                        return self.decode(subtype, raw, path);
                    }
                }

                self.decode_object(desc, fields, map, path)
            }
            SchemaKind::Array {
                items: item_type,
                minimum,
            } => {
                let elements = raw.as_array().ok_or_else(|| {
                    Slot::root(desc.name).violation(path, ViolationKind::TypeMismatch, "list")
                })?;
                let slot = Slot::items(desc.name, *minimum);
                let items = elements
                    .iter()
                    .enumerate()
                    .map(|(i, e)| self.decode_value(slot, item_type, e, &format!("{}[{}]", path, i)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ModelInstance::list(desc.name, items))
            }
            SchemaKind::Union { candidates } => {
                union::resolve(desc.name, candidates, self.policy, |candidate| {
                    let candidate = self.lookup(candidate)?;
                    self.decode(candidate, raw, path)
                })
            }
        }
    }

    fn decode_object(
        &self,
        desc: &'r SchemaDescriptor,
        fields: &'r [FieldSpec],
        map: &Map<String, Value>,
        path: &str,
    ) -> Result<ModelInstance> {
        let mut out = Vec::with_capacity(fields.len());
        for spec in fields {
            let slot = Slot::of(desc.name, spec);
            let field_path = format!("{}.{}", path, spec.name);
            match map.get(spec.name) {
                None if spec.required => {
                    return Err(slot.violation(&field_path, ViolationKind::MissingRequired, spec.ty.to_string()))
                }
                None => {}
                Some(Value::Null) if spec.nullable => out.push((spec.name, FieldValue::Null)),
                Some(Value::Null) if spec.required => {
                    return Err(slot.violation(&field_path, ViolationKind::NullNotAllowed, spec.ty.to_string()))
                }
                Some(Value::Null) => {}
                Some(value) => out.push((spec.name, self.decode_value(slot, &spec.ty, value, &field_path)?)),
            }
        }

        for key in map.keys().filter(|k| desc.field(k).is_none()) {
            tracing::debug!("Ignoring undeclared key '{}' of {} at {}", key, desc.name, path);
        }

        Ok(ModelInstance::object(desc.name, out))
    }

    fn decode_value(&self, slot: Slot<'_>, ty: &FieldType, raw: &Value, path: &str) -> Result<FieldValue> {
        let mismatch = || slot.violation(path, ViolationKind::TypeMismatch, ty.to_string());

        match ty {
            FieldType::String => {
                let s = raw.as_str().ok_or_else(mismatch)?;
                check_allowed(slot, s, path)?;
                Ok(FieldValue::String(s.to_string()))
            }
            FieldType::Integer => {
                let n = raw
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| raw.as_u64().map(i128::from))
                    .ok_or_else(mismatch)?;
                check_integer(slot, n, path)?;
                Ok(FieldValue::Integer(n))
            }
            FieldType::Float => raw.as_f64().map(FieldValue::Float).ok_or_else(mismatch),
            FieldType::Boolean => raw.as_bool().map(FieldValue::Bool).ok_or_else(mismatch),
            FieldType::Model(name) => {
                let target = self.lookup(name)?;
                // 形狀不符是外層欄位的錯；形狀正確後的錯誤歸屬於巢狀 model
                let shape_ok = match &target.kind {
                    SchemaKind::Object { .. } => raw.is_object(),
                    SchemaKind::Array { .. } => raw.is_array(),
                    SchemaKind::Union { .. } => true,
                };
                if !shape_ok {
                    return Err(mismatch());
                }
                self.decode(target, raw, path).map(FieldValue::Model)
            }
            FieldType::List(inner) => raw
                .as_array()
                .ok_or_else(mismatch)?
                .iter()
                .enumerate()
                .map(|(i, e)| self.decode_value(slot, inner, e, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>>>()
                .map(FieldValue::List),
        }
    }
}

/// The subtype a discriminator tag selects, if it names one other than the base.
fn subtype_named(
    desc: &SchemaDescriptor,
    discriminator: &Discriminator,
    tag: Option<&str>,
) -> Option<&'static str> {
    let tag = tag?;
    if tag == desc.name {
        return None;
    }
    discriminator.subtypes.iter().copied().find(|s| *s == tag)
}

fn supplied_tag<'a>(supplied: &'a [(String, FieldValue)], field: &str) -> Option<&'a str> {
    supplied
        .iter()
        .find(|(name, _)| name == field)
        .and_then(|(_, value)| value.as_str())
}

fn check_allowed(slot: Slot<'_>, value: &str, path: &str) -> Result<()> {
    match slot.allowed {
        Some(allowed) if !allowed.iter().any(|a| *a == value) => Err(slot.violation(
            path,
            ViolationKind::InvalidEnumValue,
            format!("one of [{}]", allowed.join(", ")),
        )),
        _ => Ok(()),
    }
}

fn check_integer(slot: Slot<'_>, n: i128, path: &str) -> Result<()> {
    if n < i128::from(i64::MIN) || n > i128::from(u64::MAX) {
        return Err(slot.violation(path, ViolationKind::OutOfRange, "a 64-bit integer"));
    }
    match slot.minimum {
        Some(min) if n < min => Err(slot.violation(path, ViolationKind::OutOfRange, format!(">= {}", min))),
        _ => Ok(()),
    }
}

/// Decode with the Epoch registry and the default union policy.
pub fn from_wire(schema: &str, raw: &Value) -> Result<ModelInstance> {
    Codec::default().from_wire(schema, raw)
}

/// Construct with the Epoch registry and the default union policy.
pub fn construct<I, K>(schema: &str, fields: I) -> Result<ModelInstance>
where
    I: IntoIterator<Item = (K, FieldValue)>,
    K: AsRef<str>,
{
    Codec::default().construct(schema, fields)
}

pub fn to_wire(instance: &ModelInstance) -> Value {
    instance.to_wire()
}
