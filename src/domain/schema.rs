use std::fmt;

/// 欄位的語意型別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// Reference to another registered schema by name.
    Model(&'static str),
    List(Box<FieldType>),
}

impl FieldType {
    pub fn list_of(item: FieldType) -> Self {
        FieldType::List(Box::new(item))
    }

    /// Schema names this type refers to, including through lists.
    pub fn model_ref(&self) -> Option<&'static str> {
        match self {
            FieldType::Model(name) => Some(*name),
            FieldType::List(inner) => inner.model_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Float => f.write_str("float"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Model(name) => f.write_str(name),
            FieldType::List(inner) => write!(f, "list<{}>", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub nullable: bool,
    /// Allowed values for string fields.
    pub allowed: Option<&'static [&'static str]>,
    /// Inclusive lower bound for integer fields.
    pub minimum: Option<i128>,
}

impl FieldSpec {
    pub fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
            nullable: false,
            allowed: None,
            minimum: None,
        }
    }

    pub fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn at_least(mut self, minimum: i128) -> Self {
        self.minimum = Some(minimum);
        self
    }
}

/// Subtype dispatch on a string field (`allOf` + `discriminator`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    pub field: &'static str,
    /// The discriminator value of each subtype is its schema name.
    pub subtypes: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    Object {
        fields: Vec<FieldSpec>,
        discriminator: Option<Discriminator>,
    },
    Array {
        items: FieldType,
        /// Inclusive lower bound for integer items.
        minimum: Option<i128>,
    },
    Union {
        candidates: Vec<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: &'static str,
    pub kind: SchemaKind,
}

impl SchemaDescriptor {
    pub fn object(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name,
            kind: SchemaKind::Object {
                fields,
                discriminator: None,
            },
        }
    }

    pub fn array(name: &'static str, items: FieldType) -> Self {
        Self {
            name,
            kind: SchemaKind::Array {
                items,
                minimum: None,
            },
        }
    }

    pub fn union(name: &'static str, candidates: Vec<&'static str>) -> Self {
        Self {
            name,
            kind: SchemaKind::Union { candidates },
        }
    }

    /// Attach a discriminator to an object schema. No-op for other kinds.
    pub fn discriminated_by(mut self, field: &'static str, subtypes: Vec<&'static str>) -> Self {
        if let SchemaKind::Object { discriminator, .. } = &mut self.kind {
            *discriminator = Some(Discriminator { field, subtypes });
        }
        self
    }

    /// Lower bound for the integer items of a list schema. No-op for other kinds.
    pub fn items_at_least(mut self, bound: i128) -> Self {
        if let SchemaKind::Array { minimum, .. } = &mut self.kind {
            *minimum = Some(bound);
        }
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        match &self.kind {
            SchemaKind::Object { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        match &self.kind {
            SchemaKind::Object { discriminator, .. } => discriminator.as_ref(),
            _ => None,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, SchemaKind::Union { .. })
    }

    /// Whether an instance of `schema` may stand where this schema is expected.
    pub fn accepts(&self, schema: &str) -> bool {
        if self.name == schema {
            return true;
        }
        match &self.kind {
            SchemaKind::Union { candidates } => candidates.iter().any(|c| *c == schema),
            SchemaKind::Object {
                discriminator: Some(d),
                ..
            } => d.subtypes.iter().any(|s| *s == schema),
            _ => false,
        }
    }

    /// Every schema name this descriptor depends on.
    pub fn references(&self) -> Vec<&'static str> {
        match &self.kind {
            SchemaKind::Object {
                fields,
                discriminator,
            } => {
                let mut refs: Vec<&'static str> =
                    fields.iter().filter_map(|f| f.ty.model_ref()).collect();
                if let Some(d) = discriminator {
                    refs.extend(d.subtypes.iter().copied());
                }
                refs
            }
            SchemaKind::Array { items, .. } => items.model_ref().into_iter().collect(),
            SchemaKind::Union { candidates } => candidates.clone(),
        }
    }
}
