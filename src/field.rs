use std::fmt;

/// The closed set of value kinds a field can be coerced into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Kind {
    String,
    Integer,
    Boolean,
    Float,
    StringList,
    /// Declared type has no mapping. The field is listed but never resolved or written.
    Unsupported,
}

impl Kind {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::StringList => "string list",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Static metadata for one settable field of a configuration struct
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDescriptor {
    /// Declared field name
    pub name: String,
    /// Alternate name used for the key, also enables the prefix-less fallback lookup
    pub override_name: Option<String>,
    /// Literal used when neither the prefixed nor the fallback key has a value
    pub default_value: Option<String>,
    /// Whether a missing value is an error
    pub required: bool,
    pub kind: Kind,
    /// Bit width for integers and floats, 0 otherwise
    pub bit_width: u32,
    /// Rust type name, used in conversion errors
    pub type_name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        let bit_width = match kind {
            Kind::Integer | Kind::Float => 64,
            _ => 0,
        };
        let type_name = match kind {
            Kind::String => "String",
            Kind::Integer => "i64",
            Kind::Boolean => "bool",
            Kind::Float => "f64",
            Kind::StringList => "Vec<String>",
            Kind::Unsupported => "unknown",
        };

        Self {
            name: name.into(),
            override_name: None,
            default_value: None,
            required: false,
            kind,
            bit_width,
            type_name: type_name.to_string(),
        }
    }

    /// Set the bit width. The type name follows for integers and floats.
    pub fn bits(mut self, bit_width: u32) -> Self {
        self.bit_width = bit_width;
        match self.kind {
            Kind::Integer => self.type_name = format!("i{}", bit_width),
            Kind::Float => self.type_name = format!("f{}", bit_width),
            _ => {}
        }
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// An empty name is the same as no override
    pub fn override_name(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into()).filter(|s| !s.is_empty());
        self
    }

    /// An empty default is the same as no default
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Name used to build environment keys
    pub fn effective_name(&self) -> &str {
        self.override_name.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered field descriptors of one configuration struct, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDescriptor {
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }
}

impl From<Vec<FieldDescriptor>> for RecordDescriptor {
    fn from(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a RecordDescriptor {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
