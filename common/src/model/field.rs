//! Field descriptors: the declarative schema a form is rendered from.
//!
//! A schema is an ordered JSON array of descriptor objects. Each object names
//! its kind through the `type` tag and carries a handful of optional
//! attributes. Deserialization goes through [`RawFieldDescriptor`] so that the
//! loosely typed wire format (scalars that may be strings or numbers, a `data`
//! attribute whose meaning depends on the kind) ends up in the strongly typed
//! [`FieldDescriptor`] / [`FieldKind`] pair.
//!
//! Cards group child descriptors. Nesting is allowed to any depth, but every
//! value-holding field shares a single flat namespace keyed by `name`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A single option of a `select` or `multiselect` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value of the option.
    pub id: String,
    /// Label shown to the user.
    pub title: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// The closed set of field kinds a schema can use.
///
/// `Unknown` keeps any tag this crate does not recognise. Such fields still
/// hold a value and are still validated, but render nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Select(Vec<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    File,
    Card(Vec<FieldDescriptor>),
    Unknown(String),
}

impl FieldKind {
    /// The `type` tag used on the wire.
    pub fn tag(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select(_) => "select",
            FieldKind::MultiSelect(_) => "multiselect",
            FieldKind::File => "file",
            FieldKind::Card(_) => "card",
            FieldKind::Unknown(tag) => tag,
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, FieldKind::Card(_))
    }
}

/// Declarative description of one form input, or of a card grouping inputs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    /// State key. Unique across the whole schema, cards included.
    pub name: String,
    /// Display label (the legend for cards).
    pub title: String,
    pub kind: FieldKind,
    /// Initial value; `None` means the field starts empty.
    pub value: Option<String>,
    pub required: bool,
    /// Regular expression the value must match when non-empty.
    pub validator: Option<String>,
    /// Message that replaces the default validation messages.
    pub error: Option<String>,
    pub placeholder: Option<String>,
    /// Presentational lower bound for `number` and `date` inputs.
    pub min: Option<String>,
    /// Presentational upper bound for `number` and `date` inputs.
    pub max: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            kind,
            value: None,
            required: false,
            validator: None,
            error: None,
            placeholder: None,
            min: None,
            max: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_validator(mut self, pattern: impl Into<String>) -> Self {
        self.validator = Some(pattern.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_range(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self.max = Some(max.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Child descriptors when this is a card, empty otherwise.
    pub fn children(&self) -> &[FieldDescriptor] {
        match &self.kind {
            FieldKind::Card(children) => children,
            _ => &[],
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FieldDescriptor>) {
        match &self.kind {
            FieldKind::Card(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            _ => out.push(self),
        }
    }
}

/// Every value-holding descriptor of `schema` in document order, descending
/// into cards.
pub fn leaves(schema: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    let mut out = Vec::new();
    for field in schema {
        field.collect_leaves(&mut out);
    }
    out
}

/// Finds the value-holding descriptor called `name`, wherever it is nested.
pub fn find_leaf<'a>(schema: &'a [FieldDescriptor], name: &str) -> Option<&'a FieldDescriptor> {
    leaves(schema).into_iter().find(|field| field.name == name)
}

/// Parses a schema from its JSON text.
pub fn parse_schema(json: &str) -> Result<Vec<FieldDescriptor>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Structural problems found while decoding a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field of type `{0}` must have a non-empty name")]
    EmptyName(String),
    #[error("field `{field}`: `data` must be an array")]
    DataNotArray { field: String },
    #[error("field `{field}`: invalid option: {reason}")]
    InvalidOption { field: String, reason: String },
    #[error("field `{field}`: invalid child: {reason}")]
    InvalidChild { field: String, reason: String },
}

/// Wire shape of a descriptor before kind-dependent interpretation.
#[derive(Deserialize)]
struct RawFieldDescriptor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    validator: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    min: Value,
    #[serde(default)]
    max: Value,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct RawOption {
    id: Value,
    #[serde(default)]
    title: Value,
}

impl TryFrom<RawFieldDescriptor> for FieldDescriptor {
    type Error = SchemaError;

    fn try_from(raw: RawFieldDescriptor) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_str() {
            "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "number" => FieldKind::Number,
            "date" => FieldKind::Date,
            "select" => FieldKind::Select(parse_options(&raw.name, &raw.data)?),
            "multiselect" => FieldKind::MultiSelect(parse_options(&raw.name, &raw.data)?),
            "file" => FieldKind::File,
            "card" => FieldKind::Card(parse_children(&raw.name, &raw.data)?),
            other => FieldKind::Unknown(other.to_string()),
        };

        if raw.name.trim().is_empty() && !kind.is_card() {
            return Err(SchemaError::EmptyName(raw.kind));
        }

        Ok(FieldDescriptor {
            name: raw.name,
            title: raw.title,
            kind,
            value: initial_value(&raw.value),
            required: raw.required,
            validator: raw.validator.filter(|pattern| !pattern.is_empty()),
            error: raw.error.filter(|message| !message.is_empty()),
            placeholder: raw.placeholder,
            min: scalar_text(&raw.min),
            max: scalar_text(&raw.max),
        })
    }
}

fn data_items<'a>(field: &str, data: &'a Value) -> Result<&'a [Value], SchemaError> {
    match data {
        Value::Null => Ok(&[]),
        Value::Array(items) => Ok(items),
        _ => Err(SchemaError::DataNotArray {
            field: field.to_string(),
        }),
    }
}

fn parse_options(field: &str, data: &Value) -> Result<Vec<SelectOption>, SchemaError> {
    data_items(field, data)?
        .iter()
        .map(|item| {
            let raw: RawOption =
                serde_json::from_value(item.clone()).map_err(|e| SchemaError::InvalidOption {
                    field: field.to_string(),
                    reason: e.to_string(),
                })?;
            let id = scalar_text(&raw.id).ok_or_else(|| SchemaError::InvalidOption {
                field: field.to_string(),
                reason: "option id must be a string or a number".to_string(),
            })?;
            let title = scalar_text(&raw.title).unwrap_or_default();
            Ok(SelectOption { id, title })
        })
        .collect()
}

fn parse_children(field: &str, data: &Value) -> Result<Vec<FieldDescriptor>, SchemaError> {
    data_items(field, data)?
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone()).map_err(|e| SchemaError::InvalidChild {
                field: field.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Falsy initial values (`""`, `0`, `false`, `null`) mean "start empty".
fn initial_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Bool(false) => None,
        other => scalar_text(other),
    }
}
