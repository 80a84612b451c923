use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current value of one field.
///
/// Scalar kinds (text, email, number, date, select, file) hold the literal
/// string the user entered or chose; `multiselect` holds the ordered list of
/// selected option ids. On the wire it is either a JSON string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn empty_text() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn empty_list() -> Self {
        FieldValue::List(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

/// Lists coerce to their items joined by commas.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Field name to current value.
pub type FormValues = BTreeMap<String, FieldValue>;

/// Field name to the validation message currently shown for it.
pub type FieldErrors = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_coerces_to_comma_separated_text() {
        let value = FieldValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(value.to_string(), "a,b");
        assert!(!value.is_empty());
        assert!(FieldValue::empty_list().is_empty());
        assert!(FieldValue::empty_text().is_empty());
    }

    #[test]
    fn test_values_serialize_untagged() {
        let mut values = FormValues::new();
        values.insert("tags".to_string(), FieldValue::empty_list());
        values.insert("username".to_string(), FieldValue::from("alice"));

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"tags":[],"username":"alice"}"#);

        let back: FormValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
