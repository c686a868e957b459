use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Key
///
/// Identifies one model within the current page.
/// Keys need not be globally unique.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Key {
    /// Position in the unpaginated source.
    Index(usize),
    /// Single-column key.
    Value(Value),
    /// Multi-column key, ordered as the key columns are declared.
    Composite(Vec<(String, Value)>),
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Value(value) => write!(f, "{value}"),
            Self::Composite(parts) => {
                f.write_str("(")?;
                for (i, (name, value)) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

///
/// KeySelector
///
/// Extracts a key from a model, either by field name or via a closure.
/// Field lookup is bound at construction so models that are not records
/// can still use closure selectors.
///

pub struct KeySelector<M> {
    field: Option<String>,
    extract: Box<dyn Fn(&M) -> Key>,
}

impl<M> KeySelector<M> {
    /// Select the key with a closure.
    pub fn with(extract: impl Fn(&M) -> Key + 'static) -> Self {
        Self {
            field: None,
            extract: Box::new(extract),
        }
    }

    /// Select the key by reading one named field; missing fields yield null.
    pub fn field(name: impl Into<String>) -> Self
    where
        M: Record,
    {
        let name = name.into();
        let lookup = name.clone();

        Self {
            field: Some(name),
            extract: Box::new(move |model: &M| {
                Key::Value(model.field(&lookup).unwrap_or_default())
            }),
        }
    }

    /// The field name, when this selector reads a field.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    #[must_use]
    pub fn key(&self, model: &M) -> Key {
        (self.extract)(model)
    }

    /// Extract keys for a slice of models, preserving order.
    #[must_use]
    pub fn keys(&self, models: &[M]) -> Vec<Key> {
        models.iter().map(|model| self.key(model)).collect()
    }
}

impl<M> fmt::Debug for KeySelector<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => f.debug_tuple("KeySelector::Field").field(field).finish(),
            None => f.write_str("KeySelector::With(..)"),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn field_selector_reads_value_and_defaults_missing_to_null() {
        let selector = KeySelector::<BTreeMap<String, Value>>::field("id");
        let mut row = BTreeMap::new();
        row.insert("id".to_string(), Value::Uint(11));

        assert_eq!(selector.key(&row), Key::Value(Value::Uint(11)));
        assert_eq!(selector.field_name(), Some("id"));
        assert_eq!(
            selector.key(&BTreeMap::new()),
            Key::Value(Value::Null),
            "missing key field should not panic"
        );
    }

    #[test]
    fn closure_selector_works_for_plain_models() {
        let selector = KeySelector::with(|word: &&str| Key::Value(Value::from(word.len() as u64)));

        assert_eq!(
            selector.keys(&["a", "abc"]),
            vec![Key::Value(Value::Uint(1)), Key::Value(Value::Uint(3))]
        );
        assert_eq!(selector.field_name(), None);
    }

    #[test]
    fn composite_key_display_lists_columns_in_order() {
        let key = Key::Composite(vec![
            ("tenant".to_string(), Value::from("acme")),
            ("id".to_string(), Value::Uint(4)),
        ]);

        assert_eq!(key.to_string(), "(tenant=acme, id=4)");
    }
}
