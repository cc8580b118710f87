//! Strict object shapes.

use bfly_types::Collection;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult, Violation};

/// Primitive kind a field must hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    String,
    /// A JSON number within the closed range `[min, max]`.
    Number { min: f64, max: f64 },
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number { .. } => "a number",
        }
    }

    fn check(&self, field: &str, value: &Value) -> Option<Violation> {
        match (self, value) {
            (Self::String, Value::String(_)) => None,
            (Self::Number { min, max }, Value::Number(n)) => {
                let v = n.as_f64().unwrap_or(f64::NAN);
                if v >= *min && v <= *max {
                    None
                } else {
                    Some(Violation::OutOfRange {
                        field: field.to_string(),
                        min: *min,
                        max: *max,
                    })
                }
            }
            _ => Some(Violation::WrongType {
                field: field.to_string(),
                expected: self.describe(),
            }),
        }
    }
}

/// One declared field of a [`Schema`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// The exact set of fields a record kind accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    collection: Collection,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            fields: Vec::new(),
        }
    }

    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
        });
        self
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check `value` against this schema, collecting every violation.
    ///
    /// Unknown keys come first, then per-field violations in declaration
    /// order. A `null` value counts as absent.
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        let Value::Object(map) = value else {
            return Err(ValidationError::single(Violation::NotAnObject));
        };

        let mut violations: Vec<Violation> = map
            .keys()
            .filter(|key| self.field(key).is_none())
            .map(|key| Violation::UnknownKey(key.clone()))
            .collect();

        for spec in &self.fields {
            match map.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        violations.push(Violation::Required(spec.name.to_string()));
                    }
                }
                Some(v) => violations.extend(spec.kind.check(spec.name, v)),
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Validate, then convert into the typed record draft `T`.
    pub fn parse<T: DeserializeOwned>(&self, value: &Value) -> ValidationResult<T> {
        self.validate(value)?;
        let cleaned = match value {
            // Optional fields sent as null are dropped so typed drafts see them as absent.
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            other => other.clone(),
        };
        serde_json::from_value(cleaned)
            .map_err(|e| ValidationError::single(Violation::Malformed(e.to_string())))
    }
}
