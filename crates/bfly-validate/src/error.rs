use std::fmt;

use thiserror::Error;

/// A single problem found in an input record.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// The input is not a JSON object at all.
    NotAnObject,
    /// A key the schema does not declare.
    UnknownKey(String),
    /// A required field is absent or `null`.
    Required(String),
    /// A field holds a value of the wrong primitive kind.
    WrongType { field: String, expected: &'static str },
    /// A numeric field lies outside its closed range.
    OutOfRange { field: String, min: f64, max: f64 },
    /// Shape checks passed but the typed conversion still failed.
    Malformed(String),
}

impl Violation {
    /// The offending key, if this is an unknown-key violation.
    pub fn unknown_key(&self) -> Option<&str> {
        match self {
            Self::UnknownKey(key) => Some(key),
            _ => None,
        }
    }

    /// The field this violation refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownKey(f) | Self::Required(f) => Some(f),
            Self::WrongType { field, .. } | Self::OutOfRange { field, .. } => Some(field),
            Self::NotAnObject | Self::Malformed(_) => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "value must be an object."),
            Self::UnknownKey(key) => write!(f, "{key} is not an allowed key."),
            Self::Required(field) => write!(f, "{field} is required."),
            Self::WrongType { field, expected } => write!(f, "{field} must be {expected}."),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{field} must be a number between {min} and {max}.")
            }
            Self::Malformed(reason) => write!(f, "value is malformed: {reason}."),
        }
    }
}

/// Rejection of an input record, carrying every violation found.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{}", render(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Unknown keys in the order they were found.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.violations.iter().filter_map(Violation::unknown_key).collect()
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn render(violations: &[Violation]) -> String {
    let mut sections = Vec::new();

    let unknown: Vec<&str> = violations.iter().filter_map(Violation::unknown_key).collect();
    if !unknown.is_empty() {
        sections.push(format!("The following keys are invalid: {}", unknown.join(", ")));
    }

    let properties: Vec<String> = violations
        .iter()
        .filter(|v| v.unknown_key().is_none())
        .map(|v| format!("  {v}"))
        .collect();
    if !properties.is_empty() {
        sections.push(format!(
            "The following properties have invalid values:\n{}",
            properties.join("\n")
        ));
    }

    sections.join("\n")
}
