//! Request body validation for the butterfly API.
//!
//! A [`Schema`] lists exactly which fields a record kind accepts, which of
//! them are required, and the primitive kind of each. Validation is strict:
//!
//! - keys the schema does not declare are rejected, never ignored
//! - required fields that are absent or `null` are rejected
//! - values of the wrong primitive kind, or numbers outside the declared
//!   closed range, are rejected
//!
//! Every violation in the input is reported, not just the first. The typed
//! `parse_*` functions run validation and then produce the strongly typed
//! draft record from `bfly-types`.

pub mod error;
pub mod schema;
pub mod shapes;

pub use error::{ValidationError, ValidationResult, Violation};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use shapes::{
    butterfly_schema, parse_butterfly, parse_rating, parse_user, rating_schema, schema_for,
    user_schema, validate_butterfly, validate_rating, validate_user, RATING_MAX, RATING_MIN,
};
