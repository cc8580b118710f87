//! Foundation types for the butterfly API.
//!
//! Every other `bfly-*` crate depends on `bfly-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] — short, URL-safe identifier of a stored record
//! - [`IdGenerator`] — source of fresh record ids ([`ShortIdGenerator`] in production)
//! - [`Butterfly`], [`User`], [`Rating`] — the three stored record kinds
//! - [`NewButterfly`], [`NewUser`], [`NewRating`] — validated request drafts
//! - [`Collection`] — names the collection a record lives in
//! - [`Record`] — any one of the three records

pub mod collection;
pub mod error;
pub mod id;
pub mod record;

pub use collection::Collection;
pub use error::TypeError;
pub use id::{IdGenerator, RecordId, SequentialIdGenerator, ShortIdGenerator, ID_ALPHABET};
pub use record::{Butterfly, ExtraFields, NewButterfly, NewRating, NewUser, Rating, Record, User};
