//! Record storage for the butterfly API.
//!
//! The store is a collection of three record collections (`butterflies`,
//! `users`, `ratings`) held fully in memory and, for the file backend,
//! mirrored to a single JSON document on disk.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`InMemoryStore`] -- no persistence, for tests and embedding
//! - [`JsonFileStore`] -- whole-document JSON file, rewritten on every append
//!
//! # Design Rules
//!
//! 1. Lookups are linear scans in store order; the first match wins.
//! 2. Records are never updated or deleted, and an existing id is never reused.
//! 3. Reads share a lock; appends hold an exclusive lock across the
//!    mutate-and-persist sequence, so concurrent appends cannot lose writes.
//! 4. An append that fails to persist is rolled back in memory.
//! 5. A malformed store file is an error at open time, never silently reset.
//! 6. Records the file holds without an `id` are given one at open time, and
//!    properties the record types don't know about survive every rewrite.

pub mod document;
pub mod error;
pub mod file;
pub mod memory;
pub mod seed;
pub mod traits;

pub use document::StoreDocument;
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use seed::demo_document;
pub use traits::RecordStore;
