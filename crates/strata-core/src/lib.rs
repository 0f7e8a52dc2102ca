//! Core types and trait definitions for Strata.
//!
//! Schema vocabulary, the WHERE-predicate and statement builders, the
//! three-level hierarchy description and the built-in vertical catalog. This
//! crate has no HTTP or database dependencies; every other crate depends on
//! it.

// Native `async fn`-style trait methods; the returned futures are spelled out
// with explicit `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod hierarchy;
pub mod sql;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use store::{ErrorKind, RecordStore, StoreError};
pub use value::{Row, Value};
