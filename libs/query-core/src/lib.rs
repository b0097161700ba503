//! Declarative query engine for read-only record collections.
//!
//! A resource declares its projectable fields and a [`FilterSchema`] of extra
//! query parameters. [`QuerySchema::synthesize`] merges those with the fixed
//! pagination/sort/projection parameters into one validator, and
//! [`QuerySchema::parse`] turns a raw query string into a [`ValidatedQuery`]
//! or a [`QueryError`] whose first issue carries the caller-facing message.
//!
//! The [`pipeline`] module then runs filter → sort → paginate → project over
//! an in-memory collection.

pub mod decode;
pub mod issue;
pub mod pipeline;
pub mod query;
pub mod rule;
pub mod schema;
pub mod value;

pub use decode::{RawQuery, RawValue};
pub use issue::{Issue, IssueKind, PathSegment, QueryError};
pub use query::{SortOrder, ValidatedQuery};
pub use rule::Rule;
pub use schema::{FilterSchema, QuerySchema, SchemaError, PAGE_WITHOUT_LIMIT};

/// A single record of a collection: an ordered JSON object.
pub type Record = serde_json::Map<String, serde_json::Value>;
