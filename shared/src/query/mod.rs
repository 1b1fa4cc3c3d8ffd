//! Structured and raw log queries.
//!
//! A structured query goes through three steps: the loose [`QueryLogsParams`] are
//! turned into a [`LogQueryPlan`] of typed predicates by the [`PredicateBuilder`],
//! the [`QueryExecutor`] runs the plan against the `logs` view, and the rows are
//! handed to the renderer. Raw SQL skips the builder.
//!
//! # Example
//!
//! ```
//! use shared::query::{Predicate, PredicateBuilder, QueryLogsParams};
//! use shared::timezone::TimeResolver;
//!
//! let resolver = TimeResolver::new("UTC").unwrap();
//! let builder = PredicateBuilder::new(&resolver);
//! let now = chrono::Utc::now();
//!
//! let lower = builder.build(&QueryLogsParams::new().with_level("error"), now).unwrap();
//! let upper = builder.build(&QueryLogsParams::new().with_level("ERROR"), now).unwrap();
//!
//! assert_eq!(lower, upper);
//! assert!(lower.predicates.contains(&Predicate::LevelEquals("ERROR".to_string())));
//! ```

mod error;
mod executor;
mod params;
mod predicate;

pub use error::QueryError;
pub use executor::QueryExecutor;
pub use params::{
    ListSourcesParams, QueryLogsParams, SqlParams, TimeSelection, DEFAULT_LIMIT,
    DEFAULT_MINUTES_AGO, SQL_DISPLAY_CAP,
};
pub use predicate::{escape_like, parse_date, LogQueryPlan, Predicate, PredicateBuilder, SortKey};
