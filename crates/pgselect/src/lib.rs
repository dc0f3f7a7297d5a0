//! # pgselect
//!
//! A programmatic, parameter-safe SELECT builder for Postgres-flavored SQL.
//!
//! ## Features
//!
//! - **Declarative projection**: select columns additively, exclude them
//!   subtractively; the two sets are reconciled at compile time
//! - **Parameter safety**: filter values bind as `$1, $2, ...` placeholders,
//!   never interpolated into the SQL text
//! - **Branchable builders**: `clone()` a shared base query and mutate each
//!   branch independently
//! - **Executor-agnostic**: compilation returns text plus
//!   `tokio-postgres`-compatible parameter refs; running the statement is
//!   the caller's concern
//!
//! ## Example
//!
//! ```
//! use pgselect::{ColumnOrder, Condition, SelectQuery};
//!
//! let mut q = SelectQuery::new("users", ["id", "name", "age", "password"]);
//! q.select_not(["password"]);
//! q.filter(Condition::eq("status", "active"));
//! q.order([ColumnOrder::desc("created_at")]);
//! q.set_limit(20);
//!
//! let (columns, stmt) = q.compile();
//! assert_eq!(columns, ["id", "name", "age"]);
//! assert_eq!(
//!     stmt.to_sql(),
//!     "SELECT id, name, age FROM users WHERE status = $1 ORDER BY created_at DESC"
//! );
//! // The executor applies limit/offset and binds stmt.params_ref().
//! assert_eq!(q.limit(), 20);
//! ```

pub mod columns;
pub mod condition;
pub mod error;
pub mod order;
pub mod query;
pub mod sql;

pub use columns::ColumnSet;
pub use condition::{Condition, Op};
pub use error::{QueryError, QueryResult};
pub use order::{ColumnOrder, SortDir};
pub use query::{DEFAULT_BATCH_SIZE, Query, SelectQuery};
pub use sql::Sql;
