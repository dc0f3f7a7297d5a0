//! The SELECT builder and the capability contract it fulfills.

use crate::columns::ColumnSet;
use crate::condition::Condition;
use crate::error::{QueryError, QueryResult};
use crate::order::ColumnOrder;
use crate::sql::Sql;
use std::fmt;

/// Rows fetched per round trip when a store batch-loads 1:N relations.
pub const DEFAULT_BATCH_SIZE: u64 = 50;

/// What a downstream executor needs from a query.
///
/// Execution and relation-hydration code depends on this trait rather than
/// on [`SelectQuery`] directly, leaving room for alternative
/// implementations such as a raw-statement passthrough.
pub trait Query {
    /// Compile into the resolved column names and the finished statement.
    fn compile(&self) -> (Vec<String>, Sql);

    /// Whether the result set may be a partial view of the entity.
    ///
    /// True once the caller has explicitly overridden the default column
    /// list; a partial row cannot be written back safely.
    fn is_read_only(&self) -> bool;

    /// Number of skipped rows.
    fn offset(&self) -> u64;

    /// Max number of rows retrieved, 0 meaning unlimited.
    fn limit(&self) -> u64;

    /// Rows retrieved per batch while loading 1:N relations.
    fn batch_size(&self) -> u64;
}

/// A mutable SELECT builder bound to one table.
///
/// Mutation happens in place; to branch several related queries off a
/// shared base, `clone()` the builder first — the clone shares no mutable
/// state with the original.
///
/// # Example
/// ```
/// use pgselect::{ColumnOrder, Condition, SelectQuery};
///
/// let mut q = SelectQuery::new("users", ["id", "name", "age"]);
/// q.filter(Condition::gt("age", 18_i64));
/// q.order([ColumnOrder::desc("created_at")]);
/// q.set_limit(10);
///
/// let (columns, stmt) = q.compile();
/// assert_eq!(columns, ["id", "name", "age"]);
/// assert_eq!(
///     stmt.to_sql(),
///     "SELECT id, name, age FROM users WHERE age > $1 ORDER BY created_at DESC"
/// );
/// assert_eq!(q.limit(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    columns: ColumnSet,
    excluded_columns: ColumnSet,
    conditions: Vec<Condition>,
    orders: Vec<ColumnOrder>,

    select_changed: bool,
    batch_size: u64,
    offset: u64,
    limit: u64,
}

impl SelectQuery {
    /// Create a builder for querying `table` with the given default
    /// columns.
    ///
    /// An empty column list means "all columns the caller's entity mapping
    /// knows about"; resolving that is the mapping layer's job, not ours.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: ColumnSet::new(columns),
            excluded_columns: ColumnSet::default(),
            conditions: Vec::new(),
            orders: Vec::new(),
            select_changed: false,
            batch_size: DEFAULT_BATCH_SIZE,
            offset: 0,
            limit: 0,
        }
    }

    /// Add the given columns to the selected set.
    ///
    /// The first call switches the builder from the default projection to
    /// an explicit one: the default column list is cleared and the query
    /// becomes read-only. Selecting a previously excluded column
    /// un-excludes it.
    pub fn select<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.select_changed {
            self.columns = ColumnSet::default();
            self.select_changed = true;
        }

        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.excluded_columns.remove(&columns);
        self.columns.add(columns);
    }

    /// Suppress the given columns from the resolved projection.
    ///
    /// Exclusion is evaluated at compile time, so excluding before or
    /// after a column was selected yields the same projection.
    pub fn select_not<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_columns.add(columns);
    }

    /// Append ordering clauses; multiple calls accumulate.
    pub fn order<I>(&mut self, orders: I)
    where
        I: IntoIterator<Item = ColumnOrder>,
    {
        self.orders.extend(orders);
    }

    /// Add a condition to filter the query. All conditions added are
    /// conjoined with `AND` in call order.
    ///
    /// # Example
    /// ```
    /// use pgselect::{Condition, SelectQuery};
    ///
    /// let mut q = SelectQuery::new("users", ["id"]);
    /// q.filter(Condition::eq("name", "foo"));
    /// q.filter(Condition::gt("age", 18_i64));
    /// // ... WHERE name = $1 AND age > $2
    /// ```
    pub fn filter(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Set the number of rows per relation-loading batch.
    pub fn set_batch_size(&mut self, size: u64) {
        self.batch_size = size;
    }

    /// Set the max number of rows to retrieve (0 = unlimited).
    pub fn set_limit(&mut self, n: u64) {
        self.limit = n;
    }

    /// Set the number of rows to skip.
    pub fn set_offset(&mut self, n: u64) {
        self.offset = n;
    }

    /// Set limit and offset from a 1-based page number and page size.
    ///
    /// Returns an error if `page < 1`.
    pub fn page(&mut self, page: u64, per_page: u64) -> QueryResult<()> {
        if page < 1 {
            return Err(QueryError::validation(format!(
                "page must be >= 1, got {page}"
            )));
        }
        self.limit = per_page;
        self.offset = (page - 1) * per_page;
        Ok(())
    }

    /// Rows retrieved per batch while loading 1:N relations.
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Max number of rows to retrieve, 0 meaning unlimited.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the projection was explicitly narrowed.
    ///
    /// Any `select` call flips this, even one that reselects the full
    /// default column list.
    pub fn is_read_only(&self) -> bool {
        self.select_changed
    }

    /// The resolved projection: selected columns minus exclusions, in
    /// selection order.
    fn selected_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| !self.excluded_columns.contains(col))
            .map(str::to_string)
            .collect()
    }

    /// Compile into the resolved column names and the finished statement.
    ///
    /// Compilation is pure: repeated calls without intervening mutation
    /// yield identical results and never mutate the builder. Limit,
    /// offset, and batch size are not rendered into the statement; the
    /// executor reads them through the getters and applies them when it
    /// runs the query.
    pub fn compile(&self) -> (Vec<String>, Sql) {
        let columns = self.selected_columns();

        let mut stmt = Sql::new("SELECT ");
        stmt.push(&columns.join(", "));
        stmt.push(" FROM ");
        stmt.push(&self.table);
        stmt.push_where_and(&self.conditions);
        if !self.orders.is_empty() {
            stmt.push(" ORDER BY ");
            for (i, order) in self.orders.iter().enumerate() {
                if i > 0 {
                    stmt.push(", ");
                }
                stmt.push(&order.to_sql());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgselect.sql",
            sql = %stmt.to_sql(),
            params = stmt.param_count(),
            "compiled SELECT"
        );

        (columns, stmt)
    }
}

impl Query for SelectQuery {
    fn compile(&self) -> (Vec<String>, Sql) {
        SelectQuery::compile(self)
    }

    fn is_read_only(&self) -> bool {
        SelectQuery::is_read_only(self)
    }

    fn offset(&self) -> u64 {
        SelectQuery::offset(self)
    }

    fn limit(&self) -> u64 {
        SelectQuery::limit(self)
    }

    fn batch_size(&self) -> u64 {
        SelectQuery::batch_size(self)
    }
}

impl fmt::Display for SelectQuery {
    /// The compiled statement text, for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, stmt) = self.compile();
        f.write_str(&stmt.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(q: &SelectQuery) -> String {
        let (_, stmt) = q.compile();
        stmt.to_sql()
    }

    #[test]
    fn new_defaults() {
        let q = SelectQuery::new("users", ["id", "name"]);
        assert_eq!(q.batch_size(), 50);
        assert_eq!(q.limit(), 0);
        assert_eq!(q.offset(), 0);
        assert!(!q.is_read_only());
    }

    #[test]
    fn compiles_default_projection() {
        let q = SelectQuery::new("users", ["id", "name", "age"]);
        let (columns, stmt) = q.compile();
        assert_eq!(columns, ["id", "name", "age"]);
        assert_eq!(stmt.to_sql(), "SELECT id, name, age FROM users");
        assert_eq!(stmt.param_count(), 0);
    }

    #[test]
    fn select_not_suppresses_column() {
        let mut q = SelectQuery::new("users", ["id", "name", "age"]);
        q.select_not(["age"]);

        let (columns, stmt) = q.compile();
        assert_eq!(columns, ["id", "name"]);
        assert_eq!(stmt.to_sql(), "SELECT id, name FROM users");
        assert!(!q.is_read_only());
    }

    #[test]
    fn select_replaces_default_projection() {
        let mut q = SelectQuery::new("users", ["id", "name", "age"]);
        q.select_not(["age"]);
        q.select(["email"]);

        let (columns, _) = q.compile();
        assert_eq!(columns, ["email"]);
        assert!(q.is_read_only());
    }

    #[test]
    fn select_clears_defaults_only_once() {
        let mut q = SelectQuery::new("users", ["id", "name"]);
        q.select(["email"]);
        q.select(["age"]);
        q.select(["email"]); // already present, no-op

        let (columns, _) = q.compile();
        assert_eq!(columns, ["email", "age"]);
    }

    #[test]
    fn reselect_overrides_prior_exclusion() {
        let mut q = SelectQuery::new("users", ["id", "name"]);
        q.select_not(["email"]);
        q.select(["email"]);

        let (columns, _) = q.compile();
        assert_eq!(columns, ["email"]);
    }

    #[test]
    fn exclusion_wins_over_selection() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.select(["email", "name"]);
        q.select_not(["email"]);

        let (columns, _) = q.compile();
        assert_eq!(columns, ["name"]);
    }

    #[test]
    fn exclusion_is_evaluated_at_compile_time() {
        // Excluding early or late makes no difference; the sets are only
        // reconciled when compiling.
        let mut early = SelectQuery::new("users", ["id", "name"]);
        early.select_not(["name"]);
        early.filter(Condition::eq("status", "active"));

        let mut late = SelectQuery::new("users", ["id", "name"]);
        late.filter(Condition::eq("status", "active"));
        late.select_not(["name"]);

        assert_eq!(early.compile().0, late.compile().0);
        assert_eq!(early.compile().0, ["id"]);
    }

    #[test]
    fn compile_is_idempotent() {
        let mut q = SelectQuery::new("users", ["id", "name"]);
        q.filter(Condition::eq("name", "foo"));
        q.order([ColumnOrder::asc("id")]);

        let (cols_a, stmt_a) = q.compile();
        let (cols_b, stmt_b) = q.compile();
        assert_eq!(cols_a, cols_b);
        assert_eq!(stmt_a.to_sql(), stmt_b.to_sql());
        assert_eq!(stmt_a.param_count(), stmt_b.param_count());
    }

    #[test]
    fn clone_branches_independently() {
        let mut base = SelectQuery::new("users", ["id", "name"]);
        let mut branch = base.clone();

        branch.select(["email"]);
        branch.select_not(["id"]);
        branch.filter(Condition::eq("status", "active"));
        branch.set_limit(5);

        assert_eq!(base.compile().0, ["id", "name"]);
        assert_eq!(sql_of(&base), "SELECT id, name FROM users");
        assert!(!base.is_read_only());
        assert_eq!(base.limit(), 0);

        // And the other direction.
        base.select_not(["name"]);
        assert_eq!(branch.compile().0, ["email"]);
    }

    #[test]
    fn conditions_conjoin_in_call_order() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.filter(Condition::eq("name", "foo"));
        q.filter(Condition::gt("age", 18_i64));

        let (_, stmt) = q.compile();
        assert_eq!(
            stmt.to_sql(),
            "SELECT id FROM users WHERE name = $1 AND age > $2"
        );
        assert_eq!(stmt.param_count(), 2);
        assert_eq!(stmt.params_ref().len(), 2);
    }

    #[test]
    fn order_calls_accumulate() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.order([ColumnOrder::asc("name")]);
        q.order([ColumnOrder::desc("created_at")]);

        assert_eq!(
            sql_of(&q),
            "SELECT id FROM users ORDER BY name ASC, created_at DESC"
        );
    }

    #[test]
    fn order_renders_after_where() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.filter(Condition::eq("status", "active"));
        q.order([ColumnOrder::desc("created_at")]);

        assert_eq!(
            sql_of(&q),
            "SELECT id FROM users WHERE status = $1 ORDER BY created_at DESC"
        );
    }

    #[test]
    fn pagination_is_not_rendered() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.set_limit(10);
        q.set_offset(20);
        q.order([ColumnOrder::desc("created_at")]);

        let (_, stmt) = q.compile();
        let sql = stmt.to_sql();
        assert!(sql.contains("ORDER BY created_at DESC"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn setters_overwrite() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.set_batch_size(100);
        q.set_batch_size(25);
        q.set_limit(7);
        q.set_offset(3);

        assert_eq!(q.batch_size(), 25);
        assert_eq!(q.limit(), 7);
        assert_eq!(q.offset(), 3);
    }

    #[test]
    fn page_converts_to_limit_offset() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.page(3, 25).unwrap();
        assert_eq!(q.limit(), 25);
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn page_one_starts_at_zero() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.page(1, 10).unwrap();
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_rejects_zero() {
        let mut q = SelectQuery::new("users", ["id"]);
        assert!(q.page(0, 10).is_err());
    }

    #[test]
    fn empty_projection_still_compiles() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.select_not(["id"]);

        let (columns, stmt) = q.compile();
        assert!(columns.is_empty());
        assert_eq!(stmt.to_sql(), "SELECT  FROM users");
    }

    #[test]
    fn unknown_columns_pass_through() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.select(["no_such_column"]);
        assert_eq!(sql_of(&q), "SELECT no_such_column FROM users");
    }

    #[test]
    fn display_renders_compiled_text() {
        let mut q = SelectQuery::new("users", ["id", "name"]);
        q.filter(Condition::eq("status", "active"));

        assert_eq!(
            q.to_string(),
            "SELECT id, name FROM users WHERE status = $1"
        );
    }

    #[test]
    fn trait_object_exposes_the_contract() {
        let mut q = SelectQuery::new("users", ["id"]);
        q.set_limit(10);
        let query: &dyn Query = &q;

        let (columns, stmt) = query.compile();
        assert_eq!(columns, ["id"]);
        assert_eq!(stmt.to_sql(), "SELECT id FROM users");
        assert_eq!(query.limit(), 10);
        assert_eq!(query.batch_size(), 50);
        assert!(!query.is_read_only());
    }
}
