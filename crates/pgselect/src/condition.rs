//! Filter predicates for WHERE clauses.
//!
//! A [`Condition`] is an opaque predicate that renders itself into a SQL
//! fragment plus its bound parameter values. Conditions added to a
//! [`SelectQuery`](crate::SelectQuery) via `filter` are conjoined with `AND`
//! in call order; `and`/`or`/`not` build nested boolean trees.
//!
//! Column names are taken verbatim. Constructors are total: a condition
//! over a nonexistent column still renders well-formed SQL, and the
//! resulting database error belongs to the executor.

use crate::sql::Sql;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

type Value = Arc<dyn ToSql + Send + Sync>;

/// Comparison operator with its operand(s).
///
/// # Example
/// ```
/// use pgselect::{Condition, Op};
///
/// let cond = Condition::new("age", Op::Gte(18_i64));
/// ```
#[derive(Debug, Clone)]
pub enum Op<T> {
    /// column = value
    Eq(T),
    /// column != value
    Ne(T),
    /// column > value
    Gt(T),
    /// column >= value
    Gte(T),
    /// column < value
    Lt(T),
    /// column <= value
    Lte(T),
    /// LIKE pattern match
    Like(T),
    /// Case-insensitive LIKE (PostgreSQL ILIKE)
    Ilike(T),
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// IN (list)
    In(Vec<T>),
    /// NOT IN (list)
    NotIn(Vec<T>),
    /// BETWEEN a AND b
    Between(T, T),
}

#[derive(Debug, Clone)]
enum ConditionValue {
    Single(Value),
    Pair(Value, Value),
    List(Vec<Value>),
    None,
}

#[derive(Debug, Clone)]
enum ConditionInner {
    /// A structured comparison against one column.
    Expr {
        column: String,
        operator: &'static str,
        value: ConditionValue,
    },
    /// Raw SQL condition (escape hatch).
    ///
    /// # Safety
    /// Be careful with SQL injection when using raw conditions.
    Raw(String),
    /// Conjunction of sub-conditions (AND).
    And(Vec<Condition>),
    /// Disjunction of sub-conditions (OR).
    Or(Vec<Condition>),
    /// Negation of a sub-condition (NOT).
    Not(Box<Condition>),
}

/// An opaque filter predicate.
#[derive(Debug, Clone)]
pub struct Condition(ConditionInner);

impl Condition {
    /// Create a structured condition from a column name and operator.
    pub fn new<T>(column: impl Into<String>, op: Op<T>) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        let (operator, value) = match op {
            Op::Eq(v) => ("=", ConditionValue::Single(Arc::new(v))),
            Op::Ne(v) => ("!=", ConditionValue::Single(Arc::new(v))),
            Op::Gt(v) => (">", ConditionValue::Single(Arc::new(v))),
            Op::Gte(v) => (">=", ConditionValue::Single(Arc::new(v))),
            Op::Lt(v) => ("<", ConditionValue::Single(Arc::new(v))),
            Op::Lte(v) => ("<=", ConditionValue::Single(Arc::new(v))),
            Op::Like(v) => ("LIKE", ConditionValue::Single(Arc::new(v))),
            Op::Ilike(v) => ("ILIKE", ConditionValue::Single(Arc::new(v))),
            Op::IsNull => ("IS NULL", ConditionValue::None),
            Op::IsNotNull => ("IS NOT NULL", ConditionValue::None),
            Op::In(vals) => {
                let values: Vec<Value> = vals.into_iter().map(|v| Arc::new(v) as _).collect();
                ("IN", ConditionValue::List(values))
            }
            Op::NotIn(vals) => {
                let values: Vec<Value> = vals.into_iter().map(|v| Arc::new(v) as _).collect();
                ("NOT IN", ConditionValue::List(values))
            }
            Op::Between(from, to) => {
                ("BETWEEN", ConditionValue::Pair(Arc::new(from), Arc::new(to)))
            }
        };

        Condition(ConditionInner::Expr {
            column: column.into(),
            operator,
            value,
        })
    }

    /// Create a raw SQL condition.
    ///
    /// # Safety
    /// Be careful with SQL injection when using raw conditions.
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition(ConditionInner::Raw(sql.into()))
    }

    // ==================== Convenience constructors ====================

    /// column = value
    pub fn eq<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Eq(value))
    }

    /// column != value
    pub fn ne<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ne(value))
    }

    /// column > value
    pub fn gt<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gt(value))
    }

    /// column >= value
    pub fn gte<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gte(value))
    }

    /// column < value
    pub fn lt<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Lt(value))
    }

    /// column <= value
    pub fn lte<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Lte(value))
    }

    /// column LIKE pattern
    pub fn like<T>(column: impl Into<String>, pattern: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Like(pattern))
    }

    /// column ILIKE pattern
    pub fn ilike<T>(column: impl Into<String>, pattern: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ilike(pattern))
    }

    /// column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Condition(ConditionInner::Expr {
            column: column.into(),
            operator: "IS NULL",
            value: ConditionValue::None,
        })
    }

    /// column IS NOT NULL
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Condition(ConditionInner::Expr {
            column: column.into(),
            operator: "IS NOT NULL",
            value: ConditionValue::None,
        })
    }

    /// column IN (values...)
    pub fn in_list<T>(column: impl Into<String>, values: Vec<T>) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::In(values))
    }

    /// column NOT IN (values...)
    pub fn not_in<T>(column: impl Into<String>, values: Vec<T>) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::NotIn(values))
    }

    /// column BETWEEN from AND to
    pub fn between<T>(column: impl Into<String>, from: T, to: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Between(from, to))
    }

    // ==================== Boolean composition ====================

    /// Conjunction of sub-conditions. An empty conjunction renders `TRUE`.
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition(ConditionInner::And(conditions))
    }

    /// Disjunction of sub-conditions. An empty disjunction renders `FALSE`.
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition(ConditionInner::Or(conditions))
    }

    /// Negation of a sub-condition.
    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: Condition) -> Self {
        Condition(ConditionInner::Not(Box::new(condition)))
    }

    /// Append this condition into a [`Sql`] accumulator.
    ///
    /// Placeholders are generated by `Sql`, so parameter indices stay
    /// correct no matter what was appended before. Parentheses are added
    /// around compound sub-conditions to keep precedence right.
    pub fn append_to_sql(&self, sql: &mut Sql) {
        match &self.0 {
            ConditionInner::Raw(s) => {
                sql.push(s);
            }
            ConditionInner::Expr {
                column,
                operator,
                value,
            } => match value {
                ConditionValue::List(vals) if vals.is_empty() => {
                    // An empty IN list matches nothing, an empty NOT IN
                    // matches everything; keep the statement well-formed.
                    if *operator == "IN" {
                        sql.push("1=0");
                    } else {
                        sql.push("1=1");
                    }
                }
                ConditionValue::Single(v) => {
                    sql.push(column);
                    sql.push(" ");
                    sql.push(operator);
                    sql.push(" ");
                    sql.push_bind_value(v.clone());
                }
                ConditionValue::Pair(a, b) => {
                    sql.push(column);
                    sql.push(" ");
                    sql.push(operator);
                    sql.push(" ");
                    sql.push_bind_value(a.clone());
                    sql.push(" AND ");
                    sql.push_bind_value(b.clone());
                }
                ConditionValue::List(vals) => {
                    sql.push(column);
                    sql.push(" ");
                    sql.push(operator);
                    sql.push(" (");
                    for (i, v) in vals.iter().enumerate() {
                        if i > 0 {
                            sql.push(", ");
                        }
                        sql.push_bind_value(v.clone());
                    }
                    sql.push(")");
                }
                ConditionValue::None => {
                    sql.push(column);
                    sql.push(" ");
                    sql.push(operator);
                }
            },
            ConditionInner::And(conds) => {
                if conds.is_empty() {
                    sql.push("TRUE");
                } else if conds.len() == 1 {
                    conds[0].append_to_sql(sql);
                } else {
                    sql.push("(");
                    for (i, cond) in conds.iter().enumerate() {
                        if i > 0 {
                            sql.push(" AND ");
                        }
                        cond.append_to_sql(sql);
                    }
                    sql.push(")");
                }
            }
            ConditionInner::Or(conds) => {
                if conds.is_empty() {
                    sql.push("FALSE");
                } else if conds.len() == 1 {
                    conds[0].append_to_sql(sql);
                } else {
                    sql.push("(");
                    for (i, cond) in conds.iter().enumerate() {
                        if i > 0 {
                            sql.push(" OR ");
                        }
                        cond.append_to_sql(sql);
                    }
                    sql.push(")");
                }
            }
            ConditionInner::Not(cond) => {
                sql.push("(NOT ");
                cond.append_to_sql(sql);
                sql.push(")");
            }
        }
    }
}
