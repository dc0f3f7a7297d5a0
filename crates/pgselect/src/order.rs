//! ORDER BY fragments.

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// A column name paired with its sort direction.
///
/// The column name is taken as-is; whether it exists in the schema is the
/// executor's problem, not this crate's.
///
/// # Example
/// ```
/// use pgselect::ColumnOrder;
///
/// assert_eq!(ColumnOrder::desc("created_at").to_sql(), "created_at DESC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder {
    column: String,
    dir: SortDir,
}

impl ColumnOrder {
    pub fn new(column: impl Into<String>, dir: SortDir) -> Self {
        Self {
            column: column.into(),
            dir,
        }
    }

    /// Order by `column`, ascending.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDir::Asc)
    }

    /// Order by `column`, descending.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDir::Desc)
    }

    /// Render as `"<column> <ASC|DESC>"`.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.dir.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asc_renders() {
        assert_eq!(ColumnOrder::asc("id").to_sql(), "id ASC");
    }

    #[test]
    fn desc_renders() {
        assert_eq!(ColumnOrder::desc("created_at").to_sql(), "created_at DESC");
    }

    #[test]
    fn column_name_is_not_validated() {
        // Garbage in, garbage out; the executor surfaces the error.
        assert_eq!(ColumnOrder::asc("no such col").to_sql(), "no such col ASC");
    }
}
