//! Insertion-ordered column name sets.
//!
//! [`ColumnSet`] backs both the included and the excluded column state of a
//! [`SelectQuery`](crate::SelectQuery). Order matters: the resolved projection
//! of a compiled query follows the order in which columns were first added,
//! so it must be reproducible across compilations.

/// An ordered set of column names.
///
/// Keeps the backing sequence free of duplicates while preserving first-seen
/// insertion order. Membership checks are a linear scan, which is adequate
/// for typical entity widths of tens of columns.
///
/// Cloning produces an independently-owned set; mutating either side never
/// affects the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    cols: Vec<String>,
}

impl ColumnSet {
    /// Create a set from the given names, deduplicating on insert.
    pub fn new<I, S>(cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.add(cols);
        set
    }

    /// Whether `name` is present (exact string match).
    pub fn contains(&self, name: &str) -> bool {
        self.cols.iter().any(|c| c == name)
    }

    /// Append each name not already present, preserving first-seen order.
    ///
    /// Adding an existing name is a no-op.
    pub fn add<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.contains(&name) {
                self.cols.push(name);
            }
        }
    }

    /// Drop every entry present in `names`, keeping the relative order of
    /// the surviving entries.
    pub fn remove<S: AsRef<str>>(&mut self, names: &[S]) {
        self.cols
            .retain(|col| !names.iter().any(|n| n.as_ref() == col));
    }

    /// Iterate over the names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
