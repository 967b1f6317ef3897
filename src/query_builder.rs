use std::fmt::Write as _;

use crate::error::StoreError;
use crate::types::RowValues;

/// A SQL statement and its positional parameters, bundled so they cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query, `$1` first
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }
}

/// One `<expression> <operator> $n` comparison; `n` is assigned at render time.
#[derive(Debug, Clone)]
struct Predicate {
    comparison: String,
    value: RowValues,
}

/// Collects parameters and hands out the next placeholder, so the text and the
/// parameter list are always appended together.
struct Binder {
    sql: String,
    params: Vec<RowValues>,
}

impl Binder {
    fn bind(&mut self, value: RowValues) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn push_predicates(&mut self, keyword: &str, predicates: &[Predicate]) {
        let _ = write!(self.sql, "\n{keyword} true");
        for predicate in predicates {
            let placeholder = self.bind(predicate.value.clone());
            let _ = write!(self.sql, "\n  AND {} {placeholder}", predicate.comparison);
        }
    }
}

/// Builder for a SELECT whose filters are optional.
///
/// Predicates are kept as an ordered list of comparison/parameter pairs and only turned
/// into text by [`FilteredQuery::build`], which numbers placeholders in the order they
/// appear in the rendered statement. Both WHERE and HAVING start from `true`, so every
/// predicate is appended the same way no matter how many came before it.
///
/// ```rust
/// use lightbnb_store::prelude::*;
///
/// let built = FilteredQuery::new("SELECT * FROM properties")
///     .and_where("city LIKE", "%Van%")
///     .order_by("cost_per_night")
///     .limit(10)
///     .build();
/// assert_eq!(built.params.len(), 2);
/// assert!(built.query.ends_with("LIMIT $2"));
/// ```
#[derive(Debug, Clone)]
pub struct FilteredQuery {
    select: String,
    filters: Vec<Predicate>,
    group_by: Option<String>,
    having: Vec<Predicate>,
    order_by: Option<String>,
    limit: Option<RowValues>,
}

impl FilteredQuery {
    /// Start from the SELECT ... FROM ... JOIN part of the statement.
    pub fn new(select: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            filters: Vec::new(),
            group_by: None,
            having: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Append `AND <comparison> $n` to the WHERE clause.
    #[must_use]
    pub fn and_where(mut self, comparison: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.push_where(comparison, value);
        self
    }

    /// In-place form of [`FilteredQuery::and_where`] for conditional assembly.
    pub fn push_where(&mut self, comparison: impl Into<String>, value: impl Into<RowValues>) {
        self.filters.push(Predicate {
            comparison: comparison.into(),
            value: value.into(),
        });
    }

    /// Append `AND <comparison> $n` to the HAVING clause (aggregate filters).
    pub fn push_having(&mut self, comparison: impl Into<String>, value: impl Into<RowValues>) {
        self.having.push(Predicate {
            comparison: comparison.into(),
            value: value.into(),
        });
    }

    #[must_use]
    pub fn group_by(mut self, columns: impl Into<String>) -> Self {
        self.group_by = Some(columns.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, columns: impl Into<String>) -> Self {
        self.order_by = Some(columns.into());
        self
    }

    /// Cap the row count. The limit is always the last bound parameter.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(RowValues::Int(limit));
        self
    }

    /// Number of parameters [`FilteredQuery::build`] will produce.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.filters.len() + self.having.len() + usize::from(self.limit.is_some())
    }

    /// Render the statement text and its parameters together.
    #[must_use]
    pub fn build(&self) -> QueryAndParams {
        let mut binder = Binder {
            sql: self.select.trim_end().to_string(),
            params: Vec::with_capacity(self.param_count()),
        };

        binder.push_predicates("WHERE", &self.filters);
        if let Some(group_by) = &self.group_by {
            let _ = write!(binder.sql, "\nGROUP BY {group_by}");
        }
        if !self.having.is_empty() {
            binder.push_predicates("HAVING", &self.having);
        }
        if let Some(order_by) = &self.order_by {
            let _ = write!(binder.sql, "\nORDER BY {order_by}");
        }
        if let Some(limit) = &self.limit {
            let placeholder = binder.bind(limit.clone());
            let _ = write!(binder.sql, "\nLIMIT {placeholder}");
        }

        QueryAndParams::new(binder.sql, binder.params)
    }
}

/// `INSERT INTO <table> (<columns>) VALUES ($1, ...) RETURNING *`, with the column and
/// value lists checked against each other before any text is produced.
#[derive(Debug, Clone)]
pub struct InsertStatement<'a> {
    table: &'a str,
    columns: &'a [&'a str],
    values: Vec<RowValues>,
}

impl<'a> InsertStatement<'a> {
    /// # Errors
    /// Returns `StoreError::MalformedInput` if there are no columns or the number of values
    /// differs from the number of columns.
    pub fn new(
        table: &'a str,
        columns: &'a [&'a str],
        values: Vec<RowValues>,
    ) -> Result<Self, StoreError> {
        if columns.is_empty() {
            return Err(StoreError::MalformedInput(format!(
                "insert into {table} needs at least one column"
            )));
        }
        if columns.len() != values.len() {
            return Err(StoreError::MalformedInput(format!(
                "insert into {table} lists {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self {
            table,
            columns,
            values,
        })
    }

    #[must_use]
    pub fn returning_all(self) -> QueryAndParams {
        let placeholders = (1..=self.values.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders}) RETURNING *",
            self.table,
            self.columns.join(", ")
        );
        QueryAndParams::new(query, self.values)
    }
}
