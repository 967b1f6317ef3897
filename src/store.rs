use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{
    NewProperty, NewUser, Property, PropertyWithRating, Reservation, ReservationWithProperty,
    User,
};
use crate::pool::StorePool;
use crate::postgres::{execute_batch, execute_select};
use crate::query_builder::{InsertStatement, QueryAndParams};
use crate::results::ResultSet;
use crate::search::{
    DEFAULT_LIMIT, PropertySearch, check_limit, property_search_query, reservations_query,
};
use crate::types::{RowValues, fits_integer_column};

/// DDL for the four tables the store reads and writes.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// The data-access functions of the booking app.
///
/// Holds nothing but a pool handle: every call checks out a connection, runs exactly one
/// statement, and returns the connection. Clones share the pool.
#[derive(Clone, Debug)]
pub struct LightBnbStore {
    pool: StorePool,
}

impl LightBnbStore {
    #[must_use]
    pub fn new(pool: StorePool) -> Self {
        Self { pool }
    }

    /// Build the pool from `config` and wrap it. Does not connect.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` if the configuration is incomplete.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self::new(StorePool::new(config)?))
    }

    #[must_use]
    pub fn pool(&self) -> &StorePool {
        &self.pool
    }

    /// Close the underlying pool; later calls fail with a transport error.
    pub fn close(&self) {
        self.pool.close();
    }

    /// Run a batch of statements in one transaction.
    ///
    /// # Errors
    /// Returns an error if no connection is available or any statement fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get_connection().await?;
        execute_batch(&mut conn, sql).await.inspect_err(|e| {
            tracing::error!(error = %e, "batch execution failed");
        })
    }

    /// Create the users, properties, reservations and review tables if absent.
    ///
    /// # Errors
    /// See [`LightBnbStore::execute_batch`].
    pub async fn install_schema(&self) -> Result<(), StoreError> {
        self.execute_batch(SCHEMA_SQL).await
    }

    async fn fetch(
        &self,
        operation: &str,
        statement: &QueryAndParams,
    ) -> Result<ResultSet, StoreError> {
        self.fetch_logged(operation, statement, false).await
    }

    /// Run `statement`; with `redact` set the debug log carries only the parameter count.
    async fn fetch_logged(
        &self,
        operation: &str,
        statement: &QueryAndParams,
        redact: bool,
    ) -> Result<ResultSet, StoreError> {
        tracing::debug!(
            operation,
            query = %statement.query,
            params = %params_for_log(&statement.params, redact),
            "executing statement"
        );
        let result = async {
            let conn = self.pool.get_connection().await?;
            execute_select(&conn, &statement.query, &statement.params).await
        }
        .await;

        result.inspect_err(|e| {
            if e.is_constraint_violation() {
                tracing::warn!(operation, error = %e, "statement rejected by constraint");
            } else {
                tracing::error!(operation, error = %e, "statement failed");
            }
        })
    }

    async fn fetch_optional_user(
        &self,
        operation: &str,
        statement: QueryAndParams,
    ) -> Result<Option<User>, StoreError> {
        let rs = self.fetch(operation, &statement).await?;
        rs.results.first().map(User::try_from).transpose()
    }

    /// Look a user up by email. `Ok(None)` when no user has that email.
    ///
    /// # Errors
    /// Returns a transport error if the store cannot be queried.
    pub async fn get_user_with_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.fetch_optional_user(
            "get_user_with_email",
            QueryAndParams::new("SELECT * FROM users WHERE email = $1", vec![email.into()]),
        )
        .await
    }

    /// Look a user up by id. `Ok(None)` when no user has that id.
    ///
    /// # Errors
    /// Returns a transport error if the store cannot be queried.
    pub async fn get_user_with_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        // Ids are `SERIAL`; nothing outside the int4 range can exist.
        if !fits_integer_column(id) {
            return Ok(None);
        }
        self.fetch_optional_user(
            "get_user_with_id",
            QueryAndParams::new("SELECT * FROM users WHERE id = $1", vec![id.into()]),
        )
        .await
    }

    /// Insert a user and return it with its generated id.
    ///
    /// # Errors
    /// Returns `StoreError::ConstraintViolation` when the email is already taken, or a
    /// transport error.
    pub async fn add_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let statement =
            InsertStatement::new("users", &NewUser::COLUMNS, Vec::from(user.values()))?
                .returning_all();
        let rs = self.fetch_logged("add_user", &statement, true).await?;
        let row = rs
            .results
            .first()
            .ok_or_else(|| StoreError::RowMapping("insert into users returned no row".into()))?;
        User::try_from(row)
    }

    /// Completed reservations for `guest_id`, oldest stay first, at most `limit`
    /// ([`DEFAULT_LIMIT`] when `None`).
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` for a negative limit, or a transport error.
    pub async fn get_all_reservations(
        &self,
        guest_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<ReservationWithProperty>, StoreError> {
        let limit = check_limit(limit.unwrap_or(DEFAULT_LIMIT))?;
        if !fits_integer_column(guest_id) {
            return Ok(Vec::new());
        }
        let rs = self
            .fetch("get_all_reservations", &reservations_query(guest_id, limit))
            .await?;
        rs.map_rows(|row| {
            Ok(ReservationWithProperty {
                reservation: Reservation::from_joined_row(row, "reservation_id")?,
                property: Property::try_from(row)?,
                average_rating: row.opt_float("average_rating")?,
            })
        })
    }

    /// Search listings, cheapest first, at most `limit` ([`DEFAULT_LIMIT`] when `None`).
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` for a negative limit or non-finite rating
    /// (before anything is sent), or a transport error.
    pub async fn get_all_properties(
        &self,
        options: &PropertySearch,
        limit: Option<i64>,
    ) -> Result<Vec<PropertyWithRating>, StoreError> {
        let statement = self.property_search_query(options, limit)?;
        let rs = self.fetch("get_all_properties", &statement).await?;
        rs.map_rows(|row| PropertyWithRating::try_from(row))
    }

    /// The statement [`LightBnbStore::get_all_properties`] would run, for inspection.
    ///
    /// # Errors
    /// Same input checks as [`LightBnbStore::get_all_properties`].
    pub fn property_search_query(
        &self,
        options: &PropertySearch,
        limit: Option<i64>,
    ) -> Result<QueryAndParams, StoreError> {
        property_search_query(options, limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// Insert a listing and return the stored row.
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` if an integer field does not fit its column,
    /// `StoreError::ConstraintViolation` for an unknown owner, or a transport error.
    pub async fn add_property(&self, property: &NewProperty) -> Result<Property, StoreError> {
        property.check_ranges()?;
        let statement = InsertStatement::new(
            "properties",
            &NewProperty::COLUMNS,
            Vec::from(property.values()),
        )?
        .returning_all();
        let rs = self.fetch("add_property", &statement).await?;
        let row = rs.results.first().ok_or_else(|| {
            StoreError::RowMapping("insert into properties returned no row".into())
        })?;
        Property::try_from(row)
    }

    /// Insert a listing given as an untyped object (e.g. a form body).
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` without touching the store if the object does
    /// not have exactly the listing fields; otherwise as [`LightBnbStore::add_property`].
    pub async fn add_property_json(&self, value: serde_json::Value) -> Result<Property, StoreError> {
        let property = NewProperty::from_json(value)?;
        self.add_property(&property).await
    }
}

fn params_for_log(params: &[RowValues], redact: bool) -> String {
    if redact {
        format!("[{} redacted]", params.len())
    } else {
        format!("{params:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_params_hide_values() {
        let user = NewUser {
            name: "Devin Sanders".into(),
            email: "tristanjacobs@gmail.com".into(),
            password: "hunter2-secret".into(),
        };
        let logged = params_for_log(&user.values(), true);
        assert_eq!(logged, "[3 redacted]");
        assert!(!logged.contains("hunter2-secret"));
    }

    #[test]
    fn plain_params_are_listed_in_order() {
        let logged = params_for_log(&[RowValues::Int(4), RowValues::Int(2)], false);
        assert_eq!(logged, "[Int(4), Int(2)]");
    }
}
