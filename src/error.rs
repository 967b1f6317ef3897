use thiserror::Error;

use deadpool_postgres::PoolError;

/// SQLSTATE class for integrity constraint violations (unique, foreign key, not null, check).
const INTEGRITY_CONSTRAINT_CLASS: &str = "23";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected a write because it breaks a schema constraint,
    /// e.g. a duplicate email on `add_user`.
    #[error("Constraint violation{}: {message}", constraint_suffix(.constraint.as_deref()))]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Input rejected before any statement was sent to the store.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The store could not be reached, or it failed the statement for a reason
    /// other than a constraint.
    #[error(transparent)]
    Transport(tokio_postgres::Error),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A returned row could not be mapped onto a record.
    #[error("Row mapping error: {0}")]
    RowMapping(String),
}

impl StoreError {
    /// Connection, pool checkout, and non-constraint query failures.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Pool(_))
    }

    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }
}

fn constraint_suffix(constraint: Option<&str>) -> String {
    constraint.map(|c| format!(" ({c})")).unwrap_or_default()
}

pub(crate) fn is_constraint_sqlstate(code: &str) -> bool {
    code.starts_with(INTEGRITY_CONSTRAINT_CLASS)
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error()
            && is_constraint_sqlstate(db_err.code().code())
        {
            return StoreError::ConstraintViolation {
                constraint: db_err.constraint().map(str::to_string),
                message: db_err.message().to_string(),
            };
        }
        StoreError::Transport(err)
    }
}
