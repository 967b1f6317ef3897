//! Convenient imports for common functionality.

pub use crate::config::StoreConfig;
pub use crate::error::StoreError;
pub use crate::model::{
    NewProperty, NewUser, Property, PropertyWithRating, Reservation, ReservationWithProperty,
    User,
};
pub use crate::pool::StorePool;
pub use crate::query_builder::{FilteredQuery, InsertStatement, QueryAndParams};
pub use crate::results::{ResultSet, StoreRow};
pub use crate::search::{DEFAULT_LIMIT, PropertySearch};
pub use crate::store::LightBnbStore;
pub use crate::types::RowValues;
