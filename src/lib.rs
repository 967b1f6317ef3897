//! Data-access layer for the LightBnB property-rental app.
//!
//! [`LightBnbStore`] wraps a shared PostgreSQL pool and exposes the six operations the
//! web layer calls: user lookup by email or id, user creation, a guest's past
//! reservations, filtered property search, and listing creation. Every call runs one
//! parameterized statement and reports failures as a typed [`StoreError`].
//!
//! ```rust,no_run
//! use lightbnb_store::prelude::*;
//!
//! # async fn demo() -> Result<(), StoreError> {
//! let store = LightBnbStore::connect(&StoreConfig::from_env()?)?;
//! let options = PropertySearch::from_query_pairs([("city", "Vancouver"), ("maximum", "150")])?;
//! for hit in store.get_all_properties(&options, Some(5)).await? {
//!     println!("{} {:?}", hit.property.title, hit.average_rating);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pool;
pub mod postgres;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod search;
pub mod store;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::StoreConfig;
pub use error::StoreError;
pub use pool::StorePool;
pub use store::LightBnbStore;
