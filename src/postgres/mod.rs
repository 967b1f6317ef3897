// PostgreSQL module - the only backend the store speaks
//
// - params: binding `RowValues` as driver parameters
// - query: row extraction and result-set building
// - executor: statement execution on a pooled client

pub mod executor;
pub mod params;
pub mod query;

pub use executor::{execute_batch, execute_select};
pub use params::Params;
pub use query::build_result_set_from_statement;
