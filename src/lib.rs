pub mod clean;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod parser;
pub mod plot;
pub mod record;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
pub use record::Record;
pub use store::{AggregationStore, SortOrder};
