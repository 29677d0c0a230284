//! Daily-record persistence.

pub mod postgres;
pub mod store;

pub use postgres::PostgresRecordStore;
pub use store::{InMemoryRecordStore, RecordStore};
