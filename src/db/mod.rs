pub mod log;
pub mod migrate;
pub mod pg_store;
pub mod sqlite_store;
pub mod stats;
pub mod store;

pub use store::{Backend, Store, open_store};
