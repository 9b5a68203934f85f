pub mod column;
pub mod record_store;
pub mod proxy;
