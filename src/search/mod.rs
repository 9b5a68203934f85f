pub mod executor;
pub mod aggregate;
