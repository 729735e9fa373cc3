//! Shared types and result types for the database layer

pub mod errors;

pub use errors::{DatabaseError, InvalidChoice};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
