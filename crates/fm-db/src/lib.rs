//! fm-db - Warehouse connectors for Forma
//!
//! This crate provides the `Warehouse` trait used to run compiled SQL, a
//! DuckDB implementation, Redshift and Snowflake stubs, and the credential
//! types that select between them.

pub mod credentials;
pub mod duckdb;
pub mod error;
pub(crate) mod redshift;
pub(crate) mod snowflake;
pub mod traits;

pub use credentials::{connect, Credentials, RedshiftCredentials, SnowflakeCredentials};
pub use duckdb::DuckDbWarehouse;
pub use error::{DbError, DbResult};
pub use traits::{ExecuteOptions, Row, Warehouse};
