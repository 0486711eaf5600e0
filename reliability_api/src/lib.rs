//! Types shared by the reliability engine and its callers: the network definition schema, the
//! component database and the structured error type.

pub mod config;
pub mod constants;
pub mod error;
